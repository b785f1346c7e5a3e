use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "cardnews", version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render card-set documents into feed images.
    Render(RenderArgs),
    /// Show which font files each role resolves to.
    Fonts(FontArgs),
}

#[derive(Args, Debug, Clone)]
struct FontArgs {
    /// Extra directory searched for font files before the system font directories.
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Card-set documents (`card_data_{target}.json`); discovered in `--dir` when omitted.
    docs: Vec<PathBuf>,

    /// Directory scanned for documents.
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Root of the `{brand}/{target}/img{N}.*` asset tree.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Directory receiving the `output_{brand}_{target}` folders.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// JSON file of extra themes keyed by brand.
    #[arg(long)]
    themes: Option<PathBuf>,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = cardnews::DEFAULT_JPEG_QUALITY)]
    quality: u8,

    #[command(flatten)]
    fonts: FontArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_fonts(args: &FontArgs) -> anyhow::Result<cardnews::FontSet> {
    let cfg = cardnews::FontConfig::default().with_leading_dirs(args.font_dirs.iter().cloned());
    let fonts = cardnews::FontSet::load(&cfg).context("load fonts")?;
    if let Some(reason) = fonts.fallback_reason() {
        eprintln!("fonts: using fallback family '{}' ({reason})", fonts.family());
    }
    Ok(fonts)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let docs = if args.docs.is_empty() {
        cardnews::discover_documents(&args.dir)?
    } else {
        args.docs.clone()
    };
    if docs.is_empty() {
        eprintln!(
            "no card_data_*.json documents found in '{}', nothing to render",
            args.dir.display()
        );
        return Ok(());
    }

    let mut themes = cardnews::ThemeRegistry::builtin();
    if let Some(path) = &args.themes {
        let n = themes
            .merge_json(path)
            .with_context(|| format!("load themes '{}'", path.display()))?;
        eprintln!("themes: loaded {n} from '{}'", path.display());
    }
    let fonts = load_fonts(&args.fonts)?;

    let batch = cardnews::Batch::new(
        &themes,
        &fonts,
        cardnews::BatchOptions {
            assets_root: args.assets.clone(),
            output_root: args.out.clone(),
            jpeg_quality: args.quality,
        },
    );

    let mut failed_targets = 0usize;
    for path in &docs {
        if !render_document(&batch, &themes, path) {
            failed_targets += 1;
        }
    }

    if failed_targets > 0 {
        anyhow::bail!("{failed_targets} of {} target(s) did not complete", docs.len());
    }
    Ok(())
}

/// Render one document; returns whether every image was written.
fn render_document(
    batch: &cardnews::Batch<'_>,
    themes: &cardnews::ThemeRegistry,
    path: &Path,
) -> bool {
    let Some(target) = cardnews::target_from_path(path) else {
        eprintln!(
            "skip '{}': file name is not card_data_{{target}}.json",
            path.display()
        );
        return false;
    };
    let doc = match cardnews::CardSetDocument::from_path(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("skip target '{target}': {e}");
            return false;
        }
    };
    let brand = doc.brand.clone();
    if !themes.contains(&brand) {
        eprintln!("[{brand}/{target}] unknown brand, using the default theme");
    }

    let report = match batch.run(&doc, &brand, &target) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("[{brand}/{target}] failed: {e}");
            return false;
        }
    };

    for p in &report.placeholders {
        match &p.reason {
            cardnews::PlaceholderReason::Missing => eprintln!(
                "[{brand}/{target}] card {}: no background image, using placeholder",
                p.index.0
            ),
            cardnews::PlaceholderReason::Corrupt { path, error } => eprintln!(
                "[{brand}/{target}] card {}: unreadable background '{}' ({error}), using placeholder",
                p.index.0,
                path.display()
            ),
        }
    }
    for f in &report.failures {
        eprintln!(
            "[{brand}/{target}] card {}: {} failed: {}",
            f.index.0, f.stage, f.message
        );
    }

    let dir = report
        .output_dir
        .as_deref()
        .map(|d| d.display().to_string())
        .unwrap_or_default();
    eprintln!(
        "[{brand}/{target}] wrote {} of {} image(s) to {dir}",
        report.written(),
        doc.expected_outputs()
    );
    report.is_complete()
}

fn cmd_fonts(args: FontArgs) -> anyhow::Result<()> {
    let fonts = load_fonts(&args)?;
    println!("family:   {}", fonts.family());
    println!("fallback: {}", fonts.used_fallback());
    for face in fonts.faces() {
        println!("{}:", face.role().name());
        println!("  path:         {}", face.path().display());
        println!("  size_px:      {}", face.size_px());
        println!("  glyph_height: {}", face.glyph_height_px());
        println!("  sha256:       {}", sha256_hex(face.bytes()));
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
