use super::*;
use crate::assets::fonts::{FontConfig, FontFamilySpec};
use crate::batch::sink::InMemorySink;
use crate::document::{BodyCard, Card, TitleCard};
use crate::foundation::error::CardError;
use crate::render::surface::FrameRgb;
use crate::test_support::{fixture_fonts, install_font};

fn doc(brand: &str) -> CardSetDocument {
    CardSetDocument::new(
        brand,
        vec![
            Card::Title(TitleCard {
                headline: "Hello".into(),
                sub_text: Some("World".into()),
            }),
            Card::Body(BodyCard {
                tag: "tip".into(),
                headline: "Study".into(),
                body: "Focus daily.".into(),
            }),
        ],
    )
}

fn options(root: &std::path::Path) -> BatchOptions {
    BatchOptions {
        assets_root: root.join("assets"),
        output_root: root.join("out"),
        ..BatchOptions::default()
    }
}

#[test]
fn output_dir_name_joins_brand_and_target() {
    assert_eq!(output_dir_name("B", "t"), "output_B_t");
    assert_eq!(BatchOptions::default().jpeg_quality, 95);
}

#[test]
fn two_cards_without_assets_write_three_files() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let batch = Batch::new(&themes, &fonts, options(tmp.path()));

    let report = batch.run(&doc("B"), "B", "t").unwrap();
    let dir = tmp.path().join("out").join("output_B_t");
    assert_eq!(report.output_dir.as_deref(), Some(dir.as_path()));
    assert_eq!(report.written(), 3);
    assert!(report.is_complete());
    assert_eq!(report.placeholders.len(), 2);
    assert!(
        report
            .placeholders
            .iter()
            .all(|p| p.reason == PlaceholderReason::Missing)
    );

    let mut names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["feed_01.jpg", "feed_02.jpg", "feed_03.jpg"]);
    for name in &names {
        let img = image::open(dir.join(name)).unwrap();
        assert_eq!((img.width(), img.height()), (1080, 1350));
    }
}

#[test]
fn rerun_is_byte_identical() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let batch = Batch::new(&themes, &fonts, options(tmp.path()));

    let first = batch.run(&doc("B"), "B", "t").unwrap();
    let before: Vec<Vec<u8>> = first
        .files
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();
    let second = batch.run(&doc("B"), "B", "t").unwrap();
    let after: Vec<Vec<u8>> = second
        .files
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();
    assert_eq!(first.files, second.files);
    assert_eq!(before, after);
}

#[test]
fn feed_indices_follow_card_order_and_first_is_title() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let batch = Batch::new(&themes, &fonts, options(tmp.path()));

    // Built directly so position 0 still holds a body card.
    let document = CardSetDocument {
        brand: "B".into(),
        cards: vec![
            Card::Body(BodyCard {
                tag: "x".into(),
                headline: "First".into(),
                body: String::new(),
            }),
            Card::Body(BodyCard::default()),
            Card::Body(BodyCard::default()),
        ],
    };
    let mut sink = InMemorySink::new();
    let report = batch.run_into(&document, "B", "t", &mut sink).unwrap();

    assert_eq!(sink.config().unwrap().expected, 4);
    assert!(sink.ended());
    let indices: Vec<u32> = sink.images().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, [1, 2, 3, 4]);
    assert_eq!(report.output_dir, None);
    assert!(report.files.is_empty());

    // Title photo reaches y=850, body photo stops at 700.
    let placeholder = crate::assets::resolve::PLACEHOLDER_COLOR.to_array();
    let white = themes.resolve("B").background.to_array();
    assert_eq!(sink.images()[0].1.pixel(1000, 760), placeholder);
    assert_eq!(sink.images()[1].1.pixel(1000, 760), white);
}

#[test]
fn corrupt_asset_is_reported_and_card_still_written() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let brand_dir = tmp.path().join("assets").join("B");
    std::fs::create_dir_all(&brand_dir).unwrap();
    std::fs::write(brand_dir.join("img2.png"), b"not a png").unwrap();

    let themes = ThemeRegistry::builtin();
    let batch = Batch::new(&themes, &fonts, options(tmp.path()));
    let mut sink = InMemorySink::new();
    let report = batch.run_into(&doc("B"), "B", "t", &mut sink).unwrap();

    assert_eq!(report.written(), 3);
    let corrupt: Vec<_> = report
        .placeholders
        .iter()
        .filter(|p| matches!(p.reason, PlaceholderReason::Corrupt { .. }))
        .collect();
    assert_eq!(corrupt.len(), 1);
    assert_eq!(corrupt[0].index, FeedIndex(2));
}

struct FailingSink {
    fail_at: FeedIndex,
    inner: InMemorySink,
}

impl ImageSink for FailingSink {
    fn begin(&mut self, cfg: SinkConfig) -> CardResult<()> {
        self.inner.begin(cfg)
    }

    fn push_image(
        &mut self,
        idx: FeedIndex,
        frame: &FrameRgb,
    ) -> CardResult<Option<std::path::PathBuf>> {
        if idx == self.fail_at {
            return Err(CardError::output("disk full"));
        }
        self.inner.push_image(idx, frame)
    }

    fn end(&mut self) -> CardResult<()> {
        self.inner.end()
    }
}

#[test]
fn write_failure_is_recorded_and_batch_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let batch = Batch::new(&themes, &fonts, options(tmp.path()));
    let mut sink = FailingSink {
        fail_at: FeedIndex(2),
        inner: InMemorySink::new(),
    };
    let report = batch.run_into(&doc("B"), "B", "t", &mut sink).unwrap();

    assert_eq!(report.written, [FeedIndex(1), FeedIndex(3)]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, FeedIndex(2));
    assert_eq!(report.failures[0].stage, FailureStage::Write);
    assert!(!report.is_complete());
}

#[test]
fn unwritable_output_root_fails_the_target() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    std::fs::write(tmp.path().join("out"), b"a file, not a dir").unwrap();
    let themes = ThemeRegistry::builtin();
    let batch = Batch::new(&themes, &fonts, options(tmp.path()));
    let err = batch.run(&doc("B"), "B", "t").unwrap_err();
    assert!(matches!(err, CardError::Output(_)));
}

#[test]
fn fallback_family_still_renders_every_image() {
    let tmp = tempfile::tempdir().unwrap();
    if install_font(tmp.path(), "fallback.ttf").is_none() {
        return;
    }
    let cfg = FontConfig {
        search_dirs: vec![tmp.path().to_path_buf()],
        primary: FontFamilySpec::uniform("Missing", "missing.ttf"),
        fallback: FontFamilySpec::uniform("Fallback", "fallback.ttf"),
    };
    let fonts = FontSet::load(&cfg).unwrap();
    assert!(fonts.used_fallback());

    let themes = ThemeRegistry::builtin();
    let batch = Batch::new(&themes, &fonts, options(tmp.path()));
    let report = batch.run(&doc("GENITEACHER"), "GENITEACHER", "t").unwrap();
    assert_eq!(report.written(), 3);
    assert!(report.is_complete());
}
