//! Fixtures shared by unit tests that need a real typeface.

use std::path::{Path, PathBuf};

use crate::assets::fonts::{FontConfig, FontFamilySpec, FontSet};

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// First system font found on this machine.
pub(crate) fn system_font() -> Option<PathBuf> {
    CANDIDATES.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Copy the system font into `dir` under `name`.
pub(crate) fn install_font(dir: &Path, name: &str) -> Option<PathBuf> {
    let src = system_font()?;
    let dst = dir.join(name);
    std::fs::copy(&src, &dst).ok()?;
    Some(dst)
}

/// Font config whose primary family is a single installed file in `dir`.
pub(crate) fn fixture_font_config(dir: &Path) -> Option<FontConfig> {
    install_font(dir, "fixture.ttf")?;
    Some(FontConfig {
        search_dirs: vec![dir.to_path_buf()],
        primary: FontFamilySpec::uniform("Fixture", "fixture.ttf"),
        fallback: FontFamilySpec::uniform("Fixture Fallback", "fixture-fallback.ttf"),
    })
}

/// Loaded fixture set, or `None` when the machine has no usable font.
pub(crate) fn fixture_fonts(dir: &Path) -> Option<FontSet> {
    let cfg = fixture_font_config(dir)?;
    FontSet::load(&cfg).ok()
}
