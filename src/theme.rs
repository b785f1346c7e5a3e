use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{CardError, CardResult};

/// Brand used when a document does not name one, and whose theme backs unknown brands.
pub const DEFAULT_BRAND: &str = "GENITEACHER";

/// Fixed five-color palette for one brand.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Theme {
    /// Canvas fill behind photography and text.
    pub background: Rgb8,
    /// Headline text.
    pub primary: Rgb8,
    /// Sub-text and body text.
    pub secondary: Rgb8,
    /// Divider accent and splash logo.
    pub accent: Rgb8,
    /// Hairline color for separators.
    pub divider: Rgb8,
}

impl Theme {
    const fn light(accent: Rgb8) -> Self {
        Self {
            background: Rgb8::new(0xFF, 0xFF, 0xFF),
            primary: Rgb8::new(0x11, 0x11, 0x11),
            secondary: Rgb8::new(0x55, 0x55, 0x55),
            accent,
            divider: Rgb8::new(0xEE, 0xEE, 0xEE),
        }
    }
}

/// Brand key to [`Theme`] table with default-on-miss lookup.
#[derive(Clone, Debug)]
pub struct ThemeRegistry {
    themes: BTreeMap<String, Theme>,
    default_key: String,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeRegistry {
    /// Built-in brand table.
    pub fn builtin() -> Self {
        let mut themes = BTreeMap::new();
        themes.insert(
            "GENITEACHER".to_owned(),
            Theme::light(Rgb8::new(0x00, 0xC7, 0x3C)),
        );
        themes.insert(
            "PK_ACADEMY".to_owned(),
            Theme::light(Rgb8::new(0x1A, 0x2B, 0x50)),
        );
        Self {
            themes,
            default_key: DEFAULT_BRAND.to_owned(),
        }
    }

    /// Insert or replace the theme for `brand`.
    pub fn insert(&mut self, brand: impl Into<String>, theme: Theme) {
        self.themes.insert(brand.into(), theme);
    }

    /// Exact-match lookup; unknown brands get the default theme.
    pub fn resolve(&self, brand: &str) -> &Theme {
        if let Some(theme) = self.themes.get(brand) {
            return theme;
        }
        tracing::debug!(brand, default = %self.default_key, "unknown brand, using default theme");
        self.default_theme()
    }

    /// Return `true` when `brand` has its own entry.
    pub fn contains(&self, brand: &str) -> bool {
        self.themes.contains_key(brand)
    }

    /// Theme substituted for unknown brands.
    pub fn default_theme(&self) -> &Theme {
        // The default key is always present: `builtin` inserts it and nothing removes entries.
        &self.themes[&self.default_key]
    }

    /// Brand keys in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    /// Overlay themes from a JSON object mapping brand keys to palettes.
    pub fn merge_reader<R: std::io::Read>(&mut self, r: R) -> CardResult<usize> {
        let overlay: BTreeMap<String, Theme> = serde_json::from_reader(r)
            .map_err(|e| CardError::document(format!("parse theme JSON: {e}")))?;
        let n = overlay.len();
        self.themes.extend(overlay);
        Ok(n)
    }

    /// Overlay themes from a JSON file on disk.
    pub fn merge_json(&mut self, path: impl AsRef<Path>) -> CardResult<usize> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CardError::document(format!("open theme JSON '{}': {e}", path.display()))
        })?;
        self.merge_reader(BufReader::new(f))
    }
}

#[cfg(test)]
#[path = "../tests/unit/theme.rs"]
mod tests;
