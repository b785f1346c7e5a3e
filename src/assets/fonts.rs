use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use vello_cpu::peniko::{Blob, FontData};

use crate::foundation::error::{CardError, CardResult};

/// Characters whose bounding box sets the uniform line advance, tried in order.
const REPRESENTATIVE_GLYPHS: [char; 2] = ['가', 'H'];

/// Typographic role of a text block on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontRole {
    /// Title-card headline.
    TitleMain,
    /// Title-card sub-text.
    TitleSub,
    /// Brand handle and tag labels over photography.
    Tag,
    /// Body-card headline.
    Headline,
    /// Body-card body text.
    Body,
    /// Page number.
    Page,
    /// Splash brand handle.
    Logo,
}

impl FontRole {
    /// Every role, in slot order.
    pub const ALL: [FontRole; 7] = [
        FontRole::TitleMain,
        FontRole::TitleSub,
        FontRole::Tag,
        FontRole::Headline,
        FontRole::Body,
        FontRole::Page,
        FontRole::Logo,
    ];

    /// Fixed design size in pixels.
    pub fn size_px(self) -> f32 {
        match self {
            FontRole::TitleMain => 75.0,
            FontRole::TitleSub => 38.0,
            FontRole::Tag => 28.0,
            FontRole::Headline => 60.0,
            FontRole::Body => 34.0,
            FontRole::Page => 24.0,
            FontRole::Logo => 90.0,
        }
    }

    /// Stable lower-case name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            FontRole::TitleMain => "title-main",
            FontRole::TitleSub => "title-sub",
            FontRole::Tag => "tag",
            FontRole::Headline => "headline",
            FontRole::Body => "body",
            FontRole::Page => "page",
            FontRole::Logo => "logo",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One typeface family: a display name plus a font file per role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFamilySpec {
    /// Family name used in diagnostics.
    pub name: String,
    files: [String; 7],
}

impl FontFamilySpec {
    /// Build a family from an explicit file per role (indexed like [`FontRole::ALL`]).
    pub fn new(name: impl Into<String>, files: [String; 7]) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }

    /// Family where every role uses the same file.
    pub fn uniform(name: impl Into<String>, file: impl Into<String>) -> Self {
        let file = file.into();
        Self::new(name, std::array::from_fn(|_| file.clone()))
    }

    /// Family with one bold file (title-main, tag, headline, logo) and one regular file.
    pub fn with_bold(
        name: impl Into<String>,
        regular: impl Into<String>,
        bold: impl Into<String>,
    ) -> Self {
        let regular = regular.into();
        let bold = bold.into();
        Self::new(
            name,
            FontRole::ALL.map(|role| match role {
                FontRole::TitleMain | FontRole::Tag | FontRole::Headline | FontRole::Logo => {
                    bold.clone()
                }
                FontRole::TitleSub | FontRole::Body | FontRole::Page => regular.clone(),
            }),
        )
    }

    /// Preferred family.
    pub fn pretendard() -> Self {
        Self::new(
            "Pretendard",
            FontRole::ALL.map(|role| {
                let weight = match role {
                    FontRole::TitleMain | FontRole::Tag | FontRole::Headline => "Bold",
                    FontRole::TitleSub | FontRole::Body => "Medium",
                    FontRole::Page => "Regular",
                    FontRole::Logo => "ExtraBold",
                };
                format!("Pretendard-{weight}.ttf")
            }),
        )
    }

    /// Fallback family shipped with Windows.
    pub fn malgun() -> Self {
        Self::with_bold("Malgun Gothic", "malgun.ttf", "malgunbd.ttf")
    }

    /// File name configured for `role`.
    pub fn file(&self, role: FontRole) -> &str {
        &self.files[role.slot()]
    }
}

/// Where and what to load.
#[derive(Clone, Debug)]
pub struct FontConfig {
    /// Directories searched in order for each font file.
    pub search_dirs: Vec<PathBuf>,
    /// Family tried first.
    pub primary: FontFamilySpec,
    /// Family used for every role when any primary file is unavailable.
    pub fallback: FontFamilySpec,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            search_dirs: default_search_dirs(),
            primary: FontFamilySpec::pretendard(),
            fallback: FontFamilySpec::malgun(),
        }
    }
}

impl FontConfig {
    /// Put `dirs` ahead of the current search path.
    pub fn with_leading_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut search: Vec<PathBuf> = dirs.into_iter().collect();
        search.append(&mut self.search_dirs);
        self.search_dirs = search;
        self
    }
}

/// Working directory, `./fonts`, then the platform's font directories.
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from("."), PathBuf::from("fonts")];
    if cfg!(windows) {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Microsoft").join("Windows").join("Fonts"));
        }
    } else if cfg!(target_os = "macos") {
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join("Library").join("Fonts"));
        }
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
    } else {
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
            dirs.push(PathBuf::from(home).join(".fonts"));
        }
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        dirs.push(PathBuf::from("/usr/share/fonts"));
    }
    dirs
}

/// One loaded face at its role's size.
#[derive(Clone)]
pub struct FontFace {
    role: FontRole,
    path: PathBuf,
    bytes: Arc<Vec<u8>>,
    glyph_height_px: f32,
    weight: u16,
    paint: FontData,
}

impl FontFace {
    /// Role this face was loaded for.
    pub fn role(&self) -> FontRole {
        self.role
    }

    /// File the face was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw font file bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Point size in pixels.
    pub fn size_px(&self) -> f32 {
        self.role.size_px()
    }

    /// Bounding-box height of the representative glyph at this size, in whole pixels.
    pub fn glyph_height_px(&self) -> f32 {
        self.glyph_height_px
    }

    /// OS/2 weight class (400 regular, 700 bold).
    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub(crate) fn paint_font(&self) -> &FontData {
        &self.paint
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("role", &self.role)
            .field("path", &self.path)
            .field("len", &self.bytes.len())
            .field("glyph_height_px", &self.glyph_height_px)
            .field("weight", &self.weight)
            .finish()
    }
}

/// The seven faces used by a batch, all from one family.
#[derive(Clone, Debug)]
pub struct FontSet {
    family: String,
    fallback_reason: Option<String>,
    faces: Vec<FontFace>,
}

impl FontSet {
    /// Load the primary family, switching the whole set to the fallback family if any primary
    /// file is unavailable.
    ///
    /// Fails only when the fallback family is unavailable as well.
    pub fn load(cfg: &FontConfig) -> CardResult<Self> {
        let primary_err = match load_family(&cfg.primary, &cfg.search_dirs) {
            Ok(faces) => {
                tracing::debug!(family = %cfg.primary.name, "font family loaded");
                return Ok(Self {
                    family: cfg.primary.name.clone(),
                    fallback_reason: None,
                    faces,
                });
            }
            Err(e) => e,
        };

        tracing::warn!(
            primary = %cfg.primary.name,
            fallback = %cfg.fallback.name,
            error = %primary_err,
            "primary font family unavailable, switching every role to the fallback family"
        );
        let faces = load_family(&cfg.fallback, &cfg.search_dirs).map_err(|e| {
            CardError::font(format!(
                "no usable font family: '{}': {primary_err}; '{}': {e}",
                cfg.primary.name, cfg.fallback.name
            ))
        })?;
        Ok(Self {
            family: cfg.fallback.name.clone(),
            fallback_reason: Some(primary_err),
            faces,
        })
    }

    /// Family the faces were loaded from.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Whether the fallback family replaced the primary one.
    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }

    /// Why the primary family was rejected, when it was.
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    /// Face for `role`.
    pub fn get(&self, role: FontRole) -> &FontFace {
        &self.faces[role.slot()]
    }

    /// Faces in [`FontRole::ALL`] order.
    pub fn faces(&self) -> impl Iterator<Item = &FontFace> {
        self.faces.iter()
    }
}

fn load_family(spec: &FontFamilySpec, dirs: &[PathBuf]) -> Result<Vec<FontFace>, String> {
    let mut files: HashMap<&str, (PathBuf, Arc<Vec<u8>>, Blob<u8>)> = HashMap::new();
    let mut faces = Vec::with_capacity(FontRole::ALL.len());
    for role in FontRole::ALL {
        let file = spec.file(role);
        if !files.contains_key(file) {
            let path = locate(file, dirs).ok_or_else(|| format!("'{file}' not found"))?;
            let bytes = std::fs::read(&path)
                .map_err(|e| format!("read '{}': {e}", path.display()))?;
            let blob = Blob::from(bytes.clone());
            files.insert(file, (path, Arc::new(bytes), blob));
        }
        let (path, bytes, blob) = &files[file];
        let (glyph_height_px, weight) = face_metrics(bytes, role.size_px())
            .map_err(|e| format!("'{}': {e}", path.display()))?;
        let paint = FontData::new(blob.clone(), 0);
        faces.push(FontFace {
            role,
            path: path.clone(),
            bytes: Arc::clone(bytes),
            glyph_height_px,
            weight,
            paint,
        });
    }
    Ok(faces)
}

fn locate(file: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    let p = Path::new(file);
    if p.is_absolute() {
        return p.is_file().then(|| p.to_path_buf());
    }
    dirs.iter().map(|d| d.join(p)).find(|c| c.is_file())
}

fn face_metrics(bytes: &[u8], size_px: f32) -> Result<(f32, u16), String> {
    let face = ttf_parser::Face::parse(bytes, 0).map_err(|e| format!("parse font: {e}"))?;
    let upem = face.units_per_em();
    if upem == 0 {
        return Err("font has zero units per em".to_owned());
    }

    let units = REPRESENTATIVE_GLYPHS
        .iter()
        .find_map(|&c| {
            let gid = face.glyph_index(c)?;
            let bb = face.glyph_bounding_box(gid)?;
            Some(i32::from(bb.y_max) - i32::from(bb.y_min))
        })
        .filter(|h| *h > 0)
        .unwrap_or_else(|| i32::from(face.ascender()) - i32::from(face.descender()));

    let height = (units as f32 * size_px / f32::from(upem)).round();
    Ok((height, face.weight().to_number()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
