use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::assets::decode::{cover_crop, decode_image, solid_image};
use crate::foundation::core::Rgb8;

/// Neutral fill used when no background photo can be resolved.
pub const PLACEHOLDER_COLOR: Rgb8 = Rgb8::new(0xF5, 0xF5, 0xF5);

/// Why a placeholder was substituted for a background photo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaceholderReason {
    /// No file matched either search directory.
    Missing,
    /// A file matched but could not be read or decoded.
    Corrupt {
        /// The file that failed.
        path: PathBuf,
        /// Human-readable failure.
        error: String,
    },
}

/// Where a resolved background came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// Matched in the audience-target folder.
    Target(PathBuf),
    /// Matched in the brand-common folder.
    Common(PathBuf),
    /// Nothing usable was found.
    Placeholder(PlaceholderReason),
}

impl AssetSource {
    /// The file used, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Target(p) | Self::Common(p) => Some(p),
            Self::Placeholder(_) => None,
        }
    }
}

/// A background bitmap cropped to its destination box.
#[derive(Clone, Debug)]
pub struct ResolvedAsset {
    /// Pixels, exactly the requested box size.
    pub image: RgbImage,
    /// Provenance of the pixels.
    pub source: AssetSource,
}

/// Locates per-card background photos under an assets root.
///
/// Layout: `{root}/{brand}/{target}/img{N}.*` first, then `{root}/{brand}/img{N}.*`.
#[derive(Clone, Debug)]
pub struct AssetResolver {
    root: PathBuf,
    placeholder: Rgb8,
}

impl AssetResolver {
    /// Resolver rooted at `root` (usually `./assets`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            placeholder: PLACEHOLDER_COLOR,
        }
    }

    /// Root directory searched by this resolver.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Select the file for `(brand, target, index)` without decoding it.
    ///
    /// When several files share the `img{index}.` stem the lexicographically smallest name
    /// wins, so repeated runs pick the same file.
    pub fn find(&self, brand: &str, target: &str, index: u32) -> Option<AssetSource> {
        let brand_dir = self.root.join(brand);
        if let Some(p) = first_match(&brand_dir.join(target), index) {
            return Some(AssetSource::Target(p));
        }
        first_match(&brand_dir, index).map(AssetSource::Common)
    }

    /// Resolve, decode and cover-crop the background for one card.
    ///
    /// Never fails: a missing or undecodable file yields a uniform placeholder of `size`.
    pub fn resolve(&self, brand: &str, target: &str, index: u32, size: (u32, u32)) -> ResolvedAsset {
        let (width, height) = size;
        let Some(source) = self.find(brand, target, index) else {
            tracing::debug!(brand, target, index, "no background found, using placeholder");
            return self.placeholder(size, PlaceholderReason::Missing);
        };
        let Some(path) = source.path() else {
            return self.placeholder(size, PlaceholderReason::Missing);
        };

        let decoded = std::fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| decode_image(&bytes).map_err(|e| format!("{e:#}")));
        match decoded {
            Ok(img) => {
                tracing::debug!(path = %path.display(), "background resolved");
                ResolvedAsset {
                    image: cover_crop(&img, width, height),
                    source,
                }
            }
            Err(error) => {
                tracing::warn!(
                    brand,
                    target,
                    index,
                    path = %path.display(),
                    %error,
                    "background could not be decoded, using placeholder"
                );
                let path = path.to_path_buf();
                self.placeholder(size, PlaceholderReason::Corrupt { path, error })
            }
        }
    }

    fn placeholder(&self, (width, height): (u32, u32), reason: PlaceholderReason) -> ResolvedAsset {
        ResolvedAsset {
            image: solid_image(width, height, self.placeholder),
            source: AssetSource::Placeholder(reason),
        }
    }
}

fn first_match(dir: &Path, index: u32) -> Option<PathBuf> {
    let prefix = format!("img{index}.");
    let entries = std::fs::read_dir(dir).ok()?;
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.len() > prefix.len() && name.starts_with(&prefix))
        .collect();
    names.sort();
    names.into_iter().next().map(|name| dir.join(name))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
