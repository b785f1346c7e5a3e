use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::core::FeedIndex;
use crate::foundation::error::{CardError, CardResult};
use crate::render::surface::FrameRgb;

/// JPEG quality used for feed images.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Configuration provided to an [`ImageSink`] before the first image of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Number of images the batch intends to push (cards plus splash).
    pub expected: usize,
}

/// Sink contract for consuming rendered images in feed order.
///
/// Ordering contract: `push_image` is called with strictly increasing [`FeedIndex`] values,
/// but an index may be skipped when the card at that position failed to render.
pub trait ImageSink {
    /// Called once before any image is pushed.
    fn begin(&mut self, cfg: SinkConfig) -> CardResult<()>;
    /// Persist one image; returns where it went, if anywhere.
    fn push_image(&mut self, idx: FeedIndex, frame: &FrameRgb) -> CardResult<Option<PathBuf>>;
    /// Called once after the last image.
    fn end(&mut self) -> CardResult<()>;
}

/// Writes `feed_NN.jpg` files into one directory, overwriting existing files.
#[derive(Debug, Clone)]
pub struct JpegDirSink {
    dir: PathBuf,
    quality: u8,
}

impl JpegDirSink {
    /// Sink writing into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Override the JPEG quality (clamped to 1..=100).
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSink for JpegDirSink {
    fn begin(&mut self, _cfg: SinkConfig) -> CardResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            CardError::output(format!("create output dir '{}': {e}", self.dir.display()))
        })
    }

    fn push_image(&mut self, idx: FeedIndex, frame: &FrameRgb) -> CardResult<Option<PathBuf>> {
        let path = self.dir.join(idx.file_name());
        write_jpeg(&path, frame, self.quality)?;
        Ok(Some(path))
    }

    fn end(&mut self) -> CardResult<()> {
        Ok(())
    }
}

/// Encode `frame` as JPEG into `path`; the file is flushed and closed before returning.
pub fn write_jpeg(path: &Path, frame: &FrameRgb, quality: u8) -> CardResult<()> {
    let f = File::create(path)
        .map_err(|e| CardError::output(format!("create '{}': {e}", path.display())))?;
    let mut w = BufWriter::new(f);
    JpegEncoder::new_with_quality(&mut w, quality)
        .encode(&frame.data, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| CardError::output(format!("encode '{}': {e}", path.display())))?;
    w.flush()
        .map_err(|e| CardError::output(format!("flush '{}': {e}", path.display())))?;
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    images: Vec<(FeedIndex, FrameRgb)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Borrow the captured images in push order.
    pub fn images(&self) -> &[(FeedIndex, FrameRgb)] {
        &self.images
    }

    /// Whether `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }
}

impl ImageSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CardResult<()> {
        self.cfg = Some(cfg);
        self.images.clear();
        self.ended = false;
        Ok(())
    }

    fn push_image(&mut self, idx: FeedIndex, frame: &FrameRgb) -> CardResult<Option<PathBuf>> {
        self.images.push((idx, frame.clone()));
        Ok(None)
    }

    fn end(&mut self) -> CardResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/sink.rs"]
mod tests;
