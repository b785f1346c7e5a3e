use std::fmt;
use std::path::PathBuf;

use crate::assets::fonts::FontSet;
use crate::assets::resolve::{AssetResolver, AssetSource, PlaceholderReason};
use crate::batch::sink::{DEFAULT_JPEG_QUALITY, ImageSink, JpegDirSink, SinkConfig};
use crate::document::CardSetDocument;
use crate::foundation::core::FeedIndex;
use crate::foundation::error::CardResult;
use crate::render::surface::FrameRgb;
use crate::render::card::CardRenderer;
use crate::render::layout::CardLayout;
use crate::theme::ThemeRegistry;

/// Filesystem settings for a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    /// Root of the `{brand}/{target}/img{N}.*` asset tree.
    pub assets_root: PathBuf,
    /// Directory that receives the `output_{brand}_{target}` folders.
    pub output_root: PathBuf,
    /// JPEG quality of written images.
    pub jpeg_quality: u8,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from("assets"),
            output_root: PathBuf::from("."),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Output folder name for one brand and target.
pub fn output_dir_name(brand: &str, target: &str) -> String {
    format!("output_{brand}_{target}")
}

/// Which step of a card failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureStage {
    /// Composing the canvas.
    Render,
    /// Handing the image to the sink.
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Render => "render",
            Self::Write => "write",
        })
    }
}

/// A card that produced no image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardFailure {
    /// Feed position of the missing image.
    pub index: FeedIndex,
    /// Step that failed.
    pub stage: FailureStage,
    /// Human-readable cause.
    pub message: String,
}

/// A card rendered over a placeholder instead of a photo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderUse {
    /// Feed position of the card.
    pub index: FeedIndex,
    /// Why no photo was used.
    pub reason: PlaceholderReason,
}

/// Outcome of one `(brand, target)` batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReport {
    /// Brand the batch was themed for.
    pub brand: String,
    /// Audience target.
    pub target: String,
    /// Output folder, when the sink writes to disk.
    pub output_dir: Option<PathBuf>,
    /// Feed positions handed to the sink successfully, in order.
    pub written: Vec<FeedIndex>,
    /// Files created on disk, in order.
    pub files: Vec<PathBuf>,
    /// Cards drawn over a placeholder background.
    pub placeholders: Vec<PlaceholderUse>,
    /// Cards that produced no image.
    pub failures: Vec<CardFailure>,
}

impl BatchReport {
    fn new(brand: &str, target: &str) -> Self {
        Self {
            brand: brand.to_owned(),
            target: target.to_owned(),
            output_dir: None,
            written: Vec::new(),
            files: Vec::new(),
            placeholders: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of images written.
    pub fn written(&self) -> usize {
        self.written.len()
    }

    /// Whether every image was produced.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders card-set documents into feed images.
///
/// Themes and fonts are borrowed so one loaded [`FontSet`] serves every target of a run.
pub struct Batch<'a> {
    themes: &'a ThemeRegistry,
    fonts: &'a FontSet,
    assets: AssetResolver,
    layout: CardLayout,
    options: BatchOptions,
}

impl<'a> Batch<'a> {
    /// Batch with the default card layout.
    pub fn new(themes: &'a ThemeRegistry, fonts: &'a FontSet, options: BatchOptions) -> Self {
        Self {
            themes,
            fonts,
            assets: AssetResolver::new(options.assets_root.clone()),
            layout: CardLayout::default(),
            options,
        }
    }

    /// Replace the card layout.
    pub fn with_layout(mut self, layout: CardLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Options this batch was built with.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Render `document` into `{output_root}/output_{brand}_{target}/feed_NN.jpg`.
    ///
    /// Fails only when the output folder cannot be prepared; per-card problems are collected
    /// in the report.
    pub fn run(
        &self,
        document: &CardSetDocument,
        brand: &str,
        target: &str,
    ) -> CardResult<BatchReport> {
        let dir = self
            .options
            .output_root
            .join(output_dir_name(brand, target));
        let mut sink = JpegDirSink::new(&dir).with_quality(self.options.jpeg_quality);
        let mut report = self.run_into(document, brand, target, &mut sink)?;
        report.output_dir = Some(dir);
        Ok(report)
    }

    /// Render `document` and hand each image to `sink` in feed order.
    #[tracing::instrument(skip(self, document, sink), fields(cards = document.cards.len()))]
    pub fn run_into(
        &self,
        document: &CardSetDocument,
        brand: &str,
        target: &str,
        sink: &mut dyn ImageSink,
    ) -> CardResult<BatchReport> {
        let theme = self.themes.resolve(brand);
        let mut renderer = CardRenderer::new(theme, self.fonts, &self.layout);
        let mut report = BatchReport::new(brand, target);

        sink.begin(SinkConfig {
            width: self.layout.canvas.width,
            height: self.layout.canvas.height,
            expected: document.expected_outputs(),
        })?;

        for (pos, card) in document.cards.iter().enumerate() {
            let idx = FeedIndex::for_position(pos);
            let card = card.clone().at_position(pos);
            let asset = self
                .assets
                .resolve(brand, target, idx.0, renderer.photo_box(&card));
            if let AssetSource::Placeholder(reason) = asset.source {
                report.placeholders.push(PlaceholderUse { index: idx, reason });
            }

            match renderer.render(&card, brand, idx.0, &asset.image) {
                Ok(frame) => push(sink, idx, &frame, &mut report),
                Err(e) => {
                    tracing::warn!(index = idx.0, error = %e, "card render failed");
                    report.failures.push(CardFailure {
                        index: idx,
                        stage: FailureStage::Render,
                        message: e.to_string(),
                    });
                }
            }
            tracing::debug!(index = idx.0, title = card.is_title(), "card done");
        }

        let splash_idx = FeedIndex::for_position(document.cards.len());
        match renderer.render_splash(brand) {
            Ok(frame) => push(sink, splash_idx, &frame, &mut report),
            Err(e) => {
                tracing::warn!(index = splash_idx.0, error = %e, "splash render failed");
                report.failures.push(CardFailure {
                    index: splash_idx,
                    stage: FailureStage::Render,
                    message: e.to_string(),
                });
            }
        }

        sink.end()?;
        tracing::info!(
            written = report.written(),
            failed = report.failures.len(),
            placeholders = report.placeholders.len(),
            "batch finished"
        );
        Ok(report)
    }
}

fn push(
    sink: &mut dyn ImageSink,
    idx: FeedIndex,
    frame: &FrameRgb,
    report: &mut BatchReport,
) {
    match sink.push_image(idx, frame) {
        Ok(path) => {
            report.written.push(idx);
            report.files.extend(path);
        }
        Err(e) => {
            tracing::warn!(index = idx.0, error = %e, "image write failed");
            report.failures.push(CardFailure {
                index: idx,
                stage: FailureStage::Write,
                message: e.to_string(),
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/orchestrator.rs"]
mod tests;
