//! Cardnews renders themed social-media card sets on a CPU raster pipeline.
//!
//! A card-set document holds one title card followed by body cards. Each card is drawn over a
//! background photo resolved from an asset tree, and the set closes with a flat brand splash:
//!
//! - Pick a [`Theme`] from the [`ThemeRegistry`]
//! - Load a [`FontSet`] once (primary family, whole-set fallback)
//! - Run a [`Batch`] per `(brand, target)` into `output_{brand}_{target}/feed_NN.jpg`
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod batch;
pub(crate) mod render;
pub(crate) mod text;

/// Card-set documents and discovery.
pub mod document;
/// Brand themes.
pub mod theme;

#[cfg(test)]
#[path = "../tests/unit/support.rs"]
pub(crate) mod test_support;

pub use crate::foundation::core::{Canvas, FeedIndex, Point, Rect, Rgb8};
pub use crate::foundation::error::{CardError, CardResult};

pub use crate::assets::fonts::{
    FontConfig, FontFace, FontFamilySpec, FontRole, FontSet, default_search_dirs,
};
pub use crate::assets::resolve::{
    AssetResolver, AssetSource, PLACEHOLDER_COLOR, PlaceholderReason, ResolvedAsset,
};
pub use crate::batch::orchestrator::{
    Batch, BatchOptions, BatchReport, CardFailure, FailureStage, PlaceholderUse, output_dir_name,
};
pub use crate::batch::sink::{
    DEFAULT_JPEG_QUALITY, ImageSink, InMemorySink, JpegDirSink, SinkConfig, write_jpeg,
};
pub use crate::document::{
    BodyCard, Card, CardSetDocument, TitleCard, discover_documents, target_from_path,
};
pub use crate::render::surface::FrameRgb;
pub use crate::render::card::CardRenderer;
pub use crate::render::layout::{BodyLayout, CardLayout, TitleLayout};
pub use crate::text::block::{PlacedLine, TextBlockPlan, plan_text_block};
pub use crate::text::wrap::{TextWrap, wrap_lines};
pub use crate::theme::{DEFAULT_BRAND, Theme, ThemeRegistry};
