use std::collections::HashMap;
use std::path::PathBuf;

use crate::assets::fonts::FontFace;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{CardError, CardResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgb8> for TextBrush {
    fn from(c: Rgb8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Stateful helper for shaping single lines with the faces of a [`crate::FontSet`].
///
/// Each font file is registered with Parley once; the face's weight is pinned on every layout
/// so that several files of one family resolve to the intended face.
pub(crate) struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    families: HashMap<PathBuf, String>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> CardResult<String> {
        if let Some(name) = self.families.get(face.path()) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes().to_vec()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CardError::font(format!(
                "no font families registered from '{}'",
                face.path().display()
            ))
        })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::font("registered font family has no name"))?
            .to_string();

        self.families.insert(face.path().to_path_buf(), name.clone());
        Ok(name)
    }

    /// Shape `text` as one unbroken line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        face: &FontFace,
        brush: TextBrush,
    ) -> CardResult<parley::Layout<TextBrush>> {
        let family = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(face.size_px()));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face.weight())),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance width and line-box height of `text` as one line.
    pub(crate) fn measure(&mut self, text: &str, face: &FontFace) -> CardResult<(f32, f32)> {
        let layout = self.layout_line(text, face, TextBrush::default())?;
        Ok((layout.width(), layout.height()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
