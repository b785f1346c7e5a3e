use crate::assets::fonts::FontFace;
use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::CardResult;
use crate::render::surface::Surface;
use crate::text::engine::{TextBrush, TextEngine};
use crate::text::wrap::{TextWrap, wrap_lines};

/// One wrapped line and the Y of its top edge.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    /// Line content.
    pub text: String,
    /// Top of the line box.
    pub y: f64,
}

/// Wrapped lines of a block with their vertical positions.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlockPlan {
    /// Lines top-down.
    pub lines: Vec<PlacedLine>,
    /// Y immediately below the last line; the origin Y when there are no lines.
    pub cursor_y: f64,
}

/// Wrap `text` and assign every line the same advance of `glyph_height + line_spacing`.
pub fn plan_text_block(text: &str, origin_y: f64, glyph_height: f32, wrap: TextWrap) -> TextBlockPlan {
    let advance = f64::from(glyph_height + wrap.line_spacing);
    let mut y = origin_y;
    let lines = wrap_lines(text, wrap.max_chars)
        .into_iter()
        .map(|text| {
            let line = PlacedLine { text, y };
            y += advance;
            line
        })
        .collect();
    TextBlockPlan { lines, cursor_y: y }
}

/// Draw a wrapped block top-down from `origin` and return the Y below its last line.
pub(crate) fn draw_text_block(
    surface: &mut Surface,
    engine: &mut TextEngine,
    text: &str,
    origin: Point,
    face: &FontFace,
    color: Rgb8,
    wrap: TextWrap,
) -> CardResult<f64> {
    let plan = plan_text_block(text, origin.y, face.glyph_height_px(), wrap);
    for line in &plan.lines {
        draw_text_line(surface, engine, &line.text, Point::new(origin.x, line.y), face, color)?;
    }
    Ok(plan.cursor_y)
}

/// Draw a single unwrapped line with its line box top-left at `origin`.
pub(crate) fn draw_text_line(
    surface: &mut Surface,
    engine: &mut TextEngine,
    text: &str,
    origin: Point,
    face: &FontFace,
    color: Rgb8,
) -> CardResult<()> {
    if text.is_empty() {
        return Ok(());
    }
    let layout = engine.layout_line(text, face, TextBrush::from(color))?;
    surface.draw_layout(&layout, face.paint_font(), origin);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/block.rs"]
mod tests;
