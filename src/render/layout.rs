use crate::foundation::core::{Canvas, Point, Rgb8};
use crate::text::wrap::TextWrap;

/// Placement constants for the title card.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleLayout {
    /// Height of the photo box at the top of the canvas.
    pub photo_height: u32,
    /// Top-left of the `@brand` label.
    pub brand_label: Point,
    /// Headline wrapping.
    pub headline: TextWrap,
    /// Gap between the headline cursor and the sub-text.
    pub sub_text_gap: f64,
    /// Sub-text wrapping.
    pub sub_text: TextWrap,
}

/// Placement constants for body cards.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyLayout {
    /// Height of the photo box at the top of the canvas.
    pub photo_height: u32,
    /// Top-left of the upper-cased tag label.
    pub tag_label: Point,
    /// Headline wrapping.
    pub headline: TextWrap,
    /// Distance from the headline cursor to the divider's center line.
    pub divider_gap: f64,
    /// Divider length.
    pub divider_length: f64,
    /// Divider thickness.
    pub divider_thickness: f64,
    /// Distance from the headline cursor to the body text.
    pub body_gap: f64,
    /// Body wrapping.
    pub body: TextWrap,
}

/// Every hand-tuned number of the card designs.
///
/// Wrap widths are character counts tuned per font role, not derived from glyph metrics.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayout {
    /// Output canvas.
    pub canvas: Canvas,
    /// Left edge of headline/sub-text/body blocks.
    pub text_left: f64,
    /// Distance from the bottom of the photo box to the first text block.
    pub text_top_gap: f64,
    /// Color of labels drawn over photography.
    pub label_color: Rgb8,
    /// Page number color.
    pub page_color: Rgb8,
    /// Page number offset from the right edge (to the label's right side) and from the bottom
    /// edge (to the label's top).
    pub page_margin: f64,
    /// Title card.
    pub title: TitleLayout,
    /// Body cards.
    pub body: BodyLayout,
}

impl Default for CardLayout {
    fn default() -> Self {
        Self {
            canvas: Canvas::FEED,
            text_left: 80.0,
            text_top_gap: 80.0,
            label_color: Rgb8::WHITE,
            page_color: Rgb8::new(0xCC, 0xCC, 0xCC),
            page_margin: 60.0,
            title: TitleLayout {
                photo_height: 850,
                brand_label: Point::new(50.0, 50.0),
                headline: TextWrap::new(10, 25.0),
                sub_text_gap: 35.0,
                sub_text: TextWrap::new(22, 20.0),
            },
            body: BodyLayout {
                photo_height: 700,
                tag_label: Point::new(60.0, 60.0),
                headline: TextWrap::new(12, 25.0),
                divider_gap: 35.0,
                divider_length: 80.0,
                divider_thickness: 4.0,
                body_gap: 70.0,
                body: TextWrap::new(24, 20.0),
            },
        }
    }
}

impl CardLayout {
    /// Origin of the first text block below a photo box of `photo_height`.
    pub fn text_origin(&self, photo_height: u32) -> Point {
        Point::new(self.text_left, f64::from(photo_height) + self.text_top_gap)
    }
}
