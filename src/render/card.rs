use image::RgbImage;

use crate::assets::fonts::{FontRole, FontSet};
use crate::document::{BodyCard, Card, TitleCard};
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{CardError, CardResult};
use crate::render::surface::{FrameRgb, Surface};
use crate::render::layout::CardLayout;
use crate::text::block::{draw_text_block, draw_text_line};
use crate::text::engine::TextEngine;
use crate::theme::Theme;

/// Composes card canvases from a theme, a font set and the layout constants.
///
/// The renderer performs no file I/O: backgrounds come in as bitmaps and frames go out as
/// pixels.
pub struct CardRenderer<'a> {
    theme: &'a Theme,
    fonts: &'a FontSet,
    layout: &'a CardLayout,
    text: TextEngine,
}

impl<'a> CardRenderer<'a> {
    /// Renderer bound to one theme and font set.
    pub fn new(theme: &'a Theme, fonts: &'a FontSet, layout: &'a CardLayout) -> Self {
        Self {
            theme,
            fonts,
            layout,
            text: TextEngine::new(),
        }
    }

    /// Photo box `(width, height)` for a card variant.
    pub fn photo_box(&self, card: &Card) -> (u32, u32) {
        let height = match card {
            Card::Title(_) => self.layout.title.photo_height,
            Card::Body(_) => self.layout.body.photo_height,
        };
        (self.layout.canvas.width, height)
    }

    /// Render one card with page label `page`; `photo` must match [`Self::photo_box`].
    pub fn render(
        &mut self,
        card: &Card,
        brand: &str,
        page: u32,
        photo: &RgbImage,
    ) -> CardResult<FrameRgb> {
        let expected = self.photo_box(card);
        if photo.dimensions() != expected {
            return Err(CardError::render(format!(
                "photo is {:?}, expected {expected:?}",
                photo.dimensions()
            )));
        }

        let mut surface = Surface::new(
            self.layout.canvas.width,
            self.layout.canvas.height,
            self.theme.background,
        )?;
        surface.draw_image(photo, Point::ORIGIN)?;
        match card {
            Card::Title(t) => self.draw_title(&mut surface, t, brand)?,
            Card::Body(b) => self.draw_body(&mut surface, b)?,
        }
        self.draw_page_number(&mut surface, page)?;
        Ok(surface.finish())
    }

    /// Closing image: flat background with `@brand` centered in the accent color.
    pub fn render_splash(&mut self, brand: &str) -> CardResult<FrameRgb> {
        let mut surface = Surface::new(
            self.layout.canvas.width,
            self.layout.canvas.height,
            self.theme.background,
        )?;
        let handle = format!("@{brand}");
        let face = self.fonts.get(FontRole::Logo);
        let (w, h) = self.text.measure(&handle, face)?;
        let origin = Point::new(
            (f64::from(surface.width()) - f64::from(w)) / 2.0,
            (f64::from(surface.height()) - f64::from(h)) / 2.0,
        );
        draw_text_line(
            &mut surface,
            &mut self.text,
            &handle,
            origin,
            face,
            self.theme.accent,
        )?;
        Ok(surface.finish())
    }

    fn draw_title(&mut self, surface: &mut Surface, card: &TitleCard, brand: &str) -> CardResult<()> {
        let l = &self.layout.title;
        draw_text_line(
            surface,
            &mut self.text,
            &format!("@{brand}"),
            l.brand_label,
            self.fonts.get(FontRole::Tag),
            self.layout.label_color,
        )?;

        let origin = self.layout.text_origin(l.photo_height);
        let cursor = draw_text_block(
            surface,
            &mut self.text,
            &card.headline,
            origin,
            self.fonts.get(FontRole::TitleMain),
            self.theme.primary,
            l.headline,
        )?;

        if let Some(sub) = &card.sub_text {
            draw_text_block(
                surface,
                &mut self.text,
                sub,
                Point::new(origin.x, cursor + l.sub_text_gap),
                self.fonts.get(FontRole::TitleSub),
                self.theme.secondary,
                l.sub_text,
            )?;
        }
        Ok(())
    }

    fn draw_body(&mut self, surface: &mut Surface, card: &BodyCard) -> CardResult<()> {
        let l = &self.layout.body;
        draw_text_line(
            surface,
            &mut self.text,
            &card.tag.to_uppercase(),
            l.tag_label,
            self.fonts.get(FontRole::Tag),
            self.layout.label_color,
        )?;

        let origin = self.layout.text_origin(l.photo_height);
        let cursor = draw_text_block(
            surface,
            &mut self.text,
            &card.headline,
            origin,
            self.fonts.get(FontRole::Headline),
            self.theme.primary,
            l.headline,
        )?;

        let divider_y = cursor + l.divider_gap;
        let half = l.divider_thickness / 2.0;
        surface.fill_rect(
            Rect::new(
                origin.x,
                divider_y - half,
                origin.x + l.divider_length,
                divider_y + half,
            ),
            self.theme.accent,
        );

        draw_text_block(
            surface,
            &mut self.text,
            &card.body,
            Point::new(origin.x, cursor + l.body_gap),
            self.fonts.get(FontRole::Body),
            self.theme.secondary,
            l.body,
        )?;
        Ok(())
    }

    fn draw_page_number(&mut self, surface: &mut Surface, page: u32) -> CardResult<()> {
        let label = page.to_string();
        let face = self.fonts.get(FontRole::Page);
        let (w, _) = self.text.measure(&label, face)?;
        let margin = self.layout.page_margin;
        let origin = Point::new(
            f64::from(surface.width()) - f64::from(w) - margin,
            f64::from(surface.height()) - margin,
        );
        draw_text_line(
            surface,
            &mut self.text,
            &label,
            origin,
            face,
            self.layout.page_color,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/card.rs"]
mod tests;
