use std::sync::Arc;

use image::RgbImage;

use crate::foundation::core::{Point, Rect, Rgb8};
use crate::foundation::error::{CardError, CardResult};
use crate::text::engine::TextBrush;

/// A rendered card as opaque RGB8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGB8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// Pixel at `(x, y)`; panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Drawing surface for one card, backed by a `vello_cpu` render context.
///
/// Layers are painted in call order; [`Surface::finish`] rasterizes them into a frame.
pub(crate) struct Surface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Surface {
    /// Surface of `width x height` filled with `background`.
    pub(crate) fn new(width: u32, height: u32, background: Rgb8) -> CardResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| CardError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| CardError::render("surface height exceeds u16"))?;
        let mut surface = Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
        };
        surface.fill_rect(
            Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
            background,
        );
        Ok(surface)
    }

    /// Surface width in pixels.
    pub(crate) fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Surface height in pixels.
    pub(crate) fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Rgb8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(solid(color));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    /// Paint `img` with its top-left corner at `origin`, unscaled.
    pub(crate) fn draw_image(&mut self, img: &RgbImage, origin: Point) -> CardResult<()> {
        let paint = rgb_to_image_paint(img)?;
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.width()),
            f64::from(img.height()),
        ));
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }

    /// Paint the glyph runs of a shaped layout with its line box top-left at `origin`.
    pub(crate) fn draw_layout(
        &mut self,
        layout: &parley::Layout<TextBrush>,
        font: &vello_cpu::peniko::FontData,
        origin: Point,
    ) {
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }

    /// Rasterize every painted layer into an RGB frame.
    pub(crate) fn finish(mut self) -> FrameRgb {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let premul = pixmap.data_as_u8_slice();
        let mut data = Vec::with_capacity(premul.len() / 4 * 3);
        for px in premul.chunks_exact(4) {
            data.extend_from_slice(&unpremultiply(px));
        }
        FrameRgb {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
        }
    }
}

fn solid(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn unpremultiply(px: &[u8]) -> [u8; 3] {
    let a = u16::from(px[3]);
    match a {
        255 => [px[0], px[1], px[2]],
        0 => [0, 0, 0],
        _ => {
            let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a / 2) / a).min(255) as u8 };
            [un(px[0]), un(px[1]), un(px[2])]
        }
    }
}

fn rgb_to_image_paint(img: &RgbImage) -> CardResult<vello_cpu::Image> {
    let w: u16 = img
        .width()
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16"))?;
    let h: u16 = img
        .height()
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16"))?;
    // Opaque pixels are already premultiplied.
    let pixels: Vec<vello_cpu::peniko::color::PremulRgba8> = img
        .pixels()
        .map(|p| vello_cpu::peniko::color::PremulRgba8::from_u8_array([p[0], p[1], p[2], 255]))
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
