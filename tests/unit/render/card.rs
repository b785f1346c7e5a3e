use super::*;
use crate::assets::decode::solid_image;
use crate::assets::resolve::PLACEHOLDER_COLOR;
use crate::foundation::core::Rgb8;
use crate::test_support::fixture_fonts;
use crate::theme::ThemeRegistry;

fn title() -> Card {
    Card::Title(TitleCard {
        headline: "Welcome".into(),
        sub_text: Some("A short line of sub text".into()),
    })
}

fn body() -> Card {
    Card::Body(BodyCard {
        tag: "tip".into(),
        headline: "Study smart".into(),
        body: "Focus daily.".into(),
    })
}

fn region_is(frame: &FrameRgb, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb8) -> bool {
    (y0..y1).all(|y| (x0..x1).all(|x| frame.pixel(x, y) == color.to_array()))
}

#[test]
fn variants_use_their_photo_boxes() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let layout = CardLayout::default();
    let mut r = CardRenderer::new(themes.resolve("PK_ACADEMY"), &fonts, &layout);

    assert_eq!(r.photo_box(&title()), (1080, 850));
    assert_eq!(r.photo_box(&body()), (1080, 700));

    let wrong = solid_image(1080, 700, PLACEHOLDER_COLOR);
    assert!(matches!(
        r.render(&title(), "PK_ACADEMY", 1, &wrong),
        Err(CardError::Render(_))
    ));
}

#[test]
fn title_card_keeps_photo_down_to_850() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let theme = themes.resolve("PK_ACADEMY");
    let layout = CardLayout::default();
    let mut r = CardRenderer::new(theme, &fonts, &layout);

    let photo = solid_image(1080, 850, PLACEHOLDER_COLOR);
    let frame = r.render(&title(), "PK_ACADEMY", 1, &photo).unwrap();
    assert_eq!((frame.width, frame.height), (1080, 1350));

    // Right edge of the photo box, clear of labels.
    assert!(region_is(&frame, 1000, 700, 1080, 850, PLACEHOLDER_COLOR));
    // Just below the photo box, above the first text block.
    assert!(region_is(&frame, 0, 851, 1080, 925, theme.background));
    // The page number leaves ink in the bottom-right corner.
    assert!(!region_is(&frame, 900, 1290, 1020, 1340, theme.background));
}

#[test]
fn body_card_has_short_photo_and_accent_divider() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let theme = themes.resolve("PK_ACADEMY");
    let layout = CardLayout::default();
    let mut r = CardRenderer::new(theme, &fonts, &layout);

    let photo = solid_image(1080, 700, PLACEHOLDER_COLOR);
    let frame = r.render(&body(), "PK_ACADEMY", 2, &photo).unwrap();

    assert!(region_is(&frame, 1000, 600, 1080, 700, PLACEHOLDER_COLOR));
    assert!(region_is(&frame, 0, 701, 1080, 775, theme.background));

    // "Study smart" fits on one headline line.
    let advance = fonts.get(FontRole::Headline).glyph_height_px() + layout.body.headline.line_spacing;
    let divider_y = (780.0 + f64::from(advance) + layout.body.divider_gap) as u32;
    assert!(region_is(&frame, 82, divider_y - 1, 158, divider_y + 1, theme.accent));
    assert!(region_is(&frame, 170, divider_y - 1, 300, divider_y + 1, theme.background));
}

#[test]
fn splash_is_flat_with_centered_accent_handle() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let theme = themes.resolve("PK_ACADEMY");
    let layout = CardLayout::default();
    let mut r = CardRenderer::new(theme, &fonts, &layout);

    let frame = r.render_splash("PK_ACADEMY").unwrap();
    assert!(region_is(&frame, 0, 0, 1080, 500, theme.background));
    assert!(region_is(&frame, 0, 850, 1080, 1350, theme.background));
    let accent_px = (560..790)
        .flat_map(|y| (0..1080).map(move |x| (x, y)))
        .filter(|&(x, y)| frame.pixel(x, y) == theme.accent.to_array())
        .count();
    assert!(accent_px > 0);
}

#[test]
fn rendering_is_deterministic() {
    let tmp = tempfile::tempdir().unwrap();
    let Some(fonts) = fixture_fonts(tmp.path()) else {
        return;
    };
    let themes = ThemeRegistry::builtin();
    let layout = CardLayout::default();
    let photo = solid_image(1080, 700, PLACEHOLDER_COLOR);

    let mut a = CardRenderer::new(themes.resolve("GENITEACHER"), &fonts, &layout);
    let mut b = CardRenderer::new(themes.resolve("GENITEACHER"), &fonts, &layout);
    assert_eq!(
        a.render(&body(), "GENITEACHER", 2, &photo).unwrap(),
        b.render(&body(), "GENITEACHER", 2, &photo).unwrap()
    );
}
