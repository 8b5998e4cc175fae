use super::*;

use crate::foundation::error::ErrorKind;

fn fixture_font() -> OverlayFont {
    let bytes = std::fs::read("tests/data/fonts/DejaVuSansMono.ttf").unwrap();
    OverlayFont::from_vec(bytes).unwrap()
}

fn black(canvas: Canvas) -> Vec<u8> {
    let mut data = vec![0u8; canvas.byte_len()];
    for px in data.chunks_exact_mut(4) {
        px[3] = 255;
    }
    data
}

/// Changed pixels as `(x, y, max channel delta)`.
fn ink(before: &[u8], after: &[u8], canvas: Canvas) -> Vec<(i64, i64, u8)> {
    let mut out = Vec::new();
    for (i, (b, a)) in before
        .chunks_exact(4)
        .zip(after.chunks_exact(4))
        .enumerate()
    {
        if b != a {
            let x = (i % canvas.width as usize) as i64;
            let y = (i / canvas.width as usize) as i64;
            let delta = (0..3).map(|c| a[c].abs_diff(b[c])).max().unwrap();
            out.push((x, y, delta));
        }
    }
    out
}

fn overlay(text: &str, anchor: OverlayAnchor, role: OverlayRole) -> Overlay {
    Overlay {
        text: text.to_owned(),
        anchor,
        role,
    }
}

#[test]
fn rejects_unparseable_bytes() {
    let err = OverlayFont::from_vec(vec![0u8; 16]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn empty_text_draws_nothing() {
    let canvas = Canvas::new(64, 64).unwrap();
    let font = fixture_font();
    let mut data = black(canvas);
    let before = data.clone();
    draw_overlay(
        &mut data,
        canvas,
        &font,
        &OverlayStyle::default(),
        &overlay("", OverlayAnchor::TopLeft, OverlayRole::Label),
    );
    assert_eq!(data, before);
}

#[test]
fn label_ink_stays_inside_the_top_left_margins() {
    let canvas = Canvas::new(200, 120).unwrap();
    let font = fixture_font();
    let style = OverlayStyle::default();
    let mut data = black(canvas);
    let before = data.clone();
    draw_overlay(
        &mut data,
        canvas,
        &font,
        &style,
        &overlay("AB", OverlayAnchor::TopLeft, OverlayRole::Label),
    );

    let marks = ink(&before, &data, canvas);
    assert!(!marks.is_empty());
    let margin = i64::from(style.margin_px);
    for &(x, y, _) in &marks {
        assert!(x >= margin - 1, "ink at x={x} left of the margin");
        assert!(y >= margin - 1, "ink at y={y} above the margin");
    }
    // Stem interiors reach full coverage, so the brightest ink sits at the
    // label opacity.
    let brightest = marks.iter().map(|&(_, _, d)| d).max().unwrap();
    assert!(brightest >= 200, "expected near-opaque ink, got {brightest}");
    for px in data.chunks_exact(4) {
        assert_eq!(px[3], 255);
    }
}

#[test]
fn right_anchored_ink_stops_at_the_margin_line() {
    let canvas = Canvas::new(200, 140).unwrap();
    let font = fixture_font();
    let style = OverlayStyle::default();
    let mut data = black(canvas);
    let before = data.clone();
    draw_overlay(
        &mut data,
        canvas,
        &font,
        &style,
        &overlay("W", OverlayAnchor::TopRight, OverlayRole::Label),
    );

    let marks = ink(&before, &data, canvas);
    assert!(!marks.is_empty());
    let right_edge = i64::from(canvas.width) - i64::from(style.margin_px);
    for &(x, _, _) in &marks {
        assert!(x <= right_edge, "ink at x={x} past the margin line");
        assert!(
            x >= right_edge - 2 * style.label_px as i64,
            "ink at x={x} far left of the anchor"
        );
    }
}

#[test]
fn watermark_is_translucent_and_bottom_anchored() {
    let canvas = Canvas::new(200, 140).unwrap();
    let font = fixture_font();
    let style = OverlayStyle::default();
    let mut data = black(canvas);
    let before = data.clone();
    draw_overlay(
        &mut data,
        canvas,
        &font,
        &style,
        &overlay("W", OverlayAnchor::BottomRight, OverlayRole::Watermark),
    );

    let marks = ink(&before, &data, canvas);
    assert!(!marks.is_empty());
    let bottom_edge = i64::from(canvas.height) - i64::from(style.margin_px);
    for &(_, y, _) in &marks {
        assert!(y <= bottom_edge, "ink at y={y} below the margin line");
        assert!(
            y >= bottom_edge - 2 * style.watermark_px as i64,
            "ink at y={y} far above the anchor"
        );
    }
    let brightest = marks.iter().map(|&(_, _, d)| d).max().unwrap();
    assert!(
        (80..=165).contains(&i64::from(brightest)),
        "watermark ink should stay translucent, got {brightest}"
    );
}

#[test]
fn offcanvas_ink_is_clipped() {
    let canvas = Canvas::new(80, 80).unwrap();
    let font = fixture_font();
    let mut data = black(canvas);
    draw_overlay(
        &mut data,
        canvas,
        &font,
        &OverlayStyle::default(),
        &overlay(
            "A STRING FAR WIDER THAN THE CANVAS",
            OverlayAnchor::TopRight,
            OverlayRole::Label,
        ),
    );
    for px in data.chunks_exact(4) {
        assert_eq!(px[3], 255);
    }
}

#[test]
fn advance_width_grows_with_text() {
    let font = fixture_font();
    let scaled = font.face.as_scaled(PxScale::from(42.0));
    let one = advance_width(&scaled, "A");
    let two = advance_width(&scaled, "AB");
    assert!(one > 0.0);
    assert!(two > one);
}
