use super::*;

use crate::foundation::error::ErrorKind;
use crate::scene::program::{Overlay, OverlayAnchor, OverlayRole};

fn bare(content: FrameContent) -> FrameDescriptor {
    FrameDescriptor {
        content,
        overlays: Vec::new(),
    }
}

fn fixture_font() -> OverlayFont {
    let bytes = std::fs::read("tests/data/fonts/DejaVuSansMono.ttf").unwrap();
    OverlayFont::from_vec(bytes).unwrap()
}

#[test]
fn single_copies_the_frame_verbatim() {
    let canvas = Canvas::new(4, 2).unwrap();
    let mut bytes = Vec::with_capacity(canvas.byte_len());
    for i in 0..canvas.pixel_count() {
        bytes.extend_from_slice(&[i as u8, (i * 3) as u8, (i * 7) as u8, 255]);
    }
    let frame = PreparedFrame::from_rgba8(canvas, bytes.clone()).unwrap();

    let mut surface = Surface::new(canvas, None, OverlayStyle::default());
    surface.draw(&bare(FrameContent::Single { frame })).unwrap();

    let view = surface.view();
    assert_eq!(view.width, 4);
    assert_eq!(view.height, 2);
    assert_eq!(view.data, bytes.as_slice());
}

#[test]
fn crossfade_mixes_under_and_over() {
    let canvas = Canvas::new(2, 1).unwrap();
    let under = PreparedFrame::solid(canvas, [100, 100, 100]);
    let over = PreparedFrame::solid(canvas, [200, 200, 200]);

    let mut surface = Surface::new(canvas, None, OverlayStyle::default());
    surface
        .draw(&bare(FrameContent::Crossfade {
            under,
            over,
            alpha: 0.5,
        }))
        .unwrap();

    for px in surface.view().data.chunks_exact(4) {
        assert_eq!(px, [150, 150, 150, 255]);
    }
}

#[test]
fn wipe_draws_before_left_of_the_boundary() {
    let canvas = Canvas::new(40, 2).unwrap();
    let before = PreparedFrame::solid(canvas, [10, 0, 0]);
    let after = PreparedFrame::solid(canvas, [0, 20, 0]);

    let mut surface = Surface::new(canvas, None, OverlayStyle::default());
    surface
        .draw(&bare(FrameContent::Wipe {
            before,
            after,
            boundary_px: 20,
        }))
        .unwrap();

    // Default 8px divider straddles the boundary at columns [16, 24).
    for (i, px) in surface.view().data.chunks_exact(4).enumerate() {
        let col = (i % 40) as u32;
        let expect = if (16..24).contains(&col) {
            [255, 255, 255, 255]
        } else if col < 20 {
            [10, 0, 0, 255]
        } else {
            [0, 20, 0, 255]
        };
        assert_eq!(px, expect, "column {col}");
    }
}

#[test]
fn wipe_rest_positions_have_no_divider() {
    let canvas = Canvas::new(40, 1).unwrap();
    let before = PreparedFrame::solid(canvas, [10, 0, 0]);
    let after = PreparedFrame::solid(canvas, [0, 20, 0]);
    let mut surface = Surface::new(canvas, None, OverlayStyle::default());

    surface
        .draw(&bare(FrameContent::Wipe {
            before: before.clone(),
            after: after.clone(),
            boundary_px: 0,
        }))
        .unwrap();
    for px in surface.view().data.chunks_exact(4) {
        assert_eq!(px, [0, 20, 0, 255]);
    }

    surface
        .draw(&bare(FrameContent::Wipe {
            before,
            after,
            boundary_px: 40,
        }))
        .unwrap();
    for px in surface.view().data.chunks_exact(4) {
        assert_eq!(px, [10, 0, 0, 255]);
    }
}

#[test]
fn divider_can_be_disabled() {
    let canvas = Canvas::new(40, 1).unwrap();
    let before = PreparedFrame::solid(canvas, [10, 0, 0]);
    let after = PreparedFrame::solid(canvas, [0, 20, 0]);
    let mut surface = Surface::new(canvas, None, OverlayStyle::default());
    surface.set_divider_px(0);

    surface
        .draw(&bare(FrameContent::Wipe {
            before,
            after,
            boundary_px: 20,
        }))
        .unwrap();

    for (i, px) in surface.view().data.chunks_exact(4).enumerate() {
        let expect = if i < 20 { [10, 0, 0, 255] } else { [0, 20, 0, 255] };
        assert_eq!(px, expect, "column {i}");
    }
}

#[test]
fn mismatched_frame_is_rejected() {
    let surface_canvas = Canvas::new(4, 2).unwrap();
    let frame_canvas = Canvas::new(2, 2).unwrap();
    let frame = PreparedFrame::solid(frame_canvas, [1, 2, 3]);

    let mut surface = Surface::new(surface_canvas, None, OverlayStyle::default());
    let err = surface
        .draw(&bare(FrameContent::Single { frame }))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn overlays_are_skipped_without_a_font() {
    let canvas = Canvas::new(200, 120).unwrap();
    let frame = PreparedFrame::solid(canvas, [5, 5, 5]);
    let mut surface = Surface::new(canvas, None, OverlayStyle::default());

    surface
        .draw(&FrameDescriptor {
            content: FrameContent::Single {
                frame: frame.clone(),
            },
            overlays: vec![Overlay {
                text: "BEFORE".to_owned(),
                anchor: OverlayAnchor::TopLeft,
                role: OverlayRole::Label,
            }],
        })
        .unwrap();

    assert_eq!(surface.view().data, frame.as_bytes());
}

#[test]
fn overlays_mark_the_surface_when_a_font_is_present() {
    let canvas = Canvas::new(200, 120).unwrap();
    let frame = PreparedFrame::solid(canvas, [5, 5, 5]);
    let mut surface = Surface::new(canvas, Some(fixture_font()), OverlayStyle::default());

    surface
        .draw(&FrameDescriptor {
            content: FrameContent::Single {
                frame: frame.clone(),
            },
            overlays: vec![Overlay {
                text: "BEFORE".to_owned(),
                anchor: OverlayAnchor::TopLeft,
                role: OverlayRole::Label,
            }],
        })
        .unwrap();

    let view = surface.view();
    assert_ne!(view.data, frame.as_bytes());
    for px in view.data.chunks_exact(4) {
        assert_eq!(px[3], 255);
    }
}
