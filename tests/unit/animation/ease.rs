use super::*;

const CURVES: [Ease; 7] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
];

#[test]
fn endpoints_are_fixed() {
    for ease in CURVES {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?} at 0");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?} at 1");
    }
}

#[test]
fn input_is_clamped() {
    for ease in CURVES {
        assert_eq!(ease.apply(-3.0), 0.0, "{ease:?} below range");
        assert_eq!(ease.apply(7.5), 1.0, "{ease:?} above range");
    }
}

#[test]
fn in_out_quad_midpoint_and_quarters() {
    assert_eq!(Ease::InOutQuad.apply(0.5), 0.5);
    assert_eq!(Ease::InOutQuad.apply(0.25), 0.125);
    assert_eq!(Ease::InOutQuad.apply(0.75), 0.875);
}

#[test]
fn curves_are_monotonic() {
    for ease in CURVES {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = ease.apply(f64::from(i) / 100.0);
            assert!(v >= prev, "{ease:?} decreased at step {i}");
            prev = v;
        }
    }
}

#[test]
fn default_is_in_out_quad() {
    assert_eq!(Ease::default(), Ease::InOutQuad);
}
