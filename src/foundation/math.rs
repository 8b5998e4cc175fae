pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Round a unit-interval scalar to a 0..=255 weight.
pub(crate) fn unit_to_u8(t: f64) -> u16 {
    ((t.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16
}
