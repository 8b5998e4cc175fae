use crate::foundation::error::{ShowreelError, ShowreelResult};
use crate::foundation::math::{add_sat_u8, mul_div255, unit_to_u8};

/// Premultiplied RGBA8 pixel. Opaque pixels are identical in straight and
/// premultiplied form, which is what the surface holds everywhere.
pub(crate) type PremulRgba8 = [u8; 4];

/// Source-over blend of one premultiplied pixel at an extra opacity.
pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f64) -> PremulRgba8 {
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = unit_to_u8(opacity);
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Linear blend of two premultiplied pixels: `a` at weight `1-t`, `b` at `t`.
pub(crate) fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f64) -> PremulRgba8 {
    let tt = unit_to_u8(t);
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255(u16::from(a[i]), it);
        let bv = mul_div255(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

/// Blend `src` over `dst` in place at opacity `t`, pixel by pixel. Both
/// buffers must be equal-length RGBA8.
pub(crate) fn blend_in_place(dst: &mut [u8], src: &[u8], t: f64) -> ShowreelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ShowreelError::configuration(
            "blend_in_place expects equal-length rgba8 buffers",
        ));
    }
    if t >= 1.0 {
        dst.copy_from_slice(src);
        return Ok(());
    }
    if t <= 0.0 {
        return Ok(());
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = crossfade([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], t);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
