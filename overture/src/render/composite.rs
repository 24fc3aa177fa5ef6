use crate::foundation::error::{OvertureError, OvertureResult};
use crate::foundation::math::mul_div255_u8;

/// A premultiplied RGBA8 buffer placed at an integer offset in a larger target.
pub(crate) struct Placed<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) x: i64,
    pub(crate) y: i64,
}

/// Source-over composite of `src` onto `dst` (same size), both premultiplied.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> OvertureResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(OvertureError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        over_px(d, [s[0], s[1], s[2], s[3]], 255);
    }
    Ok(())
}

/// Source-over composite of a placed buffer onto `dst`, scaled by `opacity`.
///
/// Pixels of `src` falling outside `dst` are dropped.
pub(crate) fn premul_over_at(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: &Placed<'_>,
    opacity: f64,
) -> OvertureResult<()> {
    if dst.len() != (dst_width as usize) * (dst_height as usize) * 4 {
        return Err(OvertureError::render("destination size mismatch"));
    }
    if src.data.len() != (src.width as usize) * (src.height as usize) * 4 {
        return Err(OvertureError::render("source size mismatch"));
    }
    let op = (opacity.clamp(0.0, 1.0) * 255.0).round() as u16;
    if op == 0 {
        return Ok(());
    }

    let x0 = src.x.max(0);
    let y0 = src.y.max(0);
    let x1 = (src.x + i64::from(src.width)).min(i64::from(dst_width));
    let y1 = (src.y + i64::from(src.height)).min(i64::from(dst_height));
    for y in y0..y1 {
        let sy = (y - src.y) as usize;
        for x in x0..x1 {
            let sx = (x - src.x) as usize;
            let si = (sy * src.width as usize + sx) * 4;
            let di = (y as usize * dst_width as usize + x as usize) * 4;
            let s = &src.data[si..si + 4];
            over_px(&mut dst[di..di + 4], [s[0], s[1], s[2], s[3]], op);
        }
    }
    Ok(())
}

fn over_px(d: &mut [u8], s: [u8; 4], op: u16) {
    let sa = mul_div255_u8(u16::from(s[3]), op);
    if sa == 0 {
        return;
    }
    let inv = 255u16 - u16::from(sa);
    d[3] = sa.saturating_add(mul_div255_u8(u16::from(d[3]), inv));
    for c in 0..3 {
        let sc = mul_div255_u8(u16::from(s[c]), op);
        let dc = mul_div255_u8(u16::from(d[c]), inv);
        d[c] = sc.saturating_add(dc);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
