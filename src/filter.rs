// Region filter: inside the selected rectangle the frame turns into a
// contrast-boosted, darkened grayscale; everything else stays untouched.

use crate::types::{FrameBuffer, Rect, pack_rgb, unpack_rgb};

/// `out = clamp(contrast * gray + brightness, 0, 255)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterParams {
    pub contrast: f32,
    pub brightness: f32,
}

/// Luma of one pixel: 0.299 R + 0.587 G + 0.114 B in 14-bit fixed point,
/// rounded half up (the weights sum to 1 << 14, so the result fits a byte).
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 4899 * r as u32 + 9617 * g as u32 + 1868 * b as u32;
    ((y + (1 << 13)) >> 14) as u8
}

/// Contrast/brightness on a gray value. Clamped first, then truncated to a byte.
#[inline]
pub fn adjust_gray(gray: u8, params: FilterParams) -> u8 {
    let v = params.contrast * gray as f32 + params.brightness;
    v.clamp(0.0, 255.0) as u8
}

/// Return a copy of `src` with the region under `rect` filtered.
/// No rectangle (or one that misses the frame) means an unmodified copy.
pub fn apply_region_filter(src: &FrameBuffer, rect: Option<Rect>, params: FilterParams) -> FrameBuffer {
    let mut out = src.clone();

    let Some(region) = rect.and_then(|r| r.clipped_to(src.width, src.height)) else {
        return out;
    };

    for y in region.y0..region.y1 {
        for x in region.x0..region.x1 {
            let (r, g, b) = unpack_rgb(src.get(x, y));
            let v = adjust_gray(luma(r, g, b), params);
            out.set(x, y, pack_rgb(v, v, v));
        }
    }
    out
}
