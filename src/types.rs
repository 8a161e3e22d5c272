// Core types shared by the filter, the selection and the recorder.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

#[cfg(test)]
impl FrameBuffer {
    /// All-black frame.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    /// Frame where every pixel is `rgb` (0x00RRGGBB).
    pub fn filled(width: usize, height: usize, rgb: u32) -> Self {
        Self { width, height, pixels: vec![rgb & 0x00FF_FFFF; width * height] }
    }
}

impl FrameBuffer {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, rgb: u32) {
        self.pixels[y * self.width + x] = rgb;
    }

    /// Tightly packed R,G,B bytes, row by row (what the encoder wants).
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let (r, g, b) = unpack_rgb(px);
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }
}

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_rgb(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

/// A position in window coordinates. Signed: drags can leave the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The user-dragged region: where the press happened and where the cursor is now.
/// Corners can be in any order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub start: Point,
    pub end: Point,
}

/// Half-open pixel region `[x0, x1) x [y0, y1)` that lies inside a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x0: usize,
    pub y0: usize,
    pub x1: usize,
    pub y1: usize,
}

impl Rect {
    /// Zero-size box at `p` (what a fresh mouse press produces).
    pub const fn at(p: Point) -> Self {
        Self { start: p, end: p }
    }

    /// Corners sorted so that min <= max on both axes: (min_x, min_y, max_x, max_y).
    pub fn normalized(&self) -> (i32, i32, i32, i32) {
        (
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    /// Intersect the normalized region with a `width` x `height` frame.
    /// Returns `None` when nothing of the rectangle is inside.
    pub fn clipped_to(&self, width: usize, height: usize) -> Option<Region> {
        let (min_x, min_y, max_x, max_y) = self.normalized();
        let clamp = |v: i32, hi: usize| -> usize { (v.max(0) as usize).min(hi) };

        let region = Region {
            x0: clamp(min_x, width),
            y0: clamp(min_y, height),
            x1: clamp(max_x, width),
            y1: clamp(max_y, height),
        };
        (region.x0 < region.x1 && region.y0 < region.y1).then_some(region)
    }
}
