// Window + software drawing utilities.
// 1) A window that shows the filtered camera image.
// 2) Keyboard/mouse polling for the main loop.
// 3) The red "recording" dot drawn on top of the video.

use crate::config::{
    INDICATOR_BOTTOM_OFFSET, INDICATOR_DOT_COLOR, INDICATOR_RADIUS, INDICATOR_RING,
    INDICATOR_RING_COLOR,
};
use crate::error::Error;
use crate::types::FrameBuffer;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Keys the program reacts to. Everything else is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Exit,
    ToggleRecording,
}

pub struct Drawer {
    window: Window, // the on-screen window you see
}

impl Drawer {
    /// Create a window sized to the camera feed.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        Ok(Self { window })
    }

    /// Pace `present` to the camera rate; each update waits out the rest of the frame.
    pub fn set_target_fps(&mut self, fps: u32) {
        self.window.set_target_fps(fps as usize);
    }

    /// Push the pixels for this frame to the screen. Also pumps input events.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Key pressed since the last update. ESC wins if both arrive together.
    pub fn poll_command(&self) -> Option<KeyCommand> {
        if self.window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            Some(KeyCommand::Exit)
        } else if self.window.is_key_pressed(Key::Space, KeyRepeat::No) {
            Some(KeyCommand::ToggleRecording)
        } else {
            None
        }
    }

    /// Current mouse position in window pixel coordinates (clamped to the window).
    pub fn mouse_pos(&self) -> Option<(usize, usize)> {
        self.window
            .get_mouse_pos(MouseMode::Clamp)
            .map(|(x, y)| (x.max(0.0) as usize, y.max(0.0) as usize))
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }
}

/* ---------- Software drawing ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.set(x, y, color);
}

/// Solid disc centred at (cx,cy); parts outside the frame are skipped.
pub fn fill_circle(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: u32) {
    if radius < 0 {
        return;
    }
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                put_pixel(fb, cx + dx, cy + dy, color);
            }
        }
    }
}

/// White ring with a red centre, bottom-centre of the frame.
/// On very small frames it just clips.
pub fn draw_recording_indicator(fb: &mut FrameBuffer) {
    let cx = (fb.width / 2) as i32;
    let cy = fb.height as i32 - INDICATOR_BOTTOM_OFFSET;
    fill_circle(fb, cx, cy, INDICATOR_RADIUS + INDICATOR_RING, INDICATOR_RING_COLOR);
    fill_circle(fb, cx, cy, INDICATOR_RADIUS, INDICATOR_DOT_COLOR);
}
