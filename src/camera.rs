// Opens the default camera and converts frames into a buffer suitable for the window.
// `next_frame()` hands back 0x00RRGGBB pixels, ready for the filter and the screen.

use crate::config::DEFAULT_FPS;
use crate::error::Error;
use crate::types::{FrameBuffer, pack_rgb};

use image::RgbImage;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and start streaming.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            DEFAULT_FPS,
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // Fails when no device exists at this index.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Block for one frame and convert it to 0x00RRGGBB pixels.
    pub fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        // Decoded to RGB whatever the raw format was.
        let rgb_img: RgbImage = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let pixels = rgb_img
            .pixels()
            .map(|p| pack_rgb(p[0], p[1], p[2]))
            .collect();

        Ok(FrameBuffer {
            width: w as usize,
            height: h as usize,
            pixels,
        })
    }

    /// The actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Frame rate the stream negotiated (0 if the driver doesn't say).
    pub fn frame_rate(&self) -> u32 {
        self.cam.frame_rate()
    }
}

/// Reported rate, or `DEFAULT_FPS` when the camera reports nothing usable.
pub fn effective_frame_rate(reported: u32) -> u32 {
    if reported == 0 {
        log::warn!("camera reported 0 fps; assuming {DEFAULT_FPS}");
        DEFAULT_FPS
    } else {
        reported
    }
}

/// Per-frame wait in milliseconds (`1000 / fps`, never 0).
pub fn wait_interval_ms(fps: u32) -> u64 {
    (1000 / u64::from(fps.max(1))).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fps_falls_back() {
        assert_eq!(effective_frame_rate(0), DEFAULT_FPS);
        assert_eq!(effective_frame_rate(15), 15);
    }

    #[test]
    fn wait_interval_matches_rate() {
        assert_eq!(wait_interval_ms(30), 33);
        assert_eq!(wait_interval_ms(25), 40);
        assert_eq!(wait_interval_ms(1), 1000);
        assert_eq!(wait_interval_ms(5000), 1);
        assert_eq!(wait_interval_ms(0), 1000);
    }
}
