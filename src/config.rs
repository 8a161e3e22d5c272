// Session constants. The tool takes no flags or config files; everything
// tunable lives here.

use crate::filter::FilterParams;

/// Camera device to open (0 = default webcam).
pub const CAMERA_INDEX: u32 = 0;

/// Resolution we ask the camera for; the stream may pick something close.
pub const REQUESTED_WIDTH: u32 = 640;
pub const REQUESTED_HEIGHT: u32 = 480;

pub const WINDOW_TITLE: &str = "Hide in Darkness";

/// Used when the camera reports a frame rate of 0.
pub const DEFAULT_FPS: u32 = 30;

/// Contrast/brightness applied inside the selected rectangle.
pub const FILTER: FilterParams = FilterParams {
    contrast: 1.6,
    brightness: -40.0,
};

/// Output file name pattern (local session start time) and extension.
pub const FILE_TIME_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";
pub const FILE_EXTENSION: &str = "mp4";

// Recording indicator: centred horizontally, this far above the bottom edge.
pub const INDICATOR_BOTTOM_OFFSET: i32 = 50;
pub const INDICATOR_RADIUS: i32 = 20;
pub const INDICATOR_RING: i32 = 5;
pub const INDICATOR_RING_COLOR: u32 = 0x00_FF_FF_FF;
pub const INDICATOR_DOT_COLOR: u32 = 0x00_FF_00_00;
