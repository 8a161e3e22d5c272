// One error type for the whole program.
// Every variant states *where* things went wrong.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed

    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed

    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    #[error("Encoder open error: {0}")]
    EncoderOpen(String), // Creating the video file or encoder failed

    #[error("Encoder write error: {0}")]
    EncoderWrite(String), // Encoding a frame or writing the file failed

    #[error("Frame size {actual:?} does not match recording size {expected:?}")]
    FrameSize {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}
