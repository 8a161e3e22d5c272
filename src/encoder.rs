// H.264 in MP4, encoded and muxed in-process.
// openh264 turns each RGB frame into NAL units; minimp4 muxes them into an
// in-memory MP4. `finish` writes the finished MP4 to the file created at open.

use crate::error::Error;
use crate::recorder::{SinkOpener, VideoSink};
use crate::types::FrameBuffer;
use minimp4::Mp4Muxer;
use openh264::encoder::Encoder;
use openh264::formats::{RgbSliceU8, YUVBuffer};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// Sample entry written to the MP4 track.
pub const CODEC_FOURCC: &str = "avc1";

const TRACK_NAME: &str = "Hide in Darkness";

pub struct Mp4Opener;

impl SinkOpener for Mp4Opener {
    type Sink = Mp4Sink;

    fn open(&mut self, path: &Path, width: usize, height: usize, fps: u32) -> Result<Mp4Sink, Error> {
        Mp4Sink::create(path, width, height, fps)
    }
}

pub struct Mp4Sink {
    encoder: Encoder,
    // The muxer hands a pointer to itself to the C side in `init_video`,
    // so it must not move afterwards.
    // Muxing goes to memory: minimp4 unwraps I/O results inside its C callback.
    muxer: Box<Mp4Muxer<Cursor<Vec<u8>>>>,
    file: File,
    path: PathBuf,
    width: usize,
    height: usize,
    fps: u32,
}

impl Mp4Sink {
    pub fn create(path: &Path, width: usize, height: usize, fps: u32) -> Result<Self, Error> {
        // YUV 4:2:0 halves both axes for chroma.
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(Error::EncoderOpen(format!("{width}x{height} is not an even, non-empty size")));
        }
        if fps == 0 {
            return Err(Error::EncoderOpen("frame rate must be positive".into()));
        }

        let encoder = Encoder::new().map_err(|e| Error::EncoderOpen(format!("H.264 encoder: {e}")))?;

        let file = File::create(path)
            .map_err(|e| Error::EncoderOpen(format!("create {}: {e}", path.display())))?;
        let mut muxer = Box::new(Mp4Muxer::new(Cursor::new(Vec::new())));
        muxer.init_video(width as i32, height as i32, false, TRACK_NAME);

        log::debug!("opened {CODEC_FOURCC} track {width}x{height} @ {fps} fps for {}", path.display());
        Ok(Self { encoder, muxer, file, path: path.to_path_buf(), width, height, fps })
    }
}

impl VideoSink for Mp4Sink {
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        if (frame.width, frame.height) != (self.width, self.height) {
            return Err(Error::FrameSize {
                expected: (self.width, self.height),
                actual: (frame.width, frame.height),
            });
        }

        let rgb = frame.to_rgb_bytes();
        let yuv = YUVBuffer::from_rgb_source(RgbSliceU8::new(&rgb, (self.width, self.height)));
        let bitstream = self
            .encoder
            .encode(&yuv)
            .map_err(|e| Error::EncoderWrite(format!("encode: {e}")))?;

        let nals = bitstream.to_vec();
        if !nals.is_empty() {
            self.muxer.write_video_with_fps(&nals, self.fps);
        }
        Ok(())
    }

    /// Write the index, then the whole MP4 to disk.
    fn finish(&mut self) -> Result<(), Error> {
        let mp4 = self.muxer.close().get_ref();
        self.file
            .write_all(mp4)
            .and_then(|()| self.file.sync_all())
            .map_err(|e| Error::EncoderWrite(format!("write {}: {e}", self.path.display())))
    }
}
