// Lazily opened video recorder.
// Nothing touches the disk until the first recorded frame arrives; that frame
// decides the video size. Pausing only stops feeding frames: the file stays
// open, and resuming keeps writing into the same file.

use crate::config::{FILE_EXTENSION, FILE_TIME_FORMAT};
use crate::error::Error;
use crate::types::FrameBuffer;
use chrono::{DateTime, TimeZone};
use std::path::{Path, PathBuf};

/// An open video file that accepts frames.
pub trait VideoSink {
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), Error>;
    /// Flush and close the file. Called once.
    fn finish(&mut self) -> Result<(), Error>;
}

/// Opens a `VideoSink` for a given path, frame size and rate.
pub trait SinkOpener {
    type Sink: VideoSink;
    fn open(&mut self, path: &Path, width: usize, height: usize, fps: u32) -> Result<Self::Sink, Error>;
}

enum Handle<S> {
    Unopened,
    Open(S),
    Released,
}

pub struct Recorder<O: SinkOpener> {
    opener: O,
    path: PathBuf,
    fps: u32,
    handle: Handle<O::Sink>,
}

/// `<YYYY_MM_DD_HH_MM_SS>.mp4` for the session start time.
pub fn session_file_name<Tz: TimeZone>(started: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}.{}", started.format(FILE_TIME_FORMAT), FILE_EXTENSION)
}

impl<O: SinkOpener> Recorder<O> {
    pub fn new(opener: O, path: impl Into<PathBuf>, fps: u32) -> Self {
        Self { opener, path: path.into(), fps, handle: Handle::Unopened }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        matches!(self.handle, Handle::Open(_))
    }

    /// Record one frame, opening the file first if needed.
    /// Failures are logged and the frame is dropped; an open that failed is
    /// retried on the next call.
    pub fn write(&mut self, frame: &FrameBuffer) {
        if let Handle::Unopened = self.handle {
            match self.opener.open(&self.path, frame.width, frame.height, self.fps) {
                Ok(sink) => {
                    log::info!(
                        "recording to {} ({}x{} @ {} fps)",
                        self.path.display(),
                        frame.width,
                        frame.height,
                        self.fps
                    );
                    self.handle = Handle::Open(sink);
                }
                Err(e) => {
                    log::error!("failed to open {}: {e}", self.path.display());
                    return;
                }
            }
        }

        match &mut self.handle {
            Handle::Open(sink) => {
                if let Err(e) = sink.write_frame(frame) {
                    log::error!("dropped frame: {e}");
                }
            }
            Handle::Released => log::debug!("recorder already released; frame ignored"),
            Handle::Unopened => {}
        }
    }

    /// Close the file if it was ever opened. Safe to call more than once.
    pub fn release(&mut self) {
        if let Handle::Open(mut sink) = std::mem::replace(&mut self.handle, Handle::Released) {
            match sink.finish() {
                Ok(()) => log::info!("saved {}", self.path.display()),
                Err(e) => log::error!("failed to finalize {}: {e}", self.path.display()),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// What the fake sinks saw, shared with the test body.
    #[derive(Debug, Default)]
    pub struct Log {
        pub opens: Vec<(PathBuf, usize, usize, u32)>,
        pub frames: usize,
        pub finishes: usize,
        pub failed_opens: usize,
    }

    pub struct FakeSink(Rc<RefCell<Log>>);

    impl VideoSink for FakeSink {
        fn write_frame(&mut self, _frame: &FrameBuffer) -> Result<(), Error> {
            self.0.borrow_mut().frames += 1;
            Ok(())
        }
        fn finish(&mut self) -> Result<(), Error> {
            self.0.borrow_mut().finishes += 1;
            Ok(())
        }
    }

    /// Opener that fails the first `fail_first` opens, then succeeds.
    pub struct FakeOpener {
        pub log: Rc<RefCell<Log>>,
        pub fail_first: usize,
    }

    impl FakeOpener {
        pub fn new() -> (Self, Rc<RefCell<Log>>) {
            let log = Rc::new(RefCell::new(Log::default()));
            (Self { log: log.clone(), fail_first: 0 }, log)
        }
    }

    impl SinkOpener for FakeOpener {
        type Sink = FakeSink;
        fn open(&mut self, path: &Path, width: usize, height: usize, fps: u32) -> Result<FakeSink, Error> {
            let mut log = self.log.borrow_mut();
            if log.failed_opens < self.fail_first {
                log.failed_opens += 1;
                return Err(Error::EncoderOpen("fake failure".into()));
            }
            log.opens.push((path.to_path_buf(), width, height, fps));
            Ok(FakeSink(self.log.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeOpener;
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn file_name_is_sortable_timestamp() {
        let t = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(session_file_name(&t), "2024_03_07_09_05_02.mp4");
    }

    #[test]
    fn nothing_opens_before_first_frame() {
        let (opener, log) = FakeOpener::new();
        let mut rec = Recorder::new(opener, "a.mp4", 30);
        assert!(!rec.is_open());
        rec.release();
        assert!(log.borrow().opens.is_empty());
        assert_eq!(log.borrow().finishes, 0);
    }

    #[test]
    fn first_frame_opens_once_with_its_size() {
        let (opener, log) = FakeOpener::new();
        let mut rec = Recorder::new(opener, "a.mp4", 25);
        let frame = FrameBuffer::new(64, 48);
        for _ in 0..4 {
            rec.write(&frame);
        }
        let log = log.borrow();
        assert_eq!(log.opens, vec![(PathBuf::from("a.mp4"), 64, 48, 25)]);
        assert_eq!(log.frames, 4);
    }

    #[test]
    fn failed_open_drops_frame_and_retries() {
        let (mut opener, log) = FakeOpener::new();
        opener.fail_first = 2;
        let mut rec = Recorder::new(opener, "a.mp4", 30);
        let frame = FrameBuffer::new(8, 8);

        rec.write(&frame);
        rec.write(&frame);
        assert!(!rec.is_open());
        assert_eq!(log.borrow().frames, 0);

        rec.write(&frame);
        assert!(rec.is_open());
        assert_eq!(log.borrow().opens.len(), 1);
        assert_eq!(log.borrow().frames, 1);
    }

    #[test]
    fn release_is_idempotent_and_stops_writes() {
        let (opener, log) = FakeOpener::new();
        let mut rec = Recorder::new(opener, "a.mp4", 30);
        rec.write(&FrameBuffer::new(8, 8));
        rec.release();
        rec.release();
        rec.write(&FrameBuffer::new(8, 8));

        let log = log.borrow();
        assert_eq!(log.finishes, 1);
        assert_eq!(log.frames, 1);
        assert_eq!(log.opens.len(), 1);
    }
}
