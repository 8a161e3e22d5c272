// Everything the main loop and the mouse handling share for one run:
// the selection, the recording flag and the recorder.

use crate::draw::{KeyCommand, draw_recording_indicator};
use crate::filter::{FilterParams, apply_region_filter};
use crate::recorder::{Recorder, SinkOpener};
use crate::selection::{MouseEvent, Selection};
use crate::types::FrameBuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub struct Session<O: SinkOpener> {
    selection: Selection,
    recording: bool,
    recorder: Recorder<O>,
    filter: FilterParams,
}

impl<O: SinkOpener> Session<O> {
    pub fn new(recorder: Recorder<O>, filter: FilterParams) -> Self {
        Self { selection: Selection::Idle, recording: false, recorder, filter }
    }

    pub fn recorder(&self) -> &Recorder<O> {
        &self.recorder
    }

    pub fn on_mouse(&mut self, event: MouseEvent) {
        self.selection.handle(event);
        log::debug!("{event:?} -> {:?}", self.selection);
    }

    pub fn on_key(&mut self, command: KeyCommand) -> LoopControl {
        match command {
            KeyCommand::ToggleRecording => {
                self.recording = !self.recording;
                log::info!("recording {}", if self.recording { "on" } else { "paused" });
                LoopControl::Continue
            }
            KeyCommand::Exit => {
                self.recorder.release();
                LoopControl::Exit
            }
        }
    }

    /// Filter the camera frame and, while recording, hand it to the recorder.
    /// The returned frame is what gets displayed (after `overlay`).
    pub fn process_frame(&mut self, frame: &FrameBuffer) -> FrameBuffer {
        let filtered = apply_region_filter(frame, self.selection.rect(), self.filter);
        if self.recording {
            self.recorder.write(&filtered);
        }
        filtered
    }

    /// Screen-only decorations; never part of the recording.
    pub fn overlay(&self, frame: &mut FrameBuffer) {
        if self.recording {
            draw_recording_indicator(frame);
        }
    }

    pub fn shutdown(&mut self) {
        self.recorder.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FILTER;
    use crate::recorder::testing::{FakeOpener, Log};
    use crate::types::{Point, pack_rgb};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> (Session<FakeOpener>, Rc<RefCell<Log>>) {
        let (opener, log) = FakeOpener::new();
        (Session::new(Recorder::new(opener, "session.mp4", 30), FILTER), log)
    }

    #[test]
    fn gray_frames_without_selection_pass_through() {
        let (mut s, _) = session();
        let gray = FrameBuffer::filled(64, 48, pack_rgb(128, 128, 128));
        for _ in 0..3 {
            assert_eq!(s.process_frame(&gray), gray);
        }
    }

    #[test]
    fn drag_filters_exactly_the_selected_region() {
        let (mut s, _) = session();
        let src = FrameBuffer::filled(100, 100, pack_rgb(128, 128, 128));

        s.on_mouse(MouseEvent::LeftDown(Point::new(10, 10)));
        s.on_mouse(MouseEvent::Move(Point::new(50, 60)));
        let out = s.process_frame(&src);

        for y in 0..100 {
            for x in 0..100 {
                let inside = (10..50).contains(&x) && (10..60).contains(&y);
                let want = if inside { pack_rgb(164, 164, 164) } else { pack_rgb(128, 128, 128) };
                assert_eq!(out.get(x, y), want, "pixel ({x},{y})");
            }
        }

        s.on_mouse(MouseEvent::LeftUp(Point::new(50, 60)));
        assert_eq!(s.selection, Selection::Idle);
        assert_eq!(s.process_frame(&src), src);
    }

    #[test]
    fn frames_are_recorded_only_while_recording() {
        let (mut s, log) = session();
        let frame = FrameBuffer::new(32, 24);

        s.process_frame(&frame);
        assert!(log.borrow().opens.is_empty());

        s.on_key(KeyCommand::ToggleRecording);
        s.process_frame(&frame);
        s.process_frame(&frame);
        s.on_key(KeyCommand::ToggleRecording);
        s.process_frame(&frame);
        s.on_key(KeyCommand::ToggleRecording);
        s.process_frame(&frame);

        let log = log.borrow();
        assert_eq!(log.opens.len(), 1, "pause/resume must reuse the open file");
        assert_eq!(log.opens[0].0, std::path::PathBuf::from("session.mp4"));
        assert_eq!(log.frames, 3);
        assert_eq!(log.finishes, 0);
    }

    #[test]
    fn recording_gets_filtered_frame_without_indicator() {
        let (mut s, _) = session();
        s.on_key(KeyCommand::ToggleRecording);
        let src = FrameBuffer::filled(200, 150, pack_rgb(10, 20, 30));

        let mut shown = s.process_frame(&src);
        assert_eq!(shown, src);
        s.overlay(&mut shown);
        assert_ne!(shown, src);
        assert_eq!(shown.get(100, 100), crate::config::INDICATOR_DOT_COLOR);
    }

    #[test]
    fn no_overlay_when_not_recording() {
        let (s, _) = session();
        let src = FrameBuffer::filled(200, 150, pack_rgb(10, 20, 30));
        let mut shown = src.clone();
        s.overlay(&mut shown);
        assert_eq!(shown, src);
    }

    #[test]
    fn exit_releases_recorder() {
        let (mut s, log) = session();
        s.on_key(KeyCommand::ToggleRecording);
        s.process_frame(&FrameBuffer::new(8, 8));
        assert!(s.recorder().is_open());

        assert_eq!(s.on_key(KeyCommand::Exit), LoopControl::Exit);
        assert!(!s.recorder().is_open());
        s.shutdown();
        assert_eq!(log.borrow().finishes, 1);
    }
}
