// Hide in Darkness
// • Live camera preview.
// • Hold Left Mouse and drag: the rectangle turns into dark, high-contrast grayscale.
//   Let go and it's gone.
// • SPACE starts/pauses recording to <timestamp>.mp4 (red dot while recording).
// • ESC quits.

mod camera;
mod config;
mod draw;
mod encoder;
mod error;
mod filter;
mod recorder;
mod selection;
mod session;
mod types;

use camera::{CameraCapture, effective_frame_rate, wait_interval_ms};
use draw::Drawer;
use encoder::Mp4Opener;
use error::Error;
use recorder::{Recorder, session_file_name};
use selection::MouseTracker;
use session::{LoopControl, Session};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Error> {
    /* --- Camera --- */
    let mut cam = CameraCapture::new(config::CAMERA_INDEX, config::REQUESTED_WIDTH, config::REQUESTED_HEIGHT)?;
    let (w, h) = cam.resolution();
    let fps = effective_frame_rate(cam.frame_rate());
    log::info!("camera {} open: {w}x{h} @ {fps} fps ({} ms/frame)", config::CAMERA_INDEX, wait_interval_ms(fps));

    /* --- Recorder: file name fixed at session start, opened on first recorded frame --- */
    let path = session_file_name(&chrono::Local::now());
    let mut session = Session::new(Recorder::new(Mp4Opener, path, fps), config::FILTER);
    log::info!("SPACE records to {}", session.recorder().path().display());

    /* --- Window --- */
    let mut drawer = Drawer::new(config::WINDOW_TITLE, w as usize, h as usize)?;
    drawer.set_target_fps(fps);
    let mut mouse = MouseTracker::new();

    let result = run_loop(&mut cam, &mut drawer, &mut mouse, &mut session);
    session.shutdown();
    result
}

fn run_loop(
    cam: &mut CameraCapture,
    drawer: &mut Drawer,
    mouse: &mut MouseTracker,
    session: &mut Session<Mp4Opener>,
) -> Result<(), Error> {
    while drawer.is_open() {
        // A failed read means the camera went away: end of stream, not an error.
        let live = match cam.next_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::info!("stream ended: {e}");
                break;
            }
        };

        let mut screen = session.process_frame(&live);
        session.overlay(&mut screen);
        drawer.present(&screen)?;

        // Input gathered during `present`.
        if let Some(cmd) = drawer.poll_command() {
            if session.on_key(cmd) == LoopControl::Exit {
                break;
            }
        }
        if let Some(event) = mouse.poll(drawer.left_mouse_down(), drawer.mouse_pos()) {
            session.on_mouse(event);
        }
    }
    Ok(())
}
