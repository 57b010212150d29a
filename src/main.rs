// What you SEE:
// • A round, always-on-top bubble with your webcam in it (white balance corrected).
// • Drag it anywhere with the left mouse button.
// • Ctrl+Shift+click opens a small panel with a transparency slider.
// • Closing the panel only hides it. ESC on the bubble quits.

mod bridge;
mod camera;
mod clahe;
mod compositor;
mod config;
mod correct;
mod display;
mod drag;
mod draw;
mod error;
mod lab;
mod panel;
mod pipeline;
mod types;

use camera::CameraCapture;
use config::Config;
use display::DisplaySurface;
use draw::Drawer;
use error::Error;
use log::{error, info};
use panel::{ControlPanel, WebPanel};
use pipeline::FramePipeline;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();

    /* --- Camera + pipeline ---
       A missing camera isn't fatal: the bubble just stays empty. */
    let camera = CameraCapture::open_or_unavailable(
        config.camera_index,
        config.capture_width,
        config.capture_height,
        config.capture_fps,
    );
    if let Some((w, h)) = camera.resolution() {
        info!("feed {w}x{h} -> bubble {}px", w.min(h));
    }
    let mut surface = DisplaySurface::new(camera, FramePipeline::new(config.clahe));

    /* --- Overlay window ---
       Frameless, topmost, transparent; paced to one tick per update. */
    let mut drawer = Drawer::new(&config)?;
    let mut panel: ControlPanel<WebPanel> = ControlPanel::new();

    // minifb only reports "is the button down", so edges are found by comparing ticks.
    let mut was_down = false;

    info!("bubble up: {}x{} @ {} Hz", config.window_width, config.window_height, config.target_fps());

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.quit_requested() {
        // 1) New frame in, or keep showing the last one.
        surface.tick();

        // 2) Pointer: press starts a drag, motion moves, release ends it.
        let down = drawer.left_mouse_down();
        match (was_down, down) {
            (false, true) => {
                if let Some(pointer) = drawer.pointer_global() {
                    surface.pointer_pressed(pointer, drawer.top_left());
                }
            }
            (true, true) if surface.is_dragging() => {
                if let Some(top_left) = drawer.pointer_global().and_then(|p| surface.pointer_moved(p)) {
                    drawer.move_to(top_left);
                }
            }
            (true, false) => {
                if surface.pointer_released(drawer.modifiers()) {
                    open_panel(&mut panel, &config, &surface);
                }
            }
            _ => {}
        }
        was_down = down;

        // 3) Show it, at whatever opacity the panel last asked for.
        drawer.present(surface.displayed(), surface.opacity())?;

        // 4) Let the panel (if it exists) handle its own window and page messages.
        if let Some(web) = panel.get_mut() {
            web.pump();
        }
    }

    surface.shutdown();
    Ok(())
}

/// Build the panel on first use, otherwise just bring it back.
fn open_panel<S: camera::FrameSource>(
    panel: &mut ControlPanel<WebPanel>,
    config: &Config,
    surface: &DisplaySurface<S>,
) {
    let opacity = surface.opacity_handle();
    if let Err(e) = panel.show_with(|| WebPanel::new(&config.panel, opacity)) {
        error!("{e}");
    }
}
