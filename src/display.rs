// Everything the on-screen bubble knows, minus the actual window:
// the camera, the image pipeline, the last image shown, drag state and opacity.
// main.rs feeds it input and hands its image to the window every tick.

use crate::bridge::OpacityHandle;
use crate::camera::FrameSource;
use crate::drag::DragState;
use crate::pipeline::FramePipeline;
use crate::types::{FrameBuffer, Modifiers, Opacity, Point};
use log::{debug, info};

pub struct DisplaySurface<S: FrameSource> {
    source: S,
    pipeline: FramePipeline,
    displayed: Option<FrameBuffer>,
    drag: DragState,
    opacity: OpacityHandle,
    released: bool,
}

impl<S: FrameSource> DisplaySurface<S> {
    pub fn new(source: S, pipeline: FramePipeline) -> Self {
        Self {
            source,
            pipeline,
            displayed: None,
            drag: DragState::default(),
            opacity: OpacityHandle::new(),
            released: false,
        }
    }

    /// capture -> correct -> composite -> show.
    /// Returns false when no frame came in; the previous image stays on screen.
    pub fn tick(&mut self) -> bool {
        match self.source.capture() {
            Ok(frame) => {
                self.displayed = Some(self.pipeline.process(&frame));
                true
            }
            Err(e) => {
                debug!("tick skipped: {e}");
                false
            }
        }
    }

    pub fn displayed(&self) -> Option<&FrameBuffer> {
        self.displayed.as_ref()
    }

    pub fn opacity(&self) -> Opacity {
        self.opacity.get()
    }

    /// The handle the control panel writes through.
    pub fn opacity_handle(&self) -> OpacityHandle {
        self.opacity.clone()
    }

    pub fn pointer_pressed(&mut self, pointer: Point, top_left: Point) {
        self.drag.press(pointer, top_left);
    }

    /// New window top-left, if a drag is in progress.
    pub fn pointer_moved(&mut self, pointer: Point) -> Option<Point> {
        self.drag.motion(pointer)
    }

    /// True when the release asks for the control panel.
    pub fn pointer_released(&mut self, modifiers: Modifiers) -> bool {
        self.drag.release(modifiers)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Let go of the camera. Runs again from Drop, so every exit path gets here.
    pub fn shutdown(&mut self) {
        if !self.released {
            self.source.release();
            self.released = true;
            info!("display surface shut down");
        }
    }
}

impl<S: FrameSource> Drop for DisplaySurface<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::OpacityBridge;
    use crate::config::ClaheParams;
    use crate::error::Error;
    use crate::types::Frame;
    use image::Rgb;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Replays a fixed list of capture results; `None` is a failed read.
    struct ScriptedSource {
        script: VecDeque<Option<Frame>>,
        releases: Rc<Cell<u32>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<Frame>>) -> (Self, Rc<Cell<u32>>) {
            let releases = Rc::new(Cell::new(0));
            (Self { script: script.into(), releases: releases.clone() }, releases)
        }
    }

    impl FrameSource for ScriptedSource {
        fn capture(&mut self) -> Result<Frame, Error> {
            self.script
                .pop_front()
                .flatten()
                .ok_or_else(|| Error::CameraFrame("scripted miss".into()))
        }

        fn release(&mut self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    fn surface(script: Vec<Option<Frame>>) -> (DisplaySurface<ScriptedSource>, Rc<Cell<u32>>) {
        let (source, releases) = ScriptedSource::new(script);
        (DisplaySurface::new(source, FramePipeline::new(ClaheParams::default())), releases)
    }

    fn camera_frame(shade: u8) -> Frame {
        Frame::from_fn(64, 48, |x, y| Rgb([shade, (x * 3) as u8, (y * 5) as u8]))
    }

    #[test]
    fn successful_tick_then_missed_tick_keeps_image() {
        let (mut surface, _) = surface(vec![Some(camera_frame(180)), None]);
        assert!(surface.displayed().is_none());

        assert!(surface.tick());
        let first = surface.displayed().cloned().expect("image after first tick");
        assert_eq!((first.width, first.height), (48, 48));
        assert_eq!(first.pixels.len(), 48 * 48);
        assert_eq!(first.alpha_at(24, 24), 255);
        assert_eq!(first.alpha_at(0, 0), 0);

        assert!(!surface.tick());
        assert_eq!(surface.displayed(), Some(&first));
    }

    #[test]
    fn new_frames_replace_the_image() {
        let (mut surface, _) = surface(vec![Some(camera_frame(20)), Some(camera_frame(240))]);
        surface.tick();
        let first = surface.displayed().cloned();
        surface.tick();
        assert_ne!(surface.displayed().cloned(), first);
    }

    #[test]
    fn drag_without_modifiers_never_asks_for_panel() {
        let (mut surface, _) = surface(vec![]);
        surface.pointer_pressed(Point::new(420, 330), Point::new(400, 300));
        assert!(surface.is_dragging());
        assert_eq!(surface.pointer_moved(Point::new(520, 430)), Some(Point::new(500, 400)));
        assert!(!surface.pointer_released(Modifiers::NONE));
        assert!(!surface.is_dragging());
        assert_eq!(surface.pointer_moved(Point::new(0, 0)), None);
    }

    #[test]
    fn ctrl_shift_release_asks_for_panel() {
        let (mut surface, _) = surface(vec![]);
        surface.pointer_pressed(Point::new(10, 10), Point::new(0, 0));
        assert!(surface.pointer_released(Modifiers::CTRL_SHIFT));
        assert!(!surface.is_dragging());
    }

    #[test]
    fn bridge_writes_reach_the_surface() {
        let (surface, _) = surface(vec![]);
        let bridge = surface.opacity_handle();
        bridge.set_opacity(0.0);
        bridge.set_opacity(1.0);
        assert_eq!(surface.opacity(), Opacity::OPAQUE);
        bridge.set_opacity(0.3);
        assert!((surface.opacity().get() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn source_released_once_on_shutdown_and_drop() {
        let (mut surface, releases) = surface(vec![]);
        surface.shutdown();
        surface.shutdown();
        assert_eq!(releases.get(), 1);
        drop(surface);
        assert_eq!(releases.get(), 1);
    }

    #[test]
    fn drop_alone_releases_source() {
        let (surface, releases) = surface(vec![]);
        drop(surface);
        assert_eq!(releases.get(), 1);
    }
}
