// Opens the default camera and hands out one RGB frame per tick.
// When the device can't be opened the widget keeps running with a blank feed:
// every capture simply reports that no frame is available.

use crate::error::Error;
use crate::types::Frame;
use log::{debug, error, info};

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

/// Anything that can produce frames for the display.
pub trait FrameSource {
    /// Grab the next frame. An error means "skip this tick".
    fn capture(&mut self) -> Result<Frame, Error>;

    /// Let go of the device. Must be safe to call more than once.
    fn release(&mut self);
}

// A small wrapper around nokhwa::Camera so the display stays hardware-agnostic.
pub struct CameraCapture {
    cam: Option<Camera>,
}

impl CameraCapture {
    /// Open camera `index` at a target resolution (falls back if not exact).
    pub fn open(index: u32, width: u32, height: u32, fps: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            fps,
        );

        // Ask for RGB frames, as close to our request as the device allows.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        info!("camera {index} streaming at {}x{}", actual.width(), actual.height());

        Ok(Self { cam: Some(cam) })
    }

    /// Like [`CameraCapture::open`], but a missing device yields a capture that never has frames.
    pub fn open_or_unavailable(index: u32, width: u32, height: u32, fps: u32) -> Self {
        match Self::open(index, width, height, fps) {
            Ok(capture) => capture,
            Err(e) => {
                error!("{e}; continuing with a blank feed");
                Self { cam: None }
            }
        }
    }

    /// Report the resolution the camera is actually delivering.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        self.cam.as_ref().map(|cam| {
            let r = cam.resolution();
            (r.width(), r.height())
        })
    }
}

impl FrameSource for CameraCapture {
    fn capture(&mut self) -> Result<Frame, Error> {
        let cam = self.cam.as_mut().ok_or(Error::CameraUnavailable)?;

        // Blocks until the driver hands over the next frame.
        let frame = cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = decoded.dimensions();
        Frame::from_raw(w, h, decoded.into_raw())
            .ok_or_else(|| Error::CameraFrame(format!("Short RGB buffer for {w}x{h}")))
    }

    fn release(&mut self) {
        if let Some(mut cam) = self.cam.take() {
            if let Err(e) = cam.stop_stream() {
                debug!("stop stream: {e}");
            }
            info!("camera released");
        }
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_capture_never_yields_frames() {
        let mut capture = CameraCapture { cam: None };
        assert!(matches!(capture.capture(), Err(Error::CameraUnavailable)));
        assert_eq!(capture.resolution(), None);
        // Releasing a capture without a device is a no-op, twice over.
        capture.release();
        capture.release();
    }
}
