// One error type for the whole widget.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the overlay window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Pushing the buffer to the window failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Camera unavailable")]
    CameraUnavailable, // No device was opened (or it was already released)
    #[error("Control panel init error: {0}")]
    PanelInit(String), // Building the panel window or its web view failed
    #[error("Bridge message error: {0}")]
    BridgeMessage(#[from] serde_json::Error), // The panel page sent something we can't decode
}
