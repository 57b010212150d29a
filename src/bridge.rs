// The narrow channel between the control panel page and the widget.
// The page can do exactly one thing: set the widget's opacity.
// Everything runs on the UI thread, so the shared value is a plain Rc<Cell>.

use crate::error::Error;
use crate::types::Opacity;
use log::{debug, warn};
use serde::Deserialize;
use std::cell::Cell;
use std::rc::Rc;

/// What the embedded page is allowed to call.
pub trait OpacityBridge {
    /// Expected range is [0, 1]; out-of-range values are clamped, NaN is ignored.
    fn set_opacity(&self, value: f32);
}

/// Shared opacity owned by the display surface. Clones point at the same value.
#[derive(Clone, Debug, Default)]
pub struct OpacityHandle(Rc<Cell<Opacity>>);

impl OpacityHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Opacity {
        self.0.get()
    }
}

impl OpacityBridge for OpacityHandle {
    fn set_opacity(&self, value: f32) {
        match Opacity::clamped(value) {
            Some(opacity) => {
                debug!("opacity -> {:.2}", opacity.get());
                self.0.set(opacity);
            }
            None => warn!("ignoring non-finite opacity {value}"),
        }
    }
}

/// Messages posted by the panel page through `window.ipc.postMessage`.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelMessage {
    SetOpacity { value: f32 },
}

/// Decode one raw IPC body and apply it.
pub fn dispatch(bridge: &impl OpacityBridge, raw: &str) -> Result<(), Error> {
    match serde_json::from_str::<PanelMessage>(raw)? {
        PanelMessage::SetOpacity { value } => bridge.set_opacity(value),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let opacity = OpacityHandle::new();
        assert_eq!(opacity.get(), Opacity::OPAQUE);
        opacity.set_opacity(0.0);
        assert_eq!(opacity.get().get(), 0.0);
        opacity.set_opacity(1.0);
        assert_eq!(opacity.get().get(), 1.0);
    }

    #[test]
    fn clones_share_the_value() {
        let owner = OpacityHandle::new();
        let page_side = owner.clone();
        page_side.set_opacity(0.4);
        assert_eq!(owner.get().get(), 0.4);
    }

    #[test]
    fn out_of_range_is_clamped_and_nan_ignored() {
        let opacity = OpacityHandle::new();
        opacity.set_opacity(3.5);
        assert_eq!(opacity.get().get(), 1.0);
        opacity.set_opacity(-1.0);
        assert_eq!(opacity.get().get(), 0.0);
        opacity.set_opacity(f32::NAN);
        assert_eq!(opacity.get().get(), 0.0);
    }

    #[test]
    fn dispatch_decodes_page_messages() {
        let opacity = OpacityHandle::new();
        dispatch(&opacity, r#"{"type":"setOpacity","value":0.42}"#).unwrap();
        assert!((opacity.get().get() - 0.42).abs() < 1e-6);
    }

    #[test]
    fn dispatch_rejects_junk_without_touching_opacity() {
        let opacity = OpacityHandle::new();
        opacity.set_opacity(0.5);
        for raw in ["", "setOpacity:0.1", r#"{"type":"close"}"#, r#"{"type":"setOpacity","value":"x"}"#] {
            assert!(matches!(dispatch(&opacity, raw), Err(Error::BridgeMessage(_))), "{raw}");
        }
        assert_eq!(opacity.get().get(), 0.5);
    }
}
