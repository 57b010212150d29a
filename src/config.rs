// Every tunable the widget uses, in one place.
// There is no config file or command line; these defaults are the configuration.

use std::time::Duration;

/// Contrast-limited adaptive histogram equalization settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClaheParams {
    pub clip_limit: f32, // how much a histogram bin may exceed the flat level
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self { clip_limit: 3.0, tiles_x: 8, tiles_y: 8 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { title: "Nolen James Felten".to_string(), width: 640, height: 160 }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub camera_index: u32,
    pub capture_width: u32,  // requested; the device may pick something close
    pub capture_height: u32,
    pub capture_fps: u32,
    pub window_title: String,
    pub window_width: usize,
    pub window_height: usize,
    pub tick_interval: Duration,
    pub clahe: ClaheParams,
    pub panel: PanelConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_index: 0,
            capture_width: 640,
            capture_height: 480,
            capture_fps: 30,
            window_title: "Bubblecam".to_string(),
            window_width: 400,
            window_height: 400,
            tick_interval: Duration::from_millis(33),
            clahe: ClaheParams::default(),
            panel: PanelConfig::default(),
        }
    }
}

impl Config {
    /// Window update rate implied by the tick interval (33 ms -> 30 Hz).
    pub fn target_fps(&self) -> usize {
        let ms = self.tick_interval.as_millis().max(1);
        (1000 / ms).max(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.camera_index, 0);
        assert_eq!((cfg.window_width, cfg.window_height), (400, 400));
        assert_eq!(cfg.target_fps(), 30);
        assert_eq!(cfg.clahe, ClaheParams { clip_limit: 3.0, tiles_x: 8, tiles_y: 8 });
    }

    #[test]
    fn target_fps_never_zero() {
        let cfg = Config { tick_interval: Duration::from_secs(5), ..Config::default() };
        assert_eq!(cfg.target_fps(), 1);
        let cfg = Config { tick_interval: Duration::ZERO, ..Config::default() };
        assert_eq!(cfg.target_fps(), 1000);
    }
}
