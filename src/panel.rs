// The control panel: a second, ordinary window hosting a small web page with a
// transparency slider. Built the first time it's asked for, then only ever
// shown and hidden. Closing it just hides it.

use crate::bridge::{self, OpacityHandle};
use crate::config::PanelConfig;
use crate::error::Error;
use log::{info, warn};
use tao::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    platform::run_return::EventLoopExtRunReturn,
    window::{Window, WindowBuilder},
};
use wry::{WebView, WebViewBuilder, http::Request};

/// Show/hide lifecycle shared by every panel implementation.
pub trait PanelWindow {
    fn show(&mut self);
    fn hide(&mut self);
    fn is_visible(&self) -> bool;
}

/// Lazily built, never destroyed.
pub struct ControlPanel<W> {
    window: Option<W>,
}

impl<W> Default for ControlPanel<W> {
    fn default() -> Self {
        Self { window: None }
    }
}

impl<W: PanelWindow> ControlPanel<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the panel, building it with `build` only if it doesn't exist yet.
    pub fn show_with<F>(&mut self, build: F) -> Result<&mut W, Error>
    where
        F: FnOnce() -> Result<W, Error>,
    {
        let window = match self.window.take() {
            Some(window) => window,
            None => build()?,
        };
        let window = self.window.insert(window);
        window.show();
        Ok(window)
    }

    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.window.as_mut()
    }

    #[cfg(test)]
    pub fn is_built(&self) -> bool {
        self.window.is_some()
    }
}

/// Slider page. Posts `{"type":"setOpacity","value":v}` for every change.
pub const PANEL_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Transparency</title>
    <style>
        body { font-family: sans-serif; }
        .slider-container { margin-top: 20px; }
        .slider-label { display: inline-block; width: 50px; text-align: center; }
        .percent-input { width: 40px; }
    </style>
</head>
<body>
    <div class="slider-container">
        <label for="transparencySlider">Transparency:</label>
        <input type="range" id="transparencySlider" min="0" max="100" value="100">
        <span class="slider-label">0%</span>
        <span class="slider-label" style="margin-left: 130px;">50%</span>
        <span class="slider-label" style="margin-left: 130px;">100%</span>
        <input type="text" id="percentInput" class="percent-input" value="100">
        <span>%</span>
    </div>
    <script>
        const slider = document.getElementById('transparencySlider');
        const percentInput = document.getElementById('percentInput');

        function sendOpacity(percent) {
            window.ipc.postMessage(JSON.stringify({ type: 'setOpacity', value: percent / 100 }));
        }

        slider.addEventListener('input', () => {
            percentInput.value = slider.value;
            sendOpacity(Number(slider.value));
        });

        percentInput.addEventListener('change', () => {
            const percent = Math.round(Number(percentInput.value));
            if (!Number.isFinite(percent) || percent < 0 || percent > 100) {
                percentInput.value = slider.value;
                return;
            }
            slider.value = percent;
            percentInput.value = percent;
            sendOpacity(percent);
        });
    </script>
</body>
</html>
"#;

/// Native panel: a tao window with a wry web view. It brings its own event loop,
/// which the widget's main loop pumps once per tick.
pub struct WebPanel {
    // Field order matters on drop: the web view goes before its window.
    _webview: WebView,
    window: Window,
    event_loop: EventLoop<()>,
    visible: bool,
}

impl WebPanel {
    pub fn new(config: &PanelConfig, opacity: OpacityHandle) -> Result<Self, Error> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_visible(false)
            .build(&event_loop)
            .map_err(|e| Error::PanelInit(format!("Create window: {e}")))?;

        let builder = WebViewBuilder::new()
            .with_html(PANEL_HTML)
            .with_ipc_handler(move |req: Request<String>| {
                if let Err(e) = bridge::dispatch(&opacity, req.body()) {
                    warn!("panel message rejected: {e}");
                }
            });

        #[cfg(not(target_os = "linux"))]
        let webview = builder.build(&window);
        #[cfg(target_os = "linux")]
        let webview = {
            use tao::platform::unix::WindowExtUnix;
            use wry::WebViewBuilderExtUnix;
            let vbox = window
                .default_vbox()
                .ok_or_else(|| Error::PanelInit("Window has no GTK container".into()))?;
            builder.build_gtk(vbox)
        };
        let webview = webview.map_err(|e| Error::PanelInit(format!("Create web view: {e}")))?;

        info!("control panel built");
        Ok(Self { _webview: webview, window, event_loop, visible: false })
    }

    /// Drain whatever the panel's event loop has queued, without blocking.
    /// A close request hides the panel; the page and its slider stay as they are.
    pub fn pump(&mut self) {
        let window = &self.window;
        let visible = &mut self.visible;
        let panel_id = window.id();

        self.event_loop.run_return(|event, _, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::WindowEvent { window_id, event: WindowEvent::CloseRequested, .. }
                    if window_id == panel_id =>
                {
                    window.set_visible(false);
                    *visible = false;
                }
                Event::MainEventsCleared => *control_flow = ControlFlow::Exit,
                _ => {}
            }
        });
    }
}

impl PanelWindow for WebPanel {
    fn show(&mut self) {
        self.window.set_visible(true);
        self.window.set_focus();
        self.visible = true;
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
