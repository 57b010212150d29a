// The overlay window itself: no title bar, always on top, see-through
// wherever the bubble isn't drawn. Also where pointer and modifier state come from.

use crate::config::Config;
use crate::error::Error;
use crate::types::{FrameBuffer, Modifiers, Opacity, Point, pack_argb, unpack_argb};
use minifb::{Key, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

pub struct Drawer {
    window: Window,
    scratch: Vec<u32>, // opacity-applied copy of the displayed image
}

impl Drawer {
    /// Create the frameless, topmost, transparent window.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let options = WindowOptions {
            borderless: true,
            title: false,
            resize: false,
            topmost: true,
            transparency: true,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        };
        let mut window = Window::new(&config.window_title, config.window_width, config.window_height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(config.target_fps());

        Ok(Self { window, scratch: Vec::new() })
    }

    /// Push the current image at the given opacity. With nothing to show yet,
    /// only window events are processed.
    pub fn present(&mut self, image: Option<&FrameBuffer>, opacity: Opacity) -> Result<(), Error> {
        match image.filter(|img| !img.is_empty()) {
            Some(img) => {
                apply_opacity(img, opacity, &mut self.scratch);
                self.window
                    .update_with_buffer(&self.scratch, img.width, img.height)
                    .map_err(|e| Error::WindowUpdate(e.to_string()))
            }
            None => {
                self.window.update();
                Ok(())
            }
        }
    }

    /// Returns false when the window has been closed.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Escape quits; the bubble has no close button of its own.
    pub fn quit_requested(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    pub fn top_left(&self) -> Point {
        let (x, y) = self.window.get_position();
        Point::new(x, y)
    }

    /// Pointer position in screen coordinates (window origin + pointer inside it).
    pub fn pointer_global(&self) -> Option<Point> {
        self.window
            .get_unscaled_mouse_pos(MouseMode::Pass)
            .map(|(x, y)| self.top_left() + Point::new(x.round() as isize, y.round() as isize))
    }

    pub fn move_to(&mut self, top_left: Point) {
        self.window.set_position(top_left.x, top_left.y);
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl),
            shift: self.window.is_key_down(Key::LeftShift) || self.window.is_key_down(Key::RightShift),
        }
    }
}

/// Scale every pixel's alpha by `opacity` and premultiply colour, which is what
/// a composited transparent window expects.
fn apply_opacity(src: &FrameBuffer, opacity: Opacity, dst: &mut Vec<u32>) {
    let k = opacity.get();
    dst.clear();
    dst.extend(src.pixels.iter().map(|&px| {
        let (a, r, g, b) = unpack_argb(px);
        let a = (a as f32 * k).round() as u8;
        if a == 0 {
            return 0;
        }
        let premul = |c: u8| ((c as u32 * a as u32 + 127) / 255) as u8;
        pack_argb(a, premul(r), premul(g), premul(b))
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(pixels: Vec<u32>) -> FrameBuffer {
        FrameBuffer { width: pixels.len(), height: 1, pixels }
    }

    #[test]
    fn full_opacity_keeps_opaque_pixels() {
        let src = buffer(vec![0xFF11_2233, 0x0000_0000]);
        let mut out = Vec::new();
        apply_opacity(&src, Opacity::OPAQUE, &mut out);
        assert_eq!(out, vec![0xFF11_2233, 0]);
    }

    #[test]
    fn zero_opacity_clears_everything() {
        let src = buffer(vec![0xFFFF_FFFF, 0x80AB_CDEF]);
        let mut out = vec![1, 2, 3];
        apply_opacity(&src, Opacity::clamped(0.0).unwrap(), &mut out);
        assert_eq!(out, vec![0, 0]);
    }

    #[test]
    fn half_opacity_halves_alpha_and_premultiplies() {
        let src = buffer(vec![0xFFC8_6432]);
        let mut out = Vec::new();
        apply_opacity(&src, Opacity::clamped(0.5).unwrap(), &mut out);
        let (a, r, g, b) = unpack_argb(out[0]);
        assert_eq!(a, 128);
        assert_eq!((r, g, b), (100, 50, 25));
    }
}
