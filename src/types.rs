// Core types shared by the capture pipeline and the window.

use std::ops::{Add, Sub};

/// One captured camera image (8-bit RGB). Lives for a single tick.
pub type Frame = image::RgbImage;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // canvas width in pixels
    pub height: usize,     // canvas height in pixels
    pub pixels: Vec<u32>,  // each entry is 0xAARRGGBB, straight (non-premultiplied) alpha
}

impl FrameBuffer {
    /// A fully transparent canvas.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[cfg(test)]
    pub fn alpha_at(&self, x: usize, y: usize) -> u8 {
        (self.pixels[y * self.width + x] >> 24) as u8
    }
}

#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack_argb(px: u32) -> (u8, u8, u8, u8) {
    ((px >> 24) as u8, (px >> 16) as u8, (px >> 8) as u8, px as u8)
}

/// Screen-space position in pixels (window top-left, global pointer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Keyboard modifiers held at the moment of a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

#[cfg(test)]
impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, shift: false };
    pub const CTRL_SHIFT: Modifiers = Modifiers { ctrl: true, shift: true };
}

/// Window opacity in [0.0, 1.0]. 1.0 is fully opaque.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Opacity(f32);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(1.0);

    /// Clamp into [0, 1]. Non-finite input has no meaningful opacity, so it's rejected.
    pub fn clamped(value: f32) -> Option<Self> {
        if value.is_finite() { Some(Opacity(value.clamp(0.0, 1.0))) } else { None }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Opacity::OPAQUE
    }
}
