// Turns a rectangular frame into the round "bubble" the widget shows:
// centre-crop to a square, then keep only what falls inside the inscribed circle.
// Everything outside the circle is fully transparent.

use crate::types::{Frame, FrameBuffer, pack_argb};

/// Sub-samples per axis for pixels on the circle's edge.
const EDGE_SAMPLES: usize = 4;
/// Half the diagonal of a pixel; beyond this from the edge a pixel is all-in or all-out.
const HALF_DIAGONAL: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Centred square inside a `width x height` frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

pub fn crop_region(width: u32, height: u32) -> CropRegion {
    let size = width.min(height);
    CropRegion { x: (width - size) / 2, y: (height - size) / 2, size }
}

/// Antialiased coverage of a circle inscribed in a `size x size` canvas.
/// 255 = fully inside, 0 = fully outside.
pub struct CircleMask {
    pub size: usize,
    pub coverage: Vec<u8>, // size * size, row-major
}

impl CircleMask {
    pub fn new(size: usize) -> Self {
        let radius = size as f32 / 2.0;
        let centre = radius;
        let mut coverage = Vec::with_capacity(size * size);

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - centre;
                let dy = y as f32 + 0.5 - centre;
                let d = (dx * dx + dy * dy).sqrt();

                let c = if d <= radius - HALF_DIAGONAL {
                    255
                } else if d >= radius + HALF_DIAGONAL {
                    0
                } else {
                    edge_coverage(x, y, centre, radius)
                };
                coverage.push(c);
            }
        }

        Self { size, coverage }
    }
}

/// Fraction of a pixel's sub-samples that land inside the circle, as 0..=255.
fn edge_coverage(x: usize, y: usize, centre: f32, radius: f32) -> u8 {
    let r2 = radius * radius;
    let step = 1.0 / EDGE_SAMPLES as f32;
    let mut inside = 0usize;
    for sy in 0..EDGE_SAMPLES {
        for sx in 0..EDGE_SAMPLES {
            let px = x as f32 + (sx as f32 + 0.5) * step - centre;
            let py = y as f32 + (sy as f32 + 0.5) * step - centre;
            if px * px + py * py <= r2 {
                inside += 1;
            }
        }
    }
    ((inside * 255 + EDGE_SAMPLES * EDGE_SAMPLES / 2) / (EDGE_SAMPLES * EDGE_SAMPLES)) as u8
}

/// Crops and masks frames. Keeps the mask around while the frame size stays put.
#[derive(Default)]
pub struct CircularCompositor {
    mask: Option<CircleMask>,
}

impl CircularCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn composite(&mut self, frame: &Frame) -> FrameBuffer {
        let crop = crop_region(frame.width(), frame.height());
        let size = crop.size as usize;

        let mask = match self.mask.take() {
            Some(mask) if mask.size == size => mask,
            _ => CircleMask::new(size),
        };

        let mut out = FrameBuffer::transparent(size, size);
        for y in 0..size {
            for x in 0..size {
                let idx = y * size + x;
                let alpha = mask.coverage[idx];
                if alpha == 0 {
                    continue; // stays transparent
                }
                let [r, g, b] = frame.get_pixel(crop.x + x as u32, crop.y + y as u32).0;
                out.pixels[idx] = pack_argb(alpha, r, g, b);
            }
        }

        self.mask = Some(mask);
        out
    }
}
