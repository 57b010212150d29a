// Contrast-limited adaptive histogram equalization on one 8-bit plane.
// The plane is cut into a grid of tiles; each tile gets its own equalization
// curve with the histogram clipped so flat areas don't blow up into noise.
// Pixels blend the curves of the four nearest tile centres, so no seams show.

use crate::config::ClaheParams;
use image::GrayImage;

type Lut = [u8; 256];

/// Equalize `src` tile by tile. Output has the same dimensions.
pub fn equalize(src: &GrayImage, params: ClaheParams) -> GrayImage {
    let (w, h) = (src.width() as usize, src.height() as usize);
    if w == 0 || h == 0 {
        return src.clone();
    }

    // Never more tiles than pixels along an axis.
    let tiles_x = params.tiles_x.clamp(1, w);
    let tiles_y = params.tiles_y.clamp(1, h);
    let edges_x: Vec<usize> = (0..=tiles_x).map(|i| i * w / tiles_x).collect();
    let edges_y: Vec<usize> = (0..=tiles_y).map(|j| j * h / tiles_y).collect();

    let raw = src.as_raw();

    /* ---- Pass 1: one equalization curve per tile ---- */
    let mut luts: Vec<Lut> = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0u32; 256];
            for y in edges_y[ty]..edges_y[ty + 1] {
                let row = &raw[y * w..(y + 1) * w];
                for &v in &row[edges_x[tx]..edges_x[tx + 1]] {
                    hist[v as usize] += 1;
                }
            }

            let area = ((edges_x[tx + 1] - edges_x[tx]) * (edges_y[ty + 1] - edges_y[ty])) as u32;
            if let Some(limit) = clip_limit(params.clip_limit, area) {
                clip_histogram(&mut hist, limit);
            }
            luts.push(cumulative_lut(&hist, area));
        }
    }

    /* ---- Pass 2: bilinear blend between neighbouring tile curves ---- */
    let tile_w = w as f32 / tiles_x as f32;
    let tile_h = h as f32 / tiles_y as f32;
    let mut out = vec![0u8; w * h];

    for y in 0..h {
        let (ty0, ty1, wy) = neighbours(y, tile_h, tiles_y);
        for x in 0..w {
            let (tx0, tx1, wx) = neighbours(x, tile_w, tiles_x);
            let v = raw[y * w + x] as usize;

            let top = lerp(luts[ty0 * tiles_x + tx0][v], luts[ty0 * tiles_x + tx1][v], wx);
            let bottom = lerp(luts[ty1 * tiles_x + tx0][v], luts[ty1 * tiles_x + tx1][v], wx);
            let mixed = top + (bottom - top) * wy;

            out[y * w + x] = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    // Dimensions and length come straight from `src`, so this can't fail.
    GrayImage::from_raw(w as u32, h as u32, out).unwrap_or_else(|| src.clone())
}

/// Per-bin ceiling for a tile of `area` pixels. `None` disables clipping.
fn clip_limit(limit: f32, area: u32) -> Option<u32> {
    if limit <= 0.0 {
        return None;
    }
    Some(((limit * area as f32 / 256.0) as u32).max(1))
}

/// Cut every bin down to `limit` and spread what was cut evenly over all bins.
/// The total count is preserved.
fn clip_histogram(hist: &mut [u32; 256], limit: u32) {
    let mut clipped = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            clipped += *bin - limit;
            *bin = limit;
        }
    }

    let batch = clipped / 256;
    let mut residual = clipped - batch * 256;
    for bin in hist.iter_mut() {
        *bin += batch;
    }

    // Leftovers go to evenly spaced bins.
    if residual > 0 {
        let step = (256 / residual as usize).max(1);
        let mut i = 0;
        while i < 256 && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

fn cumulative_lut(hist: &[u32; 256], area: u32) -> Lut {
    let scale = 255.0 / area.max(1) as f32;
    let mut lut = [0u8; 256];
    let mut sum = 0u32;
    for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
        sum += count;
        *slot = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// The two tile indices whose centres bracket `pos`, and the weight of the second.
#[inline]
fn neighbours(pos: usize, tile_len: f32, tiles: usize) -> (usize, usize, f32) {
    let t = pos as f32 / tile_len - 0.5;
    let t0 = t.floor();
    let weight = t - t0;
    let last = tiles as isize - 1;
    let i0 = (t0 as isize).clamp(0, last) as usize;
    let i1 = (t0 as isize + 1).clamp(0, last) as usize;
    (i0, i1, weight)
}

#[inline]
fn lerp(a: u8, b: u8, t: f32) -> f32 {
    a as f32 + (b as f32 - a as f32) * t
}
