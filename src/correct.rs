// Counteracts the warm/yellow cast most webcams' auto white balance produces.
// Only lightness is equalized; hue and saturation ride along untouched.

use crate::clahe;
use crate::config::ClaheParams;
use crate::lab::{Lab, LabConverter};
use crate::types::Frame;
use image::GrayImage;

pub struct ColorCorrector {
    lab: LabConverter,
    params: ClaheParams,
}

impl ColorCorrector {
    pub fn new(params: ClaheParams) -> Self {
        Self { lab: LabConverter::new(), params }
    }

    /// Lab split -> CLAHE on L -> merge -> back to RGB.
    /// Pure: nothing is remembered between frames.
    pub fn correct(&self, frame: &Frame) -> Frame {
        let (w, h) = frame.dimensions();

        let mut chroma = Vec::with_capacity((w as usize) * (h as usize));
        let mut lightness = GrayImage::new(w, h);
        for (px, l) in frame.pixels().zip(lightness.pixels_mut()) {
            let lab = self.lab.rgb_to_lab(px.0);
            l[0] = lab.l;
            chroma.push((lab.a, lab.b));
        }

        let lightness = clahe::equalize(&lightness, self.params);

        let mut out = Frame::new(w, h);
        for ((dst, l), &(a, b)) in out.pixels_mut().zip(lightness.pixels()).zip(chroma.iter()) {
            dst.0 = self.lab.lab_to_rgb(Lab { l: l[0], a, b });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn uniform_gray_is_left_almost_alone() {
        let corrector = ColorCorrector::new(ClaheParams::default());
        let frame = Frame::from_pixel(256, 192, Rgb([128, 128, 128]));
        let out = corrector.correct(&frame);

        assert_eq!(out.dimensions(), frame.dimensions());
        for px in out.pixels() {
            let [r, g, b] = px.0;
            assert!((r as i32 - 128).abs() <= 6, "r = {r}");
            // Still neutral: no tint introduced.
            assert!((r as i32 - g as i32).abs() <= 1 && (g as i32 - b as i32).abs() <= 1, "{:?}", px.0);
        }
    }

    #[test]
    fn same_frame_gives_same_output() {
        let corrector = ColorCorrector::new(ClaheParams::default());
        let frame = Frame::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 90]));
        assert_eq!(corrector.correct(&frame), corrector.correct(&frame));
    }

    #[test]
    fn low_contrast_detail_is_boosted() {
        let corrector = ColorCorrector::new(ClaheParams { clip_limit: 3.0, tiles_x: 2, tiles_y: 2 });
        // Faint vertical stripes on a mid-gray background.
        let frame = Frame::from_fn(64, 64, |x, _| if x % 8 < 4 { Rgb([120, 120, 120]) } else { Rgb([128, 128, 128]) });
        let out = corrector.correct(&frame);

        let dark = out.get_pixel(0, 32)[0] as i32;
        let light = out.get_pixel(4, 32)[0] as i32;
        assert!(light - dark > 8, "stripes {dark} vs {light}");
    }

    #[test]
    fn empty_frame_is_fine() {
        let corrector = ColorCorrector::new(ClaheParams::default());
        let out = corrector.correct(&Frame::new(0, 0));
        assert_eq!(out.dimensions(), (0, 0));
    }
}
