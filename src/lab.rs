// sRGB <-> CIE L*a*b* conversion, table-driven for the gamma part.
// Lightness is stored 8-bit (L* scaled to 0..255) so it can be histogram-equalized;
// the two chroma channels stay as floats so the round trip doesn't drift in hue.

// D65 reference white
const XN: f32 = 0.950_456;
const ZN: f32 = 1.088_754;

const EPSILON: f32 = 0.008_856; // (6/29)^3
const KAPPA: f32 = 7.787;       // slope of the linear segment of f(t)
const F_OFFSET: f32 = 16.0 / 116.0;

/// One pixel in Lab: 8-bit lightness plus signed chroma.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lab {
    pub l: u8,  // L* * 255 / 100
    pub a: f32, // green (-) .. red (+)
    pub b: f32, // blue (-) .. yellow (+)
}

pub struct LabConverter {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl Default for LabConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl LabConverter {
    /// Build both gamma tables once.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = (i as f32) / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    fn to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    pub fn rgb_to_lab(&self, rgb: [u8; 3]) -> Lab {
        let r = self.srgb_to_linear[rgb[0] as usize];
        let g = self.srgb_to_linear[rgb[1] as usize];
        let b = self.srgb_to_linear[rgb[2] as usize];

        let x = (0.412_453 * r + 0.357_580 * g + 0.180_423 * b) / XN;
        let y = 0.212_671 * r + 0.715_160 * g + 0.072_169 * b;
        let z = (0.019_334 * r + 0.119_193 * g + 0.950_227 * b) / ZN;

        let (fx, fy, fz) = (f(x), f(y), f(z));
        let lightness = 116.0 * fy - 16.0;

        Lab {
            l: (lightness * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    pub fn lab_to_rgb(&self, lab: Lab) -> [u8; 3] {
        let lightness = lab.l as f32 * 100.0 / 255.0;
        let fy = (lightness + 16.0) / 116.0;
        let y = if lightness > 116.0 * EPSILON.cbrt() - 16.0 {
            fy * fy * fy
        } else {
            lightness / (116.0 * KAPPA)
        };
        let x = f_inv(fy + lab.a / 500.0) * XN;
        let z = f_inv(fy - lab.b / 200.0) * ZN;

        let r = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
        let g = -0.969_256 * x + 1.875_991 * y + 0.041_556 * z;
        let b = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;

        [self.to_srgb_u8(r), self.to_srgb_u8(g), self.to_srgb_u8(b)]
    }
}

#[inline]
fn f(t: f32) -> f32 {
    if t > EPSILON { t.cbrt() } else { KAPPA * t + F_OFFSET }
}

#[inline]
fn f_inv(v: f32) -> f32 {
    let cube = v * v * v;
    if cube > EPSILON { cube } else { (v - F_OFFSET) / KAPPA }
}
