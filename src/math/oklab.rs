//! Gamma-encoded `sRGB` to `OKLab` conversion
//!
//! `OKLab` is perceptually uniform enough that plain squared Euclidean distance
//! between converted samples tracks visual mismatch well, which is all the
//! seam scoring engine needs. The conversion is the standard pair of fixed
//! 3x3 matrix transforms with a cube-root nonlinearity between them.

/// Linearize one gamma-encoded `sRGB` channel to [0, 1]
pub fn srgb_to_linear(channel: u8) -> f32 {
    let u = f32::from(channel) / 255.0;
    if u <= 0.040_45 {
        u / 12.92
    } else {
        ((u + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert linear RGB to `OKLab` (lightness, two chroma axes)
pub fn linear_to_oklab(r: f32, g: f32, b: f32) -> [f32; 3] {
    let l = 0.051_445_995_f32.mul_add(b, 0.412_221_46_f32.mul_add(r, 0.536_332_55 * g));
    let m = 0.107_396_96_f32.mul_add(b, 0.211_903_5_f32.mul_add(r, 0.680_699_5 * g));
    let s = 0.629_978_7_f32.mul_add(b, 0.088_302_46_f32.mul_add(r, 0.281_718_85 * g));

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    [
        (-0.004_072_046_8_f32).mul_add(s_, 0.210_454_26_f32.mul_add(l_, 0.793_617_8 * m_)),
        0.450_593_7_f32.mul_add(s_, 1.977_998_5_f32.mul_add(l_, -2.428_592_2 * m_)),
        (-0.808_675_77_f32).mul_add(s_, 0.025_904_037_f32.mul_add(l_, 0.782_771_77 * m_)),
    ]
}

/// Convert a gamma-encoded `sRGB` triple straight to `OKLab`
pub fn oklab_from_srgb(r: u8, g: u8, b: u8) -> [f32; 3] {
    linear_to_oklab(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

/// Squared Euclidean distance between two `OKLab` samples
pub fn distance_sq(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dl = a[0] - b[0];
    let da = a[1] - b[1];
    let db = a[2] - b[2];
    db.mul_add(db, dl.mul_add(dl, da * da))
}

#[cfg(test)]
mod tests {
    use super::{distance_sq, oklab_from_srgb};

    #[test]
    fn black_maps_to_origin() {
        let lab = oklab_from_srgb(0, 0, 0);
        assert!(lab.iter().all(|c| c.abs() < 1e-5));
    }

    #[test]
    fn white_has_unit_lightness_and_no_chroma() {
        let lab = oklab_from_srgb(255, 255, 255);
        assert!((lab[0] - 1.0).abs() < 1e-3);
        assert!(lab[1].abs() < 1e-3);
        assert!(lab[2].abs() < 1e-3);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_identity() {
        let a = oklab_from_srgb(200, 30, 90);
        let b = oklab_from_srgb(10, 220, 45);
        assert!((distance_sq(a, b) - distance_sq(b, a)).abs() < 1e-9);
        assert!(distance_sq(a, a).abs() < 1e-9);
        assert!(distance_sq(a, b) > 0.0);
    }
}
