// sRGB <-> linear conversion with lookup tables instead of powf.
// Used when decoding source pixels (sRGB -> linear) and when showing
// linear result colors in the window (linear -> sRGB).

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaLut {
    /// Build both tables once at startup.
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
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        // NaN clamps to 0 through the `as usize` cast
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Pack a linear RGBA color as 0x00RRGGBB (alpha dropped).
    #[inline]
    pub fn pack_rgb(&self, c: [f32; 4]) -> u32 {
        let r = self.linear_to_srgb_u8(c[0]) as u32;
        let g = self.linear_to_srgb_u8(c[1]) as u32;
        let b = self.linear_to_srgb_u8(c[2]) as u32;
        (r << 16) | (g << 8) | b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_survive_both_tables() {
        let lut = GammaLut::new();
        assert_eq!(lut.srgb_u8_to_linear(0), 0.0);
        assert!((lut.srgb_u8_to_linear(255) - 1.0).abs() < 1e-6);
        assert_eq!(lut.linear_to_srgb_u8(0.0), 0);
        assert_eq!(lut.linear_to_srgb_u8(1.0), 255);
        assert_eq!(lut.linear_to_srgb_u8(7.0), 255);
    }

    #[test]
    fn round_trip_is_close() {
        let lut = GammaLut::new();
        for v in [1u8, 17, 64, 128, 200, 254] {
            let back = lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(v));
            assert!((back as i32 - v as i32).abs() <= 1, "{v} -> {back}");
        }
    }

    #[test]
    fn pack_rgb_layout() {
        let lut = GammaLut::new();
        assert_eq!(lut.pack_rgb([1.0, 0.0, 0.0, 1.0]), 0x00FF_0000);
        assert_eq!(lut.pack_rgb([0.0, 0.0, 1.0, 0.0]), 0x0000_00FF);
    }
}
