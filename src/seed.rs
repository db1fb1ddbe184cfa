// Seed initialization: classify every source pixel as seed or not.
//
// A seed pixel stores its own coordinate; every other pixel stores
// Seed::NONE. This is the "UV" buffer the propagator starts from.

use rayon::prelude::*;

use crate::error::Result;
use crate::gamma::GammaLut;
use crate::types::{FrameBuffer, Grid, Rgba, Seed, SeedMask, SourceImage};

/// Painted mask values at or above this count as seeds.
pub const MASK_SEED_LEVEL: f32 = 0.5;

/// How a source pixel is classified as "inside the shape".
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SeedRule {
    /// Seed when alpha >= threshold (shape textures with transparency).
    Alpha { threshold: f32 },
    /// Seed when linear luma >= threshold, or < threshold when `invert`.
    Luma { threshold: f32, invert: bool },
    /// Only the explicit mask decides.
    Mask,
}

impl Default for SeedRule {
    fn default() -> Self {
        SeedRule::Alpha { threshold: 0.5 }
    }
}

impl SeedRule {
    #[inline]
    pub fn classify(&self, px: Rgba) -> bool {
        match *self {
            SeedRule::Alpha { threshold } => px[3] >= threshold,
            SeedRule::Luma { threshold, invert } => (luma(px) >= threshold) != invert,
            SeedRule::Mask => false,
        }
    }
}

/// Rec.709 luma of a linear color.
#[inline]
pub fn luma(px: Rgba) -> f32 {
    0.2126 * px[0] + 0.7152 * px[1] + 0.0722 * px[2]
}

/// Write the seed buffer for `source`.
/// `extra` (painted seeds) is merged on top of the rule when present.
pub fn initialize(
    source: &SourceImage,
    rule: &SeedRule,
    extra: Option<&SeedMask>,
    out: &mut Grid<Seed>,
) -> Result<()> {
    let dims = source.dimensions();
    out.expect_size("seed init (output)", dims)?;
    if let Some(mask) = extra {
        mask.expect_size("seed init (mask)", dims)?;
    }

    let width = source.width;
    out.data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let row_ofs = y * width;
            for (x, slot) in row.iter_mut().enumerate() {
                let idx = row_ofs + x;
                let painted = extra.is_some_and(|m| m.data[idx] >= MASK_SEED_LEVEL);
                *slot = if painted || rule.classify(source.data[idx]) {
                    Seed::at(x as u32, y as u32)
                } else {
                    Seed::NONE
                };
            }
        });
    Ok(())
}

/// Complementary seed buffer: every pixel that is *not* a seed in `seeds`
/// becomes a seed of its own. Used for the inside half of a signed field.
pub fn invert_into(seeds: &Grid<Seed>, out: &mut Grid<Seed>) -> Result<()> {
    out.expect_size("seed invert", seeds.dimensions())?;

    let width = seeds.width;
    out.data
        .par_chunks_mut(width)
        .zip(seeds.data.par_chunks(width))
        .enumerate()
        .for_each(|(y, (dst, src))| {
            for (x, (d, s)) in dst.iter_mut().zip(src).enumerate() {
                *d = if s.is_none() { Seed::at(x as u32, y as u32) } else { Seed::NONE };
            }
        });
    Ok(())
}

pub fn count_seeds(seeds: &Grid<Seed>) -> usize {
    seeds.data.par_iter().filter(|s| s.is_some()).count()
}

/// Convert a decoded RGBA8 image (sRGB) into a linear source image.
pub fn source_from_image(img: &image::RgbaImage, lut: &GammaLut) -> Result<SourceImage> {
    let (w, h) = img.dimensions();
    let mut out = Grid::try_new(w as usize, h as usize, [0.0; 4])?;
    for (slot, px) in out.data.iter_mut().zip(img.pixels()) {
        *slot = [
            lut.srgb_u8_to_linear(px[0]),
            lut.srgb_u8_to_linear(px[1]),
            lut.srgb_u8_to_linear(px[2]),
            px[3] as f32 / 255.0, // alpha is already linear
        ];
    }
    Ok(out)
}

/// Convert an opaque 0x00RRGGBB frame (camera) into a linear source image,
/// reusing `out` when the size matches.
pub fn source_from_frame(frame: &FrameBuffer, lut: &GammaLut, out: &mut SourceImage) -> Result<()> {
    out.expect_size("camera frame", (frame.width, frame.height))?;
    for (slot, &px) in out.data.iter_mut().zip(&frame.pixels) {
        *slot = [
            lut.srgb_u8_to_linear(((px >> 16) & 0xFF) as u8),
            lut.srgb_u8_to_linear(((px >> 8) & 0xFF) as u8),
            lut.srgb_u8_to_linear((px & 0xFF) as u8),
            1.0,
        ];
    }
    Ok(())
}
