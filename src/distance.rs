// Distance field derivation from a resolved nearest-seed map.
// Pure per-pixel maps, no cross-pixel reads.

use rayon::prelude::*;

use crate::error::Result;
use crate::types::{Grid, Seed};

/// Distance stored for pixels that never found a seed.
/// Signed fields store `-NO_SEED_DISTANCE` for shape pixels when the image
/// has no pixel outside the shape.
pub const NO_SEED_DISTANCE: f32 = f32::MAX;

/// True for either sentinel, `NO_SEED_DISTANCE` or its negation.
#[inline]
pub fn is_unreached(d: f32) -> bool {
    d.abs() == NO_SEED_DISTANCE
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DistanceUnit {
    /// Texel units: 1.0 = one pixel step.
    #[default]
    Texel,
    /// UV units: x offsets divided by width, y offsets by height.
    Normalized,
}

impl DistanceUnit {
    /// Per-axis scale applied to texel offsets.
    fn scale(self, width: usize, height: usize) -> (f32, f32) {
        match self {
            DistanceUnit::Texel => (1.0, 1.0),
            DistanceUnit::Normalized => (1.0 / width as f32, 1.0 / height as f32),
        }
    }
}

#[inline]
fn seed_distance(seed: Seed, x: usize, y: usize, sx: f32, sy: f32) -> f32 {
    if seed.is_none() {
        return NO_SEED_DISTANCE;
    }
    let dx = (seed.x as f64 - x as f64) as f32 * sx;
    let dy = (seed.y as f64 - y as f64) as f32 * sy;
    (dx * dx + dy * dy).sqrt()
}

/// Unsigned field: distance from each pixel to its resolved seed.
pub fn derive(nearest: &Grid<Seed>, unit: DistanceUnit, out: &mut Grid<f32>) -> Result<()> {
    out.expect_size("derive", nearest.dimensions())?;

    let width = nearest.width;
    let (sx, sy) = unit.scale(nearest.width, nearest.height);
    out.data
        .par_chunks_mut(width)
        .zip(nearest.data.par_chunks(width))
        .enumerate()
        .for_each(|(y, (dst, src))| {
            for (x, (d, &seed)) in dst.iter_mut().zip(src).enumerate() {
                *d = seed_distance(seed, x, y, sx, sy);
            }
        });
    Ok(())
}

/// Signed field: positive outside the shape (distance to the nearest shape
/// pixel, from `outer`), negative inside (minus the distance to the nearest
/// non-shape pixel, from `inner`). `shape` tells which pixels are inside.
/// When nothing lies outside the shape, every pixel gets `-NO_SEED_DISTANCE`.
pub fn derive_signed(
    outer: &Grid<Seed>,
    inner: &Grid<Seed>,
    shape: &Grid<Seed>,
    unit: DistanceUnit,
    out: &mut Grid<f32>,
) -> Result<()> {
    let dims = outer.dimensions();
    inner.expect_size("derive signed (inner)", dims)?;
    shape.expect_size("derive signed (shape)", dims)?;
    out.expect_size("derive signed (output)", dims)?;

    let width = outer.width;
    let (sx, sy) = unit.scale(outer.width, outer.height);
    out.data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, dst)| {
            let row_ofs = y * width;
            for (x, d) in dst.iter_mut().enumerate() {
                let idx = row_ofs + x;
                *d = if shape.data[idx].is_some() {
                    -seed_distance(inner.data[idx], x, y, sx, sy)
                } else {
                    seed_distance(outer.data[idx], x, y, sx, sy)
                };
            }
        });
    Ok(())
}

/// Largest finite |distance| in the field (`d_max`), or 0 when every pixel
/// is a sentinel.
pub fn max_finite(field: &Grid<f32>) -> f32 {
    field
        .data
        .par_iter()
        .filter(|d| !is_unreached(**d))
        .map(|d| d.abs())
        .reduce(|| 0.0, f32::max)
}
