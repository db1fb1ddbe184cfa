// Core buffer types shared by every pipeline stage.

use crate::error::{Error, Result};

/// A W×H row-major buffer. Every stage reads and writes these.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    pub width: usize,
    pub height: usize,
    pub data: Vec<T>, // length = width * height
}

impl<T: Clone> Grid<T> {
    /// Allocate a grid filled with `fill`.
    /// Fails cleanly (no panic, no partial buffer) if the allocation is refused.
    pub fn try_new(width: usize, height: usize, fill: T) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(Error::Allocation { bytes: usize::MAX })?;
        let bytes = len.saturating_mul(std::mem::size_of::<T>());

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::Allocation { bytes })?;
        data.resize(len, fill);

        Ok(Self { width, height, data })
    }
}

impl<T> Grid<T> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = y * self.width + x;
        self.data[idx] = value;
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Reject a buffer whose size differs from `expected`, or whose data does
    /// not hold exactly width * height entries (the fields are public).
    pub fn expect_size(&self, stage: &'static str, expected: (usize, usize)) -> Result<()> {
        if self.dimensions() != expected {
            return Err(Error::SizeMismatch {
                stage,
                expected,
                actual: self.dimensions(),
            });
        }
        let pixels = self.width.checked_mul(self.height).unwrap_or(usize::MAX);
        if self.data.len() != pixels {
            return Err(Error::GridLength {
                stage,
                expected: pixels,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// Nearest-seed entry: a texel coordinate, or `Seed::NONE` when no seed is known yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seed {
    pub x: u32,
    pub y: u32,
}

impl Seed {
    /// Sentinel for "no seed known".
    pub const NONE: Seed = Seed { x: u32::MAX, y: u32::MAX };

    #[inline]
    pub const fn at(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Squared texel distance from (px, py) to this seed. Exact in integers,
    /// so propagation never depends on float rounding.
    #[inline]
    pub fn dist2(self, px: u32, py: u32) -> u64 {
        let dx = self.x.abs_diff(px) as u64;
        let dy = self.y.abs_diff(py) as u64;
        dx * dx + dy * dy
    }

    /// Normalized UV of the seed's texel center, or None for the sentinel.
    pub fn to_uv(self, width: usize, height: usize) -> Option<(f32, f32)> {
        if self.is_none() {
            return None;
        }
        Some((
            (self.x as f32 + 0.5) / width as f32,
            (self.y as f32 + 0.5) / height as f32,
        ))
    }
}

/// Linear RGBA color, each channel nominally in [0,1].
pub type Rgba = [f32; 4];

/// Source image the seeds are classified from (linear RGBA).
pub type SourceImage = Grid<Rgba>;

/// Explicit seed mask in [0,1] per pixel; >= 0.5 marks a seed.
/// Painted with the brush in the viewer.
pub type SeedMask = Grid<f32>;

/// Precomputed circular Gaussian "stamp" we dab into a SeedMask.
pub struct Stamp {
    pub radius: i32,       // pixels from center to edge
    pub weights: Vec<f32>, // (2r+1)*(2r+1), centered kernel, normalized to peak 1.0
}

/// Window-ready pixels (0x00RRGGBB per pixel, what minifb wants).
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_grid_is_rejected() {
        let err = Grid::try_new(0, 4, 0.0f32).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { width: 0, height: 4 }));
    }

    #[test]
    fn seed_distance_is_exact() {
        let s = Seed::at(0, 0);
        assert_eq!(s.dist2(3, 3), 18);
        assert_eq!(Seed::at(5, 1).dist2(2, 5), 25);
    }

    #[test]
    fn sentinel_has_no_uv() {
        assert!(Seed::NONE.is_none());
        assert_eq!(Seed::NONE.to_uv(4, 4), None);
        assert_eq!(Seed::at(1, 3).to_uv(4, 4), Some((0.375, 0.875)));
    }

    #[test]
    fn size_check_reports_both_sizes() {
        let g = Grid::try_new(2, 3, 0u8).unwrap();
        assert!(g.expect_size("test", (2, 3)).is_ok());
        let err = g.expect_size("test", (3, 2)).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch { expected: (3, 2), actual: (2, 3), .. }
        ));
    }

    #[test]
    fn short_data_fails_the_size_check() {
        let g = Grid { width: 4, height: 4, data: vec![0u8; 10] };
        let err = g.expect_size("test", (4, 4)).unwrap_err();
        assert!(matches!(err, Error::GridLength { expected: 16, actual: 10, .. }));

        // dimensions that overflow can never match any real buffer
        let huge = Grid { width: usize::MAX, height: 2, data: vec![0u8; 2] };
        assert!(huge.expect_size("test", (usize::MAX, 2)).is_err());
    }
}
