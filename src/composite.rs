// Turns a distance field into the visible result buffer.

use rayon::prelude::*;

use crate::distance::{NO_SEED_DISTANCE, is_unreached, max_finite};
use crate::error::{Error, Result};
use crate::types::{Grid, Rgba};

pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 1.0];

/// Edge of the shape band.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Falloff {
    /// Hard mask: inside color or outside color.
    #[default]
    Binary,
    /// Smoothstep from inside to outside over `softness` distance units.
    Smooth { softness: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeParams {
    pub shape_width: f32,
    pub falloff: Falloff,
    /// Diagnostic mode: show the raw field as grayscale.
    pub show_distance: bool,
    pub inside: Rgba,
    pub outside: Rgba,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            shape_width: 0.0,
            falloff: Falloff::Binary,
            show_distance: false,
            inside: WHITE,
            outside: BLACK,
        }
    }
}

impl CompositeParams {
    pub fn validate(&self) -> Result<()> {
        if !self.shape_width.is_finite() || self.shape_width < 0.0 {
            return Err(Error::InvalidShapeWidth(self.shape_width));
        }
        if let Falloff::Smooth { softness } = self.falloff {
            if !softness.is_finite() || softness <= 0.0 {
                return Err(Error::InvalidSoftness(softness));
            }
        }
        Ok(())
    }
}

/// A pixel is in the band when it found a seed and lies within `width` of it.
/// `-NO_SEED_DISTANCE` (signed, no outside pixel anywhere) is inside.
#[inline]
pub fn is_inside(d: f32, width: f32) -> bool {
    d != NO_SEED_DISTANCE && d <= width
}

#[inline]
fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn mix(a: Rgba, b: Rgba, t: f32) -> Rgba {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Map one distance to its output color.
fn shade(d: f32, p: &CompositeParams, d_max: f32) -> Rgba {
    if p.show_distance {
        let g = if is_unreached(d) || d_max <= 0.0 {
            1.0
        } else {
            (d.abs() / d_max).clamp(0.0, 1.0)
        };
        return [g, g, g, 1.0];
    }

    if d == NO_SEED_DISTANCE {
        return p.outside;
    }
    match p.falloff {
        Falloff::Binary => {
            if is_inside(d, p.shape_width) { p.inside } else { p.outside }
        }
        // softness > 0 is checked by validate()
        Falloff::Smooth { softness } => {
            let t = smoothstep(p.shape_width, p.shape_width + softness, d);
            mix(p.inside, p.outside, t)
        }
    }
}

/// Fill `out` from `field` according to `params`.
pub fn composite(field: &Grid<f32>, params: &CompositeParams, out: &mut Grid<Rgba>) -> Result<()> {
    params.validate()?;
    out.expect_size("composite", field.dimensions())?;

    // only the diagnostic view needs the field range
    let d_max = if params.show_distance { max_finite(field) } else { 0.0 };

    out.data
        .par_iter_mut()
        .zip(field.data.par_iter())
        .for_each(|(o, &d)| *o = shade(d, params, d_max));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(values: &[f32]) -> Grid<f32> {
        Grid { width: values.len(), height: 1, data: values.to_vec() }
    }

    fn run(f: &Grid<f32>, params: CompositeParams) -> Vec<Rgba> {
        let mut out = Grid::try_new(f.width, f.height, [0.0; 4]).unwrap();
        composite(f, &params, &mut out).unwrap();
        out.data
    }

    #[test]
    fn zero_width_is_the_seed_mask() {
        let f = field(&[0.0, 1.0, 0.0, 2.5]);
        let out = run(&f, CompositeParams::default());
        assert_eq!(out, vec![WHITE, BLACK, WHITE, BLACK]);
    }

    #[test]
    fn width_d_max_marks_everything_inside() {
        let f = field(&[0.0, 1.0, 3.0, 2.5]);
        let params = CompositeParams { shape_width: max_finite(&f), ..Default::default() };
        assert!(run(&f, params).iter().all(|c| *c == WHITE));
    }

    #[test]
    fn sentinel_is_always_outside() {
        let f = field(&[NO_SEED_DISTANCE, NO_SEED_DISTANCE]);
        let params = CompositeParams { shape_width: 1.0e30, ..Default::default() };
        assert!(run(&f, params).iter().all(|c| *c == BLACK));
    }

    #[test]
    fn smooth_falloff_blends_past_the_band() {
        let f = field(&[1.0, 2.0, 3.0]);
        let params = CompositeParams {
            shape_width: 1.0,
            falloff: Falloff::Smooth { softness: 2.0 },
            ..Default::default()
        };
        let out = run(&f, params);
        assert_eq!(out[0], WHITE);
        assert!((out[1][0] - 0.5).abs() < 1e-6); // halfway through the ramp
        assert_eq!(out[2], BLACK);
    }

    #[test]
    fn diagnostic_mode_shows_normalized_distance() {
        let f = field(&[0.0, 2.0, 4.0, NO_SEED_DISTANCE]);
        let params = CompositeParams { show_distance: true, ..Default::default() };
        let gray: Vec<f32> = run(&f, params).iter().map(|c| c[0]).collect();
        assert_eq!(gray, vec![0.0, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn fully_inside_signed_sentinel_is_inside() {
        let f = field(&[-NO_SEED_DISTANCE, NO_SEED_DISTANCE]);
        assert_eq!(run(&f, CompositeParams::default()), vec![WHITE, BLACK]);

        let smooth = CompositeParams {
            falloff: Falloff::Smooth { softness: 0.5 },
            ..Default::default()
        };
        assert_eq!(run(&f, smooth), vec![WHITE, BLACK]);

        let diag = CompositeParams { show_distance: true, ..Default::default() };
        assert!(run(&f, diag).iter().all(|c| *c == WHITE));
    }

    #[test]
    fn bad_softness_is_rejected() {
        let f = field(&[0.0]);
        let mut out = Grid::try_new(1, 1, [0.0; 4]).unwrap();
        for softness in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let params = CompositeParams {
                falloff: Falloff::Smooth { softness },
                ..Default::default()
            };
            assert!(matches!(
                composite(&f, &params, &mut out),
                Err(Error::InvalidSoftness(_))
            ));
        }
    }

    #[test]
    fn negative_width_is_rejected() {
        let f = field(&[0.0]);
        let mut out = Grid::try_new(1, 1, [0.0; 4]).unwrap();
        let params = CompositeParams { shape_width: -1.0, ..Default::default() };
        assert!(matches!(
            composite(&f, &params, &mut out),
            Err(Error::InvalidShapeWidth(_))
        ));
    }
}
