// Turns one of the pipeline's buffers into window pixels.

use jump_flood::distance::{is_unreached, max_finite};
use jump_flood::gamma::GammaLut;
use jump_flood::types::{FrameBuffer, Grid, Seed};
use jump_flood::Pipeline;

/// Which buffer is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Uv,
    Jfa,
    Df,
    Result,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Uv => "UV",
            View::Jfa => "JFA",
            View::Df => "DF",
            View::Result => "RESULT",
        }
    }
}

/// Seed UV as red/green; pixels without a seed stay black.
#[inline]
fn seed_color(seed: Seed, width: usize, height: usize) -> u32 {
    match seed.to_uv(width, height) {
        Some((u, v)) => {
            let r = (u * 255.0).round() as u32;
            let g = (v * 255.0).round() as u32;
            (r << 16) | (g << 8)
        }
        None => 0,
    }
}

fn render_seeds(grid: &Grid<Seed>, out: &mut FrameBuffer) {
    for (px, &seed) in out.pixels.iter_mut().zip(&grid.data) {
        *px = seed_color(seed, grid.width, grid.height);
    }
}

/// |d| / d_max as gray; pixels that never found a seed are white.
fn render_field(field: &Grid<f32>, out: &mut FrameBuffer) {
    let d_max = max_finite(field);
    for (px, &d) in out.pixels.iter_mut().zip(&field.data) {
        let g = if is_unreached(d) || d_max <= 0.0 {
            255
        } else {
            ((d.abs() / d_max).clamp(0.0, 1.0) * 255.0).round() as u32
        };
        *px = (g << 16) | (g << 8) | g;
    }
}

/// Draw `view` from the pipeline's last run into `out` (same size).
/// Nothing is drawn before the first run.
pub fn render(view: View, pipeline: &Pipeline, lut: &GammaLut, out: &mut FrameBuffer) {
    if pipeline.dimensions() != Some((out.width, out.height)) {
        return;
    }
    match view {
        View::Uv => {
            if let Some(seeds) = pipeline.seeds() {
                render_seeds(seeds, out);
            }
        }
        View::Jfa => {
            if let Some(nearest) = pipeline.nearest() {
                render_seeds(nearest, out);
            }
        }
        View::Df => {
            if let Some(field) = pipeline.distance() {
                render_field(field, out);
            }
        }
        View::Result => {
            if let Some(result) = pipeline.result() {
                for (px, &c) in out.pixels.iter_mut().zip(&result.data) {
                    *px = lut.pack_rgb(c);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jump_flood::PipelineConfig;

    #[test]
    fn every_view_draws_after_a_run() {
        let mut source = Grid::try_new(4, 4, [0.0f32; 4]).unwrap();
        source.set(0, 0, [1.0; 4]);
        let mut p = Pipeline::new(PipelineConfig::default()).unwrap();
        p.run(&source, None).unwrap();

        let lut = GammaLut::new();
        let mut fb = FrameBuffer { width: 4, height: 4, pixels: vec![0xDEAD; 16] };

        render(View::Uv, &p, &lut, &mut fb);
        assert_eq!(fb.pixels[0], seed_color(Seed::at(0, 0), 4, 4));
        assert_eq!(fb.pixels[15], 0);

        render(View::Jfa, &p, &lut, &mut fb);
        assert!(fb.pixels.iter().all(|&c| c == seed_color(Seed::at(0, 0), 4, 4)));

        render(View::Df, &p, &lut, &mut fb);
        assert_eq!(fb.pixels[0], 0);
        assert_eq!(fb.pixels[15], 0x00FF_FFFF);

        render(View::Result, &p, &lut, &mut fb);
        assert_eq!(fb.pixels[0], 0x00FF_FFFF);
        assert_eq!(fb.pixels[1], 0);
    }
}
