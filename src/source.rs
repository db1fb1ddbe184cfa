// Where the viewer's source image comes from: a file, the camera, or a
// built-in test shape. Whatever the origin, the pipeline sees a linear
// SourceImage of fixed size.

use std::path::Path;

use jump_flood::error::{Error, Result};
use jump_flood::gamma::GammaLut;
use jump_flood::seed;
use jump_flood::types::{FrameBuffer, Grid, SourceImage};
use tracing::info;

use crate::camera::CameraCapture;
use crate::cli::Cli;

pub enum Input {
    Still(SourceImage),
    Camera {
        cam: CameraCapture,
        frame: FrameBuffer,
        source: SourceImage,
    },
}

impl Input {
    pub fn open(cli: &Cli, lut: &GammaLut) -> Result<Self> {
        if let Some(path) = &cli.image {
            return Ok(Input::Still(load_image(path, lut)?));
        }

        if let Some(index) = cli.camera {
            let cam = CameraCapture::new(index, cli.width as u32, cli.height as u32)?;
            let (w, h) = cam.resolution();
            let (w, h) = (w as usize, h as usize);
            info!(index, width = w, height = h, "camera stream open");
            return Ok(Input::Camera {
                cam,
                frame: FrameBuffer { width: w, height: h, pixels: vec![0u32; w * h] },
                source: Grid::try_new(w, h, [0.0; 4])?,
            });
        }

        Ok(Input::Still(procedural_shape(cli.width, cli.height)?))
    }

    pub fn resolution(&self) -> (usize, usize) {
        self.source().dimensions()
    }

    /// Pull the next camera frame into the source image. Still images never change.
    pub fn refresh(&mut self, lut: &GammaLut) -> Result<()> {
        match self {
            Input::Still(_) => Ok(()),
            Input::Camera { cam, frame, source } => {
                cam.next_frame(frame)?;
                seed::source_from_frame(frame, lut, source)
            }
        }
    }

    pub fn source(&self) -> &SourceImage {
        match self {
            Input::Still(source) => source,
            Input::Camera { source, .. } => source,
        }
    }
}

/// Decode an image file into a linear source image.
pub fn load_image(path: &Path, lut: &GammaLut) -> Result<SourceImage> {
    let img = image::open(path)
        .map_err(|e| Error::ImageLoad(format!("{}: {e}", path.display())))?
        .to_rgba8();
    info!(path = %path.display(), width = img.width(), height = img.height(), "source image loaded");
    seed::source_from_image(&img, lut)
}

/// Built-in shape: a ring and a small box, opaque on a transparent background.
pub fn procedural_shape(width: usize, height: usize) -> Result<SourceImage> {
    let mut src = Grid::try_new(width, height, [0.0f32; 4])?;

    let (cx, cy) = (width as f32 * 0.4, height as f32 * 0.45);
    let r = width.min(height) as f32 * 0.25;
    let thickness = (r * 0.12).max(1.0);

    let bx0 = width * 13 / 20;
    let bx1 = width * 17 / 20;
    let by0 = height * 13 / 20;
    let by1 = height * 17 / 20;

    for y in 0..height {
        for x in 0..width {
            let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
            let on_ring = ((dx * dx + dy * dy).sqrt() - r).abs() <= thickness;
            let in_box = (bx0..bx1).contains(&x) && (by0..by1).contains(&y);
            if on_ring || in_box {
                src.set(x, y, [1.0, 1.0, 1.0, 1.0]);
            }
        }
    }
    Ok(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jump_flood::SeedRule;

    #[test]
    fn procedural_shape_has_ring_and_box() {
        let src = procedural_shape(100, 100).unwrap();
        let rule = SeedRule::default();
        // box interior
        assert!(rule.classify(*src.get(75, 75)));
        // ring passes through (40 + 25, 45)
        assert!(rule.classify(*src.get(64, 44)));
        // ring center is empty
        assert!(!rule.classify(*src.get(40, 45)));
    }

    #[test]
    fn missing_image_reports_the_path() {
        let lut = GammaLut::new();
        let err = load_image(Path::new("/nonexistent/shape.png"), &lut).unwrap_err();
        assert!(matches!(err, Error::ImageLoad(ref m) if m.contains("shape.png")));
    }
}
