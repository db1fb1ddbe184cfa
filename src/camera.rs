// Opens a camera and hands back frames as 0x00RRGGBB buffers.
// The viewer turns each frame into a linear source image and floods it,
// so the distance field follows whatever the camera sees.

use jump_flood::error::Error;
use jump_flood::types::FrameBuffer;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// A small wrapper around nokhwa::Camera so the main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution (falls back if not exact).
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,
        );

        // Ask for RGB frames, closest format to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The stream may settle on a different resolution than requested.
        let actual = cam.resolution();

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
        })
    }

    /// Grab one frame (blocks until the camera delivers) into `out`.
    /// `out` keeps its allocation; a frame of another size is rejected.
    pub fn next_frame(&mut self, out: &mut FrameBuffer) -> Result<(), Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        if (w as usize, h as usize) != (out.width, out.height) {
            return Err(Error::CameraFrame(format!(
                "frame is {w}x{h}, stream was opened at {}x{}",
                out.width, out.height
            )));
        }

        for (slot, pixel) in out.pixels.iter_mut().zip(rgb_img.pixels()) {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            *slot = (r << 16) | (g << 8) | b;
        }
        Ok(())
    }

    /// Resolution the camera is actually delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
