// What you SEE:
// • The source shape flooded every frame; keys 1-4 pick the buffer on screen
//   (UV seeds, JFA nearest-seed map, DF distance field, RESULT composite).
// • Up/Down move the shape-width slider; D toggles raw DF in the result view.
// • Hold Left Mouse to paint extra seeds. C clears them. ESC quits.

mod camera;
mod cli;
mod draw;
mod source;
mod view;

use std::time::{Duration, Instant};

use clap::Parser;
use jump_flood::brush::{clear_mask, dab_mask, make_gaussian_stamp};
use jump_flood::gamma::GammaLut;
use jump_flood::{Error, FrameBuffer, Grid, Pipeline};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use draw::{Drawer, draw_crosshair, draw_text_5x7};
use source::Input;
use view::View;

/// Slider units per second while Up/Down is held.
const SLIDER_SPEED: f32 = 0.5;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    /* --- Source + window setup --- */
    let lut = GammaLut::new();
    let mut input = Input::open(&cli, &lut)?;
    let (w, h) = input.resolution();
    let mut drawer = Drawer::new("Jump Flood", w, h)?;
    info!(width = w, height = h, "viewer started");

    /* --- Pipeline (buffers get allocated on the first run) --- */
    let full_width = cli.shape_width;
    let mut pipeline = Pipeline::new(cli.pipeline_config())?;
    let mut slider: f32 = 1.0;
    let mut show_df = cli.show_df;
    let mut view = View::Result;

    /* --- Reusable screen buffer --- */
    let mut screen = FrameBuffer { width: w, height: h, pixels: vec![0u32; w * h] };

    /* --- Painted seeds --- */
    let mut mask = Grid::try_new(w, h, 0.0f32)?;
    let brush_radius: i32 = 10;
    let stamp = make_gaussian_stamp(brush_radius, brush_radius as f32 * 0.5);
    let mut mask_has_any = false; // skip the mask entirely until something is painted

    /* --- FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        /* 1) New camera frame (still images are left alone).
           A dropped frame keeps the previous one on screen. */
        if let Err(e) = input.refresh(&lut) {
            warn!("{e}");
        }

        /* 2) Inputs */
        if let Some(v) = drawer.view_selected() { view = v; }
        if drawer.d_pressed_once() { show_df = !show_df; }
        if drawer.c_pressed_once() {
            clear_mask(&mut mask);
            mask_has_any = false;
        }
        slider = (slider + drawer.slider_direction() * SLIDER_SPEED * dt).clamp(0.0, 1.0);

        if drawer.left_mouse_down() {
            if let Some((mx, my)) = drawer.mouse_pos() {
                dab_mask(&mut mask, mx as i32, my as i32, &stamp);
                mask_has_any = true;
            }
        }

        /* 3) Parameters, then the whole pipeline: seeds → flood → field → result */
        pipeline.set_shape_width(full_width * slider)?;
        pipeline.set_show_distance(show_df);
        pipeline.run(input.source(), mask_has_any.then_some(&mask))?;

        /* 4) Show the selected buffer, brush cursor and HUD */
        view::render(view, &pipeline, &lut, &mut screen);

        if let Some((mx, my)) = drawer.mouse_pos() {
            draw_crosshair(&mut screen, mx as i32, my as i32, brush_radius, 0x00_FF_CC_33);
        }

        let mut hud = format!("{} | WIDTH={:.2}", view.label(), slider);
        if view == View::Result && show_df { hud.push_str(" SHOW DF"); }
        if let Some(p) = pipeline.pass_count() { hud.push_str(&format!(" | P={p}")); }
        hud.push_str(&format!(" | {hud_fps_text}"));
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        drawer.present(&screen)?;

        /* 5) FPS, logged once per second */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            info!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
