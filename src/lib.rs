//! Jump flood distance fields on the CPU.
//!
//! The pipeline runs four stages over a W×H grid:
//!
//! 1. [`seed`] classifies source pixels and writes each seed's own coordinate.
//! 2. [`jfa`] propagates the nearest seed with jump sizes 2^P .. 1 across two
//!    ping-pong slots.
//! 3. [`distance`] turns the nearest-seed map into an unsigned or signed field.
//! 4. [`composite`] thresholds the field with the shape width into colors.
//!
//! [`pipeline::Pipeline`] drives them in order and owns every buffer.
//!
//! ```no_run
//! use jump_flood::{Grid, Pipeline, PipelineConfig};
//!
//! let mut source = Grid::try_new(64, 64, [0.0f32; 4])?;
//! source.set(32, 32, [1.0; 4]);
//!
//! let mut pipeline = Pipeline::new(PipelineConfig::default())?;
//! pipeline.set_shape_width(8.0)?;
//! pipeline.run(&source, None)?;
//! let field = pipeline.distance().expect("ran once");
//! assert_eq!(*field.get(32, 32), 0.0);
//! # Ok::<(), jump_flood::Error>(())
//! ```

pub mod brush;
pub mod composite;
pub mod distance;
pub mod error;
pub mod gamma;
pub mod jfa;
pub mod pipeline;
pub mod seed;
pub mod types;

pub use composite::{CompositeParams, Falloff};
pub use distance::{DistanceUnit, NO_SEED_DISTANCE};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineConfig, Stage};
pub use seed::SeedRule;
pub use types::{FrameBuffer, Grid, Rgba, Seed, SeedMask, SourceImage};
