// Viewer flags, mapped onto the library's PipelineConfig.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use jump_flood::{CompositeParams, DistanceUnit, Falloff, PipelineConfig, SeedRule};

/// Interactive jump flood distance-field viewer
#[derive(Parser, Debug)]
#[command(name = "jump-flood")]
#[command(about = "Jump flood distance fields: seeds, nearest-seed map, distance field, result")]
#[command(version)]
pub struct Cli {
    /// Source shape image (PNG, JPEG, ...). Without it a built-in shape is used.
    #[arg(long, conflicts_with = "camera")]
    pub image: Option<PathBuf>,

    /// Use live camera frames from this device index
    #[arg(long)]
    pub camera: Option<u32>,

    /// Width of the built-in shape / requested camera width
    #[arg(long, default_value_t = 512)]
    pub width: usize,

    /// Height of the built-in shape / requested camera height
    #[arg(long, default_value_t = 512)]
    pub height: usize,

    /// Highest pass index P (jump 2^P first). Default: ceil(log2(max(W, H)))
    #[arg(long)]
    pub passes: Option<u32>,

    /// Shape width at full slider (the slider scales it from 0 to 1)
    #[arg(long, default_value_t = 16.0)]
    pub shape_width: f32,

    /// Distance units
    #[arg(long, value_enum, default_value_t = UnitArg::Texel)]
    pub unit: UnitArg,

    /// Signed field (negative inside the shape)
    #[arg(long)]
    pub signed: bool,

    /// Smooth band edge over this many distance units instead of a hard mask
    #[arg(long)]
    pub smooth: Option<f32>,

    /// How source pixels become seeds
    #[arg(long, value_enum, default_value_t = RuleArg::Alpha)]
    pub rule: RuleArg,

    /// Threshold for the seed rule (alpha or linear luma)
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f32,

    /// Start with the raw distance field in the result view
    #[arg(long)]
    pub show_df: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    Texel,
    Normalized,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    /// alpha >= threshold
    Alpha,
    /// luma >= threshold
    Luma,
    /// luma < threshold
    LumaInverted,
    /// painted seeds only
    Mask,
}

impl Cli {
    pub fn seed_rule(&self) -> SeedRule {
        match self.rule {
            RuleArg::Alpha => SeedRule::Alpha { threshold: self.threshold },
            RuleArg::Luma => SeedRule::Luma { threshold: self.threshold, invert: false },
            RuleArg::LumaInverted => SeedRule::Luma { threshold: self.threshold, invert: true },
            RuleArg::Mask => SeedRule::Mask,
        }
    }

    /// Pipeline settings at full slider. Validation happens in Pipeline::new.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            passes: self.passes,
            unit: match self.unit {
                UnitArg::Texel => DistanceUnit::Texel,
                UnitArg::Normalized => DistanceUnit::Normalized,
            },
            signed: self.signed,
            rule: self.seed_rule(),
            composite: CompositeParams {
                shape_width: self.shape_width,
                falloff: match self.smooth {
                    Some(softness) => Falloff::Smooth { softness },
                    None => Falloff::Binary,
                },
                show_distance: self.show_df,
                ..Default::default()
            },
        }
    }
}
