// Pipeline driver: SeedInit → Propagate → Derive → Composite.
//
// Buffers are allocated once per source size and reused across runs.
// A size change allocates the complete new set first and swaps it in only
// when every allocation succeeded, so a failed resize never leaves a mix of
// old and new buffers behind.

use tracing::{debug, trace};

use crate::composite::{CompositeParams, Falloff, composite};
use crate::distance::{self, DistanceUnit};
use crate::error::{Error, Result};
use crate::jfa::{self, MAX_PASS, Propagator};
use crate::seed::{self, SeedRule};
use crate::types::{Grid, Rgba, Seed, SeedMask, SourceImage};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    /// Highest pass index P; None picks ceil(log2(max(W, H))).
    pub passes: Option<u32>,
    pub unit: DistanceUnit,
    /// Also propagate from the complement and emit a signed field.
    pub signed: bool,
    pub rule: SeedRule,
    pub composite: CompositeParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            passes: None,
            unit: DistanceUnit::Texel,
            signed: false,
            rule: SeedRule::default(),
            composite: CompositeParams::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(passes) = self.passes {
            if passes > MAX_PASS {
                return Err(Error::PassCountTooLarge { passes, max: MAX_PASS });
            }
        }
        self.composite.validate()
    }
}

/// Where the pipeline is. Stages only ever advance in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    SeedInit,
    Propagate { passes: u32 },
    Derive,
    Composite,
}

impl Stage {
    fn may_follow(self, prev: Stage) -> bool {
        matches!(
            (prev, self),
            (Stage::Idle, Stage::SeedInit)
                | (Stage::SeedInit, Stage::Propagate { .. })
                | (Stage::Propagate { .. }, Stage::Derive)
                | (Stage::Derive, Stage::Composite)
                | (_, Stage::Idle)
        )
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug_assert!(next.may_follow(*stage), "{next:?} after {:?}", *stage);
    trace!(?next, "pipeline stage");
    *stage = next;
}

/// Complement seeds plus their own propagator (signed fields only).
struct Inner {
    seeds: Grid<Seed>,
    flood: Propagator,
}

struct Buffers {
    seeds: Grid<Seed>,
    outer: Propagator,
    inner: Option<Inner>,
    distance: Grid<f32>,
    result: Grid<Rgba>,
}

impl Buffers {
    fn try_new(width: usize, height: usize, signed: bool) -> Result<Self> {
        let inner = if signed { Some(Inner::try_new(width, height)?) } else { None };
        Ok(Self {
            seeds: Grid::try_new(width, height, Seed::NONE)?,
            outer: Propagator::try_new(width, height)?,
            inner,
            distance: Grid::try_new(width, height, distance::NO_SEED_DISTANCE)?,
            result: Grid::try_new(width, height, [0.0; 4])?,
        })
    }

    fn dimensions(&self) -> (usize, usize) {
        self.seeds.dimensions()
    }
}

impl Inner {
    fn try_new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            seeds: Grid::try_new(width, height, Seed::NONE)?,
            flood: Propagator::try_new(width, height)?,
        })
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    buffers: Option<Buffers>,
    stage: Stage,
    last_passes: Option<u32>,
    allocations: u32,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            buffers: None,
            stage: Stage::Idle,
            last_passes: None,
            allocations: 0,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /* ---------- parameter changes (never reallocate) ---------- */

    pub fn set_shape_width(&mut self, width: f32) -> Result<()> {
        let params = CompositeParams { shape_width: width, ..self.config.composite };
        params.validate()?;
        self.config.composite = params;
        Ok(())
    }

    pub fn set_show_distance(&mut self, show: bool) {
        self.config.composite.show_distance = show;
    }

    pub fn set_falloff(&mut self, falloff: Falloff) -> Result<()> {
        let params = CompositeParams { falloff, ..self.config.composite };
        params.validate()?;
        self.config.composite = params;
        Ok(())
    }

    pub fn set_rule(&mut self, rule: SeedRule) {
        self.config.rule = rule;
    }

    pub fn set_passes(&mut self, passes: Option<u32>) -> Result<()> {
        let config = PipelineConfig { passes, ..self.config };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /* ---------- buffers ---------- */

    /// Make sure buffers exist for a W×H source. Reallocates only on a
    /// size change (or when a signed field needs the complement buffers).
    pub fn ensure_size(&mut self, width: usize, height: usize) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        if let Some(b) = self.buffers.as_mut() {
            if b.dimensions() == (width, height) {
                if self.config.signed && b.inner.is_none() {
                    b.inner = Some(Inner::try_new(width, height)?);
                }
                return Ok(());
            }
        }

        debug!(width, height, signed = self.config.signed, "allocating pipeline buffers");
        let fresh = Buffers::try_new(width, height, self.config.signed)?;
        self.buffers = Some(fresh);
        self.allocations += 1;
        Ok(())
    }

    /// How many times a buffer set was allocated.
    pub fn allocations(&self) -> u32 {
        self.allocations
    }

    /* ---------- run ---------- */

    /// Run every stage once for `source`, merging `extra` painted seeds.
    pub fn run(&mut self, source: &SourceImage, extra: Option<&SeedMask>) -> Result<()> {
        let outcome = self.run_stages(source, extra);
        advance(&mut self.stage, Stage::Idle);
        outcome
    }

    fn run_stages(&mut self, source: &SourceImage, extra: Option<&SeedMask>) -> Result<()> {
        self.config.validate()?;
        let (width, height) = source.dimensions();
        source.expect_size("source", (width, height))?;
        if let Some(mask) = extra {
            mask.expect_size("seed mask", (width, height))?;
        }
        self.ensure_size(width, height)?;

        let config = self.config;
        let passes = config.passes.unwrap_or_else(|| jfa::default_pass_count(width, height));

        let Self { buffers, stage, .. } = &mut *self;
        let b = buffers.as_mut().ok_or(Error::InvalidDimensions { width, height })?;

        // 1) Seeds
        advance(stage, Stage::SeedInit);
        seed::initialize(source, &config.rule, extra, &mut b.seeds)?;

        // 2) Propagation: every pass of every flood completes before Derive reads
        advance(stage, Stage::Propagate { passes });
        b.outer.run(&b.seeds, passes)?;
        let inner = match (config.signed, b.inner.as_mut()) {
            (true, Some(inner)) => {
                seed::invert_into(&b.seeds, &mut inner.seeds)?;
                inner.flood.run(&inner.seeds, passes)?;
                Some(&*inner)
            }
            _ => None,
        };

        // 3) Distance
        advance(stage, Stage::Derive);
        match inner {
            Some(inner) => distance::derive_signed(
                b.outer.primary(),
                inner.flood.primary(),
                &b.seeds,
                config.unit,
                &mut b.distance,
            )?,
            None => distance::derive(b.outer.primary(), config.unit, &mut b.distance)?,
        }

        // 4) Result
        advance(stage, Stage::Composite);
        composite(&b.distance, &config.composite, &mut b.result)?;

        self.last_passes = Some(passes);
        Ok(())
    }

    /* ---------- read-only views ---------- */

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Pass count P used by the last successful run.
    pub fn pass_count(&self) -> Option<u32> {
        self.last_passes
    }

    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.buffers.as_ref().map(Buffers::dimensions)
    }

    /// Seed ("UV") buffer.
    pub fn seeds(&self) -> Option<&Grid<Seed>> {
        self.buffers.as_ref().map(|b| &b.seeds)
    }

    /// Nearest-seed ("JFA") buffer of the shape seeds.
    pub fn nearest(&self) -> Option<&Grid<Seed>> {
        self.buffers.as_ref().map(|b| b.outer.primary())
    }

    pub fn distance(&self) -> Option<&Grid<f32>> {
        self.buffers.as_ref().map(|b| &b.distance)
    }

    pub fn result(&self) -> Option<&Grid<Rgba>> {
        self.buffers.as_ref().map(|b| &b.result)
    }
}
