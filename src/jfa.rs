// Jump flood propagation over two indexed ping-pong slots.
//
// Each pass reads the `current` slot and writes the other one, then flips
// `current`. Slot 0 is the primary slot: the result always ends up there.
// Nearest-seed search is approximate (classic 8-neighbor jump flooding);
// expect small errors near diagonal boundaries.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Grid, Seed};

/// Largest accepted pass index; 2^30 still fits comfortably in i64 offsets.
pub const MAX_PASS: u32 = 30;

/// Slot that holds the final result.
pub const PRIMARY: usize = 0;

/// Jump size for pass index `pass` (2^pass).
pub fn jump_size(pass: u32) -> Result<u32> {
    if pass > MAX_PASS {
        return Err(Error::PassCountTooLarge { passes: pass, max: MAX_PASS });
    }
    Ok(1u32 << pass)
}

/// ceil(log2(max(width, height))), the smallest pass count that lets
/// a single seed reach every pixel.
pub fn default_pass_count(width: usize, height: usize) -> u32 {
    let m = width.max(height);
    if m <= 1 {
        return 0;
    }
    usize::BITS - (m - 1).leading_zeros()
}

/// Jump sizes in execution order: 2^P, 2^(P-1), ..., 1.
pub fn schedule(pass_count: u32) -> impl Iterator<Item = u32> {
    (0..=pass_count).rev().map(|p| 1u32 << p)
}

pub struct Propagator {
    slots: [Grid<Seed>; 2],
    current: usize,  // slot readable by the next pass
    passes_run: u32, // passes in the last run, corrective one excluded
    corrected: bool, // last run needed the parity correction
}

impl Propagator {
    pub fn try_new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            slots: [
                Grid::try_new(width, height, Seed::NONE)?,
                Grid::try_new(width, height, Seed::NONE)?,
            ],
            current: PRIMARY,
            passes_run: 0,
            corrected: false,
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.slots[PRIMARY].dimensions()
    }

    /// Run passes P..=0 starting from `seeds`; the result lands in the primary slot.
    pub fn run(&mut self, seeds: &Grid<Seed>, pass_count: u32) -> Result<()> {
        jump_size(pass_count)?;
        seeds.expect_size("propagate", self.dimensions())?;

        // 1) Seeds go into the primary slot; it is the first pass's read side.
        self.slots[PRIMARY].data.copy_from_slice(&seeds.data);
        self.current = PRIMARY;
        self.passes_run = 0;
        self.corrected = false;

        // 2) One full pass per jump size. Each pass joins before the next starts.
        for jump in schedule(pass_count) {
            self.step(jump);
        }

        // 3) An odd number of passes leaves the result in the scratch slot.
        if self.current != PRIMARY {
            self.correct();
        }

        debug!(
            passes = self.passes_run,
            corrected = self.corrected,
            "jump flood finished"
        );
        Ok(())
    }

    /// One jump pass: read `current`, write the other slot, flip `current`.
    fn step(&mut self, jump: u32) {
        let [a, b] = &mut self.slots;
        let (src, dst) = if self.current == 0 { (&*a, b) } else { (&*b, a) };
        jump_pass(src, dst, jump);
        self.current = 1 - self.current;
        self.passes_run += 1;
    }

    /// Parity correction: move the finished map from scratch into primary.
    /// Values are carried over untouched, so the primary slot holds exactly
    /// what pass 0 produced.
    fn correct(&mut self) {
        let [primary, scratch] = &mut self.slots;
        primary.data.copy_from_slice(&scratch.data);
        self.current = PRIMARY;
        self.corrected = true;
    }

    /// Final nearest-seed map.
    pub fn primary(&self) -> &Grid<Seed> {
        &self.slots[PRIMARY]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn passes_run(&self) -> u32 {
        self.passes_run
    }

    pub fn was_corrected(&self) -> bool {
        self.corrected
    }
}

/// Candidate offsets in scan order (self is checked before these).
#[rustfmt::skip]
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1,  0),          (1,  0),
    (-1,  1), (0,  1), (1,  1),
];

/// One full jump-flood pass from `src` into `dst`.
/// Ties keep the first candidate found (self, then NEIGHBORS order).
pub fn jump_pass(src: &Grid<Seed>, dst: &mut Grid<Seed>, jump: u32) {
    let width = src.width;
    let (w, h) = (src.width as i64, src.height as i64);
    let j = jump as i64;

    dst.data
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let (px, py) = (x as u32, y as u32);

                let mut best = src.data[y * width + x];
                let mut best_d = if best.is_some() { best.dist2(px, py) } else { u64::MAX };

                for (ox, oy) in NEIGHBORS {
                    let nx = x as i64 + ox * j;
                    let ny = y as i64 + oy * j;
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue; // outside the image: never read
                    }
                    let cand = src.data[ny as usize * width + nx as usize];
                    if cand.is_none() {
                        continue;
                    }
                    let d = cand.dist2(px, py);
                    if d < best_d {
                        best = cand;
                        best_d = d;
                    }
                }
                *out = best;
            }
        });
}
