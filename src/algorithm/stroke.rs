//! Branch growth as a confined random walk
//!
//! Each branch walks from the crack seed, stamping a disc at every accepted
//! position. A proposed step that leaves the region is retried with a wider
//! heading change; when the retry budget runs out the branch simply ends.
//! After the main body every branch continues with a short, thin tail.

use crate::algorithm::seeding::CrackSeed;
use crate::io::configuration::{
    MAX_STEP_STRIDE, RETRY_TURN, STEP_JITTER, STEP_TURN, TAIL_RETRY_TURN, TAIL_STEPS, TAIL_STRIDE,
    TAIL_TURN,
};
use crate::math::probability::symmetric_turn;
use crate::spatial::{RegionMask, Stencil};
use rand::Rng;
use std::f64::consts::PI;

/// Shape parameters shared by every branch of one crack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
    /// Main-body steps attempted per branch
    pub length: usize,
    /// Multiplier applied to the thickness profile
    pub thickness_scale: f64,
    /// Proposals tried per step before the branch ends
    pub max_retries: usize,
}

/// Disc radius at `step` of a `length`-step main body
///
/// `max(1, round((1 + 2·sin(π·step/length)) · scale))`: thin at both ends,
/// thickest halfway.
pub fn thickness_at(step: usize, length: usize, thickness_scale: f64) -> u32 {
    let progress = if length == 0 {
        0.0
    } else {
        step as f64 / length as f64
    };
    let radius = 2.0_f64.mul_add((PI * progress).sin(), 1.0) * thickness_scale;
    radius.round().max(1.0) as u32
}

/// Disc radius used along a tail
pub fn tail_thickness(thickness_scale: f64) -> u32 {
    thickness_scale.round().max(1.0) as u32
}

/// Counters collected while growing strokes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthStats {
    /// Branches started
    pub branches: usize,
    /// Accepted main-body steps
    pub body_steps: usize,
    /// Accepted tail steps
    pub tail_steps: usize,
    /// Branches whose main body ended before reaching its length
    pub terminated_early: usize,
}

impl GrowthStats {
    /// Add another set of counters into this one
    pub const fn absorb(&mut self, other: &Self) {
        self.branches += other.branches;
        self.body_steps += other.body_steps;
        self.tail_steps += other.tail_steps;
        self.terminated_early += other.terminated_early;
    }
}

/// Current state of one growing branch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Column of the last accepted position
    pub x: u32,
    /// Row of the last accepted position
    pub y: u32,
    /// Heading in radians
    pub heading: f64,
}

impl Stroke {
    /// Start a branch at a crack seed
    pub const fn from_seed(seed: &CrackSeed) -> Self {
        Self {
            x: seed.x,
            y: seed.y,
            heading: seed.heading,
        }
    }

    /// Try to move to a proposed position inside `region`
    ///
    /// `propose` returns a raw offset from the current position; the result
    /// is clamped to the frame. Each rejected proposal turns the heading by up
    /// to `retry_turn` before the next one. Returns whether a position was
    /// accepted within `max_retries` proposals.
    pub fn advance<R, F>(
        &mut self,
        region: &RegionMask,
        max_retries: usize,
        retry_turn: f64,
        rng: &mut R,
        mut propose: F,
    ) -> bool
    where
        R: Rng,
        F: FnMut(f64, &mut R) -> (i64, i64),
    {
        let max_x = i64::from(region.width()).saturating_sub(1).max(0);
        let max_y = i64::from(region.height()).saturating_sub(1).max(0);

        let mut accepted = false;
        for _ in 0..max_retries {
            let (dx, dy) = propose(self.heading, rng);
            let nx = (i64::from(self.x) + dx).clamp(0, max_x) as u32;
            let ny = (i64::from(self.y) + dy).clamp(0, max_y) as u32;

            if region.contains(nx, ny) {
                self.x = nx;
                self.y = ny;
                accepted = true;
                break;
            }
            self.heading += symmetric_turn(retry_turn, rng);
        }
        accepted
    }
}

/// Main-body step: a 1–3 px stride per axis along the heading plus ±1 px jitter
fn body_step<R: Rng>(heading: f64, rng: &mut R) -> (i64, i64) {
    let dx = (heading.cos() * rng.random_range(1..=MAX_STEP_STRIDE) as f64) as i64;
    let dy = (heading.sin() * rng.random_range(1..=MAX_STEP_STRIDE) as f64) as i64;
    let jitter_x = rng.random_range(-STEP_JITTER..=STEP_JITTER);
    let jitter_y = rng.random_range(-STEP_JITTER..=STEP_JITTER);
    (dx + jitter_x, dy + jitter_y)
}

/// Tail step: a fixed 2 px stride along the heading
fn tail_step<R: Rng>(heading: f64, _rng: &mut R) -> (i64, i64) {
    (
        (heading.cos() * TAIL_STRIDE) as i64,
        (heading.sin() * TAIL_STRIDE) as i64,
    )
}

/// Grow the main body of one branch, returning where it ended
fn grow_body<R: Rng>(
    stencil: &mut Stencil,
    region: &RegionMask,
    seed: &CrackSeed,
    params: &StrokeParams,
    stats: &mut GrowthStats,
    rng: &mut R,
) -> Stroke {
    let mut stroke = Stroke::from_seed(seed);

    for step in 0..params.length {
        if !stroke.advance(region, params.max_retries, RETRY_TURN, rng, body_step::<R>) {
            stats.terminated_early += 1;
            break;
        }
        stencil.stamp_disc(
            stroke.x,
            stroke.y,
            thickness_at(step, params.length, params.thickness_scale),
        );
        stroke.heading += symmetric_turn(STEP_TURN, rng);
        stats.body_steps += 1;
    }

    stroke
}

/// Continue a finished branch with a thin, gently curving tail
fn grow_tail<R: Rng>(
    stencil: &mut Stencil,
    region: &RegionMask,
    mut stroke: Stroke,
    params: &StrokeParams,
    stats: &mut GrowthStats,
    rng: &mut R,
) {
    let radius = tail_thickness(params.thickness_scale);

    for _ in 0..TAIL_STEPS {
        if !stroke.advance(region, params.max_retries, TAIL_RETRY_TURN, rng, tail_step::<R>) {
            break;
        }
        stencil.stamp_disc(stroke.x, stroke.y, radius);
        stroke.heading += symmetric_turn(TAIL_TURN, rng);
        stats.tail_steps += 1;
    }
}

/// Grow every branch of one crack and stamp it onto `stencil`
///
/// All branches start from the seed with the seed's heading and diverge
/// through their own random turns. Tails are grown once every main body is
/// complete, in branch order.
pub fn grow_crack<R: Rng>(
    stencil: &mut Stencil,
    region: &RegionMask,
    seed: &CrackSeed,
    branches: usize,
    params: &StrokeParams,
    rng: &mut R,
) -> GrowthStats {
    let mut stats = GrowthStats {
        branches,
        ..GrowthStats::default()
    };

    let mut ends = Vec::with_capacity(branches);
    for _ in 0..branches {
        ends.push(grow_body(stencil, region, seed, params, &mut stats, rng));
    }

    for end in ends {
        grow_tail(stencil, region, end, params, &mut stats, rng);
    }

    stats
}
