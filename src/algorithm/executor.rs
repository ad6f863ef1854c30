use crate::{
    algorithm::seeding::{CandidateSource, SeedCandidates, select_seed},
    algorithm::stroke::{GrowthStats, StrokeParams, grow_crack},
    io::configuration::{
        DEFAULT_BRANCH_PROB, DEFAULT_MAX_LENGTH, DEFAULT_MAX_RETRIES, DEFAULT_MIN_LENGTH,
        DEFAULT_NUM_CRACKS, DEFAULT_THICKNESS_SCALE, SEED_ATTEMPTS,
    },
    io::error::{Result, invalid_parameter},
    math::probability::sample_branch_count,
    spatial::{RegionMask, Stencil},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Parameters for one synthesis run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrackSpec {
    /// Number of crack seeds to grow
    pub num_cracks: usize,
    /// Shortest main-body length in steps (inclusive)
    pub min_length: usize,
    /// Longest main-body length in steps (inclusive)
    pub max_length: usize,
    /// Probability of each additional branch, in `[0, 1)`
    pub branch_prob: f64,
    /// Multiplier applied to stroke thickness
    pub thickness_scale: f64,
    /// Proposals tried per step before a branch ends
    pub max_retries: usize,
}

impl Default for CrackSpec {
    fn default() -> Self {
        Self {
            num_cracks: DEFAULT_NUM_CRACKS,
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            branch_prob: DEFAULT_BRANCH_PROB,
            thickness_scale: DEFAULT_THICKNESS_SCALE,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl CrackSpec {
    /// Check that the parameters describe a run that terminates
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `min_length` exceeds `max_length`
    /// - `branch_prob` is outside `[0, 1)`
    /// - `thickness_scale` is not a positive finite number
    /// - `max_retries` is zero
    pub fn validate(&self) -> Result<()> {
        if self.min_length > self.max_length {
            return Err(invalid_parameter(
                "min_length",
                &self.min_length,
                &format!("must not exceed max_length ({})", self.max_length),
            ));
        }
        if !(0.0..1.0).contains(&self.branch_prob) {
            return Err(invalid_parameter(
                "branch_prob",
                &self.branch_prob,
                &"must be in [0, 1)",
            ));
        }
        if !self.thickness_scale.is_finite() || self.thickness_scale <= 0.0 {
            return Err(invalid_parameter(
                "thickness_scale",
                &self.thickness_scale,
                &"must be a positive finite number",
            ));
        }
        if self.max_retries == 0 {
            return Err(invalid_parameter(
                "max_retries",
                &self.max_retries,
                &"at least one proposal per step is required",
            ));
        }
        Ok(())
    }
}

/// Summary of what one synthesis run produced
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SynthesisReport {
    /// Cracks requested by the spec
    pub cracks_requested: usize,
    /// Cracks that found a seed and were grown
    pub cracks_grown: usize,
    /// Cracks skipped because no inside seed was found
    pub cracks_skipped: usize,
    /// Origin of the seed candidates, `None` when there were none
    pub candidate_source: Option<CandidateSource>,
    /// Stroke counters summed over all cracks
    pub growth: GrowthStats,
}

/// Independent random source for crack `index` of a run seeded with `seed`
///
/// Cracks never share a random stream, so the output of a crack depends only
/// on the master seed, its index, and the region.
pub fn crack_rng(seed: u64, index: usize) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(index as u64))
}

/// Grows cracks one at a time into a stencil confined to a region
///
/// Every random draw of crack `k` comes from [`crack_rng`]`(seed, k)` in a
/// fixed order: seed point, heading, branch count, length, then the walk.
pub struct CrackSynthesizer<'a> {
    region: &'a RegionMask,
    spec: CrackSpec,
    seed: u64,
    candidates: SeedCandidates,
    stencil: Stencil,
    next_crack: usize,
    report: SynthesisReport,
}

impl<'a> CrackSynthesizer<'a> {
    /// Prepare a run over `region`
    ///
    /// # Errors
    ///
    /// Returns an error if the spec fails [`CrackSpec::validate`]
    pub fn new(region: &'a RegionMask, spec: CrackSpec, seed: u64) -> Result<Self> {
        spec.validate()?;

        let candidates = SeedCandidates::from_region(region);
        let report = SynthesisReport {
            cracks_requested: spec.num_cracks,
            candidate_source: (!candidates.is_empty()).then(|| candidates.source()),
            ..SynthesisReport::default()
        };

        Ok(Self {
            region,
            spec,
            seed,
            candidates,
            stencil: Stencil::for_region(region),
            next_crack: 0,
            report,
        })
    }

    /// Number of cracks processed so far, grown or skipped
    pub const fn cracks_processed(&self) -> usize {
        self.next_crack
    }

    /// Whether every requested crack has been processed
    pub const fn is_finished(&self) -> bool {
        self.next_crack >= self.spec.num_cracks
    }

    /// Counters accumulated so far
    pub const fn report(&self) -> &SynthesisReport {
        &self.report
    }

    /// Stencil as stamped so far, before confinement to the region
    pub const fn stencil(&self) -> &Stencil {
        &self.stencil
    }

    /// Process the next crack
    ///
    /// Returns `false` once every crack has been processed. A crack without
    /// an inside seed is skipped and still counts as processed.
    pub fn grow_next_crack(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        let index = self.next_crack;
        self.next_crack += 1;
        let mut rng = crack_rng(self.seed, index);

        let Some(seed) = select_seed(self.region, &self.candidates, SEED_ATTEMPTS, &mut rng)
        else {
            log::debug!("Crack {index}: no seed inside the region after {SEED_ATTEMPTS} draws, skipping");
            self.report.cracks_skipped += 1;
            return true;
        };

        let branches = sample_branch_count(self.spec.branch_prob, &mut rng);
        let length = rng.random_range(self.spec.min_length..=self.spec.max_length);
        let params = StrokeParams {
            length,
            thickness_scale: self.spec.thickness_scale,
            max_retries: self.spec.max_retries,
        };

        let stats = grow_crack(
            &mut self.stencil,
            self.region,
            &seed,
            branches,
            &params,
            &mut rng,
        );
        log::debug!(
            "Crack {index}: seed ({}, {}), {branches} branch(es) of length {length}, {} body step(s), {} early stop(s)",
            seed.x,
            seed.y,
            stats.body_steps,
            stats.terminated_early
        );

        self.report.cracks_grown += 1;
        self.report.growth.absorb(&stats);
        true
    }

    /// Process every remaining crack
    pub fn run(&mut self) {
        while self.grow_next_crack() {}
    }

    /// Finish the run and hand back the stencil confined to the region
    pub fn finish(mut self) -> (Stencil, SynthesisReport) {
        self.run();
        self.stencil.confine_to(self.region);
        (self.stencil, self.report)
    }
}

/// Synthesize a crack stencil for `region` in one call
///
/// # Errors
///
/// Returns an error if the spec fails [`CrackSpec::validate`]
pub fn synthesize(
    region: &RegionMask,
    spec: CrackSpec,
    seed: u64,
) -> Result<(Stencil, SynthesisReport)> {
    let synthesizer = CrackSynthesizer::new(region, spec, seed)?;
    let (stencil, report) = synthesizer.finish();
    log::info!(
        "Grew {}/{} crack(s) with {} branch(es), {} pixel(s) stamped",
        report.cracks_grown,
        report.cracks_requested,
        report.growth.branches,
        stencil.stamped_pixels()
    );
    Ok((stencil, report))
}
