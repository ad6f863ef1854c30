use rand::Rng;
use std::f64::consts::TAU;

/// Number of branches spawned by one crack seed
///
/// Starts at one and adds a branch for every consecutive trial that succeeds
/// with probability `branch_prob`, i.e. a geometric distribution shifted by
/// one. Values of `branch_prob` at or below zero always yield one branch;
/// callers must keep it below one.
pub fn sample_branch_count<R: Rng>(branch_prob: f64, rng: &mut R) -> usize {
    let mut branches = 1;
    while rng.random::<f64>() < branch_prob {
        branches += 1;
    }
    branches
}

/// Mean of [`sample_branch_count`] for a given probability
pub fn expected_branch_count(branch_prob: f64) -> f64 {
    1.0 / (1.0 - branch_prob)
}

/// Uniform heading change in `[-max_turn, max_turn]`
pub fn symmetric_turn<R: Rng>(max_turn: f64, rng: &mut R) -> f64 {
    rng.random_range(-max_turn..=max_turn)
}

/// Uniform heading in `[0, 2π)`
pub fn uniform_heading<R: Rng>(rng: &mut R) -> f64 {
    rng.random_range(0.0..TAU)
}
