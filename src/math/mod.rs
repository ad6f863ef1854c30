//! Mathematical utilities for the synthesizer

/// Random draws for branching and heading changes
pub mod probability;
