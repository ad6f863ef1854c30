//! Procedural crack stencils grown inside segmented image regions
//!
//! Cracks start on the boundary of a binary region and grow as branching,
//! tapering random walks that never leave it. The resulting stencil can be
//! saved directly, turned into a guidance image for an external generative
//! refiner, or composited back into a full-size image through the crop and
//! paste utilities.

#![forbid(unsafe_code)]

/// Crack synthesis: seeding, branch growth and orchestration
pub mod algorithm;
/// Contracts for the external segmentation and refinement models
pub mod collaborators;
/// Input/output operations and error handling
pub mod io;
/// Probability helpers for branching and heading changes
pub mod math;
/// Region masks, stencils and pixel boxes
pub mod spatial;

pub use algorithm::executor::{CrackSpec, CrackSynthesizer, SynthesisReport, synthesize};
pub use io::error::{CrackError, Result};
pub use spatial::{PixelBox, RegionMask, Stencil};
