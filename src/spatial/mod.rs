//! Spatial data structures for crack synthesis
//!
//! This module contains:
//! - Region masks that confine growth
//! - The stencil that receives stamped strokes
//! - Pixel bounding boxes used for cropping and compositing

/// Pixel rectangles and crop windows
pub mod bounds;
/// Binary region masks and boundary extraction
pub mod region;
/// Crack stencil buffer and disc stamping
pub mod stencil;

pub use bounds::PixelBox;
pub use region::RegionMask;
pub use stencil::Stencil;
