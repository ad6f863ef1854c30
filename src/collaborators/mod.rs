//! Interfaces to the external models around the synthesizer

/// Generative refiner contract and guidance image construction
pub mod refiner;
/// Segmentation oracle contract and best-mask selection
pub mod segmentation;
