//! Generative refinement of a crack stencil into photoreal damage
//!
//! The synthesis model is external and reached through [`GenerativeRefiner`].
//! It is conditioned on an edge map of the stencil, built here.

use crate::io::configuration::{
    DEFAULT_CONDITIONING_SCALE, DEFAULT_GUIDANCE_SCALE, DEFAULT_INFERENCE_STEPS,
    DEFAULT_REFINER_PROMPT, DEFAULT_REFINER_SEED, GUIDANCE_CANNY_HIGH, GUIDANCE_CANNY_LOW,
    GUIDANCE_DILATION,
};
use crate::io::error::{CrackError, Result, collaborator_error};
use image::{GrayImage, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::dilate;

const STAGE: &str = "generative refiner";

/// Sampling parameters forwarded to the refiner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Random seed of the sampler
    pub seed: u64,
    /// Prompt adherence strength
    pub guidance_scale: f64,
    /// Strength of the guidance image conditioning
    pub conditioning_scale: f64,
    /// Number of sampling steps
    pub inference_steps: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_REFINER_SEED,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            conditioning_scale: DEFAULT_CONDITIONING_SCALE,
            inference_steps: DEFAULT_INFERENCE_STEPS,
        }
    }
}

/// Everything the refiner needs for one call
#[derive(Debug, Clone)]
pub struct RefineRequest<'a> {
    /// Image to edit
    pub source: &'a RgbImage,
    /// Pixels the refiner may change
    pub mask: &'a GrayImage,
    /// Edge map conditioning the crack geometry
    pub guidance: GrayImage,
    /// Text description of the damage
    pub prompt: &'a str,
    /// Sampler settings
    pub params: SamplingParams,
}

/// External model that repaints the masked area of an image
pub trait GenerativeRefiner {
    /// Failure reported by the model
    type Error: std::error::Error;

    /// Produce one refined image with the source's dimensions
    ///
    /// # Errors
    ///
    /// Returns the model's own error when synthesis fails
    fn refine(&self, request: &RefineRequest<'_>) -> std::result::Result<RgbImage, Self::Error>;
}

/// Edge map of a stencil used to condition the refiner
///
/// The stencil is dilated with a 3x3 square, then Canny marks the edges of
/// the widened strokes with 255.
pub fn guidance_image(stencil: &GrayImage) -> GrayImage {
    let dilated = dilate(stencil, Norm::LInf, GUIDANCE_DILATION);
    canny(&dilated, GUIDANCE_CANNY_LOW, GUIDANCE_CANNY_HIGH)
}

/// Refine `source` inside `stencil` with the default prompt
///
/// # Errors
///
/// Returns an error if:
/// - The stencil and source dimensions differ
/// - The refiner fails or returns an image of the wrong size
pub fn refine_with_stencil<G: GenerativeRefiner>(
    refiner: &G,
    source: &RgbImage,
    stencil: &GrayImage,
    params: SamplingParams,
) -> Result<RgbImage> {
    refine_with_prompt(refiner, source, stencil, DEFAULT_REFINER_PROMPT, params)
}

/// Refine `source` inside `stencil` with a custom prompt
///
/// # Errors
///
/// Returns an error if:
/// - The stencil and source dimensions differ
/// - The refiner fails or returns an image of the wrong size
pub fn refine_with_prompt<G: GenerativeRefiner>(
    refiner: &G,
    source: &RgbImage,
    stencil: &GrayImage,
    prompt: &str,
    params: SamplingParams,
) -> Result<RgbImage> {
    if stencil.dimensions() != source.dimensions() {
        return Err(CrackError::InvalidSourceData {
            reason: format!(
                "stencil is {}x{} but source is {}x{}",
                stencil.width(),
                stencil.height(),
                source.width(),
                source.height()
            ),
        });
    }

    let request = RefineRequest {
        source,
        mask: stencil,
        guidance: guidance_image(stencil),
        prompt,
        params,
    };

    log::info!(
        "Refining {}x{} image ({} steps, seed {})",
        source.width(),
        source.height(),
        params.inference_steps,
        params.seed
    );
    let refined = refiner
        .refine(&request)
        .map_err(|e| collaborator_error(STAGE, &e))?;

    if refined.dimensions() != source.dimensions() {
        return Err(collaborator_error(
            STAGE,
            &format!(
                "returned {}x{} image for {}x{} source",
                refined.width(),
                refined.height(),
                source.width(),
                source.height()
            ),
        ));
    }
    Ok(refined)
}
