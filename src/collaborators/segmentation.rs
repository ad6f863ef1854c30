//! Point-prompted region segmentation
//!
//! The segmentation model itself lives outside this crate. It is reached
//! through [`SegmentationOracle`], and this module turns its candidates into
//! the binary [`RegionMask`] the synthesizer grows cracks in.

use crate::io::configuration::MASK_THRESHOLD;
use crate::io::error::{CrackError, Result, collaborator_error, invalid_parameter};
use crate::spatial::RegionMask;
use image::{GrayImage, Rgb, RgbImage};

const STAGE: &str = "segmentation oracle";

/// One candidate region proposed by the oracle
#[derive(Debug, Clone)]
pub struct ScoredMask {
    /// Intensity mask, brighter meaning more likely inside
    pub mask: GrayImage,
    /// Confidence reported for this candidate
    pub score: f32,
}

/// External model that segments the region around a foreground point
pub trait SegmentationOracle {
    /// Failure reported by the model
    type Error: std::error::Error;

    /// Propose candidate masks for the region containing `point` (`(x, y)`)
    ///
    /// # Errors
    ///
    /// Returns the model's own error when inference fails
    fn segment(
        &self,
        image: &RgbImage,
        point: (u32, u32),
    ) -> std::result::Result<Vec<ScoredMask>, Self::Error>;
}

/// Highest-confidence candidate, ignoring NaN scores
pub fn best_candidate(candidates: &[ScoredMask]) -> Option<&ScoredMask> {
    candidates
        .iter()
        .filter(|candidate| !candidate.score.is_nan())
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

/// Segment the region around `point` and binarize the best candidate
///
/// # Errors
///
/// Returns an error if:
/// - `point` lies outside the image
/// - The oracle fails or returns no usable candidate
/// - The chosen candidate's dimensions differ from the image's
pub fn segment_region<O: SegmentationOracle>(
    oracle: &O,
    image: &RgbImage,
    point: (u32, u32),
) -> Result<RegionMask> {
    let (x, y) = point;
    if x >= image.width() || y >= image.height() {
        return Err(invalid_parameter(
            "point",
            &format!("({x}, {y})"),
            &format!("outside the {}x{} image", image.width(), image.height()),
        ));
    }

    let candidates = oracle
        .segment(image, point)
        .map_err(|e| collaborator_error(STAGE, &e))?;
    let best = best_candidate(&candidates)
        .ok_or_else(|| collaborator_error(STAGE, &"no scored candidate masks returned"))?;

    if best.mask.dimensions() != image.dimensions() {
        return Err(CrackError::Collaborator {
            stage: STAGE,
            reason: format!(
                "mask is {}x{} but image is {}x{}",
                best.mask.width(),
                best.mask.height(),
                image.width(),
                image.height()
            ),
        });
    }

    log::info!(
        "Selected mask {} of {} with score {:.3}",
        candidates
            .iter()
            .position(|candidate| std::ptr::eq(candidate, best))
            .unwrap_or(0),
        candidates.len(),
        best.score
    );
    Ok(RegionMask::from_gray(&best.mask, MASK_THRESHOLD))
}

/// Tint the region red over a copy of `image`
///
/// `alpha` is the weight of the red tint, clamped to `[0, 1]`.
pub fn overlay_region(image: &RgbImage, region: &RegionMask, alpha: f32) -> RgbImage {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut overlay = image.clone();

    for (x, y, pixel) in overlay.enumerate_pixels_mut() {
        if region.contains(x, y) {
            let Rgb([r, g, b]) = *pixel;
            let blend = |channel: u8, tint: f32| {
                (f32::from(channel) * (1.0 - alpha) + tint * alpha).round() as u8
            };
            *pixel = Rgb([blend(r, 255.0), blend(g, 0.0), blend(b, 0.0)]);
        }
    }

    overlay
}
