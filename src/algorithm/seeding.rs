//! Seed point selection on the region boundary
//!
//! Cracks start where the region meets its surroundings. When the region
//! fills the whole frame there is no such transition, so the outer border of
//! the image is used instead and the initial heading is biased inward.

use crate::math::probability::uniform_heading;
use crate::spatial::RegionMask;
use rand::Rng;
use std::f64::consts::{FRAC_PI_4, PI};

/// Start of one crack: a position inside the region and an initial heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrackSeed {
    /// Column of the start pixel
    pub x: u32,
    /// Row of the start pixel
    pub y: u32,
    /// Initial heading in radians (0 points along +x, π/2 along +y)
    pub heading: f64,
}

/// Where seed candidates were taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Pixels on the region's own boundary
    RegionBoundary,
    /// The image border, used when the region has no boundary in the frame
    ImageBorder,
}

/// Candidate start positions for every crack of one synthesis run
#[derive(Debug, Clone)]
pub struct SeedCandidates {
    points: Vec<(u32, u32)>,
    source: CandidateSource,
}

impl SeedCandidates {
    /// Collect boundary points, falling back to the image border
    pub fn from_region(region: &RegionMask) -> Self {
        let boundary = region.boundary_points();
        if boundary.is_empty() {
            log::debug!("No region boundary in frame, seeding cracks from the image border");
            Self {
                points: region.border_points(),
                source: CandidateSource::ImageBorder,
            }
        } else {
            Self {
                points: boundary,
                source: CandidateSource::RegionBoundary,
            }
        }
    }

    /// Candidate positions as `(x, y)`
    pub fn points(&self) -> &[(u32, u32)] {
        &self.points
    }

    /// Origin of the candidate set
    pub const fn source(&self) -> CandidateSource {
        self.source
    }

    /// Whether there is nothing to draw from
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Draw a candidate that lies inside `region`
    ///
    /// Makes up to `attempts` uniform draws and returns the first one that is
    /// inside. Returns `None` when every attempt lands outside or the set is
    /// empty.
    pub fn draw_inside<R: Rng>(
        &self,
        region: &RegionMask,
        attempts: usize,
        rng: &mut R,
    ) -> Option<(u32, u32)> {
        if self.points.is_empty() {
            return None;
        }

        let mut found = None;
        for _ in 0..attempts {
            let index = rng.random_range(0..self.points.len());
            if let Some(&(x, y)) = self.points.get(index) {
                if region.contains(x, y) {
                    found = Some((x, y));
                    break;
                }
            }
        }
        found
    }
}

/// Initial heading for a crack starting at `(x, y)`
///
/// Starts on the left, right, top or bottom image edge (checked in that
/// order) point into the frame, within 45° of the inward normal. Every other
/// start gets a uniform heading.
pub fn initial_heading<R: Rng>(x: u32, y: u32, width: u32, height: u32, rng: &mut R) -> f64 {
    let inward_normal = if x == 0 {
        Some(0.0)
    } else if x + 1 == width {
        Some(PI)
    } else if y == 0 {
        Some(PI / 2.0)
    } else if y + 1 == height {
        Some(-PI / 2.0)
    } else {
        None
    };

    match inward_normal {
        Some(normal) => rng.random_range(normal - FRAC_PI_4..normal + FRAC_PI_4),
        None => uniform_heading(rng),
    }
}

/// Pick a seed point and heading for one crack
///
/// Returns `None` when no inside candidate was found within `attempts`
/// draws; the crack is then skipped.
pub fn select_seed<R: Rng>(
    region: &RegionMask,
    candidates: &SeedCandidates,
    attempts: usize,
    rng: &mut R,
) -> Option<CrackSeed> {
    let (x, y) = candidates.draw_inside(region, attempts, rng)?;
    let heading = initial_heading(x, y, region.width(), region.height(), rng);
    Some(CrackSeed { x, y, heading })
}
