//! Pixel bounding boxes and crop windows

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Half-open pixel rectangle `[x_start, x_end) x [y_start, y_end)`
///
/// Serializes as the four integers `[x_start, y_start, x_end, y_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct PixelBox {
    /// First column (inclusive)
    pub x_start: u32,
    /// First row (inclusive)
    pub y_start: u32,
    /// Last column (exclusive)
    pub x_end: u32,
    /// Last row (exclusive)
    pub y_end: u32,
}

impl From<[u32; 4]> for PixelBox {
    fn from(coords: [u32; 4]) -> Self {
        let [x_start, y_start, x_end, y_end] = coords;
        Self {
            x_start,
            y_start,
            x_end,
            y_end,
        }
    }
}

impl From<PixelBox> for [u32; 4] {
    fn from(pixel_box: PixelBox) -> Self {
        [
            pixel_box.x_start,
            pixel_box.y_start,
            pixel_box.x_end,
            pixel_box.y_end,
        ]
    }
}

impl PixelBox {
    /// Width in pixels, zero for inverted boxes
    pub const fn width(&self) -> u32 {
        self.x_end.saturating_sub(self.x_start)
    }

    /// Height in pixels, zero for inverted boxes
    pub const fn height(&self) -> u32 {
        self.y_end.saturating_sub(self.y_start)
    }

    /// Whether a pixel lies inside the box
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x_start && x < self.x_end && y >= self.y_start && y < self.y_end
    }

    /// Whether the box lies within a `width x height` frame
    pub const fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x_start <= self.x_end
            && self.y_start <= self.y_end
            && self.x_end <= width
            && self.y_end <= height
    }

    /// Smallest box covering every `(x, y)` for which `selected` holds
    ///
    /// Returns `None` when nothing is selected.
    pub fn enclosing(
        width: u32,
        height: u32,
        mut selected: impl FnMut(u32, u32) -> bool,
    ) -> Option<Self> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        let mut found = false;

        for y in 0..height {
            for x in 0..width {
                if selected(x, y) {
                    found = true;
                    min_x = min_x.min(x);
                    min_y = min_y.min(y);
                    max_x = max_x.max(x);
                    max_y = max_y.max(y);
                }
            }
        }

        found.then_some(Self {
            x_start: min_x,
            y_start: min_y,
            x_end: max_x + 1,
            y_end: max_y + 1,
        })
    }

    /// Pick the crop window for a target patch size
    ///
    /// When the box is larger than `size` along both axes a random
    /// `size x size` window inside it is chosen; otherwise the box itself is
    /// the window.
    pub fn crop_window<R: Rng>(&self, size: u32, rng: &mut R) -> Self {
        if self.width() > size && self.height() > size {
            let x_start = rng.random_range(self.x_start..=self.x_end - size);
            let y_start = rng.random_range(self.y_start..=self.y_end - size);
            Self {
                x_start,
                y_start,
                x_end: x_start + size,
                y_end: y_start + size,
            }
        } else {
            *self
        }
    }
}
