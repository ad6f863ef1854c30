//! Progress display for batch crack synthesis
//!
//! Small batches get one bar per mask counting its cracks. Larger batches
//! collapse into a single bar over every crack of every mask, labelled with
//! the mask being grown.

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static MASK_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:<28} [{bar:30.cyan/blue}] {pos}/{len} cracks {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static POOLED_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cracks {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Crack counts of one mask in the batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskProgress {
    /// File name shown next to the bar
    pub name: String,
    /// Cracks attempted so far, grown or skipped
    pub cracks_done: usize,
    /// Cracks that found no seed inside the region
    pub cracks_skipped: usize,
    /// Cracks requested for this mask
    pub cracks_total: usize,
    /// Whether the stencil has been written
    pub finished: bool,
}

enum Layout {
    Hidden,
    PerMask(Vec<ProgressBar>),
    Pooled(ProgressBar),
}

/// Tracks crack growth across a batch of masks
pub struct ProgressManager {
    multi_progress: MultiProgress,
    layout: Layout,
    masks: Vec<MaskProgress>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager with nothing to show yet
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            layout: Layout::Hidden,
            masks: Vec::new(),
        }
    }

    /// Shared handle used to print log lines without tearing the bars
    pub const fn multi_progress(&self) -> &MultiProgress {
        &self.multi_progress
    }

    /// Number of masks tracked
    pub fn mask_count(&self) -> usize {
        self.masks.len()
    }

    /// Lay out bars for `mask_count` masks of `cracks_per_mask` cracks each
    pub fn initialize(&mut self, mask_count: usize, cracks_per_mask: usize) {
        self.masks = vec![MaskProgress::default(); mask_count];

        self.layout = if mask_count == 0 {
            Layout::Hidden
        } else if mask_count <= MAX_INDIVIDUAL_PROGRESS_BARS {
            let bars = (0..mask_count)
                .map(|_| {
                    let bar = ProgressBar::new(cracks_per_mask as u64);
                    bar.set_style(MASK_STYLE.clone());
                    self.multi_progress.add(bar)
                })
                .collect();
            Layout::PerMask(bars)
        } else {
            let bar = ProgressBar::new((mask_count * cracks_per_mask) as u64);
            bar.set_style(POOLED_STYLE.clone());
            Layout::Pooled(self.multi_progress.add(bar))
        };
    }

    /// Begin growing the cracks of mask `index`
    pub fn start_mask(&mut self, index: usize, path: &Path, cracks: usize) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.masks.len() {
            self.masks.resize(index + 1, MaskProgress::default());
        }
        if let Some(mask) = self.masks.get_mut(index) {
            *mask = MaskProgress {
                name: name.clone(),
                cracks_total: cracks,
                ..MaskProgress::default()
            };
        }

        match &self.layout {
            Layout::PerMask(bars) => {
                if let Some(bar) = bars.get(index) {
                    bar.set_length(cracks as u64);
                    bar.set_position(0);
                    bar.set_prefix(name);
                }
            }
            Layout::Pooled(bar) => bar.set_message(name),
            Layout::Hidden => {}
        }
    }

    /// Record that `done` cracks of mask `index` were attempted, `skipped` of them without a seed
    pub fn record_cracks(&mut self, index: usize, done: usize, skipped: usize) {
        let Some(mask) = self.masks.get_mut(index) else {
            return;
        };
        let advanced = done.saturating_sub(mask.cracks_done);
        mask.cracks_done = done;
        mask.cracks_skipped = skipped;

        match &self.layout {
            Layout::PerMask(bars) => {
                if let Some(bar) = bars.get(index) {
                    bar.set_position(done as u64);
                }
            }
            Layout::Pooled(bar) => bar.inc(advanced as u64),
            Layout::Hidden => {}
        }
    }

    /// Mark mask `index` as written
    pub fn complete_mask(&mut self, index: usize) {
        let Some(mask) = self.masks.get_mut(index) else {
            return;
        };
        let remaining = mask.cracks_total.saturating_sub(mask.cracks_done);
        mask.cracks_done = mask.cracks_total;
        mask.finished = true;

        match &self.layout {
            Layout::PerMask(bars) => {
                if let Some(bar) = bars.get(index) {
                    let message = if mask.cracks_skipped > 0 {
                        format!("✓ ({} skipped)", mask.cracks_skipped)
                    } else {
                        "✓".to_string()
                    };
                    bar.finish_with_message(message);
                }
            }
            Layout::Pooled(bar) => bar.inc(remaining as u64),
            Layout::Hidden => {}
        }
    }

    /// Counts recorded for mask `index`
    pub fn mask_progress(&self, index: usize) -> Option<&MaskProgress> {
        self.masks.get(index)
    }

    /// Remove the bars from the terminal
    pub fn finish(&self) {
        if let Layout::Pooled(bar) = &self.layout {
            let finished = self.masks.iter().filter(|mask| mask.finished).count();
            bar.finish_with_message(format!("{finished} mask(s) done"));
        }
        let _ = self.multi_progress.clear();
    }
}
