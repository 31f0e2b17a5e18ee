//! Terminal progress for tile extraction and annealing

use crate::algorithm::annealing::AnnealingProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

/// Redraw the annealing bar every this many iterations
const ANNEALING_REFRESH_INTERVAL: usize = 50;

static EXTRACTION_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("Tiles  [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static ANNEALING_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("Layout [{bar:30.cyan/blue}] {pos}/{len} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bars for the two phases of a quilt run
pub struct ProgressManager {
    multi_progress: MultiProgress,
    extraction_bar: Option<ProgressBar>,
    annealing_bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a manager drawing to stderr
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Create a manager that tracks progress without drawing anything
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(target),
            extraction_bar: None,
            annealing_bar: None,
        }
    }

    /// Begin the descriptor extraction phase
    pub fn start_extraction(&mut self, tile_count: usize) {
        let bar = ProgressBar::new(tile_count as u64);
        bar.set_style(EXTRACTION_STYLE.clone());
        self.extraction_bar = Some(self.multi_progress.add(bar));
    }

    /// Record one extracted tile
    pub fn tile_extracted(&self, label: &str) {
        if let Some(ref bar) = self.extraction_bar {
            bar.set_message(label.to_string());
            bar.inc(1);
        }
    }

    /// Begin the annealing phase
    pub fn start_annealing(&mut self, iterations: usize) {
        if let Some(ref bar) = self.extraction_bar {
            bar.finish_with_message("done");
        }
        let bar = ProgressBar::new(iterations as u64);
        bar.set_style(ANNEALING_STYLE.clone());
        self.annealing_bar = Some(self.multi_progress.add(bar));
    }

    /// Report the state after an annealing iteration
    pub fn update_annealing(&self, progress: &AnnealingProgress) {
        let Some(ref bar) = self.annealing_bar else {
            return;
        };
        if progress.iteration % ANNEALING_REFRESH_INTERVAL == 0
            || progress.iteration == progress.max_iterations
        {
            bar.set_position(progress.iteration as u64);
            bar.set_message(format!(
                "best {:.1} T={:.3}",
                progress.best_energy, progress.temperature
            ));
        }
    }

    /// Position of the annealing bar, if one has been started
    pub fn annealing_position(&self) -> Option<u64> {
        self.annealing_bar.as_ref().map(ProgressBar::position)
    }

    /// Position of the extraction bar, if one has been started
    pub fn extraction_position(&self) -> Option<u64> {
        self.extraction_bar.as_ref().map(ProgressBar::position)
    }

    /// Finish and clear all bars
    pub fn finish(&self) {
        for bar in [&self.extraction_bar, &self.annealing_bar]
            .into_iter()
            .flatten()
        {
            bar.finish();
        }
        let _ = self.multi_progress.clear();
    }
}
