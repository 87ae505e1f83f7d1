//! Multi-file progress tracking with automatic batching for large sets

use crate::algorithm::executor::{Progress, SynthesisObserver};
use crate::io::configuration::{MAX_INDIVIDUAL_PROGRESS_BARS, PROGRESS_BAR_WIDTH};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;

/// Display state of one file: (`name`, `filled_pixels`, `total_pixels`)
type FileState = (String, usize, usize);

/// Coordinates progress display for batch synthesis
///
/// Automatically switches between individual progress bars (for small batches)
/// and an additional batch progress bar (for large batches) based on file count
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_count: usize,
    file_states: Vec<FileState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_count: 0,
            file_states: Vec::new(),
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(Self::batch_style());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(Self::fill_style());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Number of files announced through [`Self::initialize`]
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    /// Configure progress bar for a new file
    pub fn start_file(&mut self, index: usize, path: &Path, total_pixels: usize) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(index + 1, (String::new(), 0, 0));
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = (display_name, 0, total_pixels);
        }
        self.update_bars();
    }

    /// Report the current number of filled pixels of a file
    pub fn update_fill(&mut self, index: usize, filled: usize) {
        if let Some(state) = self.file_states.get_mut(index) {
            // Coverage never regresses, so neither does the bar
            state.1 = state.1.max(filled);
        }
        self.update_bars();
    }

    /// Mark file as completed and update batch progress
    pub fn complete_file(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.file_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.1 = state.2;
        }
        self.update_bars();
    }

    /// Observer feeding synthesis progress of one file into this manager
    pub const fn observer(&mut self, index: usize) -> FileProgress<'_> {
        FileProgress {
            manager: self,
            index,
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Fill state of a file as (`filled_pixels`, `total_pixels`)
    pub fn file_progress(&self, index: usize) -> Option<(usize, usize)> {
        self.file_states
            .get(index)
            .filter(|(name, _, _)| !name.is_empty())
            .map(|&(_, filled, total)| (filled, total))
    }

    /// Update all progress bars to show the last N active files
    fn update_bars(&self) {
        let active_files: Vec<&FileState> = self
            .file_states
            .iter()
            .filter(|(name, _, _)| !name.is_empty())
            .collect();

        let start_idx = active_files
            .len()
            .saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible_files = active_files.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, (name, filled, total)) in visible_files.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(*total as u64);
                bar.set_position(*filled as u64);
                let percent = if *total == 0 {
                    100.0
                } else {
                    *filled as f64 * 100.0 / *total as f64
                };
                bar.set_message(format!("{percent:>5.1}%"));
                bar.set_prefix(name.clone());
            }
        }

        // Clear any unused bars
        for bar_idx in visible_files.len()..self.file_bars.len() {
            if let Some(bar) = self.file_bars.get(bar_idx) {
                bar.set_length(0);
                bar.set_position(0);
                bar.set_message(String::new());
                bar.set_prefix(String::new());
            }
        }
    }

    fn fill_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{prefix}}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ")
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

/// Synthesis observer that forwards coverage of one file to a [`ProgressManager`]
pub struct FileProgress<'a> {
    manager: &'a mut ProgressManager,
    index: usize,
}

impl SynthesisObserver for FileProgress<'_> {
    fn on_progress(&mut self, progress: Progress) {
        self.manager.update_fill(self.index, progress.filled);
    }
}
