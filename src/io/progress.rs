//! Multi-file progress tracking across preprocessing and optimization
//!
//! Each file passes through two phases (signature extraction, then the
//! attempt loop or growth), shown on one rolling bar per file. Large
//! batches collapse into a single batch bar to avoid terminal spam.

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {prefix}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Per-file display state: name, phase label, current, max, detail note
type FileState = (String, String, u64, u64, String);

/// Coordinates progress display for batch runs
///
/// Small batches get one bar per file; large batches add a single batch
/// bar and roll the per-file bars over the most recent files.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_states: Vec<FileState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with no bars yet
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_states: Vec::new(),
        }
    }

    /// Create bars for the given number of files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(0);
            bar.set_style(PHASE_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Register a file about to be processed
    pub fn start_file(&mut self, index: usize, path: &Path) {
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(
                index + 1,
                (String::new(), String::new(), 0, 0, String::new()),
            );
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = (display_name, String::new(), 0, 0, String::new());
        }
        self.update_bars();
    }

    /// Begin a named phase (signatures, attempts, growth) for a file
    pub fn begin_phase(&mut self, index: usize, label: &str, total: u64) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.1 = label.to_string();
            state.2 = 0;
            state.3 = total;
            state.4.clear();
        }
        self.update_bars();
    }

    /// Report phase progress for a file
    pub fn update(&mut self, index: usize, current: u64) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.2 = current.min(state.3);
        }
        self.update_bars();
    }

    /// Report phase progress along with a short status note shown after
    /// the counter (accept counts, last delta)
    pub fn update_with_detail(&mut self, index: usize, current: u64, detail: String) {
        if let Some(state) = self.file_states.get_mut(index) {
            state.2 = current.min(state.3);
            state.4 = detail;
        }
        self.update_bars();
    }

    /// Mark a file as done and advance the batch bar
    pub fn complete_file(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.file_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.2 = state.3;
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Redraw the rolling window of per-file bars
    fn update_bars(&self) {
        let active: Vec<&FileState> = self
            .file_states
            .iter()
            .filter(|state| !state.0.is_empty())
            .collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar, (name, label, current, max, detail)) in self.file_bars.iter().zip(visible) {
            bar.set_length(*max);
            bar.set_position(*current);
            let max_width = max.to_string().len();
            let message = if detail.is_empty() {
                format!("{label} {current:>max_width$}/{max}")
            } else {
                format!("{label} {current:>max_width$}/{max} {detail}")
            };
            bar.set_message(message);
            bar.set_prefix(name.clone());
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}
