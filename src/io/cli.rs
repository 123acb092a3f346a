//! Command-line interface for batch processing PNG files
//!
//! Cuts each source PNG into square tiles, optimizes (or grows) an
//! arrangement whose adjacent edges match, and writes the rendered board
//! next to the input.

use crate::algorithm::growth::{GrowthBuilder, GrowthStep};
use crate::algorithm::solver::SeamSolver;
use crate::analysis::field::load_source;
use crate::analysis::signatures::SignatureBuilder;
use crate::io::configuration::{
    ATTEMPT_BATCH, DEFAULT_ATTEMPTS, DEFAULT_SEED, DEFAULT_TILE_PX, OUTPUT_SUFFIX,
    SIGNATURE_TILES_PER_CHUNK, SolverConfig, W_BLOB,
};
use crate::io::error::Result;
use crate::io::image::export_board_png;
use crate::io::progress::ProgressManager;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "seamtile")]
#[command(
    author,
    version,
    about = "Rearrange image tiles so adjacent edges visually match"
)]
/// Command-line arguments for the tile rearrangement tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Random seed for reproducible runs
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Square tile side in pixels
    #[arg(short, long, default_value_t = DEFAULT_TILE_PX)]
    pub tile_size: usize,

    /// Optimization attempts before exporting
    #[arg(short, long, default_value_t = DEFAULT_ATTEMPTS)]
    pub attempts: u64,

    /// Grow the board outward from a seed instead of optimizing a shuffle
    #[arg(short, long)]
    pub grow: bool,

    /// Disable the inward-ray term of the seam cost
    #[arg(long)]
    pub no_vector: bool,

    /// Disable tile rotation moves
    #[arg(long)]
    pub no_rotation: bool,

    /// Treat the horizontal axis as bounded instead of wrapping
    #[arg(long)]
    pub flat_x: bool,

    /// Treat the vertical axis as bounded instead of wrapping
    #[arg(long)]
    pub flat_y: bool,

    /// Region-cohesion weight; zero disables the term
    #[arg(short, long, default_value_t = W_BLOB)]
    pub blob: f64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Solver configuration derived from the flags
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            w_blob: self.blob,
            use_vector: !self.no_vector,
            allow_rotation: !self.no_rotation,
            toroidal_x: !self.flat_x,
            toroidal_y: !self.flat_y,
            ..SolverConfig::default()
        }
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if target validation or file processing fails
    pub fn process(&mut self) -> Result<()> {
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if self.cli.target.extension().and_then(|s| s.to_str()) == Some("png") {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(crate::io::error::io_error(
                    "Target file must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("png")
                    && self.should_process_file(&path)
                {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(crate::io::error::io_error(
                "Target must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let output_path = Self::get_output_path(input_path);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path);
        }

        let source = load_source(input_path, self.cli.tile_size)?;
        let config = self.cli.solver_config();

        // Signature extraction phase, interleaved with progress updates
        let tile_count = source.geometry.tile_count();
        if let Some(ref mut pm) = self.progress_manager {
            pm.begin_phase(index, "signatures", tile_count as u64);
        }
        let mut builder = SignatureBuilder::new(&source.field, source.geometry);
        loop {
            let done = builder.process_chunk(SIGNATURE_TILES_PER_CHUNK);
            if let Some(ref mut pm) = self.progress_manager {
                pm.update(index, (tile_count - builder.remaining()) as u64);
            }
            if done {
                break;
            }
        }
        let signatures = builder.finish();

        let board = if self.cli.grow {
            if let Some(ref mut pm) = self.progress_manager {
                pm.begin_phase(index, "growth", tile_count as u64);
            }
            let mut growth = GrowthBuilder::new(
                source.field.clone(),
                source.geometry,
                signatures,
                config,
                self.cli.seed,
            );
            loop {
                match growth.step() {
                    GrowthStep::Placed { .. } => {
                        if let Some(ref mut pm) = self.progress_manager {
                            pm.update(index, (tile_count - growth.unused_count()) as u64);
                        }
                    }
                    GrowthStep::Relaxed => {}
                    GrowthStep::Complete => break,
                }
            }
            growth.board().clone()
        } else {
            if let Some(ref mut pm) = self.progress_manager {
                pm.begin_phase(index, "attempts", self.cli.attempts);
            }
            let mut solver = SeamSolver::with_signatures(
                source.field.clone(),
                source.geometry,
                signatures,
                config,
                self.cli.seed,
            );
            let mut done = 0u64;
            let mut accepted_total = 0u64;
            while done < self.cli.attempts {
                let batch = ATTEMPT_BATCH.min(self.cli.attempts - done);
                for _ in 0..batch {
                    solver.attempt_improve_once();
                }
                done += batch;
                let interval = solver.drain_stats();
                accepted_total += interval.accepted;
                if let Some(ref mut pm) = self.progress_manager {
                    pm.update_with_detail(
                        index,
                        done,
                        format!(
                            "{accepted_total} accepted, Δ {:+.4}",
                            interval.last_delta
                        ),
                    );
                }
            }
            solver.board().clone()
        };

        export_board_png(&board, &source.geometry, &source.pixels, &output_path)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        Ok(())
    }

    fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        );

        input_path.parent().map_or_else(
            || PathBuf::from(&output_name),
            |parent| parent.join(&output_name),
        )
    }
}
