//! Command-line interface for batch texture synthesis of PNG files

use crate::algorithm::executor::Synthesizer;
use crate::io::configuration::{
    CUT_MAP_SUFFIX, DEFAULT_OVERLAP, DEFAULT_SCALE_FACTOR, OUTPUT_SUFFIX, SynthesisConfig,
};
use crate::io::error::{Result, SynthesisError};
use crate::io::image::{export_raster_as_png, load_source};
use crate::io::progress::ProgressManager;
use crate::io::visualization::export_cut_map;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "texturize")]
#[command(
    author,
    version,
    about = "Synthesize large seamless textures from a small sample"
)]
/// Command-line arguments for the texture synthesis tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Output width in pixels (implies square if height not specified)
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Output height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// How much existing content each new patch is matched against
    #[arg(short, long, default_value_t = DEFAULT_OVERLAP)]
    pub overlap: usize,

    /// Make the output tile seamlessly
    #[arg(short, long)]
    pub tileable: bool,

    /// Also export a map of where the seams fell
    #[arg(short, long)]
    pub cuts: bool,

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

    /// Output dimensions for a source of the given size
    pub const fn canvas_size(&self, source_width: usize, source_height: usize) -> (usize, usize) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w),
            (None, Some(h)) => (h, h),
            (None, None) => (
                source_width * DEFAULT_SCALE_FACTOR,
                source_height * DEFAULT_SCALE_FACTOR,
            ),
        }
    }

    /// Synthesis configuration for a source of the given size
    pub const fn config_for(&self, source_width: usize, source_height: usize) -> SynthesisConfig {
        let (width, height) = self.canvas_size(source_width, source_height);
        SynthesisConfig::new(width, height)
            .with_overlap(self.overlap)
            .with_tileable(self.tileable)
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
    /// Returns an error if target validation, synthesis or export fails
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

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Input files selected by the target, in processing order
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a PNG file nor a readable directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_png(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(target_error("Target file must be a PNG image"))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            let entries =
                std::fs::read_dir(&self.cli.target).map_err(|e| SynthesisError::FileSystem {
                    path: self.cli.target.clone(),
                    operation: "read directory",
                    source: e,
                })?;
            for entry in entries {
                let path = entry?.path();
                if is_png(&path) && !is_generated(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(target_error("Target must be a PNG file or directory"))
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
        let start_time = Instant::now();
        let output_path = Self::get_output_path(input_path);

        let source = load_source(input_path)?;
        let config = self.cli.config_for(source.width(), source.height());
        let synthesizer = Synthesizer::new(source, config)?;

        let synthesis = match self.progress_manager.as_mut() {
            Some(pm) => {
                pm.start_file(index, input_path, config.area());
                synthesizer.run(&mut pm.observer(index))?
            }
            None => synthesizer.run(&mut ())?,
        };

        if self.cli.cuts {
            export_cut_map(synthesis.fill(), &Self::get_cut_map_path(input_path))?;
        }

        let iterations = synthesis.iterations();
        let canvas = synthesis.into_canvas()?;
        export_raster_as_png(&canvas, &output_path)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index);
        }

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            iterations,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "texture written"
        );

        Ok(())
    }

    /// Path of the synthesized texture for an input file
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        sibling_with_suffix(input_path, OUTPUT_SUFFIX)
    }

    /// Path of the cut map for an input file
    pub fn get_cut_map_path(input_path: &Path) -> PathBuf {
        sibling_with_suffix(input_path, CUT_MAP_SUFFIX)
    }
}

fn sibling_with_suffix(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}.png", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

// Outputs of earlier runs sit next to their inputs
fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX) || stem.ends_with(CUT_MAP_SUFFIX))
}

fn target_error(reason: &str) -> SynthesisError {
    SynthesisError::InvalidParameter {
        parameter: "target",
        value: String::new(),
        reason: reason.to_string(),
    }
}
