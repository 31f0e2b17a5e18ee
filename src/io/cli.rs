//! Command-line interface: tile images in, optimized quilt out

use crate::algorithm::annealing::{AnnealingOutcome, LayoutOptimizer, OptimizationConfig};
use crate::algorithm::energy::energy_breakdown;
use crate::io::configuration::{
    DEFAULT_COLS, DEFAULT_OUTPUT_NAME, DEFAULT_RENDER_TILE_SIZE, DEFAULT_ROWS,
    DEFAULT_TILE_COUNT, MAX_GRID_DIMENSION, TILE_EXTENSIONS, TILE_SIDE, read_config,
};
use crate::io::error::{QuiltError, Result, invalid_parameter};
use crate::io::image::{describe_tile, export_quilt_png, load_tile, render_quilt};
use crate::io::layout::{LayoutDocument, write_layout_json};
use crate::io::progress::ProgressManager;
use crate::math::random::random_source;
use crate::spatial::{TilePool, TilePoolEntry};
use clap::Parser;
use image::RgbaImage;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "quiltgrid")]
#[command(
    author,
    version,
    about = "Arrange fabric tile photos into a quilt that spreads similar tiles apart"
)]
/// Command-line arguments for the quilt layout tool
pub struct Cli {
    /// Tile images, or directories containing them
    #[arg(value_name = "TILES", required = true)]
    pub tiles: Vec<PathBuf>,

    /// Grid rows
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Grid columns
    #[arg(short, long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Repeat count for every tile
    #[arg(short = 'n', long, default_value_t = DEFAULT_TILE_COUNT)]
    pub count: usize,

    /// Per-tile repeat counts in tile order (overrides --count)
    #[arg(long, value_delimiter = ',')]
    pub counts: Vec<usize>,

    /// Seed for a reproducible layout (random when omitted)
    #[arg(short, long)]
    pub seed: Option<u32>,

    /// JSON file with weights and annealing schedule
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Annealing iterations
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Initial annealing temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Temperature multiplier per iteration
    #[arg(long)]
    pub cooling_rate: Option<f64>,

    /// Weight of the similar-color penalty
    #[arg(long)]
    pub color_weight: Option<f64>,

    /// Weight of the similar-brightness penalties
    #[arg(long)]
    pub brightness_weight: Option<f64>,

    /// Weight of the same-pattern penalty
    #[arg(long)]
    pub pattern_weight: Option<f64>,

    /// Weight of the repeated-tile penalties
    #[arg(long)]
    pub spacing_weight: Option<f64>,

    /// Rendered quilt path (defaults to quilt_result.png next to the tiles)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pixel size of each cell in the rendered quilt
    #[arg(short, long, default_value_t = DEFAULT_RENDER_TILE_SIZE)]
    pub tile_size: u32,

    /// Also write the layout and tile summaries as JSON
    #[arg(long, value_name = "FILE")]
    pub layout_json: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log run details
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Default log filter for this invocation
    pub const fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    /// Configuration file (if any) with command-line overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be loaded or the
    /// resulting values are unusable
    pub fn optimization_config(&self) -> Result<OptimizationConfig> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => OptimizationConfig::default(),
        };

        let weights = &mut config.weights;
        let schedule = &mut config.schedule;
        let overrides = [
            (&mut weights.color_weight, self.color_weight),
            (&mut weights.brightness_weight, self.brightness_weight),
            (&mut weights.pattern_weight, self.pattern_weight),
            (&mut weights.spacing_weight, self.spacing_weight),
            (&mut schedule.initial_temperature, self.temperature),
            (&mut schedule.cooling_rate, self.cooling_rate),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(iterations) = self.iterations {
            config.schedule.max_iterations = iterations;
        }

        config.validate()?;
        Ok(config)
    }

    /// Repeat count for each of `tile_count` tiles
    ///
    /// # Errors
    ///
    /// Returns an error if `--counts` lists a different number of tiles
    pub fn tile_counts(&self, tile_count: usize) -> Result<Vec<usize>> {
        if self.counts.is_empty() {
            return Ok(vec![self.count; tile_count]);
        }
        if self.counts.len() != tile_count {
            return Err(invalid_parameter(
                "counts",
                &format!("{:?}", self.counts),
                &format!("expected {tile_count} counts, one per tile"),
            ));
        }
        Ok(self.counts.clone())
    }
}

/// Runs the extract, optimize, render pipeline for one invocation
pub struct QuiltProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl QuiltProcessor {
    /// Create a new processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Create a processor with an explicit progress manager
    pub const fn with_progress(cli: Cli, progress_manager: Option<ProgressManager>) -> Self {
        Self {
            cli,
            progress_manager,
        }
    }

    /// Extract, optimize, render and export according to the CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if any tile fails to decode, the counts do not fill
    /// the grid, or an output cannot be written
    pub fn process(&mut self) -> Result<AnnealingOutcome> {
        let start_time = Instant::now();
        self.validate_grid()?;
        let config = self.cli.optimization_config()?;

        let files = self.collect_files()?;
        if files.is_empty() {
            return Err(invalid_parameter(
                "tiles",
                &format!("{:?}", self.cli.tiles),
                &"no tile images found",
            ));
        }
        let counts = self.cli.tile_counts(files.len())?;

        let (pool, images) = self.build_pool(&files, &counts)?;
        log::info!(
            "extracted {} tiles in {:.2?}",
            pool.len(),
            start_time.elapsed()
        );

        let optimizer = LayoutOptimizer::new(&pool, self.cli.rows, self.cli.cols, config)?;
        let mut random = random_source(self.cli.seed);

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_annealing(config.schedule.max_iterations);
        }
        let progress_manager = self.progress_manager.as_ref();
        let outcome = optimizer.run_with_observer(&mut random, |progress| {
            if let Some(pm) = progress_manager {
                pm.update_annealing(progress);
            }
            ControlFlow::Continue(())
        })?;

        log::info!(
            "energy {:.3} -> {:.3} after {} iterations ({} accepted)",
            outcome.initial_energy,
            outcome.best_energy,
            outcome.iterations,
            outcome.accepted_moves
        );
        for (term, value) in energy_breakdown(&outcome.assignment, &pool, &config.weights) {
            log::debug!("  {term:<10} {value:.3}");
        }

        let quilt = render_quilt(&outcome.assignment, &images, self.cli.tile_size)?;
        let output_path = self.output_path();
        export_quilt_png(&quilt, &output_path)?;
        log::info!("wrote {}", output_path.display());

        if let Some(ref layout_path) = self.cli.layout_json {
            let document = LayoutDocument::new(&pool, &outcome, &config, self.cli.seed);
            write_layout_json(&document, layout_path)?;
            log::info!("wrote {}", layout_path.display());
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Ok(outcome)
    }

    fn validate_grid(&self) -> Result<()> {
        for (parameter, value) in [("rows", self.cli.rows), ("cols", self.cli.cols)] {
            if value == 0 || value > MAX_GRID_DIMENSION {
                return Err(invalid_parameter(
                    parameter,
                    &value,
                    &format!("must be between 1 and {MAX_GRID_DIMENSION}"),
                ));
            }
        }
        Ok(())
    }

    fn build_pool(
        &mut self,
        files: &[PathBuf],
        counts: &[usize],
    ) -> Result<(TilePool, Vec<RgbaImage>)> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.start_extraction(files.len());
        }

        let mut pool = TilePool::new();
        let mut images = Vec::with_capacity(files.len());
        for (path, &count) in files.iter().zip(counts) {
            let tile = load_tile(path, TILE_SIDE as u32)?;
            let descriptor = describe_tile(&tile)?;
            let label = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            log::debug!(
                "{label}: color {:?} brightness {} pattern {}",
                descriptor.blurred_dominant_color,
                descriptor.brightness,
                descriptor.pattern_type
            );
            if let Some(ref pm) = self.progress_manager {
                pm.tile_extracted(&label);
            }
            pool.push_entry(TilePoolEntry {
                descriptor,
                count,
                label: Some(label),
            });
            images.push(tile);
        }

        Ok((pool, images))
    }

    /// Tile image files named on the command line, directories expanded and sorted
    ///
    /// # Errors
    ///
    /// Returns an error if a target does not exist or a directory cannot be read
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for target in &self.cli.tiles {
            if target.is_file() {
                files.push(target.clone());
            } else if target.is_dir() {
                let entries = std::fs::read_dir(target).map_err(|e| QuiltError::FileSystem {
                    path: target.clone(),
                    operation: "read directory",
                    source: e,
                })?;
                let mut found = Vec::new();
                for entry in entries {
                    let path = entry?.path();
                    if path.is_file() && is_tile_image(&path) && !self.is_own_output(&path) {
                        found.push(path);
                    }
                }
                found.sort();
                files.extend(found);
            } else {
                return Err(invalid_parameter(
                    "tiles",
                    &target.display(),
                    &"not a file or directory",
                ));
            }
        }
        Ok(files)
    }

    /// Where the rendered quilt is written
    pub fn output_path(&self) -> PathBuf {
        if let Some(ref output) = self.cli.output {
            return output.clone();
        }
        let base = match self.cli.tiles.first() {
            Some(first) if first.is_dir() => first.clone(),
            Some(first) => first.parent().map(Path::to_path_buf).unwrap_or_default(),
            None => PathBuf::new(),
        };
        base.join(DEFAULT_OUTPUT_NAME)
    }

    fn is_own_output(&self, path: &Path) -> bool {
        path.file_name().and_then(|name| name.to_str()) == Some(DEFAULT_OUTPUT_NAME)
            || self.cli.output.as_deref() == Some(path)
    }
}

fn is_tile_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TILE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
