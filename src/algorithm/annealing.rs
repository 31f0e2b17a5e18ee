//! Simulated annealing over tile-to-cell assignments
//!
//! Starting from a shuffled layout, each iteration swaps two random cells and
//! keeps the swap under the Metropolis criterion. The best layout seen is
//! snapshotted whenever an accepted move improves on it, and that snapshot is
//! what the run returns.

use crate::algorithm::energy::{EnergyWeights, energy};
use crate::io::configuration::{DEFAULT_COOLING_RATE, DEFAULT_MAX_ITERATIONS, DEFAULT_TEMPERATURE};
use crate::io::error::{QuiltError, Result, invalid_parameter};
use crate::math::random::{RandomSource, random_source, shuffle};
use crate::spatial::{GridAssignment, TilePool};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// Temperature schedule and iteration budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingSchedule {
    /// Number of swap proposals per run
    pub max_iterations: usize,
    /// Temperature before the first proposal
    pub initial_temperature: f64,
    /// Multiplier applied to the temperature after every proposal
    pub cooling_rate: f64,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_temperature: DEFAULT_TEMPERATURE,
            cooling_rate: DEFAULT_COOLING_RATE,
        }
    }
}

/// Everything tunable about one optimization run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    /// Energy term weights
    #[serde(flatten)]
    pub weights: EnergyWeights,
    /// Annealing schedule
    #[serde(flatten)]
    pub schedule: AnnealingSchedule,
}

impl OptimizationConfig {
    /// Reject schedules and weights the annealer cannot run with
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a non-positive or non-finite temperature,
    /// a cooling rate outside `(0, 1]`, or a non-finite weight
    pub fn validate(&self) -> Result<()> {
        let temperature = self.schedule.initial_temperature;
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(invalid_parameter(
                "initial_temperature",
                &temperature,
                &"must be positive and finite",
            ));
        }
        let rate = self.schedule.cooling_rate;
        if rate.is_nan() || rate <= 0.0 || rate > 1.0 {
            return Err(invalid_parameter(
                "cooling_rate",
                &rate,
                &"must be in (0, 1]",
            ));
        }
        let weights = [
            ("color_weight", self.weights.color_weight),
            ("brightness_weight", self.weights.brightness_weight),
            ("pattern_weight", self.weights.pattern_weight),
            ("spacing_weight", self.weights.spacing_weight),
        ];
        for (parameter, value) in weights {
            if !value.is_finite() {
                return Err(invalid_parameter(parameter, &value, &"must be finite"));
            }
        }
        Ok(())
    }
}

/// State reported to an observer after each iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealingProgress {
    /// Iterations completed so far
    pub iteration: usize,
    /// Iteration budget
    pub max_iterations: usize,
    /// Temperature after cooling
    pub temperature: f64,
    /// Energy of the current layout
    pub current_energy: f64,
    /// Lowest energy seen
    pub best_energy: f64,
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingOutcome {
    /// Lowest-energy layout seen
    pub assignment: GridAssignment,
    /// Energy of the shuffled starting layout
    pub initial_energy: f64,
    /// Energy of `assignment`
    pub best_energy: f64,
    /// Swaps accepted by the Metropolis criterion
    pub accepted_moves: usize,
    /// Accepted swaps that set a new best
    pub improvements: usize,
    /// Iterations executed
    pub iterations: usize,
}

/// Metropolis acceptance: always take improvements, sometimes take regressions
///
/// A random value is drawn only when `delta` is not negative.
pub fn metropolis_accepts<R: RandomSource + ?Sized>(
    delta: f64,
    temperature: f64,
    random: &mut R,
) -> bool {
    delta < 0.0 || random.next_unit() < (-delta / temperature).exp()
}

/// Annealer bound to one tile pool and grid shape
pub struct LayoutOptimizer<'a> {
    pool: &'a TilePool,
    rows: usize,
    cols: usize,
    config: OptimizationConfig,
}

impl<'a> LayoutOptimizer<'a> {
    /// Validate the run parameters and bind them to a pool
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty grid or unusable config, and
    /// `CapacityMismatch` if the pool counts do not sum to `rows * cols`
    pub fn new(
        pool: &'a TilePool,
        rows: usize,
        cols: usize,
        config: OptimizationConfig,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(invalid_parameter(
                "grid",
                &format!("{rows}x{cols}"),
                &"rows and cols must be positive",
            ));
        }
        config.validate()?;
        pool.check_capacity(rows, cols)?;
        Ok(Self {
            pool,
            rows,
            cols,
            config,
        })
    }

    /// Configuration this optimizer runs with
    pub const fn config(&self) -> &OptimizationConfig {
        &self.config
    }

    /// Shuffled starting layout: expand counts, Fisher–Yates, fill row-major
    ///
    /// # Errors
    ///
    /// Returns an error only if the expanded pool no longer fits the grid
    pub fn initial_assignment<R: RandomSource + ?Sized>(
        &self,
        random: &mut R,
    ) -> Result<GridAssignment> {
        let mut sequence = self.pool.expand();
        shuffle(&mut sequence, random);
        GridAssignment::from_sequence(self.rows, self.cols, sequence)
    }

    /// Run the full iteration budget
    ///
    /// # Errors
    ///
    /// Never fails once construction succeeded, apart from internal shape errors
    pub fn run<R: RandomSource + ?Sized>(&self, random: &mut R) -> Result<AnnealingOutcome> {
        self.run_with_observer(random, |_| ControlFlow::Continue(()))
    }

    /// Run the iteration budget, reporting to `observer` after every iteration
    ///
    /// The observer may return `ControlFlow::Break` to abort between
    /// iterations; no partial layout is returned in that case.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if the observer aborts the run
    pub fn run_with_observer<R, F>(&self, random: &mut R, mut observer: F) -> Result<AnnealingOutcome>
    where
        R: RandomSource + ?Sized,
        F: FnMut(&AnnealingProgress) -> ControlFlow<()>,
    {
        let weights = &self.config.weights;
        let schedule = &self.config.schedule;

        let mut current = self.initial_assignment(random)?;
        let initial_energy = energy(&current, self.pool, weights);
        let mut current_energy = initial_energy;
        let mut best = current.clone();
        let mut best_energy = initial_energy;
        let mut temperature = schedule.initial_temperature;
        let mut accepted_moves = 0;
        let mut improvements = 0;

        log::debug!(
            "annealing {}x{} grid over {} tiles, initial energy {initial_energy:.3}",
            self.rows,
            self.cols,
            self.pool.len()
        );

        for iteration in 0..schedule.max_iterations {
            let first = [random.next_index(self.rows), random.next_index(self.cols)];
            let second = [random.next_index(self.rows), random.next_index(self.cols)];

            current.swap_cells(first, second)?;
            let candidate_energy = energy(&current, self.pool, weights);
            let delta = candidate_energy - current_energy;

            if metropolis_accepts(delta, temperature, random) {
                current_energy = candidate_energy;
                accepted_moves += 1;
                if current_energy < best_energy {
                    best.clone_from(&current);
                    best_energy = current_energy;
                    improvements += 1;
                }
            } else {
                current.swap_cells(first, second)?;
            }

            temperature *= schedule.cooling_rate;

            let progress = AnnealingProgress {
                iteration: iteration + 1,
                max_iterations: schedule.max_iterations,
                temperature,
                current_energy,
                best_energy,
            };
            if observer(&progress).is_break() {
                log::debug!("annealing aborted by caller at iteration {}", iteration + 1);
                return Err(QuiltError::Cancelled {
                    iteration: iteration + 1,
                });
            }
        }

        log::debug!(
            "annealing finished: best energy {best_energy:.3} ({accepted_moves} accepted, {improvements} improvements)"
        );

        Ok(AnnealingOutcome {
            assignment: best,
            initial_energy,
            best_energy,
            accepted_moves,
            improvements,
            iterations: schedule.max_iterations,
        })
    }
}

/// Arrange a tile pool into a `rows × cols` grid
///
/// With a seed the run is reproducible through the LCG source; without one
/// it draws from operating system entropy.
///
/// # Errors
///
/// Returns `CapacityMismatch` if the pool counts do not sum to `rows * cols`,
/// or `InvalidParameter` for an empty grid or unusable config
pub fn optimize_layout(
    pool: &TilePool,
    rows: usize,
    cols: usize,
    config: &OptimizationConfig,
    seed: Option<u32>,
) -> Result<GridAssignment> {
    let optimizer = LayoutOptimizer::new(pool, rows, cols, *config)?;
    let mut random = random_source(seed);
    Ok(optimizer.run(&mut random)?.assignment)
}
