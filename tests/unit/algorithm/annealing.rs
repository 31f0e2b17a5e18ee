//! Tests for the simulated annealing layout optimizer

#[cfg(test)]
mod tests {
    use quiltgrid::QuiltError;
    use quiltgrid::algorithm::annealing::{
        AnnealingSchedule, LayoutOptimizer, OptimizationConfig, metropolis_accepts,
        optimize_layout,
    };
    use quiltgrid::algorithm::energy::{EnergyWeights, energy};
    use quiltgrid::analysis::descriptor::{EdgeStrips, PatternType, TileDescriptor};
    use quiltgrid::math::random::LcgRandom;
    use quiltgrid::spatial::{GridAssignment, TilePool};
    use std::ops::ControlFlow;

    fn descriptor(color: [u8; 3], brightness: u8, pattern_type: PatternType) -> TileDescriptor {
        TileDescriptor {
            dominant_color: color,
            blurred_dominant_color: color,
            brightness,
            color_histogram: Vec::new(),
            pattern_type,
            edges: EdgeStrips {
                top: Vec::new(),
                right: Vec::new(),
                bottom: Vec::new(),
                left: Vec::new(),
            },
        }
    }

    fn two_tone_pool(count: usize) -> TilePool {
        let mut pool = TilePool::new();
        pool.push(descriptor([40, 40, 40], 40, PatternType::Solid), count);
        pool.push(descriptor([220, 200, 180], 200, PatternType::Floral), count);
        pool
    }

    fn mixed_pool() -> TilePool {
        let mut pool = TilePool::new();
        pool.push(descriptor([200, 30, 30], 90, PatternType::Striped), 3);
        pool.push(descriptor([30, 200, 30], 150, PatternType::Floral), 2);
        pool.push(descriptor([30, 30, 200], 60, PatternType::Solid), 3);
        pool.push(descriptor([240, 240, 240], 240, PatternType::Geometric), 1);
        pool
    }

    fn config_with_iterations(max_iterations: usize) -> OptimizationConfig {
        OptimizationConfig {
            weights: EnergyWeights::default(),
            schedule: AnnealingSchedule {
                max_iterations,
                ..AnnealingSchedule::default()
            },
        }
    }

    fn counts_of(assignment: &GridAssignment, pool: &TilePool) -> Vec<usize> {
        (0..pool.len()).map(|i| assignment.occurrences(i)).collect()
    }

    #[test]
    fn test_default_config() {
        let config = OptimizationConfig::default();
        assert_eq!(config.schedule.max_iterations, 5000);
        assert!((config.schedule.initial_temperature - 100.0).abs() < f64::EPSILON);
        assert!((config.schedule.cooling_rate - 0.995).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    // Tests unusable schedules and weights are rejected before running
    // Verified by accepting a cooling rate of zero
    #[test]
    fn test_validate_rejects_bad_values() {
        let schedules = [
            (0.0, 0.9),
            (-5.0, 0.9),
            (f64::INFINITY, 0.9),
            (f64::NAN, 0.9),
            (100.0, 0.0),
            (100.0, 1.5),
            (100.0, -0.5),
            (100.0, f64::NAN),
        ];
        for (initial_temperature, cooling_rate) in schedules {
            let config = OptimizationConfig {
                weights: EnergyWeights::default(),
                schedule: AnnealingSchedule {
                    max_iterations: 10,
                    initial_temperature,
                    cooling_rate,
                },
            };
            assert!(
                matches!(config.validate(), Err(QuiltError::InvalidParameter { .. })),
                "temperature {initial_temperature} rate {cooling_rate} should be rejected"
            );
        }

        let mut config = OptimizationConfig::default();
        config.weights.pattern_weight = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(QuiltError::InvalidParameter {
                parameter: "pattern_weight",
                ..
            })
        ));

        let mut no_cooling = OptimizationConfig::default();
        no_cooling.schedule.cooling_rate = 1.0;
        assert!(no_cooling.validate().is_ok());
    }

    // Tests construction checks grid shape and pool capacity
    // Verified by accepting pools with more tiles than cells
    #[test]
    fn test_new_validates_inputs() {
        let pool = two_tone_pool(8);
        let config = OptimizationConfig::default();

        assert!(LayoutOptimizer::new(&pool, 4, 4, config).is_ok());
        assert!(matches!(
            LayoutOptimizer::new(&pool, 0, 4, config),
            Err(QuiltError::InvalidParameter { parameter: "grid", .. })
        ));
        assert!(matches!(
            LayoutOptimizer::new(&pool, 3, 4, config),
            Err(QuiltError::CapacityMismatch {
                available: 16,
                required: 12
            })
        ));
        assert!(matches!(
            LayoutOptimizer::new(&pool, 5, 4, config),
            Err(QuiltError::CapacityMismatch {
                available: 16,
                required: 20
            })
        ));
    }

    // Tests the starting layout places every copy exactly once
    // Verified by filling the grid without shuffling
    #[test]
    fn test_initial_assignment_preserves_counts() {
        let pool = mixed_pool();
        let optimizer =
            LayoutOptimizer::new(&pool, 3, 3, OptimizationConfig::default()).expect("valid run");

        let first = optimizer
            .initial_assignment(&mut LcgRandom::new(5))
            .expect("fits grid");
        let again = optimizer
            .initial_assignment(&mut LcgRandom::new(5))
            .expect("fits grid");

        assert_eq!(counts_of(&first, &pool), vec![3, 2, 3, 1]);
        assert_eq!(first, again);
    }

    // Tests swaps never change how often each tile appears
    // Verified by replacing the second cell instead of swapping
    #[test]
    fn test_run_preserves_counts() {
        let pool = mixed_pool();
        let optimizer =
            LayoutOptimizer::new(&pool, 3, 3, config_with_iterations(500)).expect("valid run");

        let outcome = optimizer.run(&mut LcgRandom::new(11)).expect("run completes");

        assert_eq!(counts_of(&outcome.assignment, &pool), vec![3, 2, 3, 1]);
        assert_eq!(outcome.assignment.rows(), 3);
        assert_eq!(outcome.assignment.cols(), 3);
        assert_eq!(outcome.iterations, 500);
    }

    // Tests the returned layout is the best seen, not the last visited
    // Verified by returning the current layout at the end of the run
    #[test]
    fn test_best_energy_never_exceeds_initial() {
        let pool = mixed_pool();
        let config = config_with_iterations(800);
        let optimizer = LayoutOptimizer::new(&pool, 3, 3, config).expect("valid run");

        for seed in [1, 2, 3, 99] {
            let outcome = optimizer.run(&mut LcgRandom::new(seed)).expect("run completes");
            let recomputed = energy(&outcome.assignment, &pool, &config.weights);

            assert!(outcome.best_energy <= outcome.initial_energy);
            assert!((recomputed - outcome.best_energy).abs() < 1e-9);
            assert!(outcome.improvements <= outcome.accepted_moves);
            assert!(outcome.accepted_moves <= outcome.iterations);
        }
    }

    // Tests a zero budget returns the shuffled start untouched
    #[test]
    fn test_zero_iterations_returns_initial_layout() {
        let pool = two_tone_pool(2);
        let optimizer =
            LayoutOptimizer::new(&pool, 2, 2, config_with_iterations(0)).expect("valid run");

        let expected = optimizer
            .initial_assignment(&mut LcgRandom::new(3))
            .expect("fits grid");
        let outcome = optimizer.run(&mut LcgRandom::new(3)).expect("run completes");

        assert_eq!(outcome.assignment, expected);
        assert!((outcome.best_energy - outcome.initial_energy).abs() < f64::EPSILON);
        assert_eq!(outcome.accepted_moves, 0);
    }

    // Tests a seeded run is fully reproducible
    // Verified by seeding the shuffle from entropy
    #[test]
    fn test_seeded_runs_are_identical() {
        let pool = mixed_pool();
        let config = config_with_iterations(300);

        let first = optimize_layout(&pool, 3, 3, &config, Some(2024)).expect("run completes");
        let second = optimize_layout(&pool, 3, 3, &config, Some(2024)).expect("run completes");

        assert_eq!(first, second);
    }

    // Tests two tones settle into a checkerboard
    // Verified by inverting the Metropolis comparison
    #[test]
    fn test_two_tones_reach_checkerboard() {
        let pool = two_tone_pool(8);

        let layout =
            optimize_layout(&pool, 4, 4, &config_with_iterations(2000), Some(42)).expect("run");

        for row in 0..4 {
            for col in 0..4 {
                let here = layout.get(row, col);
                if let Some(right) = layout.get(row, col + 1) {
                    assert_ne!(here, Some(right));
                }
                if let Some(below) = layout.get(row + 1, col) {
                    assert_ne!(here, Some(below));
                }
            }
        }
    }

    // Tests the observer sees every iteration with cooling applied
    #[test]
    fn test_observer_receives_progress() {
        let pool = two_tone_pool(2);
        let mut config = config_with_iterations(4);
        config.schedule.cooling_rate = 0.5;
        let optimizer = LayoutOptimizer::new(&pool, 2, 2, config).expect("valid run");

        let mut seen = Vec::new();
        let outcome = optimizer
            .run_with_observer(&mut LcgRandom::new(8), |progress| {
                seen.push(*progress);
                ControlFlow::Continue(())
            })
            .expect("run completes");

        let iterations: Vec<usize> = seen.iter().map(|p| p.iteration).collect();
        assert_eq!(iterations, vec![1, 2, 3, 4]);
        assert!(seen.iter().all(|p| p.max_iterations == 4));
        assert!(seen.last().is_some_and(|p| (p.temperature - 6.25).abs() < 1e-12));
        assert!(
            seen.last()
                .is_some_and(|p| (p.best_energy - outcome.best_energy).abs() < f64::EPSILON)
        );
        assert!(seen.iter().all(|p| p.best_energy <= p.current_energy));
    }

    // Tests breaking from the observer aborts without a layout
    // Verified by ignoring the observer's return value
    #[test]
    fn test_observer_can_cancel() {
        let pool = two_tone_pool(8);
        let optimizer =
            LayoutOptimizer::new(&pool, 4, 4, OptimizationConfig::default()).expect("valid run");

        let result = optimizer.run_with_observer(&mut LcgRandom::new(1), |progress| {
            if progress.iteration == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        assert!(matches!(result, Err(QuiltError::Cancelled { iteration: 3 })));
    }

    // Tests improvements skip the random draw and regressions consume one
    // Verified by drawing before checking the sign of delta
    #[test]
    fn test_metropolis_draw_order() {
        let mut random = LcgRandom::new(0);

        assert!(metropolis_accepts(-1.0, 10.0, &mut random));
        assert_eq!(random.state(), 0);

        assert!(metropolis_accepts(0.0, 10.0, &mut random));
        assert_eq!(random.state(), 1_013_904_223);

        // exp(-1000) underflows below any draw
        assert!(!metropolis_accepts(1000.0, 1.0, &mut random));
        assert_eq!(random.state(), 1_196_435_762);
    }

    // Tests the acceptance probability tracks exp(-delta / T)
    #[test]
    fn test_metropolis_probability() {
        let mut random = LcgRandom::new(17);
        let trials = 20_000;

        let accepted = (0..trials)
            .filter(|_| metropolis_accepts(1.0, 1.0, &mut random))
            .count();
        let rate = accepted as f64 / f64::from(trials);

        assert!((rate - (-1.0_f64).exp()).abs() < 0.02);
    }
}
