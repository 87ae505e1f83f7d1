//! Tests for synthesizer setup, single iterations and observer-driven runs

#[cfg(test)]
mod tests {
    use texturize::SynthesisError;
    use texturize::algorithm::executor::{Progress, Synthesis, SynthesisObserver, Synthesizer};
    use texturize::algorithm::search::OffsetBounds;
    use texturize::io::configuration::SynthesisConfig;
    use texturize::spatial::Raster;

    fn checker(size: usize) -> Raster {
        let samples = (0..size * size)
            .flat_map(|i| {
                let (x, y) = (i % size, i / size);
                let v = if (x + y) % 2 == 0 { 200 } else { 40 };
                [v, v / 2, 255 - v]
            })
            .collect();
        Raster::from_samples(size, size, 3, samples)
            .unwrap_or_else(|e| unreachable!("valid raster rejected: {e}"))
    }

    #[derive(Default)]
    struct Recorder {
        reports: Vec<Progress>,
        cancel_after: Option<usize>,
    }

    impl SynthesisObserver for Recorder {
        fn on_progress(&mut self, progress: Progress) {
            self.reports.push(progress);
        }

        fn should_cancel(&mut self) -> bool {
            self.cancel_after
                .is_some_and(|limit| self.reports.len() >= limit)
        }
    }

    // Tests the seed patch is placed at the origin and counted as filled
    // Verified by skipping the seed fill
    #[test]
    fn test_new_places_seed() {
        let source = checker(4);
        let Ok(synthesizer) = Synthesizer::new(source.clone(), SynthesisConfig::new(10, 6)) else {
            unreachable!("valid configuration rejected");
        };

        assert_eq!(synthesizer.fill.filled_count(), 16);
        assert_eq!(synthesizer.iteration, 0);
        assert_eq!(synthesizer.canvas.pixel([3, 3]), source.pixel([3, 3]));
        assert_eq!(synthesizer.canvas.pixel([4, 0]), Some(vec![0, 0, 0]));
        assert_eq!(synthesizer.fill.first_unfilled(), Some([4, 0]));
    }

    // Tests invalid configurations are rejected before any work
    // Verified by removing the validation call
    #[test]
    fn test_new_rejects_invalid_config() {
        let too_small = Synthesizer::new(checker(4), SynthesisConfig::new(3, 8));
        assert!(matches!(
            too_small,
            Err(SynthesisError::InvalidParameter {
                parameter: "width",
                ..
            })
        ));

        let no_overlap = Synthesizer::new(checker(4), SynthesisConfig::new(8, 8).with_overlap(0));
        assert!(matches!(
            no_overlap,
            Err(SynthesisError::InvalidParameter {
                parameter: "overlap",
                ..
            })
        ));
    }

    // Tests one iteration fills the anchor and advances the counter
    // Verified by not incrementing the iteration
    #[test]
    fn test_execute_iteration() {
        let config = SynthesisConfig::new(8, 8).with_overlap(2);
        let Ok(mut synthesizer) = Synthesizer::new(checker(4), config) else {
            unreachable!("valid configuration rejected");
        };

        let before = synthesizer.fill.filled_count();
        assert!(matches!(synthesizer.execute_iteration(), Ok(true)));

        assert_eq!(synthesizer.iteration, 1);
        assert!(synthesizer.fill.is_filled([4, 0]));
        assert!(synthesizer.fill.filled_count() > before);
        assert!(synthesizer.last_placement.is_some());
        assert!(synthesizer.fill.is_consistent());
    }

    // Tests a placement that misses its anchor is reported with that anchor
    // Verified by dropping the position from the iteration context
    #[test]
    fn test_stalled_placement_reports_anchor() {
        let Ok(source) = Raster::from_samples(1, 1, 1, vec![90]) else {
            unreachable!("valid raster rejected");
        };
        let Ok(mut synthesizer) = Synthesizer::new(source, SynthesisConfig::new(3, 1)) else {
            unreachable!("valid configuration rejected");
        };
        // A window that only reaches back onto the seed
        synthesizer.bounds = OffsetBounds {
            x_near: 1,
            y_near: 0,
            x_far: 1,
            y_far: 0,
        };

        match synthesizer.execute_iteration() {
            Err(
                error @ SynthesisError::InvariantViolation {
                    iteration: 1,
                    position: Some([1, 0]),
                    operation: "composite",
                    ..
                },
            ) => {
                assert!(error.to_string().contains("anchor [1, 0]"));
            }
            other => unreachable!("Expected InvariantViolation, got {other:?}"),
        }
    }

    // Tests a canvas the size of the source needs no iterations
    // Verified by running one iteration unconditionally
    #[test]
    fn test_canvas_equal_to_source() {
        let source = checker(4);
        let Ok(mut synthesizer) = Synthesizer::new(source.clone(), SynthesisConfig::new(4, 4))
        else {
            unreachable!("valid configuration rejected");
        };
        assert!(synthesizer.is_complete());
        assert!(matches!(synthesizer.execute_iteration(), Ok(false)));

        let mut recorder = Recorder::default();
        let Ok(synthesis) = synthesizer.run(&mut recorder) else {
            unreachable!("run failed");
        };
        assert!(synthesis.is_complete());
        assert_eq!(synthesis.iterations(), 0);
        assert!(recorder.reports.is_empty());
        assert_eq!(synthesis.canvas(), &source);
    }

    // Tests every iteration is reported with monotonic coverage
    // Verified by reporting before the placement
    #[test]
    fn test_run_reports_progress() {
        let config = SynthesisConfig::new(12, 12).with_overlap(2);
        let Ok(synthesizer) = Synthesizer::new(checker(4), config) else {
            unreachable!("valid configuration rejected");
        };

        let mut recorder = Recorder::default();
        let Ok(synthesis) = synthesizer.run(&mut recorder) else {
            unreachable!("run failed");
        };

        assert!(synthesis.is_complete());
        assert_eq!(recorder.reports.len(), synthesis.iterations());
        assert!(
            recorder
                .reports
                .windows(2)
                .all(|pair| matches!(pair, [a, b] if a.filled < b.filled))
        );
        assert_eq!(
            recorder.reports.last().map(|p| (p.filled, p.total)),
            Some((144, 144))
        );
        assert_eq!(synthesis.fill().filled_count(), 144);
    }

    // Tests cancellation stops the run and the partial canvas cannot be taken as finished
    // Verified by ignoring the cancellation hook
    #[test]
    fn test_run_cancellation() {
        let config = SynthesisConfig::new(16, 16).with_overlap(2);
        let Ok(synthesizer) = Synthesizer::new(checker(4), config) else {
            unreachable!("valid configuration rejected");
        };

        let mut recorder = Recorder {
            cancel_after: Some(1),
            ..Default::default()
        };
        let Ok(synthesis) = synthesizer.run(&mut recorder) else {
            unreachable!("run failed");
        };

        assert!(matches!(synthesis, Synthesis::Canceled { iterations: 1, .. }));
        assert!(synthesis.fill().filled_count() < 256);
        assert!(matches!(
            synthesis.into_canvas(),
            Err(SynthesisError::Aborted { iteration: 1, total: 256, .. })
        ));
    }

    // Tests progress fractions
    // Verified by dividing by the filled count
    #[test]
    fn test_progress_fraction() {
        let half = Progress {
            iteration: 3,
            filled: 50,
            total: 100,
        };
        assert!((half.fraction() - 0.5).abs() < f64::EPSILON);

        let empty = Progress {
            iteration: 0,
            filled: 0,
            total: 0,
        };
        assert!((empty.fraction() - 1.0).abs() < f64::EPSILON);
    }
}
