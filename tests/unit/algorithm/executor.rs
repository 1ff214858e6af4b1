//! Tests for the mosaic engine tick loop and its commands

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use mosaicdrift::algorithm::compositing::CompositingConfig;
    use mosaicdrift::io::configuration::{
        DEFAULT_TRANSITION_SPEED, MAX_SECTIONS_PER_FRAME, MAX_TRANSITION_SPEED,
        MIN_TRANSITION_SPEED,
    };
    use mosaicdrift::{EngineConfig, MosaicEngine, TickReport};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 6) as u8, (y * 6) as u8, 90, 255])
        })
    }

    fn small_config(sections_per_frame: usize) -> EngineConfig {
        EngineConfig {
            width: 20,
            height: 20,
            section_size: 10,
            sections_per_frame,
            compositing: CompositingConfig::exact(),
            ..EngineConfig::default()
        }
    }

    fn small_engine(sections_per_frame: usize, seed: u64) -> MosaicEngine {
        let targets = vec![
            RgbaImage::from_pixel(20, 20, Rgba([200, 40, 40, 255])),
            RgbaImage::from_pixel(20, 20, Rgba([40, 40, 200, 255])),
        ];
        MosaicEngine::new(gradient(40, 40), targets, small_config(sections_per_frame), seed)
            .expect("valid engine")
    }

    // Tests an idle engine only advances the blend
    // Verified by processing sections while paused
    #[test]
    fn test_idle_ticks_only_blend() {
        let mut engine = small_engine(4, 1);
        assert!(!engine.is_processing());

        for _ in 0..3 {
            let report = engine.tick().expect("tick succeeds");
            assert_eq!(report, TickReport::default());
        }

        assert_eq!(engine.tick_count(), 3);
        assert!(engine.coverage().abs() < f64::EPSILON);
        assert!(engine.layer().pixels().all(|p| p.0[3] == 0));
        assert!((engine.cycle().blend_amount() - 3.0 * DEFAULT_TRANSITION_SPEED).abs() < 1e-12);
    }

    // Tests one processing tick covers a four-section grid
    // Verified by processing one section per tick
    #[test]
    fn test_processing_tick_covers_grid() {
        let mut engine = small_engine(4, 2);
        engine.start_processing();

        let report = engine.tick().expect("tick succeeds");

        assert_eq!(report.sections_processed, 4);
        assert_eq!(report.cycles_completed, 0);
        assert!(engine.grid().is_complete());
        assert!((engine.coverage() - 1.0).abs() < f64::EPSILON);
        assert!(engine.layer().pixels().all(|p| p.0[3] == 255));
    }

    // Tests full coverage rolls over inside the same tick
    // Verified by skipping the event that triggers the clear
    #[test]
    fn test_rollover_continues_same_event() {
        let mut engine = small_engine(6, 3);
        engine.start_processing();

        let report = engine.tick().expect("tick succeeds");

        assert_eq!(report.sections_processed, 6);
        assert_eq!(report.cycles_completed, 1);
        assert_eq!(engine.cycles_completed(), 1);
        assert_eq!(engine.grid().processed_count(), 2);
    }

    // Tests a completed grid is cleared on the next tick
    // Verified by leaving the layer uncleared
    #[test]
    fn test_rollover_on_next_tick() {
        let mut engine = small_engine(1, 4);
        engine.start_processing();

        for _ in 0..4 {
            engine.tick().expect("tick succeeds");
        }
        assert!(engine.grid().is_complete());

        let report = engine.tick().expect("tick succeeds");
        assert_eq!(report.cycles_completed, 1);
        assert_eq!(engine.grid().processed_count(), 1);
        assert_eq!(engine.layer().pixels().filter(|p| p.0[3] == 255).count(), 100);
    }

    // Tests reset clears coverage, pauses and is idempotent
    // Verified by keeping the layer on reset
    #[test]
    fn test_reset() {
        let mut engine = small_engine(3, 5);
        engine.start_processing();
        engine.tick().expect("tick succeeds");

        engine.reset();
        engine.reset();

        assert!(!engine.is_processing());
        assert!(engine.coverage().abs() < f64::EPSILON);
        assert_eq!(engine.grid().unprocessed_count(), 4);
        assert!(engine.layer().pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    // Tests processing toggles
    // Verified by making toggle a no-op
    #[test]
    fn test_toggle_processing() {
        let mut engine = small_engine(1, 6);

        engine.toggle_processing();
        assert!(engine.is_processing());
        engine.toggle_processing();
        assert!(!engine.is_processing());
        engine.start_processing();
        engine.pause_processing();
        assert!(!engine.is_processing());
    }

    // Tests section budget is clamped and stepped
    // Verified by letting the budget reach zero
    #[test]
    fn test_sections_per_frame_bounds() {
        let mut engine = small_engine(4, 7);

        engine.set_sections_per_frame(0);
        assert_eq!(engine.sections_per_frame(), 1);

        engine.set_sections_per_frame(1000);
        assert_eq!(engine.sections_per_frame(), MAX_SECTIONS_PER_FRAME);

        engine.set_sections_per_frame(48);
        engine.increase_sections_per_frame();
        assert_eq!(engine.sections_per_frame(), MAX_SECTIONS_PER_FRAME);

        engine.set_sections_per_frame(12);
        engine.increase_sections_per_frame();
        assert_eq!(engine.sections_per_frame(), 17);
        engine.decrease_sections_per_frame();
        assert_eq!(engine.sections_per_frame(), 12);

        engine.set_sections_per_frame(3);
        engine.decrease_sections_per_frame();
        assert_eq!(engine.sections_per_frame(), 1);
    }

    // Tests transition speed is clamped and scaled
    // Verified by swapping the up and down factors
    #[test]
    fn test_transition_speed_bounds() {
        let mut engine = small_engine(1, 8);
        assert!((engine.transition_speed() - DEFAULT_TRANSITION_SPEED).abs() < f64::EPSILON);

        engine.increase_transition_speed();
        assert!((engine.transition_speed() - 0.00075).abs() < 1e-12);

        engine.set_transition_speed(DEFAULT_TRANSITION_SPEED);
        engine.decrease_transition_speed();
        assert!((engine.transition_speed() - 0.000375).abs() < 1e-12);

        engine.set_transition_speed(1.0);
        assert!((engine.transition_speed() - MAX_TRANSITION_SPEED).abs() < f64::EPSILON);

        engine.set_transition_speed(0.0);
        assert!((engine.transition_speed() - MIN_TRANSITION_SPEED).abs() < f64::EPSILON);

        engine.set_transition_speed(f64::NAN);
        assert!((engine.transition_speed() - MIN_TRANSITION_SPEED).abs() < f64::EPSILON);
    }

    // Tests construction clamps runtime parameters
    // Verified by using the raw configuration
    #[test]
    fn test_config_clamped_on_construction() {
        let config = EngineConfig {
            sections_per_frame: 0,
            transition_speed: 5.0,
            match_attempts: 0,
            ..small_config(1)
        };
        let engine = MosaicEngine::new(
            gradient(40, 40),
            vec![RgbaImage::new(20, 20)],
            config,
            0,
        )
        .expect("valid engine");

        assert_eq!(engine.sections_per_frame(), 1);
        assert!((engine.transition_speed() - MAX_TRANSITION_SPEED).abs() < f64::EPSILON);
        assert_eq!(engine.config().match_attempts, 1);
    }

    // Tests invalid construction inputs are rejected
    // Verified by deferring validation to the first tick
    #[test]
    fn test_invalid_construction() {
        let targets = vec![RgbaImage::new(20, 20)];

        assert!(MosaicEngine::new(gradient(10, 10), targets.clone(), small_config(1), 0).is_err());
        assert!(MosaicEngine::new(gradient(40, 40), Vec::new(), small_config(1), 0).is_err());

        let zero_section = EngineConfig {
            section_size: 0,
            ..small_config(1)
        };
        assert!(MosaicEngine::new(gradient(40, 40), targets, zero_section, 0).is_err());
    }

    // Tests target cycle advances once the blend completes
    // Verified by never rolling the cycle
    #[test]
    fn test_target_cycle_advances() {
        let mut engine = small_engine(1, 9);
        engine.set_transition_speed(MAX_TRANSITION_SPEED);

        let advanced = (0..101)
            .filter(|_| engine.tick().expect("tick succeeds").target_advanced)
            .count();

        assert_eq!(advanced, 1);
        assert_eq!(engine.cycle().current(), 1);
        assert_eq!(engine.cycle().next(), 0);
    }

    // Tests an idle engine clears coverage when a source is installed
    // Verified by never clearing on install
    #[test]
    fn test_install_source_idle_clears() {
        let mut engine = small_engine(2, 10);
        engine.start_processing();
        engine.tick().expect("tick succeeds");
        engine.pause_processing();

        engine
            .install_source(RgbaImage::from_pixel(30, 30, Rgba([5, 5, 5, 255])))
            .expect("valid source");

        assert!(engine.coverage().abs() < f64::EPSILON);
        assert_eq!(engine.store().source().dimensions(), (30, 30));
    }

    // Tests a processing engine keeps coverage when a source is installed
    // Verified by always clearing on install
    #[test]
    fn test_install_source_processing_keeps_coverage() {
        let mut engine = small_engine(2, 11);
        engine.start_processing();
        engine.tick().expect("tick succeeds");

        engine
            .install_source(RgbaImage::from_pixel(30, 30, Rgba([5, 5, 5, 255])))
            .expect("valid source");

        assert!((engine.coverage() - 0.5).abs() < f64::EPSILON);
        assert!(engine.is_processing());
    }

    // Tests a rejected source leaves the engine untouched
    // Verified by clearing before validating
    #[test]
    fn test_install_invalid_source() {
        let mut engine = small_engine(2, 12);
        engine.start_processing();
        engine.tick().expect("tick succeeds");
        engine.pause_processing();

        assert!(engine.install_source(RgbaImage::new(5, 5)).is_err());
        assert_eq!(engine.store().source().dimensions(), (40, 40));
        assert!((engine.coverage() - 0.5).abs() < f64::EPSILON);
    }

    // Tests replacing targets restarts the cycle
    // Verified by keeping the old cycle length
    #[test]
    fn test_replace_targets() {
        let mut engine = small_engine(1, 13);
        engine.set_transition_speed(MAX_TRANSITION_SPEED);
        for _ in 0..150 {
            engine.tick().expect("tick succeeds");
        }
        assert_eq!(engine.cycle().current(), 1);

        engine
            .replace_targets(vec![RgbaImage::new(8, 8); 3])
            .expect("non-empty targets");
        assert_eq!(engine.cycle().len(), 3);
        assert_eq!((engine.cycle().current(), engine.cycle().next()), (0, 1));
        assert!(engine.store().targets().iter().all(|t| t.dimensions() == (20, 20)));

        assert!(engine.replace_targets(Vec::new()).is_err());
        assert_eq!(engine.cycle().len(), 3);
    }

    // Tests blended frame matches the region size and blend state
    // Verified by rendering only the current target
    #[test]
    fn test_blended_frame() {
        let engine = small_engine(1, 14);
        let frame = engine.blended_frame();

        assert_eq!(frame.dimensions(), (20, 20));
        assert!(frame.pixels().all(|p| *p == Rgba([200, 40, 40, 255])));
    }

    // Tests identical seeds produce identical layers
    // Verified by seeding from the clock
    #[test]
    fn test_seeded_runs_are_deterministic() {
        let run = |seed| {
            let config = EngineConfig {
                compositing: CompositingConfig::default(),
                ..small_config(3)
            };
            let mut engine = MosaicEngine::new(
                gradient(40, 40),
                vec![RgbaImage::from_pixel(20, 20, Rgba([120, 60, 90, 255]))],
                config,
                seed,
            )
            .expect("valid engine");
            engine.start_processing();
            let reports: Vec<TickReport> = (0..5)
                .map(|_| engine.tick().expect("tick succeeds"))
                .collect();
            (reports, engine.layer().clone())
        };

        assert_eq!(run(77), run(77));
    }
}
