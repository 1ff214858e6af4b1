//! Tests for tile drawing into the composited layer

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use mosaicdrift::algorithm::compositing::{
        CompositingConfig, CompositingEngine, DrawMode, draw_block,
    };
    use mosaicdrift::io::configuration::{MAX_ROTATION, MAX_TILE_SCALE, MIN_TILE_SCALE};
    use mosaicdrift::math::transform::TilePlacement;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 5) as u8, (y * 5) as u8, 128, 255])
        })
    }

    // Tests exact placement copies the tile pixel for pixel
    // Verified by sampling at pixel corners instead of centers
    #[test]
    fn test_exact_draw_copies_block() {
        let engine = CompositingEngine::new(CompositingConfig::exact());
        let source = gradient(40, 40);
        let mut layer = RgbaImage::new(30, 30);
        let mut rng = StdRng::seed_from_u64(1);

        let draw = engine.render_section(&mut layer, &source, (5, 7), (10, 10), 10, &mut rng);

        assert!(!draw.glitched);
        assert!(draw.angle.abs() < f64::EPSILON);
        assert!((draw.scale - 1.0).abs() < f64::EPSILON);
        for y in 0..30 {
            for x in 0..30 {
                let inside = (10..20).contains(&x) && (10..20).contains(&y);
                let expected = if inside {
                    *source.get_pixel(x - 5, y - 3)
                } else {
                    Rgba([0, 0, 0, 0])
                };
                assert_eq!(*layer.get_pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    // Tests replace mode overwrites existing layer content
    // Verified by compositing the tile over the old pixels
    #[test]
    fn test_replace_overwrites() {
        let mut layer = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
        let block = RgbaImage::from_pixel(10, 10, Rgba([200, 0, 0, 40]));

        draw_block(
            &mut layer,
            &block,
            TilePlacement::identity((5.0, 5.0)),
            DrawMode::Replace,
        );
        assert!(layer.pixels().all(|p| *p == Rgba([200, 0, 0, 40])));
    }

    // Tests default draws stay inside the configured ranges
    // Verified by drawing rotation from a one-sided range
    #[test]
    fn test_default_ranges() {
        let engine = CompositingEngine::default();
        let source = gradient(40, 40);
        let mut layer = RgbaImage::new(40, 40);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let draw = engine.render_section(&mut layer, &source, (3, 3), (10, 10), 10, &mut rng);
            assert!(draw.angle.abs() <= MAX_ROTATION);
            assert!((MIN_TILE_SCALE..=MAX_TILE_SCALE).contains(&draw.scale));
        }
    }

    // Tests a forced glitch tints the drawn tile
    // Verified by skipping the tinted passes
    #[test]
    fn test_forced_glitch_changes_pixels() {
        let source = RgbaImage::from_pixel(20, 20, Rgba([100, 150, 200, 255]));
        let glitching = CompositingEngine::new(CompositingConfig {
            glitch_probability: 1.0,
            ..CompositingConfig::exact()
        });
        let mut layer = RgbaImage::new(10, 10);
        let mut rng = StdRng::seed_from_u64(4);

        let draw = glitching.render_section(&mut layer, &source, (0, 0), (0, 0), 10, &mut rng);

        assert!(draw.glitched);
        let pixel = *layer.get_pixel(5, 5);
        assert_ne!(pixel, Rgba([100, 150, 200, 255]));
        assert_eq!(pixel.0[3], 255);
    }

    // Tests zero probability never glitches
    // Verified by comparing with less-or-equal
    #[test]
    fn test_zero_probability_never_glitches() {
        let engine = CompositingEngine::new(CompositingConfig {
            glitch_probability: 0.0,
            ..CompositingConfig::default()
        });
        let source = gradient(30, 30);
        let mut layer = RgbaImage::new(20, 20);
        let mut rng = StdRng::seed_from_u64(23);

        for _ in 0..200 {
            let draw = engine.render_section(&mut layer, &source, (0, 0), (0, 0), 10, &mut rng);
            assert!(!draw.glitched);
        }
    }

    // Tests drawing past the layer edge is clipped
    // Verified by removing the bounds clamp
    #[test]
    fn test_edge_sections_clipped() {
        let engine = CompositingEngine::new(CompositingConfig::exact());
        let source = RgbaImage::from_pixel(20, 20, Rgba([1, 2, 3, 255]));
        let mut layer = RgbaImage::new(25, 25);
        let mut rng = StdRng::seed_from_u64(0);

        engine.render_section(&mut layer, &source, (0, 0), (20, 20), 10, &mut rng);

        assert_eq!(*layer.get_pixel(24, 24), Rgba([1, 2, 3, 255]));
        assert_eq!(*layer.get_pixel(20, 20), Rgba([1, 2, 3, 255]));
        assert_eq!(*layer.get_pixel(19, 19), Rgba([0, 0, 0, 0]));
    }

    // Tests tile placed entirely off the layer draws nothing
    // Verified by casting negative bounds to unsigned
    #[test]
    fn test_offscreen_draw_is_noop() {
        let mut layer = RgbaImage::new(10, 10);
        let block = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));

        draw_block(
            &mut layer,
            &block,
            TilePlacement::identity((-50.0, -50.0)),
            DrawMode::Replace,
        );
        assert!(layer.pixels().all(|p| p.0[3] == 0));
    }

    // Tests configuration normalization
    // Verified by accepting an inverted scale range
    #[test]
    fn test_config_clamped() {
        let config = CompositingConfig {
            max_rotation: f64::NAN,
            min_scale: 2.0,
            max_scale: 1.0,
            glitch_probability: 3.0,
            glitch_opacity: -1.0,
            glitch_jitter: -2.0,
        }
        .clamped();

        assert!((config.max_rotation - MAX_ROTATION).abs() < f64::EPSILON);
        assert!((config.min_scale - 2.0).abs() < f64::EPSILON);
        assert!((config.max_scale - 2.0).abs() < f64::EPSILON);
        assert!((config.glitch_probability - 1.0).abs() < f64::EPSILON);
        assert!(config.glitch_opacity.abs() < f64::EPSILON);
        assert!((config.glitch_jitter - 2.0).abs() < f64::EPSILON);

        let engine = CompositingEngine::new(config);
        assert_eq!(*engine.config(), config);
    }
}
