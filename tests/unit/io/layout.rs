//! Tests for layout document capture and JSON persistence

#[cfg(test)]
mod tests {
    use quiltgrid::QuiltError;
    use quiltgrid::algorithm::annealing::{LayoutOptimizer, OptimizationConfig};
    use quiltgrid::analysis::descriptor::{PatternType, extract_descriptor};
    use quiltgrid::io::layout::{LayoutDocument, read_layout_json, write_layout_json};
    use quiltgrid::math::random::LcgRandom;
    use quiltgrid::spatial::{TilePool, TilePoolEntry};
    use std::fs;
    use tempfile::TempDir;

    fn sample_pool() -> TilePool {
        let mut pool = TilePool::new();
        let dark = extract_descriptor(&[20u8; 4 * 4 * 3], 4).expect("valid buffer");
        let light = extract_descriptor(&[220u8; 4 * 4 * 3], 4).expect("valid buffer");
        pool.push_entry(TilePoolEntry {
            descriptor: dark,
            count: 3,
            label: Some("denim.png".to_string()),
        });
        pool.push(light, 3);
        pool
    }

    fn sample_document(pool: &TilePool) -> LayoutDocument {
        let mut config = OptimizationConfig::default();
        config.schedule.max_iterations = 100;
        let optimizer = LayoutOptimizer::new(pool, 2, 3, config).expect("valid run");
        let outcome = optimizer.run(&mut LcgRandom::new(13)).expect("run completes");
        LayoutDocument::new(pool, &outcome, &config, Some(13))
    }

    // Tests the document mirrors the run and labels unnamed tiles by index
    #[test]
    fn test_document_captures_run() {
        let pool = sample_pool();

        let document = sample_document(&pool);

        assert_eq!((document.rows, document.cols), (2, 3));
        assert_eq!(document.seed, Some(13));
        assert_eq!(document.config.schedule.max_iterations, 100);
        let labels: Vec<&str> = document.tiles.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["denim.png", "tile-1"]);
        assert!(document.tiles.iter().all(|t| t.pattern_type == PatternType::Solid));
        assert!(document.best_energy <= document.initial_energy);
    }

    // Tests a written document reads back unchanged
    // Verified by dropping the layout field during serialization
    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("layout.json");
        let pool = sample_pool();
        let document = sample_document(&pool);

        write_layout_json(&document, &path).expect("writable");
        let restored = read_layout_json(&path).expect("readable");

        assert_eq!(restored.layout, document.layout);
        assert_eq!(restored.tiles, document.tiles);
        assert_eq!(restored.config, document.config);

        let text = fs::read_to_string(&path).expect("readable file");
        assert!(text.contains("\"pattern_type\": \"solid\""));
        assert!(text.contains("\"cooling_rate\""));
    }

    // Tests stored layouts naming missing tiles are rejected
    #[test]
    fn test_assignment_validates_indices() {
        let pool = sample_pool();
        let mut document = sample_document(&pool);
        assert!(document.assignment().is_ok());

        if let Some(cell) = document.layout.first_mut().and_then(|row| row.first_mut()) {
            *cell = 9;
        }
        assert!(matches!(
            document.assignment(),
            Err(QuiltError::InvalidTileIndex {
                index: 9,
                pool_size: 2
            })
        ));

        document.layout = vec![vec![0, 1], vec![1]];
        assert!(document.assignment().is_err());
    }

    #[test]
    fn test_read_layout_errors() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("layout.json");

        assert!(matches!(
            read_layout_json(&path),
            Err(QuiltError::FileSystem { .. })
        ));

        fs::write(&path, "[1, 2").expect("Failed to write file");
        assert!(matches!(
            read_layout_json(&path),
            Err(QuiltError::Serialization { .. })
        ));
    }
}
