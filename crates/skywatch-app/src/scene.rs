//! Scene assembly: load the datasets, resolve constellations, and build the
//! label set. A missing dataset degrades to an emptier scene, never a crash.

use skywatch_catalog::StarCatalog;
use skywatch_config::Config;
use skywatch_constellation::{ResolvedSky, load_constellations, resolve};
use skywatch_overlay::{Label, StatusFeed, StatusLine, build_labels};

/// Everything derived from the on-disk datasets.
pub struct SceneData {
    pub catalog: StarCatalog,
    pub sky: ResolvedSky,
    pub labels: Vec<Label>,
    pub status: StatusLine,
    pub feed: StatusFeed,
}

impl SceneData {
    /// Load and join the star catalog and constellation lines.
    pub fn load(config: &Config) -> Self {
        let mut feed = StatusFeed::new();

        feed.push("Loading star catalog...");
        let catalog = match StarCatalog::load(
            &config.data.star_catalog_path(),
            config.sky.magnitude_limit,
            config.sky.label_magnitude_limit,
        ) {
            Ok(catalog) => {
                feed.push(format!("Star catalog: {} stars", catalog.len()));
                catalog
            }
            Err(err) => {
                feed.push(format!("Star catalog unavailable: {err}"));
                StarCatalog::parse("", config.sky.magnitude_limit, config.sky.label_magnitude_limit)
            }
        };

        feed.push("Loading constellation lines...");
        let constellations = match load_constellations(&config.data.constellation_lines_path()) {
            Ok(constellations) => constellations,
            Err(err) => {
                feed.push(format!("Constellation lines unavailable: {err}"));
                Vec::new()
            }
        };
        let sky = resolve(&constellations, &catalog.hip_positions);
        if !sky.missing.is_empty() {
            feed.push(format!(
                "{} constellation star ids unresolved: {:?}",
                sky.missing.len(),
                sky.missing
            ));
        }

        let labels = build_labels(&catalog.labeled, &sky);
        let status = StatusLine {
            star_count: catalog.len(),
            constellation_count: sky.constellations.len(),
            segment_count: sky.segment_count,
            missing_count: sky.missing.len(),
        };
        feed.push(status.summary());

        Self {
            catalog,
            sky,
            labels,
            status,
            feed,
        }
    }

    /// All segments flattened for the line renderer.
    pub fn all_segments(&self) -> Vec<[glam::Vec3; 2]> {
        self.sky
            .constellations
            .iter()
            .flat_map(|c| c.segments.iter().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_datasets_degrade_to_empty_scene() {
        let mut config = Config::default();
        config.data.data_dir = PathBuf::from("/nonexistent");
        let scene = SceneData::load(&config);
        assert!(scene.catalog.is_empty());
        assert!(scene.sky.constellations.is_empty());
        assert!(scene.labels.is_empty());
        assert_eq!(scene.status.star_count, 0);
        assert!(
            scene
                .feed
                .lines()
                .iter()
                .any(|line| line.contains("unavailable")),
            "load failures should surface in the status feed"
        );
    }
}
