//! Catalog parsing: one pass over the delimited file builds the point set
//! and both side lookups.

use std::collections::HashMap;
use std::path::Path;

use glam::Vec3;
use tracing::{debug, info};

use crate::color::spectral_color;
use crate::position::position_from_equatorial;
use crate::record::StarRecord;

/// Errors that abort a whole catalog load. Individual malformed rows never
/// do; they are skipped and counted instead.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Failed to read the catalog file from disk.
    #[error("failed to read star catalog: {0}")]
    Read(#[source] std::io::Error),
}

/// A bright star with a proper name, kept for on-screen labeling.
#[derive(Clone, Debug)]
pub struct NamedStar {
    /// The proper name from the catalog (e.g. "Betelgeuse").
    pub name: String,
    /// Scene-space position.
    pub position: Vec3,
    /// Apparent magnitude, for diagnostics and ordering.
    pub magnitude: f64,
}

/// The product of a catalog load: point geometry plus lookups.
///
/// `positions` and `colors` are parallel arrays, one entry per accepted star.
pub struct StarCatalog {
    /// Scene-space star positions.
    pub positions: Vec<[f32; 3]>,
    /// Display color per star, derived from spectral class.
    pub colors: Vec<[f32; 3]>,
    /// Hipparcos number → position, for constellation line resolution.
    pub hip_positions: HashMap<u32, Vec3>,
    /// Bright named stars eligible for labels.
    pub labeled: Vec<NamedStar>,
    /// Rows rejected for missing/unparseable fields or by the magnitude cut.
    pub skipped: usize,
}

impl StarCatalog {
    /// Read and parse a catalog file.
    pub fn load(
        path: &Path,
        magnitude_limit: f64,
        label_magnitude_limit: f64,
    ) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(CatalogError::Read)?;
        let catalog = Self::parse(&text, magnitude_limit, label_magnitude_limit);
        info!(
            "Star catalog {}: {} stars, {} labeled, {} rows skipped",
            path.display(),
            catalog.len(),
            catalog.labeled.len(),
            catalog.skipped
        );
        Ok(catalog)
    }

    /// Parse catalog text. The first line is a header and is skipped.
    ///
    /// Rows fainter than `magnitude_limit` or with missing required fields
    /// are dropped. Stars brighter than `label_magnitude_limit` that carry a
    /// proper name are collected into [`StarCatalog::labeled`].
    pub fn parse(text: &str, magnitude_limit: f64, label_magnitude_limit: f64) -> Self {
        let mut positions = Vec::new();
        let mut colors = Vec::new();
        let mut hip_positions = HashMap::new();
        let mut labeled = Vec::new();
        let mut skipped = 0usize;

        for row in text.lines().skip(1) {
            if row.trim().is_empty() {
                continue;
            }
            let record = match StarRecord::from_row(row) {
                Ok(record) => record,
                Err(err) => {
                    debug!("Skipping catalog row: {err}");
                    skipped += 1;
                    continue;
                }
            };
            if record.magnitude > magnitude_limit {
                skipped += 1;
                continue;
            }

            let position =
                position_from_equatorial(record.ra_hours, record.dec_deg, record.distance);
            positions.push(position.to_array());
            colors.push(spectral_color(record.spectral.as_deref()));

            if let Some(hip) = record.hip {
                hip_positions.insert(hip, position);
            }
            if let Some(name) = record.proper
                && record.magnitude < label_magnitude_limit
            {
                labeled.push(NamedStar {
                    name,
                    position,
                    magnitude: record.magnitude,
                });
            }
        }

        Self {
            positions,
            colors,
            hip_positions,
            labeled,
            skipped,
        }
    }

    /// Number of stars in the point set.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no star survived the load.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Header plus five hand-picked rows: three bright named stars, one faint
    // unnamed star below the default cut, one row with a missing distance.
    const FIXTURE: &str = "\
id,hip,hd,hr,gl,bf,proper,ra,dec,dist,mag,absmag,pmra,pmdec,rv,ci,spect
32263,32349,48915,2491,Gl 244A,9Alp CMa,Sirius,6.752481,-16.716116,2.6371,-1.44,1.454,,,,0.009,A0m...
24378,24436,34085,1713,,19Bet Ori,Rigel,5.242298,-8.201638,264.5503,0.18,-6.932,,,,-0.03,B8Ia
27919,27989,39801,2061,,58Alp Ori,Betelgeuse,5.919529,7.407064,152.6718,0.45,-5.469,,,,1.5,M2Ib
90000,,,,,,,12.5,3.0,50.0,7.5,,,,,,G5
91000,91001,,,,,,14.0,10.0,,4.0,,,,,,K0
";

    fn parse_fixture() -> StarCatalog {
        StarCatalog::parse(FIXTURE, 7.0, 2.5)
    }

    #[test]
    fn test_fixture_counts_match_hand_computation() {
        let catalog = parse_fixture();
        // Three rows survive: the faint star fails the magnitude cut and the
        // distance-less row fails validation.
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.skipped, 2);
        assert_eq!(catalog.labeled.len(), 3);
        assert_eq!(catalog.hip_positions.len(), 3);
    }

    #[test]
    fn test_positions_and_colors_stay_parallel() {
        let catalog = parse_fixture();
        assert_eq!(catalog.positions.len(), catalog.colors.len());
    }

    #[test]
    fn test_magnitude_cut_excludes_everywhere() {
        let catalog = StarCatalog::parse(FIXTURE, 0.0, 2.5);
        // Only Sirius (mag -1.44) survives a cut at 0.0.
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.labeled.len(), 1);
        assert_eq!(catalog.labeled[0].name, "Sirius");
        assert_eq!(catalog.hip_positions.len(), 1);
        assert!(catalog.hip_positions.contains_key(&32349));
    }

    #[test]
    fn test_hip_map_matches_point_positions() {
        let catalog = parse_fixture();
        let sirius = catalog.hip_positions[&32349];
        assert_eq!(catalog.positions[0], sirius.to_array());
    }

    #[test]
    fn test_label_magnitude_threshold() {
        // With a label cut at 0.0 only Sirius is bright enough for a label,
        // but all three stars still render as points.
        let catalog = StarCatalog::parse(FIXTURE, 7.0, 0.0);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.labeled.len(), 1);
    }

    #[test]
    fn test_unnamed_stars_never_labeled() {
        let faint_cut_gone = StarCatalog::parse(FIXTURE, 10.0, 10.0);
        // The mag-7.5 star now loads but has no proper name.
        assert_eq!(faint_cut_gone.len(), 4);
        assert_eq!(faint_cut_gone.labeled.len(), 3);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = StarCatalog::parse("id,hip\n", 7.0, 2.5);
        assert!(catalog.is_empty());
        assert_eq!(catalog.skipped, 0);
    }

    #[test]
    fn test_betelgeuse_color_is_orange() {
        let catalog = parse_fixture();
        // Row order: Sirius, Rigel, Betelgeuse.
        let betelgeuse = catalog.colors[2];
        assert!(
            betelgeuse[0] > betelgeuse[2],
            "M-class star should lean orange: {betelgeuse:?}"
        );
    }
}
