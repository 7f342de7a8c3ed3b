//! A single validated star catalog row.

/// Column positions in the HYG-style delimited catalog.
mod col {
    pub const ID: usize = 0;
    pub const HIP: usize = 1;
    pub const PROPER: usize = 6;
    pub const RA: usize = 7;
    pub const DEC: usize = 8;
    pub const DIST: usize = 9;
    pub const MAG: usize = 10;
    pub const SPECT: usize = 16;
}

/// Why a row was rejected during parsing.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RowError {
    /// A required field was empty or absent.
    #[error("missing required field '{0}'")]
    Missing(&'static str),

    /// A required numeric field did not parse.
    #[error("field '{field}' is not a number: '{value}'")]
    NotANumber {
        field: &'static str,
        value: String,
    },
}

/// One validated row of the star catalog.
///
/// Right ascension is kept in hours and declination in degrees, exactly as
/// the catalog stores them; conversion to a spatial position happens once in
/// [`crate::position::position_from_equatorial`].
#[derive(Clone, Debug, PartialEq)]
pub struct StarRecord {
    /// Catalog row id.
    pub id: u64,
    /// Hipparcos number, when the star appears in that catalog.
    pub hip: Option<u32>,
    /// Proper name (e.g. "Sirius"), when one exists.
    pub proper: Option<String>,
    /// Right ascension in hours [0, 24).
    pub ra_hours: f64,
    /// Declination in degrees [-90, 90].
    pub dec_deg: f64,
    /// Distance in catalog units (parsecs).
    pub distance: f64,
    /// Apparent magnitude; lower is brighter.
    pub magnitude: f64,
    /// Spectral class string (e.g. "G2V"), when present.
    pub spectral: Option<String>,
}

impl StarRecord {
    /// Parse one delimited catalog row.
    ///
    /// Rows missing any of ra/dec/dist/mag are rejected; the identifier,
    /// proper name, and spectral class are optional.
    pub fn from_row(row: &str) -> Result<Self, RowError> {
        let fields: Vec<&str> = row.split(',').collect();

        let required = |idx: usize, name: &'static str| -> Result<f64, RowError> {
            let raw = fields.get(idx).map(|s| s.trim()).unwrap_or("");
            if raw.is_empty() {
                return Err(RowError::Missing(name));
            }
            raw.parse::<f64>().map_err(|_| RowError::NotANumber {
                field: name,
                value: raw.to_string(),
            })
        };
        let optional = |idx: usize| -> Option<String> {
            fields
                .get(idx)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let ra_hours = required(col::RA, "ra")?;
        let dec_deg = required(col::DEC, "dec")?;
        let distance = required(col::DIST, "dist")?;
        let magnitude = required(col::MAG, "mag")?;

        let id = fields
            .get(col::ID)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or(RowError::Missing("id"))?;
        let hip = fields
            .get(col::HIP)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<u32>().ok());

        Ok(Self {
            id,
            hip,
            proper: optional(col::PROPER),
            ra_hours,
            dec_deg,
            distance,
            magnitude,
            spectral: optional(col::SPECT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // id,hip,hd,hr,gl,bf,proper,ra,dec,dist,mag,absmag,pmra,pmdec,rv,ci,spect
    const SIRIUS: &str = "32263,32349,48915,2491,Gl 244A,9Alp CMa,Sirius,6.752481,-16.716116,2.6371,-1.44,1.454,-546.01,-1223.08,-9.4,0.009,A0m...";

    #[test]
    fn test_full_row_parses() {
        let record = StarRecord::from_row(SIRIUS).unwrap();
        assert_eq!(record.id, 32263);
        assert_eq!(record.hip, Some(32349));
        assert_eq!(record.proper.as_deref(), Some("Sirius"));
        assert!((record.ra_hours - 6.752481).abs() < 1e-9);
        assert!((record.dec_deg + 16.716116).abs() < 1e-9);
        assert!((record.distance - 2.6371).abs() < 1e-9);
        assert!((record.magnitude + 1.44).abs() < 1e-9);
        assert_eq!(record.spectral.as_deref(), Some("A0m..."));
    }

    #[test]
    fn test_missing_ra_rejected() {
        let row = "1,2,,,,,,,-16.7,2.6,1.0,,,,,,";
        assert_eq!(StarRecord::from_row(row), Err(RowError::Missing("ra")));
    }

    #[test]
    fn test_missing_magnitude_rejected() {
        let row = "1,2,,,,,,6.7,-16.7,2.6,,,,,,,";
        assert_eq!(StarRecord::from_row(row), Err(RowError::Missing("mag")));
    }

    #[test]
    fn test_garbage_number_rejected() {
        let row = "1,2,,,,,,abc,-16.7,2.6,1.0,,,,,,";
        assert!(matches!(
            StarRecord::from_row(row),
            Err(RowError::NotANumber { field: "ra", .. })
        ));
    }

    #[test]
    fn test_hip_and_name_optional() {
        let row = "7,,,,,,,0.021412,38.859279,202.4291,6.18,,,,,,K0";
        let record = StarRecord::from_row(row).unwrap();
        assert_eq!(record.hip, None);
        assert_eq!(record.proper, None);
        assert_eq!(record.spectral.as_deref(), Some("K0"));
    }

    #[test]
    fn test_short_row_rejected_not_panicking() {
        assert!(StarRecord::from_row("42").is_err());
        assert!(StarRecord::from_row("").is_err());
    }
}
