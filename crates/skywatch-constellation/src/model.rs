//! The on-disk constellation document.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

/// Errors that abort a constellation load.
#[derive(Debug, thiserror::Error)]
pub enum ConstellationError {
    /// Failed to read the constellation file from disk.
    #[error("failed to read constellation lines: {0}")]
    Read(#[source] std::io::Error),

    /// The JSON document did not match the expected shape.
    #[error("failed to parse constellation lines: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One constellation: a name and an ordered walk of star identifiers.
///
/// Consecutive identifiers describe connected line segments. The same
/// identifier may appear more than once when the figure revisits a star.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Constellation {
    /// Display name (e.g. "Orion").
    pub name: String,
    /// Ordered Hipparcos numbers tracing the figure.
    pub lines: Vec<u32>,
}

/// Parse a JSON array of constellations.
pub fn parse_constellations(text: &str) -> Result<Vec<Constellation>, ConstellationError> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a constellation file.
pub fn load_constellations(path: &Path) -> Result<Vec<Constellation>, ConstellationError> {
    let text = std::fs::read_to_string(path).map_err(ConstellationError::Read)?;
    let constellations = parse_constellations(&text)?;
    info!(
        "Constellation lines {}: {} constellations",
        path.display(),
        constellations.len()
    );
    Ok(constellations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let text = r#"[
            {"name": "Orion", "lines": [26727, 27989, 25336]},
            {"name": "Cassiopeia", "lines": [746, 3179, 4427, 6686, 8886]}
        ]"#;
        let constellations = parse_constellations(text).unwrap();
        assert_eq!(constellations.len(), 2);
        assert_eq!(constellations[0].name, "Orion");
        assert_eq!(constellations[1].lines.len(), 5);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_constellations("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(parse_constellations(r#"{"name": "not a list"}"#).is_err());
        assert!(parse_constellations("[{\"name\": 3}]").is_err());
    }
}
