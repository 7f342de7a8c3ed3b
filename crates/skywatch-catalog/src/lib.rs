//! Star catalog loading: delimited rows in, point geometry and lookups out.
//!
//! One pass over the catalog file produces everything the rest of the viewer
//! needs: an interleaved position/color point set for the star field, a
//! HIP-number → position map for constellation resolution, and the short list
//! of bright named stars that receive on-screen labels.

pub mod catalog;
pub mod color;
pub mod position;
pub mod record;

pub use catalog::{CatalogError, NamedStar, StarCatalog};
pub use color::spectral_color;
pub use position::{DISTANCE_SCALE, position_from_equatorial};
pub use record::{RowError, StarRecord};
