//! Constellation line lists: JSON model and the segment resolver that joins
//! identifier sequences against resolved star positions.

pub mod model;
pub mod resolver;

pub use model::{Constellation, ConstellationError, load_constellations, parse_constellations};
pub use resolver::{ResolvedConstellation, ResolvedSky, resolve};
