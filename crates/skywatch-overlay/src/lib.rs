//! Screen-space overlay: per-frame label projection, the status readout,
//! and the constellation visibility toggle.

pub mod label;
pub mod project;
pub mod status;
pub mod visibility;

pub use label::{Label, LabelKind, PlacedLabel, build_labels, place_labels};
pub use project::project_to_screen;
pub use status::{StatusFeed, StatusLine};
pub use visibility::OverlayVisibility;
