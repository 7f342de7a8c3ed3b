//! Labels anchored to scene points, reprojected every frame.

use glam::{Mat4, Vec3};

use skywatch_catalog::NamedStar;
use skywatch_constellation::ResolvedSky;

use crate::project::project_to_screen;
use crate::visibility::OverlayVisibility;

/// What a label names, which also picks its marker color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelKind {
    Star,
    Constellation,
}

impl LabelKind {
    /// Marker color: warm white for stars, line blue for constellations.
    pub fn color(self) -> [f32; 3] {
        match self {
            LabelKind::Star => [1.0, 1.0, 0.9],
            LabelKind::Constellation => [0.4, 0.5, 1.0],
        }
    }
}

/// A label with a fixed scene-space anchor.
#[derive(Clone, Debug)]
pub struct Label {
    pub text: String,
    pub anchor: Vec3,
    pub kind: LabelKind,
}

/// A label placed in pixel coordinates for the current frame.
#[derive(Clone, Debug)]
pub struct PlacedLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub kind: LabelKind,
}

/// Assemble the static label set from bright named stars and resolved
/// constellation anchors.
pub fn build_labels(stars: &[NamedStar], sky: &ResolvedSky) -> Vec<Label> {
    let mut labels: Vec<Label> = stars
        .iter()
        .map(|star| Label {
            text: star.name.clone(),
            anchor: star.position,
            kind: LabelKind::Star,
        })
        .collect();

    for constellation in &sky.constellations {
        if let Some(anchor) = constellation.label_anchor {
            labels.push(Label {
                text: constellation.name.clone(),
                anchor,
                kind: LabelKind::Constellation,
            });
        }
    }

    labels
}

/// Project the label set for one frame.
///
/// Labels behind the camera are dropped; constellation labels are also
/// dropped while the overlay is toggled off.
pub fn place_labels(
    labels: &[Label],
    visibility: OverlayVisibility,
    view_proj: Mat4,
    viewport: (u32, u32),
) -> Vec<PlacedLabel> {
    labels
        .iter()
        .filter(|label| {
            label.kind != LabelKind::Constellation || visibility.show_constellations
        })
        .filter_map(|label| {
            project_to_screen(label.anchor, view_proj, viewport).map(|(x, y)| PlacedLabel {
                text: label.text.clone(),
                x,
                y,
                kind: label.kind,
            })
        })
        .collect()
}
