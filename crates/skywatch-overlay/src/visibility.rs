//! Overlay visibility state.

/// Which overlay elements are currently shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayVisibility {
    /// Constellation lines and their labels.
    pub show_constellations: bool,
}

impl Default for OverlayVisibility {
    fn default() -> Self {
        Self {
            show_constellations: true,
        }
    }
}

impl OverlayVisibility {
    /// Flip the constellation overlay and return the new state.
    pub fn toggle_constellations(&mut self) -> bool {
        self.show_constellations = !self.show_constellations;
        self.show_constellations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shows_constellations() {
        assert!(OverlayVisibility::default().show_constellations);
    }

    #[test]
    fn test_toggle_round_trips() {
        let mut vis = OverlayVisibility::default();
        assert!(!vis.toggle_constellations());
        assert!(vis.toggle_constellations());
    }
}
