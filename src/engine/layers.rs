use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerName {
    Boundary,
    Traffic,
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerName::Boundary => write!(f, "boundary"),
            LayerName::Traffic => write!(f, "traffic"),
        }
    }
}

/// Whole-layer visibility toggles. Independent of per-feature filtering; a traffic feature is
/// drawn only when the traffic layer is visible and the filter marks the feature visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerVisibility {
    boundary_visible: bool,
    traffic_visible: bool,
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            boundary_visible: true,
            traffic_visible: true,
        }
    }
}

impl LayerVisibility {
    pub fn set_visible(&mut self, layer: LayerName, visible: bool) {
        match layer {
            LayerName::Boundary => self.boundary_visible = visible,
            LayerName::Traffic => self.traffic_visible = visible,
        }
    }

    pub fn is_visible(&self, layer: LayerName) -> bool {
        match layer {
            LayerName::Boundary => self.boundary_visible,
            LayerName::Traffic => self.traffic_visible,
        }
    }

    /// Whether a traffic feature with the given filter visibility ends up on the map.
    pub fn is_traffic_feature_drawn(&self, filter_visible: bool) -> bool {
        self.traffic_visible && filter_visible
    }
}
