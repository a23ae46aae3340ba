use std::collections::HashMap;

use super::events::{FeatureStyle, RenderCommand};
use crate::{
    engine::{
        layers::LayerName,
        list_sync::{ListEntry, PanelVisibility},
        selection::PopupContent,
    },
    geofile::feature::FeatureId,
};

/// Consumer of render commands, e.g. a map widget.
pub trait MapRenderer {
    fn apply(&mut self, command: &RenderCommand);

    fn apply_all(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            self.apply(command);
        }
    }
}

/// Keeps the last state the commands described and logs every change.
///
/// A traffic feature counts as drawn only if the traffic layer is visible and its own style is
/// not hidden, so whole-layer toggles and per-feature filtering compose here.
#[derive(Debug, Default)]
pub struct MapSurface {
    view: Option<(geo::Point, f64)>,
    extent: Option<geo::Rect>,
    layers: HashMap<LayerName, bool>,
    feature_styles: HashMap<FeatureId, FeatureStyle>,
    list: Vec<ListEntry>,
    panel: PanelVisibility,
    popup: Option<(PopupContent, geo::Point)>,
}

impl MapRenderer for MapSurface {
    fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::CenterView { center, zoom } => {
                log::info!("Centering view on ({}, {}) at zoom {}", center.x(), center.y(), zoom);
                self.view = Some((*center, *zoom));
            }
            RenderCommand::FitView { extent } => {
                log::info!("Fitting view to extent {:?}", extent);
                self.extent = Some(*extent);
            }
            RenderCommand::SetLayerVisible { layer, visible } => {
                log::debug!("Layer {} visible: {}", layer, visible);
                self.layers.insert(*layer, *visible);
            }
            RenderCommand::SetFeatureStyle { id, style } => {
                self.feature_styles.insert(*id, *style);
            }
            RenderCommand::RenderList { entries } => {
                log::debug!("Rendering {} list entries", entries.len());
                self.list = entries.clone();
            }
            RenderCommand::SetPanelVisibility(panel) => {
                log::debug!("Side panel {:?}", panel);
                self.panel = *panel;
            }
            RenderCommand::ShowPopup { content, position } => {
                log::info!(
                    "Popup at ({}, {}): {} / {}",
                    position.x(),
                    position.y(),
                    content.title,
                    content.address
                );
                log::debug!("Popup content:\n{}", content.to_html());
                self.popup = Some((content.clone(), *position));
            }
            RenderCommand::HidePopup => {
                if self.popup.take().is_some() {
                    log::info!("Popup hidden");
                }
            }
        }
    }
}

impl MapSurface {
    pub fn view(&self) -> Option<(geo::Point, f64)> {
        self.view
    }

    pub fn extent(&self) -> Option<geo::Rect> {
        self.extent
    }

    /// Layers are visible until told otherwise.
    pub fn is_layer_visible(&self, layer: LayerName) -> bool {
        self.layers.get(&layer).copied().unwrap_or(true)
    }

    pub fn is_drawn(&self, id: FeatureId) -> bool {
        self.is_layer_visible(LayerName::Traffic)
            && self.feature_styles.get(&id).copied().unwrap_or(FeatureStyle::Default)
                == FeatureStyle::Default
    }

    /// Ids of the traffic features currently on the map, sorted.
    pub fn drawn_features(&self) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self
            .feature_styles
            .keys()
            .copied()
            .filter(|id| self.is_drawn(*id))
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn list(&self) -> &[ListEntry] {
        &self.list
    }

    pub fn panel(&self) -> PanelVisibility {
        self.panel
    }

    pub fn popup(&self) -> Option<(&PopupContent, geo::Point)> {
        self.popup
            .as_ref()
            .map(|(content, position)| (content, *position))
    }
}
