use crate::{
    engine::{
        layers::LayerName,
        list_sync::{ListEntry, PanelVisibility},
        selection::PopupContent,
    },
    geofile::feature::{FeatureId, TimeOfDay},
};

/// User input, already resolved by the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CheckboxChange { time: TimeOfDay, checked: bool },
    LayerToggle { layer: LayerName, checked: bool },
    /// The rendered feature under the click, if any.
    MapClick { feature: Option<FeatureId> },
    ListItemClick { id: FeatureId },
    PopupCloseClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStyle {
    Default,
    Hidden,
}

/// One-way instruction to the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    CenterView { center: geo::Point, zoom: f64 },
    FitView { extent: geo::Rect },
    SetLayerVisible { layer: LayerName, visible: bool },
    SetFeatureStyle { id: FeatureId, style: FeatureStyle },
    RenderList { entries: Vec<ListEntry> },
    SetPanelVisibility(PanelVisibility),
    ShowPopup { content: PopupContent, position: geo::Point },
    HidePopup,
}
