use super::{
    events::{Event, RenderCommand},
    handlers::{apply_filter, dispatch},
};
use crate::{
    engine::{
        filter::{FilterEngine, FilterState, VisibilityMap},
        layers::{LayerName, LayerVisibility},
        list_sync::ListPanel,
        selection::SelectionController,
    },
    geofile::{feature::FeatureId, geojson::BoundaryLayer},
    store::feature_store::FeatureStore,
};

/// Everything the event handlers read and replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub filter: FilterState,
    pub visibility: VisibilityMap,
    pub panel: ListPanel,
    pub selection: SelectionController,
    pub layers: LayerVisibility,
}

impl AppState {
    pub fn is_visible(&self, id: FeatureId) -> bool {
        self.visibility.get(&id).copied().unwrap_or(false)
    }

    /// Whether the traffic feature is on the map, combining layer and filter visibility.
    pub fn is_drawn(&self, id: FeatureId) -> bool {
        self.layers.is_traffic_feature_drawn(self.is_visible(id))
    }
}

/// Initial map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub center: geo::Point,
    pub zoom: f64,
}

/// Owns the loaded layers and the application state for one map session.
#[derive(Debug)]
pub struct Session {
    store: FeatureStore,
    boundary: BoundaryLayer,
    engine: FilterEngine,
    state: AppState,
}

impl Session {
    pub fn new(store: FeatureStore, boundary: BoundaryLayer) -> Self {
        Self {
            store,
            boundary,
            engine: FilterEngine::new(),
            state: AppState::default(),
        }
    }

    /// Commands that set up the map before the first user event: view, layers, and the
    /// initial filter.
    pub fn start(&mut self, view: ViewSettings, initial_filter: FilterState) -> Vec<RenderCommand> {
        let mut commands = vec![RenderCommand::CenterView {
            center: view.center,
            zoom: view.zoom,
        }];
        if let Some(extent) = self.boundary.extent() {
            commands.push(RenderCommand::FitView { extent });
        }
        for layer in [LayerName::Boundary, LayerName::Traffic] {
            commands.push(RenderCommand::SetLayerVisible {
                layer,
                visible: self.state.layers.is_visible(layer),
            });
        }
        let (state, filter_commands) =
            apply_filter(&self.store, &mut self.engine, &self.state, initial_filter);
        self.state = state;
        commands.extend(filter_commands);
        commands
    }

    pub fn dispatch(&mut self, event: &Event) -> Vec<RenderCommand> {
        let (state, commands) = dispatch(&self.store, &mut self.engine, &self.state, event);
        self.state = state;
        commands
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }
}
