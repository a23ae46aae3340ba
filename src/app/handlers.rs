use super::{
    events::{Event, FeatureStyle, RenderCommand},
    session::AppState,
};
use crate::{
    engine::{
        filter::{FilterEngine, FilterState},
        layers::LayerName,
        list_sync,
        selection::{PopupRequest, Selection},
    },
    geofile::feature::{FeatureId, TimeOfDay},
    store::feature_store::FeatureStore,
};

/// Result of handling one event: the state to continue with and what to tell the renderer.
pub type Transition = (AppState, Vec<RenderCommand>);

/// Route an event to its handler. The given state is never modified.
pub fn dispatch(
    store: &FeatureStore,
    engine: &mut FilterEngine,
    state: &AppState,
    event: &Event,
) -> Transition {
    log::debug!("Handling {:?}", event);
    match event {
        Event::CheckboxChange { time, checked } => {
            on_checkbox_change(store, engine, state, *time, *checked)
        }
        Event::LayerToggle { layer, checked } => on_layer_toggle(state, *layer, *checked),
        Event::MapClick { feature } => on_map_click(store, state, *feature),
        Event::ListItemClick { id } => on_list_item_click(store, state, *id),
        Event::PopupCloseClick => on_popup_close_click(state),
    }
}

/// Recompute visibility, styles and the list for `filter`. A selection whose feature is no
/// longer visible is dropped and the popup hidden.
pub fn apply_filter(
    store: &FeatureStore,
    engine: &mut FilterEngine,
    state: &AppState,
    filter: FilterState,
) -> Transition {
    let features = store.get_all();
    let visibility = engine.visibility(features, &filter).clone();

    let mut commands: Vec<RenderCommand> = features
        .iter()
        .map(|feature| RenderCommand::SetFeatureStyle {
            id: feature.id,
            style: if visibility.get(&feature.id).copied().unwrap_or(false) {
                FeatureStyle::Default
            } else {
                FeatureStyle::Hidden
            },
        })
        .collect();

    let panel = list_sync::render(&visibility, features);
    commands.push(RenderCommand::RenderList {
        entries: panel.entries().to_vec(),
    });
    commands.push(RenderCommand::SetPanelVisibility(panel.visibility()));

    let mut next = state.clone();
    if next.selection.reconcile(&visibility) {
        commands.push(RenderCommand::HidePopup);
    }
    log::info!(
        "Filter {:?}: {} of {} features visible",
        filter.active_times().collect::<Vec<_>>(),
        panel.entries().len(),
        features.len()
    );
    next.filter = filter;
    next.visibility = visibility;
    next.panel = panel;
    (next, commands)
}

fn on_checkbox_change(
    store: &FeatureStore,
    engine: &mut FilterEngine,
    state: &AppState,
    time: TimeOfDay,
    checked: bool,
) -> Transition {
    let filter = state.filter.toggled(time, checked);
    apply_filter(store, engine, state, filter)
}

/// Show or hide a layer. Hiding the traffic layer also closes the popup, since its feature is
/// no longer drawn. The boundary layer never affects the selection.
fn on_layer_toggle(state: &AppState, layer: LayerName, checked: bool) -> Transition {
    let mut next = state.clone();
    next.layers.set_visible(layer, checked);
    log::info!("Layer {} {}", layer, if checked { "shown" } else { "hidden" });
    let mut commands = vec![RenderCommand::SetLayerVisible {
        layer,
        visible: checked,
    }];
    if layer == LayerName::Traffic
        && !checked
        && matches!(next.selection.selection(), Selection::Selected(_))
    {
        next.selection.select_none();
        commands.push(RenderCommand::HidePopup);
    }
    (next, commands)
}

fn show_popup(request: PopupRequest) -> RenderCommand {
    RenderCommand::ShowPopup {
        content: request.content,
        position: request.position,
    }
}

fn on_map_click(store: &FeatureStore, state: &AppState, feature: Option<FeatureId>) -> Transition {
    let mut next = state.clone();
    let id = match feature {
        Some(id) => id,
        None => {
            next.selection.select_none();
            return (next, vec![RenderCommand::HidePopup]);
        }
    };
    if !state.is_drawn(id) {
        log::warn!("Ignoring click on feature {} which is not drawn", id);
        return (next, Vec::new());
    }
    match next.selection.select_feature(store, id) {
        Ok(request) => (next, vec![show_popup(request)]),
        Err(err) => {
            log::warn!("{}", err);
            (state.clone(), Vec::new())
        }
    }
}

fn on_list_item_click(store: &FeatureStore, state: &AppState, id: FeatureId) -> Transition {
    let mut next = state.clone();
    let entry = match state.panel.entries().iter().find(|entry| entry.id == id) {
        Some(entry) => entry,
        None => {
            log::warn!("Ignoring click on feature {} which is not listed", id);
            return (next, Vec::new());
        }
    };
    match entry.select(&mut next.selection, store) {
        Ok(request) => (next, vec![show_popup(request)]),
        Err(err) => {
            log::warn!("{}", err);
            (state.clone(), Vec::new())
        }
    }
}

fn on_popup_close_click(state: &AppState) -> Transition {
    let mut next = state.clone();
    next.selection.select_none();
    (next, vec![RenderCommand::HidePopup])
}
