use super::{
    filter::VisibilityMap,
    selection::{PopupRequest, SelectionController},
};
use crate::{
    error::SelectionError,
    geofile::feature::{Feature, FeatureId, TimeOfDay},
    store::feature_store::FeatureStore,
};

/// One row of the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: FeatureId,
    pub name: String,
    pub address: String,
    pub time_of_day: Option<TimeOfDay>,
}

impl From<&Feature> for ListEntry {
    fn from(feature: &Feature) -> Self {
        Self {
            id: feature.id,
            name: feature.name.clone(),
            address: feature.address.clone(),
            time_of_day: feature.time_of_day,
        }
    }
}

impl ListEntry {
    /// The action behind clicking this row.
    pub fn select(
        &self,
        controller: &mut SelectionController,
        store: &FeatureStore,
    ) -> Result<PopupRequest, SelectionError> {
        controller.select_feature(store, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelVisibility {
    Shown,
    #[default]
    Hidden,
}

/// Side panel contents, in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPanel {
    entries: Vec<ListEntry>,
}

impl ListPanel {
    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    /// An empty panel is hidden entirely.
    pub fn visibility(&self) -> PanelVisibility {
        if self.entries.is_empty() {
            PanelVisibility::Hidden
        } else {
            PanelVisibility::Shown
        }
    }
}

/// List the features marked visible, keeping the load order of `features`.
pub fn render(visibility: &VisibilityMap, features: &[Feature]) -> ListPanel {
    ListPanel {
        entries: features
            .iter()
            .filter(|feature| visibility.get(&feature.id).copied().unwrap_or(false))
            .map(ListEntry::from)
            .collect(),
    }
}
