use anyhow::Context;
use serde::Deserialize;
use std::{fs::read_to_string, path::Path};

use super::{events::Event, hit_test::HitIndex};
use crate::{
    engine::layers::LayerName,
    geofile::feature::{FeatureId, TimeOfDay},
};

/// One recorded user interaction. Map clicks carry a map coordinate that still has to be
/// resolved against the drawn features.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptStep {
    CheckboxChange { time: TimeOfDay, checked: bool },
    LayerToggle { layer: LayerName, checked: bool },
    MapClick { lon: f64, lat: f64 },
    ListItemClick { id: FeatureId },
    PopupCloseClick,
}

impl ScriptStep {
    pub fn resolve(&self, hit_index: &HitIndex) -> Event {
        match self {
            ScriptStep::CheckboxChange { time, checked } => Event::CheckboxChange {
                time: *time,
                checked: *checked,
            },
            ScriptStep::LayerToggle { layer, checked } => Event::LayerToggle {
                layer: *layer,
                checked: *checked,
            },
            ScriptStep::MapClick { lon, lat } => Event::MapClick {
                feature: hit_index.feature_at(geo::Coord { x: *lon, y: *lat }),
            },
            ScriptStep::ListItemClick { id } => Event::ListItemClick { id: *id },
            ScriptStep::PopupCloseClick => Event::PopupCloseClick,
        }
    }
}

pub fn read_script(filepath: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let contents = read_to_string(filepath)
        .with_context(|| format!("Reading event script {:?}", filepath))?;
    let steps: Vec<ScriptStep> = serde_yaml::from_str(&contents)
        .with_context(|| format!("Parsing event script {:?}", filepath))?;
    log::info!("Read {} events from {:?}", steps.len(), filepath);
    Ok(steps)
}
