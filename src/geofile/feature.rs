use std::fmt;

use geojson::JsonValue;
use serde::Deserialize;

use crate::error::LoadError;

pub type FeatureId = u64;

pub const DEFAULT_NAME: &str = "Unknown Place";
pub const DEFAULT_ADDRESS: &str = "No Address Available";

/// Time of day at which congestion was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Midday,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// The value used for this time in the source data.
    pub fn source_value(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "pagi",
            TimeOfDay::Midday => "siang",
            TimeOfDay::Evening => "sore",
            TimeOfDay::Night => "malam",
        }
    }

    /// Exact match against the source values, anything else is not a time of day.
    pub fn from_source_value(value: &str) -> Option<Self> {
        TimeOfDay::ALL
            .into_iter()
            .find(|time| time.source_value() == value)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        };
        write!(f, "{}", name)
    }
}

/// Names of the GeoJSON properties a traffic feature is read from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AttributeKeys {
    pub name: String,
    pub address: String,
    pub image_ref: String,
    pub time_of_day: String,
}

impl Default for AttributeKeys {
    fn default() -> Self {
        Self {
            name: "Nama Tempat".to_string(),
            address: "Alamat".to_string(),
            image_ref: "gmbr".to_string(),
            time_of_day: "waktuMacet".to_string(),
        }
    }
}

/// One traffic congestion point. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub name: String,
    pub address: String,
    pub image_ref: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
    pub location: geo::Point,
}

/// The id stored in a GeoJSON feature, if it has one. Numbers and numeric strings are accepted.
pub fn explicit_id(
    feature: &geojson::Feature,
    source_name: &str,
) -> Result<Option<FeatureId>, LoadError> {
    match &feature.id {
        None => Ok(None),
        Some(geojson::feature::Id::Number(number)) => number.as_u64().map(Some).ok_or_else(|| {
            LoadError::malformed(source_name, format!("invalid feature id {}", number))
        }),
        Some(geojson::feature::Id::String(id)) => id.parse().map(Some).map_err(|_| {
            LoadError::malformed(source_name, format!("invalid feature id '{}'", id))
        }),
    }
}

impl Feature {
    /// Convert a GeoJSON feature with an already assigned id. Returns `None` for features
    /// without point geometry.
    pub fn from_geojson(
        feature: &geojson::Feature,
        id: FeatureId,
        keys: &AttributeKeys,
    ) -> Option<Self> {
        let location = match feature.geometry.as_ref().map(|geometry| &geometry.value) {
            Some(geojson::Value::Point(position)) if position.len() >= 2 => {
                geo::Point::new(position[0], position[1])
            }
            _ => return None,
        };
        let property = |key: &str| -> Option<String> {
            feature
                .properties
                .as_ref()
                .and_then(|properties| properties.get(key))
                .and_then(property_as_text)
        };

        Some(Self {
            id,
            name: property(&keys.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            address: property(&keys.address).unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            image_ref: property(&keys.image_ref),
            time_of_day: property(&keys.time_of_day)
                .and_then(|value| TimeOfDay::from_source_value(&value)),
            location,
        })
    }
}

/// Text of a property value. Null, empty strings and structured values count as absent.
fn property_as_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) if !text.is_empty() => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
impl Feature {
    pub(crate) fn sample(id: FeatureId, time_of_day: Option<TimeOfDay>) -> Self {
        Self {
            id,
            name: format!("Place {}", id),
            address: format!("Jalan {}", id),
            image_ref: None,
            time_of_day,
            location: geo::Point::new(101.44 + id as f64 * 0.01, 0.5),
        }
    }
}
