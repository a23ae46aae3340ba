use std::collections::HashMap;

use crate::{
    error::LoadError,
    geofile::{
        feature::{AttributeKeys, Feature, FeatureId},
        geojson::read_traffic_features,
        source::FeatureSource,
    },
};

/// All traffic features of a session, read-only after load.
#[derive(Debug, Default)]
pub struct FeatureStore {
    features: Vec<Feature>,
    index_by_id: HashMap<FeatureId, usize>,
}

impl FeatureStore {
    /// Store with no features, used when loading failed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from features in load order. Ids must be unique.
    pub fn from_features(features: Vec<Feature>, source_name: &str) -> Result<Self, LoadError> {
        let mut index_by_id = HashMap::with_capacity(features.len());
        for (index, feature) in features.iter().enumerate() {
            if index_by_id.insert(feature.id, index).is_some() {
                return Err(LoadError::DuplicateId {
                    source_name: source_name.to_string(),
                    id: feature.id,
                });
            }
        }
        Ok(Self {
            features,
            index_by_id,
        })
    }

    pub fn load(source: &FeatureSource, keys: &AttributeKeys) -> Result<Self, LoadError> {
        let features = read_traffic_features(source, keys)?;
        let store = Self::from_features(features, &source.to_string())?;
        log::info!("Loaded {} traffic features from {}", store.len(), source);
        Ok(store)
    }

    /// All features in load order.
    pub fn get_all(&self) -> &[Feature] {
        &self.features
    }

    pub fn get_by_id(&self, id: FeatureId) -> Option<&Feature> {
        self.index_by_id
            .get(&id)
            .map(|&index| &self.features[index])
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
