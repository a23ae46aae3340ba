use thiserror::Error;

use crate::geofile::feature::FeatureId;

/// Failure to load a feature layer. The layer stays empty when this happens.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("Feature source {source_name} is unreachable: {reason}")]
    Unreachable { source_name: String, reason: String },

    #[error("Feature source {source_name} is malformed: {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("Feature source {source_name} contains duplicate feature id {id}")]
    DuplicateId { source_name: String, id: FeatureId },
}

impl LoadError {
    pub fn malformed(source_name: &str, reason: impl ToString) -> Self {
        LoadError::Malformed {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unreachable(source_name: &str, reason: impl ToString) -> Self {
        LoadError::Unreachable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Feature {0} does not exist in the feature store")]
    UnknownFeature(FeatureId),
}
