use std::collections::{BTreeSet, HashMap};

use crate::geofile::feature::{Feature, FeatureId, TimeOfDay};

/// Visibility decision per feature id.
pub type VisibilityMap = HashMap<FeatureId, bool>;

/// The set of time-of-day predicates the user has checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterState {
    active_times: BTreeSet<TimeOfDay>,
}

impl FilterState {
    /// No time checked.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every time checked.
    pub fn full() -> Self {
        Self::from_times(TimeOfDay::ALL)
    }

    pub fn from_times(times: impl IntoIterator<Item = TimeOfDay>) -> Self {
        Self {
            active_times: times.into_iter().collect(),
        }
    }

    pub fn active_times(&self) -> impl Iterator<Item = TimeOfDay> + '_ {
        self.active_times.iter().copied()
    }

    /// New state with `time` checked or unchecked. The current state is left as is.
    pub fn toggled(&self, time: TimeOfDay, checked: bool) -> Self {
        let mut active_times = self.active_times.clone();
        if checked {
            active_times.insert(time);
        } else {
            active_times.remove(&time);
        }
        Self { active_times }
    }

    /// Nothing checked and everything checked both mean no filtering.
    pub fn is_show_all(&self) -> bool {
        self.active_times.is_empty() || self.active_times.len() == TimeOfDay::ALL.len()
    }

    /// Whether a feature observed at `time` passes this filter. A missing time only passes
    /// under the show-all rule.
    pub fn matches(&self, time: Option<TimeOfDay>) -> bool {
        if self.is_show_all() {
            return true;
        }
        match time {
            Some(time) => self.active_times.contains(&time),
            None => false,
        }
    }
}

pub fn compute_visibility(features: &[Feature], filter: &FilterState) -> VisibilityMap {
    features
        .iter()
        .map(|feature| (feature.id, filter.matches(feature.time_of_day)))
        .collect()
}

/// Memoizes `compute_visibility` per filter state. Only valid for a single, unchanging feature set.
#[derive(Debug, Default)]
pub struct FilterEngine {
    cache: HashMap<FilterState, VisibilityMap>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visibility(&mut self, features: &[Feature], filter: &FilterState) -> &VisibilityMap {
        self.cache.entry(filter.clone()).or_insert_with(|| {
            log::debug!("Computing visibility for filter {:?}", filter);
            compute_visibility(features, filter)
        })
    }

    #[cfg(test)]
    pub(crate) fn cached_states(&self) -> usize {
        self.cache.len()
    }
}
