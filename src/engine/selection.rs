use super::filter::VisibilityMap;
use crate::{
    error::SelectionError,
    geofile::feature::{Feature, FeatureId},
    store::feature_store::FeatureStore,
};

pub const POPUP_IMAGE_WIDTH: u32 = 200;

/// At most one active feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Selected(FeatureId),
}

/// What the detail popup shows for a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub address: String,
    pub image_ref: Option<String>,
}

impl From<&Feature> for PopupContent {
    fn from(feature: &Feature) -> Self {
        Self {
            title: feature.name.clone(),
            address: feature.address.clone(),
            image_ref: feature.image_ref.clone(),
        }
    }
}

impl PopupContent {
    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<h3>{}</h3>\n<p>{}</p>",
            escape_html(&self.title),
            escape_html(&self.address)
        );
        if let Some(image_ref) = &self.image_ref {
            html.push_str(&format!(
                "\n<img src=\"{}\" alt=\"Image\" width=\"{}\" />",
                escape_html(image_ref),
                POPUP_IMAGE_WIDTH
            ));
        }
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Popup request produced by a successful selection.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupRequest {
    pub content: PopupContent,
    pub position: geo::Point,
}

/// Holds the active selection. Every transition overwrites the previous one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionController {
    selection: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Select the feature with `id`. Unknown ids leave the selection unchanged.
    pub fn select_feature(
        &mut self,
        store: &FeatureStore,
        id: FeatureId,
    ) -> Result<PopupRequest, SelectionError> {
        let feature = store
            .get_by_id(id)
            .ok_or(SelectionError::UnknownFeature(id))?;
        self.selection = Selection::Selected(id);
        Ok(PopupRequest {
            content: PopupContent::from(feature),
            position: feature.location,
        })
    }

    pub fn select_none(&mut self) {
        self.selection = Selection::Idle;
    }

    /// Drop the selection if its feature is no longer visible. Returns whether it was dropped.
    pub fn reconcile(&mut self, visibility: &VisibilityMap) -> bool {
        match self.selection {
            Selection::Selected(id) if !visibility.get(&id).copied().unwrap_or(false) => {
                log::debug!("Feature {} was filtered out, clearing selection", id);
                self.selection = Selection::Idle;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PopupContent, Selection, SelectionController};
    use crate::{
        engine::filter::VisibilityMap,
        error::SelectionError,
        geofile::feature::{Feature, TimeOfDay},
        store::feature_store::FeatureStore,
    };

    fn store() -> FeatureStore {
        FeatureStore::from_features(
            vec![
                Feature::sample(1, Some(TimeOfDay::Morning)),
                Feature::sample(2, Some(TimeOfDay::Evening)),
            ],
            "test",
        )
        .unwrap()
    }

    #[test]
    fn test_select_feature_requests_popup() {
        let store = store();
        let mut controller = SelectionController::new();
        let request = controller.select_feature(&store, 2).unwrap();

        assert_eq!(controller.selection(), Selection::Selected(2));
        assert_eq!(request.content.title, "Place 2");
        assert_eq!(request.content.address, "Jalan 2");
        assert_eq!(request.position, store.get_by_id(2).unwrap().location);
    }

    #[test]
    fn test_select_unknown_feature_keeps_state() {
        let store = store();
        let mut controller = SelectionController::new();
        controller.select_feature(&store, 1).unwrap();

        let result = controller.select_feature(&store, 42);
        assert_eq!(result.unwrap_err(), SelectionError::UnknownFeature(42));
        assert_eq!(controller.selection(), Selection::Selected(1));
    }

    #[test]
    fn test_selection_overwrites_and_clears() {
        let store = store();
        let mut controller = SelectionController::new();
        controller.select_feature(&store, 1).unwrap();
        controller.select_feature(&store, 2).unwrap();
        assert_eq!(controller.selection(), Selection::Selected(2));

        controller.select_none();
        assert_eq!(controller.selection(), Selection::Idle);
        // The feature itself is untouched.
        assert!(store.get_by_id(2).is_some());
    }

    #[test]
    fn test_reconcile_drops_hidden_selection() {
        let store = store();
        let mut controller = SelectionController::new();
        controller.select_feature(&store, 2).unwrap();

        let visibility = VisibilityMap::from([(1, true), (2, true)]);
        assert!(!controller.reconcile(&visibility));
        assert_eq!(controller.selection(), Selection::Selected(2));

        let visibility = VisibilityMap::from([(1, true), (2, false)]);
        assert!(controller.reconcile(&visibility));
        assert_eq!(controller.selection(), Selection::Idle);
    }

    #[test]
    fn test_popup_html_escapes_attributes() {
        let content = PopupContent {
            title: "Simpang <Empat>".to_string(),
            address: "Jl. Sudirman & Jl. Riau".to_string(),
            image_ref: Some("img/a.jpg".to_string()),
        };
        assert_eq!(
            content.to_html(),
            "<h3>Simpang &lt;Empat&gt;</h3>\n<p>Jl. Sudirman &amp; Jl. Riau</p>\n\
             <img src=\"img/a.jpg\" alt=\"Image\" width=\"200\" />"
        );
    }

    #[test]
    fn test_popup_html_without_image() {
        let content = PopupContent::from(&Feature::sample(3, None));
        assert_eq!(content.to_html(), "<h3>Place 3</h3>\n<p>Jalan 3</p>");
    }
}
