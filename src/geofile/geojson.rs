use geo::BoundingRect;
use rayon::prelude::*;
use std::collections::HashSet;

use super::{
    feature::{explicit_id, AttributeKeys, Feature, FeatureId},
    source::FeatureSource,
};
use crate::error::LoadError;

/// Parse a GeoJSON document into a feature collection. A lone feature becomes a collection of one.
pub fn parse_feature_collection(
    contents: &str,
    source_name: &str,
) -> Result<geojson::FeatureCollection, LoadError> {
    let geojson_contents: geojson::GeoJson = contents
        .parse()
        .map_err(|err| LoadError::malformed(source_name, err))?;
    match geojson_contents {
        geojson::GeoJson::FeatureCollection(collection) => Ok(collection),
        geojson::GeoJson::Feature(feature) => Ok(geojson::FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }),
        geojson::GeoJson::Geometry(_) => Err(LoadError::malformed(
            source_name,
            "expected a Feature or FeatureCollection, found a bare Geometry",
        )),
    }
}

/// Ids for all features in load order. Explicit ids are kept; features without one get the
/// smallest ids not taken by any explicit id, so the two never collide.
pub fn assign_feature_ids(
    features: &[geojson::Feature],
    source_name: &str,
) -> Result<Vec<FeatureId>, LoadError> {
    let explicit_ids = features
        .iter()
        .map(|feature| explicit_id(feature, source_name))
        .collect::<Result<Vec<Option<FeatureId>>, LoadError>>()?;
    let taken: HashSet<FeatureId> = explicit_ids.iter().flatten().copied().collect();
    let mut next_free: FeatureId = 0;
    Ok(explicit_ids
        .into_iter()
        .map(|id| {
            id.unwrap_or_else(|| {
                while taken.contains(&next_free) {
                    next_free += 1;
                }
                next_free += 1;
                next_free - 1
            })
        })
        .collect())
}

/// Read the traffic point layer. Features are returned in load order.
pub fn read_traffic_features(
    source: &FeatureSource,
    keys: &AttributeKeys,
) -> Result<Vec<Feature>, LoadError> {
    let source_name = source.to_string();
    let collection = parse_feature_collection(&source.fetch()?, &source_name)?;
    let num_features = collection.features.len();
    let ids = assign_feature_ids(&collection.features, &source_name)?;
    let features: Vec<Feature> = collection
        .features
        .par_iter()
        .zip(ids.par_iter())
        .filter_map(|(feature, id)| Feature::from_geojson(feature, *id, keys))
        .collect();
    if features.len() != num_features {
        log::warn!(
            "Out of {} features read from {}, only {} were Points.",
            num_features,
            source_name,
            features.len()
        )
    }
    Ok(features)
}

/// Geometries of the city boundary layer.
#[derive(Debug, Default, Clone)]
pub struct BoundaryLayer {
    pub geometries: Vec<geo::Geometry>,
}

impl BoundaryLayer {
    /// Bounding rectangle of all geometries, `None` for an empty layer.
    pub fn extent(&self) -> Option<geo::Rect> {
        self.geometries
            .iter()
            .filter_map(|geometry| geometry.bounding_rect())
            .reduce(|extent, rect| {
                geo::Rect::new(
                    geo::Coord {
                        x: extent.min().x.min(rect.min().x),
                        y: extent.min().y.min(rect.min().y),
                    },
                    geo::Coord {
                        x: extent.max().x.max(rect.max().x),
                        y: extent.max().y.max(rect.max().y),
                    },
                )
            })
    }
}

/// Read the boundary polygon layer. Features without geometry are skipped.
pub fn read_boundary(source: &FeatureSource) -> Result<BoundaryLayer, LoadError> {
    let source_name = source.to_string();
    let collection = parse_feature_collection(&source.fetch()?, &source_name)?;
    let geometries = collection
        .features
        .into_iter()
        .filter_map(|feature| feature.geometry)
        .map(|geometry| {
            geo::Geometry::<f64>::try_from(geometry)
                .map_err(|err| LoadError::malformed(&source_name, err))
        })
        .collect::<Result<Vec<geo::Geometry>, LoadError>>()?;
    log::info!(
        "Read {} boundary geometries from {}",
        geometries.len(),
        source_name
    );
    Ok(BoundaryLayer { geometries })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use testdir::testdir;

    use super::{
        assign_feature_ids, parse_feature_collection, read_boundary, read_traffic_features,
    };
    use crate::{
        error::LoadError,
        geofile::{
            feature::{AttributeKeys, TimeOfDay},
            source::FeatureSource,
        },
    };

    const TRAFFIC_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [101.44, 0.50]},
             "properties": {"Nama Tempat": "A", "waktuMacet": "pagi"}},
            {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]},
             "properties": {}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [101.46, 0.52]},
             "properties": {"Nama Tempat": "C", "waktuMacet": "malam"}}
        ]
    }"#;

    #[test]
    fn test_read_traffic_features_keeps_load_order() {
        let test_dir = testdir!();
        let filepath = test_dir.join("macet.json");
        fs::write(&filepath, TRAFFIC_GEOJSON).unwrap();

        let features =
            read_traffic_features(&FeatureSource::File(filepath), &AttributeKeys::default())
                .unwrap();

        // The LineString is skipped, id-less features are numbered in load order.
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, 0);
        assert_eq!(features[0].name, "A");
        assert_eq!(features[0].time_of_day, Some(TimeOfDay::Morning));
        assert_eq!(features[1].id, 2);
        assert_eq!(features[1].name, "C");
        assert_eq!(features[1].time_of_day, Some(TimeOfDay::Night));
    }

    fn point_feature(id: Option<u64>) -> String {
        let id = id.map(|id| format!(r#""id": {}, "#, id)).unwrap_or_default();
        format!(
            r#"{{"type": "Feature", {}"geometry": {{"type": "Point", "coordinates": [101.4, 0.5]}}, "properties": {{}}}}"#,
            id
        )
    }

    fn collection_of(ids: &[Option<u64>]) -> String {
        let features: Vec<String> = ids.iter().map(|id| point_feature(*id)).collect();
        format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features.join(", ")
        )
    }

    #[rstest]
    #[case(vec![Some(1), None], vec![1, 0])]
    #[case(vec![None, Some(0)], vec![1, 0])]
    #[case(vec![None, Some(1), None, Some(0), None], vec![2, 1, 3, 0, 4])]
    #[case(vec![None, None], vec![0, 1])]
    #[case(vec![Some(7), Some(3)], vec![7, 3])]
    fn test_assign_feature_ids_avoids_explicit_ids(
        #[case] explicit: Vec<Option<u64>>,
        #[case] expected: Vec<u64>,
    ) {
        let collection = parse_feature_collection(&collection_of(&explicit), "test").unwrap();
        assert_eq!(
            assign_feature_ids(&collection.features, "test").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let result = parse_feature_collection("{ not json", "broken.json");
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_parse_rejects_bare_geometry() {
        let result =
            parse_feature_collection(r#"{"type": "Point", "coordinates": [1.0, 2.0]}"#, "x");
        assert!(matches!(result, Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn test_parse_accepts_single_feature() {
        let collection = parse_feature_collection(
            r#"{"type": "Feature", "geometry": null, "properties": {}}"#,
            "x",
        )
        .unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn test_read_boundary_extent() {
        let test_dir = testdir!();
        let filepath = test_dir.join("polygonpku.json");
        fs::write(
            &filepath,
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon",
                     "coordinates": [[[101.3, 0.4], [101.5, 0.4], [101.5, 0.6], [101.3, 0.6], [101.3, 0.4]]]}},
                    {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon",
                     "coordinates": [[[101.4, 0.5], [101.6, 0.5], [101.6, 0.7], [101.4, 0.5]]]}}
                ]
            }"#,
        )
        .unwrap();

        let boundary = read_boundary(&FeatureSource::File(filepath)).unwrap();
        assert_eq!(boundary.geometries.len(), 2);

        let extent = boundary.extent().unwrap();
        let epsilon = 1e-9;
        assert_abs_diff_eq!(extent.min().x, 101.3, epsilon = epsilon);
        assert_abs_diff_eq!(extent.min().y, 0.4, epsilon = epsilon);
        assert_abs_diff_eq!(extent.max().x, 101.6, epsilon = epsilon);
        assert_abs_diff_eq!(extent.max().y, 0.7, epsilon = epsilon);
    }

    #[test]
    fn test_empty_boundary_has_no_extent() {
        assert!(super::BoundaryLayer::default().extent().is_none());
    }
}
