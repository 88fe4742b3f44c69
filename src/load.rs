//! Boundary loader: reads the fragment and ward documents into typed records.
//!
//! A document may be a GeoJSON `FeatureCollection` or a bare array of
//! features. Individual features that cannot be used are skipped and logged;
//! only a missing, unreadable or structurally wrong document is fatal.

use std::path::Path;

use geoshape::Boundary;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::FeatureSchema;
use crate::error::{PipelineError, Result};
use crate::types::{RawFragment, RawWard};

type Properties = Map<String, Value>;

/// Features that parsed, in source order, plus how many were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

/// Fail with `InputNotFound` for the first path that is not a readable file.
pub fn require_inputs<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Result<()> {
    for path in paths {
        if !path.is_file() {
            return Err(PipelineError::InputNotFound { path: path.to_path_buf() });
        }
    }
    Ok(())
}

/// Load constituency fragments. Each needs a geometry and a group label.
pub fn load_fragments(path: &Path, schema: &FeatureSchema) -> Result<Loaded<RawFragment>> {
    let features = read_features(path)?;
    let loaded = collect(path, &features, |index, feature| parse_fragment(index, feature, schema));
    info!(path = %path.display(), loaded = loaded.items.len(), skipped = loaded.skipped, "loaded constituency fragments");
    Ok(loaded)
}

/// Load wards. Each needs a geometry and a name.
pub fn load_wards(path: &Path, schema: &FeatureSchema) -> Result<Loaded<RawWard>> {
    let features = read_features(path)?;
    let loaded = collect(path, &features, |index, feature| parse_ward(index, feature, schema));
    info!(path = %path.display(), loaded = loaded.items.len(), skipped = loaded.skipped, "loaded wards");
    Ok(loaded)
}

fn read_features(path: &Path) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => PipelineError::InputNotFound { path: path.to_path_buf() },
        _ => PipelineError::Io { path: path.to_path_buf(), source: e },
    })?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| PipelineError::MalformedInput { path: path.to_path_buf(), reason: e.to_string() })?;
    features_of(value)
        .map_err(|reason| PipelineError::MalformedInput { path: path.to_path_buf(), reason })
}

/// Extract the feature list from a FeatureCollection or a bare array.
pub(crate) fn features_of(value: Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Array(features) => Ok(features),
        Value::Object(mut obj) => match obj.remove("features") {
            Some(Value::Array(features)) => Ok(features),
            Some(_) => Err("`features` is not an array".into()),
            None => Err("expected a FeatureCollection or an array of features".into()),
        },
        _ => Err("expected a FeatureCollection or an array of features".into()),
    }
}

fn collect<T>(path: &Path, features: &[Value], parse: impl Fn(usize, &Value) -> Result<T, String>) -> Loaded<T> {
    features.iter().enumerate().fold(
        Loaded { items: Vec::with_capacity(features.len()), skipped: 0 },
        |mut loaded, (index, feature)| {
            match parse(index, feature) {
                Ok(item) => loaded.items.push(item),
                Err(reason) => {
                    warn!(path = %path.display(), index, %reason, "skipping malformed feature");
                    loaded.skipped += 1;
                }
            }
            loaded
        },
    )
}

pub(crate) fn parse_fragment(index: usize, feature: &Value, schema: &FeatureSchema) -> Result<RawFragment, String> {
    let (geometry, props) = feature_parts(feature)?;
    let label = text_property(props, &schema.group)
        .ok_or_else(|| format!("missing `{}` property", schema.group))?;

    Ok(RawFragment {
        index,
        label,
        geometry,
        population: number_property(props, &schema.population).unwrap_or(0.0),
        division: text_property(props, &schema.division),
        district: text_property(props, &schema.district),
    })
}

pub(crate) fn parse_ward(index: usize, feature: &Value, schema: &FeatureSchema) -> Result<RawWard, String> {
    let (geometry, props) = feature_parts(feature)?;
    let name = text_property(props, &schema.ward_name)
        .ok_or_else(|| format!("missing `{}` property", schema.ward_name))?;

    Ok(RawWard {
        index,
        name,
        thana: text_property(props, &schema.ward_thana),
        district: text_property(props, &schema.ward_district),
        geometry,
    })
}

fn feature_parts(feature: &Value) -> Result<(Boundary, Option<&Properties>), String> {
    let obj = feature.as_object().ok_or("feature is not an object")?;
    let geometry = obj.get("geometry")
        .filter(|g| !g.is_null())
        .ok_or("missing geometry")?;
    let boundary = Boundary::from_geojson(geometry).map_err(|e| e.to_string())?;
    Ok((boundary, obj.get("properties").and_then(Value::as_object)))
}

/// String or number property; blank strings count as missing.
fn text_property(props: Option<&Properties>, key: &str) -> Option<String> {
    match props?.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Number or numeric-string property; anything else counts as missing.
fn number_property(props: Option<&Properties>, key: &str) -> Option<f64> {
    let value = match props?.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use super::*;

    fn square() -> Value {
        json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]})
    }

    fn write_json(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(value.to_string().as_bytes()).unwrap();
        file
    }

    #[test]
    fn fragment_properties_are_read_with_defaults() {
        let schema = FeatureSchema::default();
        let feature = json!({
            "type": "Feature",
            "geometry": square(),
            "properties": {"layer": "Dhaka-10", "TOTAL_POP": "1200", "DIVISION_N": "Dhaka"}
        });
        let fragment = parse_fragment(3, &feature, &schema).unwrap();
        assert_eq!(fragment.index, 3);
        assert_eq!(fragment.label, "Dhaka-10");
        assert_eq!(fragment.population, 1200.0);
        assert_eq!(fragment.division.as_deref(), Some("Dhaka"));
        assert_eq!(fragment.district, None);
    }

    #[test]
    fn missing_population_is_zero() {
        let feature = json!({"geometry": square(), "properties": {"layer": "A", "TOTAL_POP": null}});
        let fragment = parse_fragment(0, &feature, &FeatureSchema::default()).unwrap();
        assert_eq!(fragment.population, 0.0);
    }

    #[test]
    fn fragment_without_label_or_geometry_is_rejected() {
        let schema = FeatureSchema::default();
        assert!(parse_fragment(0, &json!({"geometry": square(), "properties": {}}), &schema).is_err());
        assert!(parse_fragment(0, &json!({"geometry": square(), "properties": {"layer": "  "}}), &schema).is_err());
        assert!(parse_fragment(0, &json!({"geometry": null, "properties": {"layer": "A"}}), &schema).is_err());
        assert!(parse_fragment(0, &json!({"properties": {"layer": "A"}}), &schema).is_err());
    }

    #[test]
    fn ward_parent_labels_are_optional() {
        let feature = json!({"geometry": square(), "properties": {"ADM4_EN": "Ward 12"}});
        let ward = parse_ward(0, &feature, &FeatureSchema::default()).unwrap();
        assert_eq!(ward.name, "Ward 12");
        assert_eq!(ward.thana, None);
    }

    #[test]
    fn bare_array_and_collection_are_both_accepted() {
        let feature = json!({"geometry": square(), "properties": {"ADM4_EN": "W"}});
        assert_eq!(features_of(json!([feature.clone()])).unwrap().len(), 1);
        assert_eq!(features_of(json!({"type": "FeatureCollection", "features": [feature]})).unwrap().len(), 1);
        assert!(features_of(json!({"type": "Feature"})).is_err());
        assert!(features_of(json!(42)).is_err());
    }

    #[test]
    fn load_skips_bad_features_and_keeps_order() {
        let file = write_json(&json!({
            "type": "FeatureCollection",
            "features": [
                {"geometry": square(), "properties": {"layer": "B"}},
                {"geometry": {"type": "Point", "coordinates": [0, 0]}, "properties": {"layer": "X"}},
                {"geometry": square(), "properties": {"layer": "A"}},
                "not a feature"
            ]
        }));
        let loaded = load_fragments(file.path(), &FeatureSchema::default()).unwrap();
        let labels: Vec<_> = loaded.items.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["B", "A"]);
        assert_eq!(loaded.items[1].index, 2);
        assert_eq!(loaded.skipped, 2);
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let err = load_wards(Path::new("/nonexistent/wards.json"), &FeatureSchema::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InputNotFound { .. }));
    }

    #[test]
    fn non_json_file_is_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"layer,geometry\n").unwrap();
        let err = load_wards(file.path(), &FeatureSchema::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { .. }));
    }

    #[test]
    fn require_inputs_names_missing_path() {
        let present = NamedTempFile::new().unwrap();
        let missing = Path::new("/nonexistent/ccc.json");
        match require_inputs([present.path(), missing]) {
            Err(PipelineError::InputNotFound { path }) => assert_eq!(path, missing),
            other => panic!("unexpected {other:?}"),
        }
    }
}
