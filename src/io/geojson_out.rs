//! Styled GeoJSON output.
//!
//! Each feature carries its resolved style as a `style` foreign member. The
//! collection carries the layer `name`, a `tooltip` field selection and the
//! `legend` of the resolver, so a web map can render it without further
//! lookups.

use crate::core::{Feature, Layer};
use crate::error::{GridplanError, Result};
use crate::observability::{set_phase, AnalysisPhase};
use crate::style::StyleResolver;
use geojson::{FeatureCollection, JsonObject};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Attribute fields shown on hover, with display aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub fields: Vec<String>,
    pub aliases: Vec<String>,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, alias: &str) -> Self {
        self.fields.push(name.to_string());
        self.aliases.push(alias.to_string());
        self
    }

    /// Keep only fields some feature of `layer` carries.
    pub fn retain_present(mut self, layer: &Layer) -> Self {
        let (fields, aliases) = self
            .fields
            .into_iter()
            .zip(self.aliases)
            .filter(|(field, _)| layer.has_column(field))
            .unzip();
        self.fields = fields;
        self.aliases = aliases;
        self
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue> {
    serde_json::to_value(value)
        .map_err(|e| GridplanError::from_io_error(std::io::Error::from(e), None))
}

fn styled_feature(feature: &Feature, resolver: &StyleResolver) -> Result<geojson::Feature> {
    let properties: JsonObject = feature
        .attributes
        .iter()
        .map(|(k, v)| (k.clone(), JsonValue::from(v)))
        .collect();
    let mut members = JsonObject::new();
    members.insert("style".to_string(), to_json(&resolver.style(feature))?);

    Ok(geojson::Feature {
        bbox: None,
        geometry: feature.geometry.clone(),
        id: feature.id.clone(),
        properties: Some(properties),
        foreign_members: Some(members),
    })
}

/// Build the styled collection for `layer`.
pub fn styled_collection(
    layer: &Layer,
    resolver: &StyleResolver,
    tooltip: &Tooltip,
) -> Result<FeatureCollection> {
    let _phase = set_phase(AnalysisPhase::Styling);
    let features = layer
        .features
        .iter()
        .map(|f| styled_feature(f, resolver))
        .collect::<Result<Vec<_>>>()?;

    let mut members = JsonObject::new();
    members.insert("name".to_string(), JsonValue::String(layer.name.clone()));
    members.insert("tooltip".to_string(), to_json(tooltip)?);
    members.insert("legend".to_string(), to_json(&resolver.legend())?);

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(members),
    })
}

/// Style every feature of `layer` and write the collection to `path`.
/// Parent directories are created as needed.
pub fn write_styled_collection(
    path: &Path,
    layer: &Layer,
    resolver: &StyleResolver,
    tooltip: &Tooltip,
) -> Result<()> {
    let collection = styled_collection(layer, resolver, tooltip)?;

    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    let io_err = |e: std::io::Error| GridplanError::from_io_error(e, Some(path.to_path_buf()));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = fs::File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &collection)
        .map_err(|e| io_err(std::io::Error::from(e)))?;
    writer.flush().map_err(io_err)?;

    tracing::info!(
        layer = %layer.name,
        features = layer.len(),
        path = %path.display(),
        "wrote styled layer"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StyleConfig;
    use crate::core::{AttributeValue, LayerKind};
    use crate::io::crs::Crs;
    use geojson::feature::Id;
    use geojson::{GeoJson, Geometry, Value};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn lines_layer() -> Layer {
        let mut hv = Feature::from_attributes([
            ("voltage_kv", AttributeValue::Number(220.0)),
            ("name", AttributeValue::Text("Kawanda-Masaka".into())),
        ]);
        hv.id = Some(Id::String("l1".into()));
        hv.geometry = Some(Geometry::new(Value::LineString(vec![
            vec![32.5, 0.4],
            vec![31.7, -0.3],
        ])));
        let unknown = Feature::from_attributes([("name", AttributeValue::Text("spur".into()))]);
        Layer::new("lines", LayerKind::TransmissionLines, Crs::Wgs84, vec![hv, unknown])
    }

    #[test]
    fn features_carry_style_and_collection_carries_legend() {
        let layer = lines_layer();
        let resolver = StyleResolver::voltage(&StyleConfig::default()).unwrap();
        let tooltip = Tooltip::new().field("voltage_kv", "Voltage (kV):");
        let collection = styled_collection(&layer, &resolver, &tooltip).unwrap();

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            value["features"][0]["style"],
            json!({"fillColor": "#ff0000", "strokeColor": "#ff0000", "weight": 3.0, "opacity": 0.9})
        );
        assert_eq!(value["features"][0]["id"], "l1");
        assert_eq!(value["features"][1]["style"]["fillColor"], "#808080");
        assert_eq!(value["tooltip"]["fields"], json!(["voltage_kv"]));
        assert_eq!(value["tooltip"]["aliases"], json!(["Voltage (kV):"]));
        assert_eq!(value["legend"][0]["label"], ">= 220 kV");
        assert_eq!(value["name"], "lines");
    }

    #[test]
    fn numeric_ids_stay_numeric() {
        let mut layer = lines_layer();
        layer.features[1].id = Some(Id::Number(7.into()));
        let resolver = StyleResolver::voltage(&StyleConfig::default()).unwrap();
        let collection = styled_collection(&layer, &resolver, &Tooltip::new()).unwrap();

        let value = serde_json::to_value(&collection).unwrap();
        assert_eq!(value["features"][0]["id"], json!("l1"));
        assert_eq!(value["features"][1]["id"], json!(7));
    }

    #[test]
    fn retain_present_drops_absent_fields() {
        let tooltip = Tooltip::new()
            .field("voltage_kv", "Voltage:")
            .field("status", "Status:")
            .retain_present(&lines_layer());
        assert_eq!(tooltip.fields, vec!["voltage_kv"]);
        assert_eq!(tooltip.aliases, vec!["Voltage:"]);
    }

    #[test]
    fn written_file_is_valid_geojson() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("lines.geojson");
        let resolver = StyleResolver::voltage(&StyleConfig::default()).unwrap();
        write_styled_collection(&path, &lines_layer(), &resolver, &Tooltip::new()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        match text.parse::<GeoJson>().unwrap() {
            GeoJson::FeatureCollection(fc) => {
                assert_eq!(fc.features.len(), 2);
                let members = fc.foreign_members.unwrap();
                assert!(members.contains_key("legend"));
            }
            other => panic!("expected a feature collection, got {:?}", other),
        }
    }
}
