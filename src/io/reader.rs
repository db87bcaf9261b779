//! GeoJSON layer loading.

use super::crs::Crs;
use crate::core::{AttributeValue, Attributes, Feature, Layer, LayerKind};
use crate::error::{GridplanError, Result};
use crate::observability::{set_current_layer, set_phase, AnalysisPhase};
use geojson::GeoJson;
use std::fs;
use std::path::Path;

/// How the source CRS of a layer is decided.
///
/// `source_crs` wins over whatever the file declares; `default_crs` only
/// applies to files that declare nothing. Without either, WGS84 is assumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub source_crs: Option<Crs>,
    pub default_crs: Option<Crs>,
}

/// Read a layer assuming WGS84 unless the file declares otherwise.
pub fn read_layer(path: &Path, kind: LayerKind) -> Result<Layer> {
    read_layer_with(path, kind, &ReadOptions::default())
}

/// Read a GeoJSON file into a [`Layer`].
///
/// A missing or unreadable file fails immediately with an I/O error naming
/// the path. A bare Feature or Geometry document becomes a one-feature layer.
pub fn read_layer_with(path: &Path, kind: LayerKind, options: &ReadOptions) -> Result<Layer> {
    let _phase = set_phase(AnalysisPhase::Loading);
    let _layer = set_current_layer(path);
    let name = layer_name(path);

    let contents = fs::read_to_string(path)
        .map_err(|e| GridplanError::from_io_error(e, Some(path.to_path_buf())))?;
    let document = contents
        .parse::<GeoJson>()
        .map_err(|e| GridplanError::geojson(e.to_string(), path))?;

    let (declared, features) = match document {
        GeoJson::FeatureCollection(collection) => (
            Crs::from_foreign_members(collection.foreign_members.as_ref()),
            collection.features.into_iter().map(convert_feature).collect(),
        ),
        GeoJson::Feature(feature) => (
            Crs::from_foreign_members(feature.foreign_members.as_ref()),
            vec![convert_feature(feature)],
        ),
        GeoJson::Geometry(geometry) => (None, vec![Feature::new(Some(geometry), Attributes::new())]),
    };

    let declared = declared.transpose()?;
    let crs = options
        .source_crs
        .or(declared)
        .or(options.default_crs)
        .unwrap_or_default();

    tracing::info!(
        layer = %name,
        kind = %kind,
        features = features.len(),
        crs = %crs,
        "loaded layer"
    );
    Ok(Layer::new(name, kind, crs, features))
}

fn layer_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn convert_feature(feature: geojson::Feature) -> Feature {
    let attributes: Attributes = feature
        .properties
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, AttributeValue::from(v)))
        .collect();
    Feature {
        id: feature.id,
        geometry: feature.geometry,
        attributes,
    }
}
