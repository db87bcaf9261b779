use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar attribute carried by a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl AttributeValue {
    /// Numeric view of the value.
    ///
    /// Text is read as a number when it starts with one, so `"220"` and
    /// `"132 kV"` both yield numbers. Booleans and nulls never do.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) => None,
            Self::Text(s) => leading_number(s),
            Self::Bool(_) | Self::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Null => write!(f, "null"),
        }
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            // Nested values are kept verbatim for tooltips
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<&AttributeValue> for serde_json::Value {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Number(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            AttributeValue::Text(s) => serde_json::Value::String(s.clone()),
            AttributeValue::Bool(b) => serde_json::Value::Bool(*b),
            AttributeValue::Null => serde_json::Value::Null,
        }
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<f64>() {
        return Some(n).filter(|n| n.is_finite());
    }
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

pub type Attributes = BTreeMap<String, AttributeValue>;

/// A geometry plus its attribute table row. Read-only once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// GeoJSON id, string or number as read
    pub id: Option<geojson::feature::Id>,
    pub geometry: Option<geojson::Geometry>,
    pub attributes: Attributes,
}

impl Feature {
    pub fn new(geometry: Option<geojson::Geometry>, attributes: Attributes) -> Self {
        Self {
            id: None,
            geometry,
            attributes,
        }
    }

    /// Attribute-only feature, mostly useful for tests and benches.
    pub fn from_attributes<I, K>(attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, AttributeValue)>,
        K: Into<String>,
    {
        Self::new(
            None,
            attributes.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttributeValue::as_f64)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_str)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// True when the geometry is a (multi)polygon.
    pub fn is_areal(&self) -> bool {
        matches!(
            self.geometry.as_ref().map(|g| &g.value),
            Some(geojson::Value::Polygon(_)) | Some(geojson::Value::MultiPolygon(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_text_reads_as_number() {
        assert_eq!(AttributeValue::Text("220".into()).as_f64(), Some(220.0));
        assert_eq!(AttributeValue::Text(" 132 kV".into()).as_f64(), Some(132.0));
        assert_eq!(AttributeValue::Text("-0.5".into()).as_f64(), Some(-0.5));
        assert_eq!(AttributeValue::Text("1.161e-06".into()).as_f64(), Some(1.161e-6));
        assert_eq!(AttributeValue::Text("existing".into()).as_f64(), None);
        assert_eq!(AttributeValue::Bool(true).as_f64(), None);
        assert_eq!(AttributeValue::Null.as_f64(), None);
    }

    #[test]
    fn json_values_convert_to_attributes() {
        assert_eq!(AttributeValue::from(json!(3)), AttributeValue::Number(3.0));
        assert_eq!(
            AttributeValue::from(json!("Existing")),
            AttributeValue::Text("Existing".into())
        );
        assert_eq!(AttributeValue::from(json!(null)), AttributeValue::Null);
        assert_eq!(
            AttributeValue::from(json!([1, 2])),
            AttributeValue::Text("[1,2]".into())
        );
    }

    #[test]
    fn feature_lookups() {
        let feature = Feature::from_attributes([
            ("scenario_1", AttributeValue::Number(0.4)),
            ("status", AttributeValue::Text("existing".into())),
        ]);
        assert_eq!(feature.number("scenario_1"), Some(0.4));
        assert_eq!(feature.text("status"), Some("existing"));
        assert_eq!(feature.number("status"), None);
        assert!(!feature.has_attribute("voltage_kv"));
        assert!(!feature.is_areal());
    }
}
