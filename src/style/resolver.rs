use super::color::Rgb;
use super::{ColorMode, StyleDescriptor};
use crate::config::{HighlightConfig, StyleConfig};
use crate::core::Feature;
use crate::error::{GridplanError, Result};
use crate::priority::{PriorityCategory, PriorityScale};
use serde::Serialize;

/// One legend row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

impl LegendEntry {
    fn new(label: impl Into<String>, color: Rgb) -> Self {
        Self {
            label: label.into(),
            color: color.to_hex(),
        }
    }
}

/// Stroke emphasis for features whose `column` value is `>= threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdHighlight {
    pub column: String,
    pub threshold: f64,
    pub color: Rgb,
    pub weight: f64,
}

impl ThresholdHighlight {
    /// Highlighted strokes are at least this many times the base weight.
    pub const WIDEN_FACTOR: f64 = 2.0;

    /// Stroke weight of a highlighted feature. Always heavier than `base`
    /// as long as the configured weight is positive.
    pub fn emphasised_weight(&self, base: f64) -> f64 {
        (base * Self::WIDEN_FACTOR).max(self.weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Stroke {
    weight: f64,
    opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum FillRule {
    Continuous {
        column: String,
        low: Rgb,
        high: Rgb,
        vmin: f64,
        vmax: f64,
    },
    Voltage {
        attribute: String,
        /// Sorted by descending `min_kv`
        tiers: Vec<(f64, Rgb)>,
        base: Rgb,
    },
    Status {
        attribute: String,
        existing: Rgb,
        under_construction: Rgb,
        other: Rgb,
    },
    Priority {
        attribute: String,
        scale: PriorityScale,
        /// Indexed by category rank
        colors: Vec<Rgb>,
    },
    Fixed {
        label: String,
        color: Rgb,
    },
}

/// Deterministic feature to style mapping for one layer.
///
/// Geometry picks the base stroke: polygons use the polygon weight and
/// opacity, everything else the line ones. The threshold highlight, when
/// set, is applied on top of whichever fill rule is active.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleResolver {
    rule: FillRule,
    unknown: Rgb,
    polygon: Stroke,
    line: Stroke,
    highlight: Option<ThresholdHighlight>,
}

fn parse_color(value: &str, field: &str) -> Result<Rgb> {
    Rgb::parse(value).map_err(|e| GridplanError::config_with_field(e, field))
}

impl StyleResolver {
    fn with_rule(rule: FillRule, config: &StyleConfig) -> Result<Self> {
        Ok(Self {
            rule,
            unknown: parse_color(&config.unknown_color, "style.unknown_color")?,
            polygon: Stroke {
                weight: config.polygon_weight,
                opacity: config.polygon_opacity,
            },
            line: Stroke {
                weight: config.line_weight,
                opacity: config.line_opacity,
            },
            highlight: None,
        })
    }

    /// White-to-red (by default) ramp of `column` over `[vmin, vmax]`.
    pub fn continuous(column: &str, vmin: f64, vmax: f64, config: &StyleConfig) -> Result<Self> {
        let rule = FillRule::Continuous {
            column: column.to_string(),
            low: parse_color(&config.ramp_low, "style.ramp_low")?,
            high: parse_color(&config.ramp_high, "style.ramp_high")?,
            vmin,
            vmax,
        };
        Self::with_rule(rule, config)
    }

    pub fn voltage(config: &StyleConfig) -> Result<Self> {
        let mut tiers = config
            .voltage_tiers
            .iter()
            .map(|t| Ok((t.min_kv, parse_color(&t.color, "style.voltage_tiers")?)))
            .collect::<Result<Vec<_>>>()?;
        tiers.sort_by(|a, b| b.0.total_cmp(&a.0));

        let rule = FillRule::Voltage {
            attribute: config.voltage_attr.clone(),
            tiers,
            base: parse_color(&config.voltage_base_color, "style.voltage_base_color")?,
        };
        Self::with_rule(rule, config)
    }

    pub fn status(config: &StyleConfig) -> Result<Self> {
        let rule = FillRule::Status {
            attribute: config.status_attr.clone(),
            existing: parse_color(&config.status_existing, "style.status_existing")?,
            under_construction: parse_color(
                &config.status_under_construction,
                "style.status_under_construction",
            )?,
            other: parse_color(&config.status_other, "style.status_other")?,
        };
        Self::with_rule(rule, config)
    }

    pub fn priority(attribute: &str, scale: &PriorityScale, config: &StyleConfig) -> Result<Self> {
        let colors = PriorityCategory::ALL
            .iter()
            .map(|&c| parse_color(scale.color(c), "priority.bands"))
            .collect::<Result<Vec<_>>>()?;
        let rule = FillRule::Priority {
            attribute: attribute.to_string(),
            scale: scale.clone(),
            colors,
        };
        Self::with_rule(rule, config)
    }

    /// A single color for every feature; `label` names the legend row.
    pub fn fixed(label: &str, color: &str, config: &StyleConfig) -> Result<Self> {
        let rule = FillRule::Fixed {
            label: label.to_string(),
            color: parse_color(color, "layers.color")?,
        };
        Self::with_rule(rule, config)
    }

    /// Add the threshold highlight unless it is disabled in `config`.
    pub fn with_highlight(
        mut self,
        column: &str,
        threshold: f64,
        config: &HighlightConfig,
    ) -> Result<Self> {
        if config.enabled {
            self.highlight = Some(ThresholdHighlight {
                column: column.to_string(),
                threshold,
                color: parse_color(&config.color, "style.highlight.color")?,
                weight: config.weight,
            });
        }
        Ok(self)
    }

    pub fn mode(&self) -> ColorMode {
        match self.rule {
            FillRule::Continuous { .. } => ColorMode::Continuous,
            FillRule::Voltage { .. } => ColorMode::Voltage,
            FillRule::Status { .. } => ColorMode::Status,
            FillRule::Priority { .. } => ColorMode::Priority,
            FillRule::Fixed { .. } => ColorMode::Fixed,
        }
    }

    pub fn highlight(&self) -> Option<&ThresholdHighlight> {
        self.highlight.as_ref()
    }

    /// Attribute the fill rule reads, if any.
    pub fn attribute(&self) -> Option<&str> {
        match &self.rule {
            FillRule::Continuous { column, .. } => Some(column),
            FillRule::Voltage { attribute, .. }
            | FillRule::Status { attribute, .. }
            | FillRule::Priority { attribute, .. } => Some(attribute),
            FillRule::Fixed { .. } => None,
        }
    }

    pub fn fill_color(&self, feature: &Feature) -> Rgb {
        match &self.rule {
            FillRule::Continuous {
                column,
                low,
                high,
                vmin,
                vmax,
            } => match feature.number(column) {
                None => self.unknown,
                Some(_) if vmax <= vmin => *low,
                Some(v) => low.lerp(*high, (v - vmin) / (vmax - vmin)),
            },
            FillRule::Voltage {
                attribute,
                tiers,
                base,
            } => match feature.number(attribute) {
                None => self.unknown,
                Some(kv) => tiers
                    .iter()
                    .find(|(min_kv, _)| kv >= *min_kv)
                    .map_or(*base, |(_, color)| *color),
            },
            FillRule::Status {
                attribute,
                existing,
                under_construction,
                other,
            } => match feature.text(attribute) {
                Some(s) if s.eq_ignore_ascii_case("existing") => *existing,
                Some(s) if s.eq_ignore_ascii_case("under construction") => *under_construction,
                _ => *other,
            },
            FillRule::Priority {
                attribute,
                scale,
                colors,
            } => {
                let category = feature
                    .number(attribute)
                    .map_or(PriorityCategory::NoPriority, |s| scale.classify(s));
                colors[category.rank()]
            }
            FillRule::Fixed { color, .. } => *color,
        }
    }

    /// Style one feature.
    pub fn style(&self, feature: &Feature) -> StyleDescriptor {
        let fill = self.fill_color(feature).to_hex();
        let stroke = if feature.is_areal() {
            self.polygon
        } else {
            self.line
        };
        let mut descriptor = StyleDescriptor {
            stroke_color: fill.clone(),
            fill_color: fill,
            weight: stroke.weight,
            opacity: stroke.opacity,
        };

        if let Some(h) = &self.highlight {
            if feature.number(&h.column).is_some_and(|v| v >= h.threshold) {
                descriptor.stroke_color = h.color.to_hex();
                descriptor.weight = h.emphasised_weight(descriptor.weight);
            }
        }
        descriptor
    }

    /// Legend rows for the active fill rule, in display order.
    pub fn legend(&self) -> Vec<LegendEntry> {
        match &self.rule {
            FillRule::Continuous {
                low,
                high,
                vmin,
                vmax,
                ..
            } => vec![
                LegendEntry::new(format!("{}", vmin), *low),
                LegendEntry::new(format!("{}", vmax), *high),
                LegendEntry::new("No data", self.unknown),
            ],
            FillRule::Voltage { tiers, base, .. } => {
                let mut entries: Vec<LegendEntry> = tiers
                    .iter()
                    .map(|(min_kv, color)| LegendEntry::new(format!(">= {} kV", min_kv), *color))
                    .collect();
                let floor = tiers.last().map_or(String::from("Any voltage"), |(kv, _)| {
                    format!("< {} kV", kv)
                });
                entries.push(LegendEntry::new(floor, *base));
                entries.push(LegendEntry::new("Unknown voltage", self.unknown));
                entries
            }
            FillRule::Status {
                existing,
                under_construction,
                other,
                ..
            } => vec![
                LegendEntry::new("Existing", *existing),
                LegendEntry::new("Under construction", *under_construction),
                LegendEntry::new("Other / unknown", *other),
            ],
            FillRule::Priority { colors, .. } => PriorityCategory::ALL
                .iter()
                .map(|c| LegendEntry::new(c.short_label(), colors[c.rank()]))
                .collect(),
            FillRule::Fixed { label, color } => vec![LegendEntry::new(label.clone(), *color)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AttributeValue;
    use geojson::{Geometry, Value};
    use pretty_assertions::assert_eq;

    fn line(attrs: &[(&str, AttributeValue)]) -> Feature {
        let mut feature = Feature::from_attributes(attrs.iter().cloned());
        feature.geometry = Some(Geometry::new(Value::LineString(vec![
            vec![32.0, 1.0],
            vec![32.5, 1.5],
        ])));
        feature
    }

    fn cell(value: f64) -> Feature {
        let mut feature = Feature::from_attributes([("scenario_1", AttributeValue::Number(value))]);
        feature.geometry = Some(Geometry::new(Value::Polygon(vec![vec![
            vec![32.0, 1.0],
            vec![32.1, 1.0],
            vec![32.1, 1.1],
            vec![32.0, 1.0],
        ]])));
        feature
    }

    fn kv(v: f64) -> Feature {
        line(&[("voltage_kv", AttributeValue::Number(v))])
    }

    #[test]
    fn voltage_tiers_are_inclusive_low() {
        let resolver = StyleResolver::voltage(&StyleConfig::default()).unwrap();
        assert_eq!(resolver.style(&kv(220.0)).stroke_color, "#ff0000");
        assert_eq!(resolver.style(&kv(219.99)).stroke_color, "#ffa500");
        assert_eq!(resolver.style(&kv(110.0)).stroke_color, "#ffa500");
        assert_eq!(resolver.style(&kv(109.99)).stroke_color, "#008000");
        assert_eq!(resolver.style(&line(&[])).stroke_color, "#808080");
    }

    #[test]
    fn voltage_reads_numeric_text() {
        let resolver = StyleResolver::voltage(&StyleConfig::default()).unwrap();
        let f = line(&[("voltage_kv", AttributeValue::Text("132 kV".into()))]);
        assert_eq!(resolver.fill_color(&f), Rgb::ORANGE);
    }

    #[test]
    fn status_matching_is_exact_but_ignores_case() {
        let resolver = StyleResolver::status(&StyleConfig::default()).unwrap();
        let status = |s: &str| line(&[("status", AttributeValue::Text(s.into()))]);
        assert_eq!(resolver.fill_color(&status("Existing")), Rgb::GREEN);
        assert_eq!(resolver.fill_color(&status(" Existing ")), Rgb::GRAY);
        assert_eq!(resolver.fill_color(&status("existing line")), Rgb::GRAY);
        assert_eq!(resolver.fill_color(&status("UNDER CONSTRUCTION")), Rgb::ORANGE);
        assert_eq!(resolver.fill_color(&status("planned")), Rgb::GRAY);
        assert_eq!(resolver.fill_color(&line(&[])), Rgb::GRAY);
    }

    #[test]
    fn continuous_ramp_clamps_and_handles_degenerate_range() {
        let config = StyleConfig::default();
        let resolver = StyleResolver::continuous("scenario_1", 0.0, 1.0, &config).unwrap();
        assert_eq!(resolver.fill_color(&cell(0.0)), Rgb::WHITE);
        assert_eq!(resolver.fill_color(&cell(1.0)), Rgb::RED);
        assert_eq!(resolver.fill_color(&cell(-4.0)), Rgb::WHITE);
        assert_eq!(resolver.fill_color(&cell(9.0)), Rgb::RED);
        assert_eq!(resolver.fill_color(&cell(0.5)), Rgb([0xff, 0x80, 0x80]));
        assert_eq!(resolver.fill_color(&line(&[])), Rgb::GRAY);

        let flat = StyleResolver::continuous("scenario_1", 3.0, 3.0, &config).unwrap();
        assert_eq!(flat.fill_color(&cell(3.0)), Rgb::WHITE);
    }

    #[test]
    fn polygon_and_line_strokes_differ() {
        let config = StyleConfig::default();
        let grid = StyleResolver::continuous("scenario_1", 0.0, 1.0, &config).unwrap();
        let style = grid.style(&cell(1.0));
        assert_eq!(
            style,
            StyleDescriptor {
                fill_color: "#ff0000".into(),
                stroke_color: "#ff0000".into(),
                weight: 0.2,
                opacity: 0.7,
            }
        );

        let lines = StyleResolver::voltage(&config).unwrap();
        let style = lines.style(&kv(400.0));
        assert_eq!(style.weight, 3.0);
        assert_eq!(style.opacity, 0.9);
    }

    #[test]
    fn highlight_darkens_and_thickens_border_only() {
        let config = StyleConfig::default();
        let resolver = StyleResolver::continuous("scenario_1", 0.0, 1.0, &config)
            .unwrap()
            .with_highlight("scenario_1", 0.8, &config.highlight)
            .unwrap();

        let above = resolver.style(&cell(0.8));
        assert_eq!(above.stroke_color, "#000000");
        assert_eq!(above.weight, 2.0);
        assert_eq!(above.fill_color, resolver.fill_color(&cell(0.8)).to_hex());

        let below = resolver.style(&cell(0.79));
        assert_eq!(below.stroke_color, below.fill_color);
        assert_eq!(below.weight, 0.2);
    }

    #[test]
    fn highlight_widens_lines_beyond_base_weight() {
        let config = StyleConfig::default();
        let plain = StyleResolver::voltage(&config).unwrap();
        let resolver = plain
            .clone()
            .with_highlight("voltage_kv", 100.0, &config.highlight)
            .unwrap();
        let base = plain.style(&kv(220.0));
        let style = resolver.style(&kv(220.0));
        assert_eq!(style.weight, 6.0);
        assert!(style.weight > base.weight);
        assert_eq!(style.stroke_color, "#000000");
        assert_eq!(style.fill_color, "#ff0000");
    }

    #[test]
    fn highlight_is_heavier_in_every_mode() {
        let config = StyleConfig::default();
        let scale = PriorityScale::default();
        let resolvers = [
            StyleResolver::continuous("scenario_1", 0.0, 1.0, &config).unwrap(),
            StyleResolver::voltage(&config).unwrap(),
            StyleResolver::status(&config).unwrap(),
            StyleResolver::priority("scenario_1", &scale, &config).unwrap(),
            StyleResolver::fixed("Substations", "#0000ff", &config).unwrap(),
        ];
        let features = [
            line(&[("scenario_1", AttributeValue::Number(1.0))]),
            cell(1.0),
        ];

        for plain in resolvers {
            let highlighted = plain
                .clone()
                .with_highlight("scenario_1", 0.5, &config.highlight)
                .unwrap();
            for feature in &features {
                let base = plain.style(feature);
                let style = highlighted.style(feature);
                assert!(
                    style.weight > base.weight,
                    "{:?}: {} <= {}",
                    plain.mode(),
                    style.weight,
                    base.weight
                );
            }
        }
    }

    #[test]
    fn emphasised_weight_is_strict_for_zero_base() {
        let highlight = ThresholdHighlight {
            column: "scenario_1".into(),
            threshold: 0.0,
            color: Rgb::BLACK,
            weight: 2.0,
        };
        assert_eq!(highlight.emphasised_weight(0.0), 2.0);
        assert_eq!(highlight.emphasised_weight(0.2), 2.0);
        assert_eq!(highlight.emphasised_weight(3.0), 6.0);
    }

    #[test]
    fn disabled_highlight_is_not_applied() {
        let mut config = StyleConfig::default();
        config.highlight.enabled = false;
        let resolver = StyleResolver::continuous("scenario_1", 0.0, 1.0, &config)
            .unwrap()
            .with_highlight("scenario_1", 0.0, &config.highlight)
            .unwrap();
        assert!(resolver.highlight().is_none());
        assert_eq!(resolver.style(&cell(1.0)).stroke_color, "#ff0000");
    }

    #[test]
    fn priority_mode_uses_band_colors() {
        let resolver =
            StyleResolver::priority("line_prior", &PriorityScale::default(), &StyleConfig::default())
                .unwrap();
        let score = |s: f64| line(&[("line_prior", AttributeValue::Number(s))]);
        assert_eq!(resolver.style(&score(0.0)).stroke_color, "#d3d3d3");
        assert_eq!(resolver.style(&score(0.000_005)).stroke_color, "#feb24c");
        assert_eq!(resolver.style(&score(0.000_02)).stroke_color, "#f03b20");
        assert_eq!(resolver.style(&line(&[])).stroke_color, "#d3d3d3");
        assert_eq!(resolver.mode(), ColorMode::Priority);
    }

    #[test]
    fn legends_follow_mode() {
        let config = StyleConfig::default();
        let labels = |r: &StyleResolver| -> Vec<String> {
            r.legend().into_iter().map(|e| e.label).collect()
        };

        let voltage = StyleResolver::voltage(&config).unwrap();
        assert_eq!(
            labels(&voltage),
            vec![">= 220 kV", ">= 110 kV", "< 110 kV", "Unknown voltage"]
        );

        let priority =
            StyleResolver::priority("line_prior", &PriorityScale::default(), &config).unwrap();
        assert_eq!(
            labels(&priority),
            vec!["No priority", "Low", "Mid", "Mid-High", "High"]
        );

        let fixed = StyleResolver::fixed("Substations", "blue", &config).unwrap();
        assert_eq!(
            fixed.legend(),
            vec![LegendEntry {
                label: "Substations".into(),
                color: "#0000ff".into()
            }]
        );
        assert_eq!(fixed.attribute(), None);
    }

    #[test]
    fn bad_color_is_a_config_error() {
        let config = StyleConfig {
            ramp_high: "reddish".into(),
            ..StyleConfig::default()
        };
        let err = StyleResolver::continuous("scenario_1", 0.0, 1.0, &config).unwrap_err();
        assert!(err.to_string().contains("style.ramp_high"));
    }
}
