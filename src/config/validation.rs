//! Configuration validation with error accumulation.
//!
//! Every check pushes onto one list so a single run reports all problems.
//! Messages are prefixed with the TOML field path they refer to.

use super::core::GridplanConfig;
use super::style::StyleConfig;
use crate::error::{GridplanError, Result};
use crate::io::crs::Crs;
use crate::style::color::Rgb;

/// Validate the entire config, returning every problem found.
pub fn validate_config(config: &GridplanConfig) -> Vec<String> {
    let mut errors = Vec::new();

    errors.extend(
        config
            .scenarios
            .validate()
            .into_iter()
            .map(|e| format!("scenarios: {}", e)),
    );

    for (field, value) in [
        ("priority.score_attr", &config.priority.score_attr),
        ("priority.cost_attr", &config.priority.cost_attr),
        ("priority.connections_attr", &config.priority.connections_attr),
    ] {
        check_not_blank(&mut errors, field, value);
    }
    errors.extend(
        config
            .priority
            .scale()
            .validate()
            .into_iter()
            .map(|e| format!("priority.bands: {}", e)),
    );

    validate_style(&mut errors, &config.style);

    let fraction = config.thresholds.fraction;
    if !(0.0..=1.0).contains(&fraction) {
        errors.push(format!(
            "thresholds.fraction: {} is out of range (must be 0.0-1.0)",
            fraction
        ));
    }
    if config.thresholds.histogram_bins == 0 {
        errors.push("thresholds.histogram_bins: must be at least 1".to_string());
    }

    if let Some(name) = &config.input.default_crs {
        if let Err(e) = Crs::parse(name) {
            errors.push(format!("input.default_crs: {}", e));
        }
    }

    for (i, rule) in config.layers.iter().enumerate() {
        if let Err(e) = glob::Pattern::new(&rule.pattern) {
            errors.push(format!("layers[{}].pattern: '{}': {}", i, rule.pattern, e));
        }
        if let Some(color) = &rule.color {
            check_color(&mut errors, &format!("layers[{}].color", i), color);
        }
    }

    errors
}

/// Validate config, failing with one error that lists every problem.
pub fn validate_config_result(config: &GridplanConfig) -> Result<()> {
    let errors = validate_config(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(GridplanError::validations(errors))
    }
}

fn validate_style(errors: &mut Vec<String>, style: &StyleConfig) {
    for (field, color) in [
        ("style.ramp_low", &style.ramp_low),
        ("style.ramp_high", &style.ramp_high),
        ("style.unknown_color", &style.unknown_color),
        ("style.voltage_base_color", &style.voltage_base_color),
        ("style.status_existing", &style.status_existing),
        (
            "style.status_under_construction",
            &style.status_under_construction,
        ),
        ("style.status_other", &style.status_other),
        ("style.highlight.color", &style.highlight.color),
    ] {
        check_color(errors, field, color);
    }

    for (field, weight) in [
        ("style.polygon_weight", style.polygon_weight),
        ("style.line_weight", style.line_weight),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            errors.push(format!("{}: {} must be a non-negative number", field, weight));
        }
    }

    let highlight_weight = style.highlight.weight;
    if !highlight_weight.is_finite() || highlight_weight <= 0.0 {
        errors.push(format!(
            "style.highlight.weight: {} must be a positive number",
            highlight_weight
        ));
    }

    for (field, opacity) in [
        ("style.polygon_opacity", style.polygon_opacity),
        ("style.line_opacity", style.line_opacity),
    ] {
        if !(0.0..=1.0).contains(&opacity) {
            errors.push(format!(
                "{}: {} is out of range (must be 0.0-1.0)",
                field, opacity
            ));
        }
    }

    check_not_blank(errors, "style.voltage_attr", &style.voltage_attr);
    check_not_blank(errors, "style.status_attr", &style.status_attr);

    for (i, tier) in style.voltage_tiers.iter().enumerate() {
        if !tier.min_kv.is_finite() {
            errors.push(format!("style.voltage_tiers[{}].min_kv: must be finite", i));
        }
        check_color(errors, &format!("style.voltage_tiers[{}].color", i), &tier.color);
    }
}

fn check_color(errors: &mut Vec<String>, field: &str, value: &str) {
    if let Err(e) = Rgb::parse(value) {
        errors.push(format!("{}: {}", field, e));
    }
}

fn check_not_blank(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{}: must not be empty", field));
    }
}
