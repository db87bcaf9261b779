use crate::config::LayerRule;
use crate::error::{GridplanError, Result};
use crate::observability::{set_phase, AnalysisPhase};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LAYER_EXTENSIONS: &[&str] = &["geojson", "json"];

/// A data file matched to a layer rule.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredLayer {
    pub path: PathBuf,
    pub rule: LayerRule,
}

impl DiscoveredLayer {
    /// Rule name, else the file stem.
    pub fn name(&self) -> String {
        self.rule.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

pub struct LayerWalker {
    root: PathBuf,
    rules: Vec<(glob::Pattern, LayerRule)>,
}

impl LayerWalker {
    pub fn new(root: PathBuf, rules: &[LayerRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| {
                glob::Pattern::new(&rule.pattern.to_lowercase())
                    .map(|p| (p, rule.clone()))
                    .map_err(|e| {
                        GridplanError::config_with_field(
                            format!("invalid layer pattern '{}': {}", rule.pattern, e),
                            "layers.pattern",
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { root, rules })
    }

    /// Matching files sorted by path. Files no rule matches are skipped.
    pub fn walk(&self) -> Result<Vec<DiscoveredLayer>> {
        let _phase = set_phase(AnalysisPhase::LayerDiscovery);
        if !self.root.is_dir() {
            return Err(GridplanError::from_io_error(
                std::io::Error::new(std::io::ErrorKind::NotFound, "data directory not found"),
                Some(self.root.clone()),
            ));
        }

        let mut layers = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf);
                GridplanError::from_io_error(std::io::Error::other(e.to_string()), path)
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_layer_extension(path) {
                continue;
            }
            match self.match_rule(path) {
                Some(rule) => layers.push(DiscoveredLayer {
                    path: path.to_path_buf(),
                    rule: rule.clone(),
                }),
                None => tracing::debug!(path = %path.display(), "no layer rule matches, skipping"),
            }
        }

        layers.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(layers)
    }

    fn match_rule(&self, path: &Path) -> Option<&LayerRule> {
        let stem = path.file_stem()?.to_string_lossy().to_lowercase();
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(&stem))
            .map(|(_, rule)| rule)
    }
}

fn has_layer_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| LAYER_EXTENSIONS.contains(&ext.as_str()))
}

/// Walk `root` and pair each GeoJSON file with the first matching rule.
pub fn discover_layers(root: &Path, rules: &[LayerRule]) -> Result<Vec<DiscoveredLayer>> {
    LayerWalker::new(root.to_path_buf(), rules)?.walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_layer_rules;
    use crate::core::LayerKind;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn matches_files_to_rules_in_path_order() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "output/grid_normalised.geojson");
        touch(temp.path(), "output/greenfield_lines_prior.geojson");
        touch(temp.path(), "infra/Substations.json");
        touch(temp.path(), "infra/railways.geojson");
        touch(temp.path(), "infra/readme.txt");
        touch(temp.path(), "infra/lakes.geojson");

        let layers = discover_layers(temp.path(), &default_layer_rules()).unwrap();
        let found: Vec<(String, LayerKind)> =
            layers.iter().map(|l| (l.name(), l.rule.kind)).collect();
        assert_eq!(
            found,
            vec![
                ("Substations".to_string(), LayerKind::Substations),
                ("railways".to_string(), LayerKind::Railways),
                ("greenfield_lines_prior".to_string(), LayerKind::TransmissionLines),
                ("grid_normalised".to_string(), LayerKind::Grid),
            ]
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "grid_lines.geojson");
        let layers = discover_layers(temp.path(), &default_layer_rules()).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].rule.kind, LayerKind::Grid);
    }

    #[test]
    fn missing_root_is_an_io_error() {
        let err = discover_layers(Path::new("/no/such/data"), &default_layer_rules()).unwrap_err();
        assert!(err.to_string().contains("/no/such/data"));
    }

    #[test]
    fn bad_pattern_is_a_config_error() {
        let rules = vec![LayerRule::new("[", LayerKind::Other, None)];
        assert!(LayerWalker::new(PathBuf::from("."), &rules).is_err());
    }
}
