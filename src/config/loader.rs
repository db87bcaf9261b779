use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::GridplanConfig;
use crate::error::{GridplanError, Result};

pub const CONFIG_FILE_NAME: &str = ".gridplan.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String> {
    let file =
        fs::File::open(path).map_err(|e| GridplanError::from_io_error(e, Some(path.into())))?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .map_err(|e| GridplanError::from_io_error(e, Some(path.into())))?;
    Ok(contents)
}

/// Parse config from a TOML string. `path` is only used for error reporting.
pub fn parse_config(contents: &str, path: &Path) -> Result<GridplanConfig> {
    toml::from_str::<GridplanConfig>(contents)
        .map_err(|e| GridplanError::toml(e.to_string().trim_end().to_string(), path))
}

/// Generate `start` and its ancestors, at most `max_depth` directories
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Nearest `.gridplan.toml` at or above `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.is_file())
}

/// Per-user configuration, e.g. `~/.config/gridplan/config.toml` on Linux.
pub fn user_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gridplan").join("config.toml"))
}

/// Load configuration.
///
/// An explicit path must exist. Without one the current directory and its
/// ancestors are searched, then the per-user file; when nothing is found
/// the defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<GridplanConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return Ok(GridplanConfig::default());
        }
    };
    if find_config_file(&current).is_none() {
        if let Some(path) = user_config_file().filter(|p| p.is_file()) {
            return load_config_file(&path);
        }
    }
    load_config_from(&current)
}

/// Search upwards from `start` for a config file.
pub fn load_config_from(start: &Path) -> Result<GridplanConfig> {
    match find_config_file(start) {
        Some(path) => load_config_file(&path),
        None => {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(GridplanConfig::default())
        }
    }
}

fn load_config_file(path: &Path) -> Result<GridplanConfig> {
    if !path.is_file() {
        return Err(GridplanError::config_not_found(path));
    }
    let contents = read_config_file(path)?;
    let config = parse_config(&contents, path)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
