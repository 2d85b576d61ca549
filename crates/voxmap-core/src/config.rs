use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VoxmapError;

/// Top-level configuration, loaded from a `.voxmap.toml` file.
///
/// Every field has a default, so an empty file (or no file at all) yields a
/// working configuration.
///
/// # Examples
///
/// ```
/// use voxmap_core::VoxmapConfig;
///
/// let config = VoxmapConfig::from_toml("[index]\nexcludes = [\"dist\"]").unwrap();
/// assert_eq!(config.index.excludes, vec!["dist"]);
/// assert!(config.index.use_gitignore);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoxmapConfig {
    /// Settings for tree enumeration and watching.
    #[serde(default)]
    pub index: IndexConfig,
    /// Settings for transcript matching.
    #[serde(default, rename = "match")]
    pub matching: MatchConfig,
}

/// Controls which parts of the tree are enumerated and watched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Glob patterns excluded from indexing, matched against directory names.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,
    /// Respect `.gitignore` files during enumeration.
    #[serde(default = "default_use_gitignore")]
    pub use_gitignore: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            excludes: default_excludes(),
            use_gitignore: default_use_gitignore(),
        }
    }
}

fn default_excludes() -> Vec<String> {
    vec!["node_modules".to_string()]
}

fn default_use_gitignore() -> bool {
    true
}

/// Controls single-word matching behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Additional stop words (lowercase) skipped during the word pass.
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

impl VoxmapConfig {
    /// Loads configuration from a TOML file on disk.
    pub fn from_file(path: &Path) -> Result<Self, VoxmapError> {
        if !path.exists() {
            return Err(VoxmapError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, VoxmapError> {
        let config: VoxmapConfig = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_tracks_node_modules_exclude() {
        let config = VoxmapConfig::default();
        assert_eq!(config.index.excludes, vec!["node_modules"]);
        assert!(config.index.use_gitignore);
        assert!(config.matching.extra_stop_words.is_empty());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config = VoxmapConfig::from_toml("").unwrap();
        assert_eq!(config.index.excludes, vec!["node_modules"]);
        assert!(config.index.use_gitignore);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = VoxmapConfig::from_toml("[index]\nuse_gitignore = false").unwrap();
        assert!(!config.index.use_gitignore);
        assert_eq!(config.index.excludes, vec!["node_modules"]);
    }

    #[test]
    fn match_section_parses_extra_stop_words() {
        let toml = r#"
[match]
extra_stop_words = ["voxmap", "umm"]
"#;
        let config = VoxmapConfig::from_toml(toml).unwrap();
        assert_eq!(config.matching.extra_stop_words, vec!["voxmap", "umm"]);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let result = VoxmapConfig::from_toml("[index\nexcludes = 3");
        assert!(matches!(result, Err(VoxmapError::Toml(_))));
    }

    #[test]
    fn missing_file_reports_not_found() {
        let result = VoxmapConfig::from_file(Path::new("/nonexistent/.voxmap.toml"));
        assert!(matches!(result, Err(VoxmapError::NotFound(_))));
    }
}
