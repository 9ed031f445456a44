//! Validator configuration (.skillpack.yaml)
//!
//! Configuration is always explicit: either a file passed with `--config`
//! (or `SKILLPACK_CONFIG`), or `.skillpack.yaml` at the bundle root. The
//! file is hidden, so it never ends up in a packaged artifact.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use wax::Glob;

use crate::error::{self, Result};

/// Config file looked up at the bundle root when no explicit path is given
pub const CONFIG_FILE_NAME: &str = ".skillpack.yaml";

/// Default upper bound for script sources handed to the syntax validator
pub const DEFAULT_MAX_SCRIPT_BYTES: u64 = 1024 * 1024;

/// Settings shared by every pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Entry document, relative to the bundle root
    pub entry_document: String,

    /// Folder holding scripts
    pub scripts_dir: String,

    /// Folder holding reference documents
    pub references_dir: String,

    /// Folder holding assets
    pub assets_dir: String,

    /// Name of the packaging output folder, never inventoried
    pub output_dir: String,

    /// Scripts larger than this are skipped with a warning
    pub max_script_bytes: u64,

    /// Extra glob patterns excluded from the inventory
    pub exclude: Vec<String>,

    /// Treat warnings as errors
    pub strict: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            entry_document: "SKILL.md".to_string(),
            scripts_dir: "scripts".to_string(),
            references_dir: "references".to_string(),
            assets_dir: "assets".to_string(),
            output_dir: "dist".to_string(),
            max_script_bytes: DEFAULT_MAX_SCRIPT_BYTES,
            exclude: Vec::new(),
            strict: false,
        }
    }
}

impl ValidatorConfig {
    /// Load configuration for a bundle
    ///
    /// An explicit path must exist. Without one, `.skillpack.yaml` at the
    /// bundle root is used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>, bundle_root: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(error::config::not_found(path.display().to_string()));
                }
                path.to_path_buf()
            }
            None => {
                let candidate = bundle_root.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    tracing::debug!("no {} in bundle, using defaults", CONFIG_FILE_NAME);
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let yaml = std::fs::read_to_string(&path).map_err(|e| {
            error::config::read_failed(path.display().to_string(), e.to_string())
        })?;
        tracing::debug!("loaded configuration from {}", path.display());
        Self::from_yaml(&yaml, &path.display().to_string())
    }

    /// Parse configuration from YAML; `origin` is only used in error messages
    pub fn from_yaml(yaml: &str, origin: &str) -> Result<Self> {
        // An empty file is a valid "all defaults" config
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| error::config::parse_failed(origin, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_entry_path(&self.entry_document)?;

        for (field, value) in [
            ("scripts_dir", &self.scripts_dir),
            ("references_dir", &self.references_dir),
            ("assets_dir", &self.assets_dir),
            ("output_dir", &self.output_dir),
        ] {
            if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".."
            {
                return Err(error::config::invalid(format!(
                    "{field} must be a single folder name, got '{value}'"
                )));
            }
        }

        if self.max_script_bytes == 0 {
            return Err(error::config::invalid(
                "max_script_bytes must be greater than zero",
            ));
        }

        for pattern in &self.exclude {
            Glob::new(pattern).map_err(|e| {
                error::config::invalid(format!("invalid exclude pattern '{pattern}': {e}"))
            })?;
        }

        Ok(())
    }

    /// Designated folder names, in classification order
    pub fn designated_dirs(&self) -> [&str; 3] {
        [&self.scripts_dir, &self.references_dir, &self.assets_dir]
    }
}

/// The entry document must stay inside the bundle root
fn validate_entry_path(entry: &str) -> Result<()> {
    let path = Path::new(entry);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if entry.is_empty() || escapes {
        return Err(error::config::invalid(format!(
            "entry_document must be a relative path inside the bundle, got '{entry}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.entry_document, "SKILL.md");
        assert_eq!(config.designated_dirs(), ["scripts", "references", "assets"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ValidatorConfig::from_yaml("max_script_bytes: 2048\nstrict: true\n", "t")
            .unwrap();
        assert_eq!(config.max_script_bytes, 2048);
        assert!(config.strict);
        assert_eq!(config.scripts_dir, "scripts");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = ValidatorConfig::from_yaml("colour: blue\n", "t");
        assert!(matches!(
            result,
            Err(crate::error::SkillpackError::ConfigParseFailed { .. })
        ));
    }

    #[test]
    fn test_entry_outside_bundle_rejected() {
        for entry in ["../SKILL.md", "/etc/SKILL.md", "docs/../../x.md"] {
            let yaml = format!("entry_document: '{entry}'\n");
            let result = ValidatorConfig::from_yaml(&yaml, "t");
            assert!(
                matches!(result, Err(crate::error::SkillpackError::ConfigInvalid { .. })),
                "{entry} should be rejected"
            );
        }
    }

    #[test]
    fn test_nested_folder_name_rejected() {
        let result = ValidatorConfig::from_yaml("scripts_dir: src/scripts\n", "t");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_script_limit_rejected() {
        let result = ValidatorConfig::from_yaml("max_script_bytes: 0\n", "t");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_bundle_root() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "output_dir: build\n").unwrap();

        let config = ValidatorConfig::load(None, temp.path()).unwrap();
        assert_eq!(config.output_dir, "build");
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ValidatorConfig::load(None, temp.path()).unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let result = ValidatorConfig::load(Some(&temp.path().join("nope.yaml")), temp.path());
        assert!(matches!(
            result,
            Err(crate::error::SkillpackError::ConfigNotFound { .. })
        ));
    }
}
