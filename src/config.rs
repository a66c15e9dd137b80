// src/config.rs
// =============================================================================
// Settings for a run: the request timeout and the list of targets.
//
// Without --config the built-in defaults are used. With --config the file is
// read as TOML; any field it leaves out falls back to the default:
//
//   timeout_secs = 10
//
//   [[targets]]
//   name = "Homepage"
//   url = "https://ksbrwsk.de"
// =============================================================================

use crate::target::{default_targets, Target};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Total time a single request may take
    pub timeout_secs: u64,
    /// Seeded once at startup; the list never grows or shrinks afterwards
    pub targets: Vec<Target>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            targets: default_targets(),
        }
    }
}

impl Config {
    // Reads and validates a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    // Loads `path` if one was given, otherwise returns the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            bail!("Config has no targets");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.targets.len(), 5);
    }

    #[test]
    fn test_load_full_file() {
        let file = write_config(
            r#"
            timeout_secs = 3

            [[targets]]
            name = "Local"
            url = "http://localhost:8080"
            "#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.targets, vec![Target::new("Local", "http://localhost:8080")]);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = write_config("timeout_secs = 4\n");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 4);
        assert_eq!(config.targets, default_targets());
    }

    #[test]
    fn test_rejects_empty_target_list() {
        let file = write_config("targets = []\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let file = write_config("timeout_secs = 0\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_example_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("site-pulse.example.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.targets.len(), 3);
        assert_eq!(config.targets[2].name, "Rust");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
