//! Settings file for nautilus
//!
//! Read from `--config` or `~/.nautilus/config.toml`. Command-line flags take
//! precedence over every value here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Namespace used when neither the flag nor the settings file names one
pub const DEFAULT_NAMESPACE: &str = "default";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Namespace to start in
    pub namespace: Option<String>,
    /// Kubeconfig context to connect with
    pub context: Option<String>,
    /// Kubeconfig file overriding `KUBECONFIG` and `~/.kube/config`
    pub kubeconfig: Option<PathBuf>,
}

impl Settings {
    /// `~/.nautilus/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(home.join(".nautilus").join("config.toml"))
    }

    /// Load settings from `path`, or from the default location.
    ///
    /// A missing default file yields defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_full() {
        let settings = Settings::parse(
            r#"
namespace = "payments"
context = "kind-dev"
kubeconfig = "/tmp/kubeconfig"
"#,
        )
        .unwrap();

        assert_eq!(settings.namespace.as_deref(), Some("payments"));
        assert_eq!(settings.context.as_deref(), Some("kind-dev"));
        assert_eq!(settings.kubeconfig, Some(PathBuf::from("/tmp/kubeconfig")));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Settings::parse("").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::parse("namespce = \"typo\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "namespace = \"apps\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.namespace.as_deref(), Some("apps"));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Settings::load(Some(Path::new("/nonexistent/nautilus.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings"));
    }
}
