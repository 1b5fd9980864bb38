//! Run configuration, loadable from TOML.
//!
//! ```toml
//! weigher = "naive"
//! min_depth = 6
//! max_paths = 100000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compressor::MIN_DEPTH;
use crate::encoder::ContextWindow;
use crate::storage::BackendConfig;
use crate::weigher::WeigherKind;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummarizerConfig {
    pub weigher: WeigherKind,
    /// Minimum number of edges a summary path must have.
    pub min_depth: usize,
    /// Tokens compared on each side of a word when merging.
    pub context_window: usize,
    /// FOLLOWS hops explored on each side of a candidate node.
    pub context_depth: usize,
    /// Stop path enumeration after this many paths.
    pub max_paths: Option<usize>,
    pub backend: BackendConfig,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            weigher: WeigherKind::default(),
            min_depth: MIN_DEPTH,
            context_window: 3,
            context_depth: 3,
            max_paths: None,
            backend: BackendConfig::default(),
        }
    }
}

impl SummarizerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.context_window == 0 {
            return Err(Error::Config("context_window must be at least 1".into()));
        }
        if self.context_depth == 0 {
            return Err(Error::Config("context_depth must be at least 1".into()));
        }
        if self.max_paths == Some(0) {
            return Err(Error::Config("max_paths must be at least 1 when set".into()));
        }
        Ok(())
    }

    pub fn context(&self) -> ContextWindow {
        ContextWindow { width: self.context_window, depth: self.context_depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SummarizerConfig::default();
        assert_eq!(config.weigher, WeigherKind::Advanced);
        assert_eq!(config.min_depth, 8);
        assert_eq!(config.context(), ContextWindow::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SummarizerConfig::from_toml_str("weigher = \"naive\"\nmax_paths = 500\n").unwrap();
        assert_eq!(config, SummarizerConfig {
            weigher: WeigherKind::Naive,
            max_paths: Some(500),
            ..SummarizerConfig::default()
        });
    }

    #[test]
    fn test_rejects_unknown_keys_and_zero_windows() {
        assert!(matches!(SummarizerConfig::from_toml_str("depth = 3"), Err(Error::Config(_))));
        assert!(matches!(SummarizerConfig::from_toml_str("context_window = 0"), Err(Error::Config(_))));
        assert!(matches!(SummarizerConfig::from_toml_str("weigher = \"fancy\""), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_depth = 4\nbackend = \"memory\"").unwrap();
        let config = SummarizerConfig::load(file.path()).unwrap();
        assert_eq!(config.min_depth, 4);
        assert_eq!(config.backend, BackendConfig::Memory);
    }
}
