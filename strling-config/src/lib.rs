//! Configuration for STRling tools
//!
//! The defaults live in `defaults/strling.default.toml` and are compiled in,
//! so a missing or partial user file still yields a complete
//! [`StrlingConfig`]. User files only name the keys they change.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/strling.default.toml");

/// Top-level configuration consumed by STRling applications.
#[derive(Debug, Clone, Deserialize)]
pub struct StrlingConfig {
    pub emit: EmitConfig,
    pub diagnostics: DiagnosticsConfig,
    pub artifact: ArtifactConfig,
}

/// Code generation knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct EmitConfig {
    pub target: String,
    pub flags_prefix: bool,
}

/// How parse errors are reported.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagnosticsConfig {
    pub format: DiagnosticsFormat,
    pub hints: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticsFormat {
    /// Source line, caret and hint.
    Text,
    /// `{"message", "pos", "hint"}`.
    Json,
    /// An LSP `Diagnostic` object.
    Lsp,
}

/// JSON output of artifacts and IR.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    pub pretty: bool,
    pub include_features: bool,
}

/// Builds a [`StrlingConfig`] from layered TOML sources.
///
/// Later layers win key by key. The `strling` binary stacks them as
/// embedded defaults, then `./strling.toml`, then `--config FILE`.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file that must exist; `build` fails otherwise.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists, such as a per-project `strling.toml`.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    /// Set one dotted key, e.g. `("emit.flags_prefix", false)`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge every layer. Unknown enum values such as a bad
    /// `diagnostics.format` are reported here.
    pub fn build(self) -> Result<StrlingConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults with nothing layered on top.
pub fn load_defaults() -> Result<StrlingConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.emit.target, "pcre2");
        assert!(config.emit.flags_prefix);
        assert_eq!(config.diagnostics.format, DiagnosticsFormat::Text);
        assert!(config.diagnostics.hints);
        assert!(config.artifact.pretty);
        assert!(config.artifact.include_features);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("diagnostics.format", "lsp")
            .expect("override to apply")
            .set_override("emit.flags_prefix", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.diagnostics.format, DiagnosticsFormat::Lsp);
        assert!(!config.emit.flags_prefix);
    }

    #[test]
    fn rejects_unknown_diagnostics_format() {
        let result = Loader::new()
            .set_override("diagnostics.format", "yaml")
            .expect("override to apply")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("definitely/not/here/strling.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.emit.target, "pcre2");
    }

    #[test]
    fn later_files_override_only_the_keys_they_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let project = dir.path().join("strling.toml");
        let explicit = dir.path().join("custom.toml");
        std::fs::write(&project, "[diagnostics]\nformat = \"json\"\nhints = false\n")
            .expect("write project config");
        std::fs::write(&explicit, "[diagnostics]\nformat = \"lsp\"\n").expect("write config");

        let config = Loader::new()
            .with_optional_file(&project)
            .with_file(&explicit)
            .build()
            .expect("config to build");
        assert_eq!(config.diagnostics.format, DiagnosticsFormat::Lsp);
        assert!(!config.diagnostics.hints);
        assert_eq!(config.emit.target, "pcre2");
        assert!(config.artifact.pretty);
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("definitely/not/here/strling.toml")
            .build();
        assert!(result.is_err());
    }
}
