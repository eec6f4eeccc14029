//! Configuration file (tessera.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tessera_render::{BuildConfig, PipelineConfig, DEFAULT_EXPORT_FILENAME, LAYOUT_TEMPLATE};
use tessera_server::ServerConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_components")]
    pub components: PathBuf,
    #[serde(default = "default_templates")]
    pub templates: PathBuf,
    #[serde(default = "default_public")]
    pub public: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_build_output")]
    pub build_output: PathBuf,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct LayoutConfig {
    #[serde(default = "default_layout")]
    pub template: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_filename")]
    pub default_filename: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub open: bool,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct StoreConfig {
    #[serde(default)]
    pub cache: bool,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            components: default_components(),
            templates: default_templates(),
            public: default_public(),
            output: default_output(),
            build_output: default_build_output(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            template: default_layout(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_filename: default_filename(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open: true,
        }
    }
}

fn default_components() -> PathBuf {
    PathBuf::from("components")
}
fn default_templates() -> PathBuf {
    PathBuf::from("src/templates")
}
fn default_public() -> PathBuf {
    PathBuf::from("public")
}
fn default_output() -> PathBuf {
    PathBuf::from("GUI_Output")
}
fn default_build_output() -> PathBuf {
    PathBuf::from("Test")
}
fn default_layout() -> String {
    LAYOUT_TEMPLATE.to_string()
}
fn default_filename() -> String {
    DEFAULT_EXPORT_FILENAME.to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Settings for rendering and exporting a selection.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            components_dir: self.paths.components.clone(),
            templates_dir: Some(self.paths.templates.clone()),
            layout: self.layout.template.clone(),
            output_dir: self.paths.output.clone(),
            default_filename: self.export.default_filename.clone(),
            cache: self.store.cache,
        }
    }

    /// Settings for the batch template build.
    pub fn build(&self) -> BuildConfig {
        BuildConfig {
            components_dir: self.paths.components.clone(),
            templates_dir: self.paths.templates.clone(),
            output_dir: self.paths.build_output.clone(),
        }
    }

    /// Settings for the HTTP server.
    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            pipeline: self.pipeline(),
            public_dir: self.paths.public.clone(),
            port: self.server.port,
            host: self.server.host.clone(),
            open: self.server.open,
            watch: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = Config::load(&temp.path().join("tessera.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.pipeline().output_dir, PathBuf::from("GUI_Output"));
        assert_eq!(config.build().output_dir, PathBuf::from("Test"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tessera.toml");
        fs::write(
            &path,
            r#"
[paths]
components = "fragments"

[store]
cache = true
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.paths.components, PathBuf::from("fragments"));
        assert_eq!(config.paths.templates, PathBuf::from("src/templates"));
        assert!(config.pipeline().cache);
        assert_eq!(config.layout.template, LAYOUT_TEMPLATE);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tessera.toml");
        fs::write(&path, "[server\nport = ").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
