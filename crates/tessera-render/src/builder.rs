//! Batch build: render every template in the templates directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use tessera_components::{ComponentStore, RenderContext, StoreError};

use crate::renderer::Renderer;

/// Extension of source templates.
const TEMPLATE_EXT: &str = "njk";

/// Configuration for a batch build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Fragment directory
    pub components_dir: PathBuf,

    /// Directory holding `*.njk` templates
    pub templates_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            components_dir: PathBuf::from("components"),
            templates_dir: PathBuf::from("src/templates"),
            output_dir: PathBuf::from("Test"),
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of templates written
    pub templates: usize,

    /// Number of fragments bound into the context
    pub components: usize,

    /// Templates that failed to render or write
    pub failed: Vec<String>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Templates directory not found: {0}")]
    TemplatesNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Renders each template with the discovered fragments and writes `.html`.
pub struct TemplateBuilder {
    config: BuildConfig,
}

impl TemplateBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build every template.
    ///
    /// A template that fails is logged and listed in
    /// [`BuildResult::failed`]; the rest are still written.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        if !self.config.templates_dir.exists() {
            return Err(BuildError::TemplatesNotFound(
                self.config.templates_dir.display().to_string(),
            ));
        }

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let ctx = ComponentStore::new(&self.config.components_dir).load_context()?;
        tracing::info!("Found {} component(s)", ctx.len());

        let templates = self.discover_templates();
        if templates.is_empty() {
            tracing::warn!(
                "No .{} templates found in {}",
                TEMPLATE_EXT,
                self.config.templates_dir.display()
            );
        }

        let renderer = Renderer::from_dir(&self.config.templates_dir, String::new());

        let results: Vec<(String, Result<PathBuf, String>)> = templates
            .par_iter()
            .map(|name| (name.clone(), self.build_template(&renderer, name, &ctx)))
            .collect();

        let mut built = 0;
        let mut failed = Vec::new();

        for (name, result) in results {
            match result {
                Ok(path) => {
                    tracing::info!("Built {} -> {}", name, path.display());
                    built += 1;
                }
                Err(message) => {
                    tracing::error!("Failed to build {}: {}", name, message);
                    failed.push(name);
                }
            }
        }

        Ok(BuildResult {
            templates: built,
            components: ctx.len(),
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Template names directly under the templates directory, sorted.
    fn discover_templates(&self) -> Vec<String> {
        WalkDir::new(&self.config.templates_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| {
                Path::new(name).extension().and_then(|e| e.to_str()) == Some(TEMPLATE_EXT)
            })
            .collect()
    }

    fn build_template(
        &self,
        renderer: &Renderer,
        name: &str,
        ctx: &RenderContext,
    ) -> Result<PathBuf, String> {
        let html = renderer.render(name, ctx).map_err(|e| e.to_string())?;

        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        let output_path = self.config.output_dir.join(format!("{stem}.html"));

        fs::write(&output_path, html).map_err(|e| e.to_string())?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn config(root: &Path) -> BuildConfig {
        let components = root.join("components");
        let templates = root.join("templates");
        fs::create_dir_all(&components).unwrap();
        fs::create_dir_all(&templates).unwrap();

        fs::write(components.join("hero.html"), "<h1>Hero</h1>").unwrap();
        fs::write(components.join("day_banner.html"), "<div>Day</div>").unwrap();

        BuildConfig {
            components_dir: components,
            templates_dir: templates,
            output_dir: root.join("Test"),
        }
    }

    #[test]
    fn renders_each_template_with_fragments() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        fs::write(
            config.templates_dir.join("welcome.njk"),
            "{{ hero }}\n{{ dayBanner }}",
        )
        .unwrap();
        fs::write(config.templates_dir.join("notes.txt"), "skip").unwrap();

        let result = TemplateBuilder::new(config).build().unwrap();

        assert_eq!(result.templates, 1);
        assert_eq!(result.components, 2);
        assert!(result.failed.is_empty());
        assert_eq!(
            fs::read_to_string(temp.path().join("Test/welcome.html")).unwrap(),
            "<h1>Hero</h1>\n<div>Day</div>"
        );
        assert!(!temp.path().join("Test/notes.html").exists());
    }

    #[test]
    fn broken_template_does_not_stop_others() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        fs::write(config.templates_dir.join("good.njk"), "{{ hero }}").unwrap();
        fs::write(config.templates_dir.join("bad.njk"), "{% for %}").unwrap();

        let result = TemplateBuilder::new(config).build().unwrap();

        assert_eq!(result.templates, 1);
        assert_eq!(result.failed, vec!["bad.njk".to_string()]);
        assert!(temp.path().join("Test/good.html").exists());
    }

    #[test]
    fn build_does_not_inject_assembled_components() {
        let temp = tempdir().unwrap();
        let config = config(temp.path());
        fs::write(config.templates_dir.join("page.njk"), "[{{ assembledComponents }}]").unwrap();

        TemplateBuilder::new(config).build().unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("Test/page.html")).unwrap(),
            "[]"
        );
    }

    #[test]
    fn missing_templates_directory_is_an_error() {
        let temp = tempdir().unwrap();
        let config = BuildConfig {
            templates_dir: temp.path().join("nope"),
            ..config(temp.path())
        };

        assert!(matches!(
            TemplateBuilder::new(config).build(),
            Err(BuildError::TemplatesNotFound(_))
        ));
    }
}
