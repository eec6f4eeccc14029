//! Template rendering using minijinja.

use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tessera_components::RenderContext;

/// Reserved name of the full-page layout template.
pub const LAYOUT_TEMPLATE: &str = "_gui_boilerplate.njk";

/// Errors raised by the template engine.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to render template {template}: {message}")]
    Template { template: String, message: String },
}

impl RenderError {
    fn from_engine(template: &str, err: minijinja::Error) -> Self {
        Self::Template {
            template: template.to_string(),
            message: err.to_string(),
        }
    }
}

/// Renders templates against a [`RenderContext`].
///
/// Fragment content is raw markup, so autoescaping is off and block/line
/// stripping is disabled to keep whitespace byte-for-byte.
pub struct Renderer {
    env: Environment<'static>,
    layout: String,
    templates_dir: Option<PathBuf>,
}

impl Renderer {
    /// Load templates from `templates_dir` on demand.
    ///
    /// Template names are paths relative to that directory. `layout` is the
    /// name [`Renderer::render_layout`] uses.
    pub fn from_dir(templates_dir: impl AsRef<Path>, layout: impl Into<String>) -> Self {
        let templates_dir = templates_dir.as_ref().to_path_buf();
        let mut env = base_environment();
        env.set_loader(minijinja::path_loader(&templates_dir));

        Self {
            env,
            layout: layout.into(),
            templates_dir: Some(templates_dir),
        }
    }

    /// Renderer with only the built-in [`DEFAULT_LAYOUT`] registered under
    /// [`LAYOUT_TEMPLATE`].
    pub fn builtin() -> Self {
        let mut env = base_environment();
        env.add_template_owned(LAYOUT_TEMPLATE.to_string(), DEFAULT_LAYOUT.to_string())
            .expect("Failed to add default layout");

        Self {
            env,
            layout: LAYOUT_TEMPLATE.to_string(),
            templates_dir: None,
        }
    }

    /// Name of the layout template.
    pub fn layout(&self) -> &str {
        &self.layout
    }

    /// Directory templates are loaded from, if any.
    pub fn templates_dir(&self) -> Option<&Path> {
        self.templates_dir.as_deref()
    }

    /// Render the named template.
    ///
    /// Variables missing from `ctx` render as empty; unused ones are ignored.
    pub fn render(&self, template: &str, ctx: &RenderContext) -> Result<String, RenderError> {
        let tmpl = self
            .env
            .get_template(template)
            .map_err(|e| RenderError::from_engine(template, e))?;

        tmpl.render(ctx)
            .map_err(|e| RenderError::from_engine(template, e))
    }

    /// Render the full-page layout.
    pub fn render_layout(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        self.render(&self.layout, ctx)
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_trim_blocks(false);
    env.set_lstrip_blocks(false);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Chainable);
    env
}

/// Layout written by `tessera init` and used when no templates directory
/// is configured.
pub const DEFAULT_LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta http-equiv="Content-Type" content="text/html; charset=utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Template</title>
  <style type="text/css">
{{ styles }}
  </style>
</head>
<body>
{{ assembledComponents }}
</body>
</html>
"##;
