//! Scaffold a tessera project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tessera_render::{DEFAULT_LAYOUT, LAYOUT_TEMPLATE};

/// Run the init command.
///
/// Files are created next to `config_path`. Existing files are kept unless
/// `yes` is set.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing tessera...");

    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    write_file(config_path, DEFAULT_CONFIG, yes)?;

    let templates_dir = root.join("src").join("templates");
    fs::create_dir_all(&templates_dir).context("Failed to create templates directory")?;
    write_file(&templates_dir.join(LAYOUT_TEMPLATE), DEFAULT_LAYOUT, yes)?;

    let components_dir = root.join("components");
    fs::create_dir_all(&components_dir).context("Failed to create components directory")?;
    write_file(&components_dir.join("hero.html"), DEFAULT_HERO, yes)?;
    write_file(&components_dir.join("day_banner.html"), DEFAULT_DAY_BANNER, yes)?;
    write_file(&components_dir.join("styles.css"), DEFAULT_STYLES, yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'tessera serve' to start building templates.");

    Ok(())
}

fn write_file(path: &Path, content: &str, overwrite: bool) -> Result<()> {
    if path.exists() && !overwrite {
        tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
        return Ok(());
    }

    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Created {}", path.display());

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Tessera Configuration

[paths]
# Fragment directory (.html components, .css stylesheets)
components = "components"

# Template root; must contain the layout template
templates = "src/templates"

# Static builder UI
public = "public"

# Export folder
output = "GUI_Output"

# Batch build folder
build_output = "Test"

[layout]
template = "_gui_boilerplate.njk"

[export]
default_filename = "exported_template.html"

[server]
host = "127.0.0.1"
port = 3000
open = true

[store]
# Keep fragments in memory until a file changes
cache = false
"#;

const DEFAULT_HERO: &str = r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0">
  <tr>
    <td class="hero">
      <h1>Welcome</h1>
      <img src="https://example.com/hero.png" alt="Hero image" width="600">
    </td>
  </tr>
</table>
"#;

const DEFAULT_DAY_BANNER: &str = r#"<table role="presentation" width="100%" cellpadding="0" cellspacing="0">
  <tr>
    <td class="day-banner">
      <p>Today only: <a href="https://example.com/offer">see the offer</a></p>
    </td>
  </tr>
</table>
"#;

const DEFAULT_STYLES: &str = r#"body { margin: 0; padding: 0; font-family: Arial, sans-serif; }
.hero { padding: 24px; text-align: center; }
.day-banner { padding: 12px; background: #f5f5f5; }
"#;
