//! Lint command for built documents.

use std::path::PathBuf;

use anyhow::Result;
use tessera_render::{lint_dir, Severity};

use crate::config::Config;

/// Lint the documents in the build output folder.
pub fn run(config: &Config, file: Option<String>, dir: Option<PathBuf>) -> Result<()> {
    let dir = dir.unwrap_or_else(|| config.paths.build_output.clone());

    let reports = lint_dir(&dir, file.as_deref())?;
    tracing::info!("Found {} template(s) to validate", reports.len());

    let mut passed = 0;
    let mut failed = 0;

    for report in &reports {
        println!("\nTesting: {}", report.name);
        for check in &report.passed {
            println!("  ok    {}", check);
        }
        for finding in &report.findings {
            let label = match finding.severity {
                Severity::Error => "FAIL",
                Severity::Warning => "WARN",
                Severity::Notice => "NOTE",
            };
            println!("  {:<5} {}", label, finding.message);
        }

        passed += report.passed.len();
        failed += report.failures();
    }

    println!("\nResults: {} passed, {} failed", passed, failed);

    if failed > 0 {
        anyhow::bail!("{} check(s) failed", failed);
    }

    Ok(())
}
