//! Structural checks on generated HTML documents.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

/// Documents above this size get a notice.
const MAX_SIZE_KB: f64 = 100.0;

/// Documents below this many bytes are considered empty.
const MIN_CONTENT_BYTES: usize = 500;

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^}]+\}\}").expect("Invalid variable regex"));

static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<img[^>]*>").expect("Invalid img regex"));

static URL_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:href|src)="([^"]*)""#).expect("Invalid url regex"));

/// A single check run against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Doctype,
    Charset,
    Styles,
    UnrenderedVariables,
    ImageAlt,
    AbsoluteUrls,
    FileSize,
    Content,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Check::Doctype => "DOCTYPE present",
            Check::Charset => "Charset meta tag present",
            Check::Styles => "CSS styles present",
            Check::UnrenderedVariables => "No unrendered variables",
            Check::ImageAlt => "All images have alt text",
            Check::AbsoluteUrls => "All URLs are absolute",
            Check::FileSize => "File size",
            Check::Content => "Content present",
        };
        f.write_str(label)
    }
}

/// How much a finding matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Counts as a failure
    Error,
    /// Counts as a failure, but the document is usable
    Warning,
    /// Reported only
    Notice,
}

/// A failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: Check,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of linting one document.
#[derive(Debug, Clone, Default)]
pub struct LintReport {
    /// Document name
    pub name: String,
    /// Checks that passed
    pub passed: Vec<Check>,
    /// Checks that did not
    pub findings: Vec<Finding>,
}

impl LintReport {
    /// Findings that count as failures.
    pub fn failures(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity != Severity::Notice)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures() == 0
    }

    fn pass(&mut self, check: Check) {
        self.passed.push(check);
    }

    fn fail(&mut self, check: Check, severity: Severity, message: String) {
        self.findings.push(Finding {
            check,
            severity,
            message,
        });
    }
}

/// Errors locating documents to lint.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("Output directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("File not found: {name} (available: {})", available.join(", "))]
    FileNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("No HTML files in {0}")]
    NoDocuments(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Run every check against `html`.
pub fn lint_document(name: &str, html: &str) -> LintReport {
    let mut report = LintReport {
        name: name.to_string(),
        ..Default::default()
    };

    if html.contains("<!DOCTYPE") {
        report.pass(Check::Doctype);
    } else {
        report.fail(Check::Doctype, Severity::Error, "Missing DOCTYPE".to_string());
    }

    if html.contains("charset=utf-8") {
        report.pass(Check::Charset);
    } else {
        report.fail(
            Check::Charset,
            Severity::Error,
            "Missing charset meta tag".to_string(),
        );
    }

    if html.contains("<style") {
        report.pass(Check::Styles);
    } else {
        report.fail(Check::Styles, Severity::Error, "No styles found".to_string());
    }

    let unrendered: Vec<&str> = VARIABLE_RE.find_iter(html).map(|m| m.as_str()).collect();
    if unrendered.is_empty() {
        report.pass(Check::UnrenderedVariables);
    } else {
        report.fail(
            Check::UnrenderedVariables,
            Severity::Error,
            format!("Unrendered variables found: {}", unrendered.join(", ")),
        );
    }

    let missing_alt = IMG_RE
        .find_iter(html)
        .filter(|m| !m.as_str().contains("alt="))
        .count();
    if missing_alt == 0 {
        report.pass(Check::ImageAlt);
    } else {
        report.fail(
            Check::ImageAlt,
            Severity::Warning,
            format!("{missing_alt} image(s) missing alt text"),
        );
    }

    let relative = URL_ATTR_RE
        .captures_iter(html)
        .filter(|c| !is_absolute_url(&c[1]))
        .count();
    if relative == 0 {
        report.pass(Check::AbsoluteUrls);
    } else {
        report.fail(
            Check::AbsoluteUrls,
            Severity::Warning,
            format!("{relative} relative URL(s) found (should be absolute)"),
        );
    }

    let size_kb = html.len() as f64 / 1024.0;
    if size_kb > MAX_SIZE_KB {
        report.fail(
            Check::FileSize,
            Severity::Notice,
            format!("Large file: {size_kb:.2}KB (consider optimizing)"),
        );
    } else {
        report.pass(Check::FileSize);
    }

    if html.len() < MIN_CONTENT_BYTES {
        report.fail(
            Check::Content,
            Severity::Error,
            format!(
                "Template too small ({} bytes) - likely missing content",
                html.len()
            ),
        );
    } else {
        report.pass(Check::Content);
    }

    report
}

/// Lint the `.html` documents in `dir`, skipping names starting with `_`.
///
/// With `only`, lint just that file; it must be one of the candidates.
pub fn lint_dir(dir: &Path, only: Option<&str>) -> Result<Vec<LintReport>, LintError> {
    if !dir.exists() {
        return Err(LintError::DirectoryNotFound(dir.display().to_string()));
    }

    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".html") && !name.starts_with('_'))
        .collect();

    if let Some(only) = only {
        if !names.iter().any(|n| n == only) {
            return Err(LintError::FileNotFound {
                name: only.to_string(),
                available: names,
            });
        }
        names = vec![only.to_string()];
    }

    if names.is_empty() {
        return Err(LintError::NoDocuments(dir.display().to_string()));
    }

    names
        .into_iter()
        .map(|name| {
            let path = dir.join(&name);
            let html = fs::read_to_string(&path).map_err(|e| LintError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            Ok(lint_document(&name, &html))
        })
        .collect()
}

fn is_absolute_url(url: &str) -> bool {
    ["http", "//", "mailto:", "tel:"]
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn well_formed() -> String {
        let filler = "<p>Content</p>\n".repeat(40);
        format!(
            "<!DOCTYPE html>\n<html><head>\
             <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\
             <style>p {{ margin: 0; }}</style></head><body>\
             <a href=\"https://example.com\"><img src=\"https://example.com/a.png\" alt=\"A\"></a>\
             <a href=\"mailto:hi@example.com\">mail</a>\n{filler}</body></html>"
        )
    }

    #[test]
    fn clean_document_passes_everything() {
        let report = lint_document("ok.html", &well_formed());

        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.passed.len(), 8);
    }

    #[test]
    fn flags_missing_structure() {
        let report = lint_document("bare.html", "<p>hi</p>");

        let failed: Vec<Check> = report.findings.iter().map(|f| f.check).collect();
        assert_eq!(
            failed,
            vec![Check::Doctype, Check::Charset, Check::Styles, Check::Content]
        );
    }

    #[test]
    fn flags_unrendered_variables() {
        let html = well_formed().replace("<p>Content</p>", "<p>{{ hero }}</p>");

        let report = lint_document("vars.html", &html);

        assert_eq!(report.failures(), 1);
        assert!(report.findings[0].message.contains("{{ hero }}"));
    }

    #[test]
    fn warns_on_images_and_relative_urls() {
        let html = well_formed().replace("alt=\"A\"", "").replace(
            "https://example.com\"><img",
            "/local\"><img",
        );

        let report = lint_document("warn.html", &html);

        let warnings: Vec<(Check, Severity)> =
            report.findings.iter().map(|f| (f.check, f.severity)).collect();
        assert_eq!(
            warnings,
            vec![
                (Check::ImageAlt, Severity::Warning),
                (Check::AbsoluteUrls, Severity::Warning),
            ]
        );
        assert_eq!(report.failures(), 2);
    }

    #[test]
    fn large_files_are_reported_but_not_failed() {
        let html = format!("{}{}", well_formed(), "x".repeat(110 * 1024));

        let report = lint_document("big.html", &html);

        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].severity, Severity::Notice);
        assert!(report.is_clean());
    }

    #[test]
    fn lints_directory_skipping_partials() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.html"), well_formed()).unwrap();
        fs::write(temp.path().join("_gui_boilerplate.html"), "x").unwrap();
        fs::write(temp.path().join("b.txt"), "x").unwrap();

        let reports = lint_dir(temp.path(), None).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "a.html");
    }

    #[test]
    fn named_file_must_exist() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.html"), well_formed()).unwrap();

        assert_eq!(lint_dir(temp.path(), Some("a.html")).unwrap().len(), 1);
        match lint_dir(temp.path(), Some("missing.html")) {
            Err(LintError::FileNotFound { available, .. }) => {
                assert_eq!(available, vec!["a.html".to_string()])
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn empty_or_missing_directory_is_an_error() {
        let temp = tempdir().unwrap();

        assert!(matches!(
            lint_dir(temp.path(), None),
            Err(LintError::NoDocuments(_))
        ));
        assert!(matches!(
            lint_dir(&temp.path().join("nope"), None),
            Err(LintError::DirectoryNotFound(_))
        ));
    }
}
