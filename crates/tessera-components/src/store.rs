//! Component store: reads a directory of fragment files.
//!
//! `.html` files are selectable components. `.css` files take part in
//! rendering under their derived name but are never listed. Everything is
//! re-read from disk on each call.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::context::RenderContext;
use crate::naming::{derive, display_name, sanitize};

/// Kind of fragment file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Html,
    Css,
}

impl FragmentKind {
    /// Classify a file name, or `None` for files that are not fragments.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".html") {
            Some(Self::Html)
        } else if file_name.ends_with(".css") {
            Some(Self::Css)
        } else {
            None
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
        }
    }
}

/// A fragment file read from disk.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Full path the content was read from
    pub source_path: PathBuf,

    /// Bare file name, e.g. `day_banner.html`
    pub file_name: String,

    /// Html or Css
    pub kind: FragmentKind,

    /// Template variable this fragment is bound to
    pub identifier: String,

    /// File contents, verbatim
    pub raw_content: String,
}

/// UI-facing view of an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    pub id: String,
    pub name: String,
    pub file_name: String,
    pub content: String,
}

impl From<&Fragment> for ComponentDescriptor {
    fn from(fragment: &Fragment) -> Self {
        Self {
            id: fragment.identifier.clone(),
            name: display_name(&fragment.file_name),
            file_name: fragment.file_name.clone(),
            content: fragment.raw_content.clone(),
        }
    }
}

/// Errors that can occur while reading fragments.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Components directory not found: {0}")]
    NotFound(String),

    #[error("Fragments {first} and {second} both map to template variable `{identifier}`")]
    Collision {
        identifier: String,
        first: String,
        second: String,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads fragments from a single directory.
#[derive(Debug, Clone)]
pub struct ComponentStore {
    dir: PathBuf,
}

impl ComponentStore {
    /// Create a store over `dir`. Nothing is read until asked.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The fragment directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List every `.html` fragment as a descriptor.
    ///
    /// Fails with [`StoreError::NotFound`] when the directory is missing.
    pub fn discover(&self) -> Result<Vec<ComponentDescriptor>, StoreError> {
        let fragments = self
            .read_fragments()?
            .ok_or_else(|| StoreError::NotFound(self.dir.display().to_string()))?;

        descriptors(&fragments)
    }

    /// Load every `.html` and `.css` fragment into a render context.
    ///
    /// A missing directory yields an empty context so rendering can still
    /// produce the bare layout.
    pub fn load_context(&self) -> Result<RenderContext, StoreError> {
        match self.read_fragments()? {
            Some(fragments) => context(&fragments),
            None => {
                tracing::warn!(
                    "Components directory not found: {}, rendering with no fragments",
                    self.dir.display()
                );
                Ok(RenderContext::new())
            }
        }
    }

    /// Read all fragment files, in file-name order.
    ///
    /// Returns `Ok(None)` when the directory does not exist.
    pub fn read_fragments(&self) -> Result<Option<Vec<Fragment>>, StoreError> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let mut fragments = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| StoreError::Io {
                path: self.dir.display().to_string(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };

            // Anything that is not .html or .css is not a fragment
            let Some(kind) = FragmentKind::from_file_name(file_name) else {
                continue;
            };

            let path = entry.path();
            let raw_content = fs::read_to_string(path).map_err(|e| StoreError::Io {
                path: path.display().to_string(),
                source: e,
            })?;

            let derived = derive(file_name);
            let identifier = sanitize(&derived).into_owned();
            if identifier != derived {
                tracing::warn!(
                    "Fragment {} derives `{}`, which is not a valid template variable; using `{}`",
                    file_name,
                    derived,
                    identifier
                );
            }

            tracing::debug!("Loaded {} -> {{{{ {} }}}}", file_name, identifier);

            fragments.push(Fragment {
                source_path: path.to_path_buf(),
                file_name: file_name.to_string(),
                kind,
                identifier,
                raw_content,
            });
        }

        Ok(Some(fragments))
    }
}

/// Build listing descriptors from the HTML fragments of a batch.
pub fn descriptors(fragments: &[Fragment]) -> Result<Vec<ComponentDescriptor>, StoreError> {
    let html: Vec<&Fragment> = fragments
        .iter()
        .filter(|f| f.kind == FragmentKind::Html)
        .collect();

    check_unique(html.iter().copied())?;

    Ok(html.into_iter().map(ComponentDescriptor::from).collect())
}

/// Build a render context from every fragment of a batch.
pub fn context(fragments: &[Fragment]) -> Result<RenderContext, StoreError> {
    check_unique(fragments.iter())?;

    Ok(fragments
        .iter()
        .map(|f| (f.identifier.clone(), f.raw_content.clone()))
        .collect())
}

/// Reject two fragments bound to the same identifier.
fn check_unique<'a>(fragments: impl Iterator<Item = &'a Fragment>) -> Result<(), StoreError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for fragment in fragments {
        if let Some(first) = seen.insert(&fragment.identifier, &fragment.file_name) {
            return Err(StoreError::Collision {
                identifier: fragment.identifier.clone(),
                first: first.to_string(),
                second: fragment.file_name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_fixture(dir: &Path) {
        fs::write(dir.join("hero.html"), "<h1>Hero</h1>").unwrap();
        fs::write(dir.join("day_banner.html"), "<div>Day</div>").unwrap();
        fs::write(dir.join("styles.css"), "body { margin: 0; }").unwrap();
        fs::write(dir.join("notes.txt"), "ignore me").unwrap();
    }

    #[test]
    fn lists_only_html_fragments() {
        let temp = tempdir().unwrap();
        write_fixture(temp.path());

        let store = ComponentStore::new(temp.path());
        let listed = store.discover().unwrap();

        let ids: Vec<&str> = listed.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["dayBanner", "hero"]);

        assert_eq!(
            listed[0],
            ComponentDescriptor {
                id: "dayBanner".to_string(),
                name: "day banner".to_string(),
                file_name: "day_banner.html".to_string(),
                content: "<div>Day</div>".to_string(),
            }
        );
    }

    #[test]
    fn context_includes_stylesheets() {
        let temp = tempdir().unwrap();
        write_fixture(temp.path());

        let ctx = ComponentStore::new(temp.path()).load_context().unwrap();

        let keys: Vec<&str> = ctx.keys().collect();
        assert_eq!(keys, vec!["dayBanner", "hero", "styles"]);
        assert_eq!(ctx.get("styles"), Some("body { margin: 0; }"));
        assert!(!ctx.contains("notes"));
    }

    #[test]
    fn missing_directory_differs_by_path() {
        let temp = tempdir().unwrap();
        let store = ComponentStore::new(temp.path().join("nope"));

        assert!(matches!(store.discover(), Err(StoreError::NotFound(_))));
        assert!(store.load_context().unwrap().is_empty());
    }

    #[test]
    fn rejects_identifier_collisions() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("day_banner.html"), "a").unwrap();
        fs::write(temp.path().join("dayBanner.html"), "b").unwrap();

        let err = ComponentStore::new(temp.path()).discover().unwrap_err();

        match err {
            StoreError::Collision { identifier, .. } => assert_eq!(identifier, "dayBanner"),
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn html_and_css_with_same_stem_collide_only_in_context() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("hero.html"), "<h1></h1>").unwrap();
        fs::write(temp.path().join("hero.css"), "h1 {}").unwrap();

        let store = ComponentStore::new(temp.path());

        assert_eq!(store.discover().unwrap().len(), 1);
        assert!(matches!(
            store.load_context(),
            Err(StoreError::Collision { .. })
        ));
    }

    #[test]
    fn sanitizes_digit_leading_names() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("3_columns.html"), "<table></table>").unwrap();

        let store = ComponentStore::new(temp.path());
        let listed = store.discover().unwrap();

        assert_eq!(listed[0].id, "_3Columns");
        assert_eq!(listed[0].name, "3 columns");
        assert!(store.load_context().unwrap().contains("_3Columns"));
    }

    #[test]
    fn skips_subdirectories() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("nested.html")).unwrap();
        fs::write(temp.path().join("hero.html"), "x").unwrap();

        let listed = ComponentStore::new(temp.path()).discover().unwrap();

        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn reflects_current_disk_state() {
        let temp = tempdir().unwrap();
        let store = ComponentStore::new(temp.path());
        fs::write(temp.path().join("hero.html"), "v1").unwrap();

        assert_eq!(store.load_context().unwrap().get("hero"), Some("v1"));

        fs::write(temp.path().join("hero.html"), "v2").unwrap();

        assert_eq!(store.load_context().unwrap().get("hero"), Some("v2"));
    }
}
