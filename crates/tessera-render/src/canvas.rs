//! Selection state for the builder canvas.

use serde::{Deserialize, Serialize};

/// Preview viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Mobile,
    Desktop,
}

impl Viewport {
    /// Preview frame width in CSS pixels.
    pub fn width(self) -> u32 {
        match self {
            Viewport::Mobile => 375,
            Viewport::Desktop => 1200,
        }
    }
}

/// The ordered component selection plus the viewport it is previewed in.
///
/// All edits go through this type; views are derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    selection: Vec<String>,
    viewport: Viewport,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered component identifiers, duplicates included.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Append a component at the end.
    pub fn add(&mut self, id: impl Into<String>) {
        self.selection.push(id.into());
    }

    /// Insert at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, id: impl Into<String>) {
        let index = index.min(self.selection.len());
        self.selection.insert(index, id.into());
    }

    /// Move the item at `from` to position `to`. Out of range `from` is a no-op.
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.selection.len() {
            return;
        }
        let id = self.selection.remove(from);
        let to = to.min(self.selection.len());
        self.selection.insert(to, id);
    }

    /// Remove and return the item at `index`.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.selection.len()).then(|| self.selection.remove(index))
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }
}

impl<S: Into<String>> FromIterator<S> for Canvas {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            selection: iter.into_iter().map(Into::into).collect(),
            viewport: Viewport::default(),
        }
    }
}
