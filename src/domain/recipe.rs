use serde::{Deserialize, Serialize};

/// One saved recipe, keyed by its derived title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub title: String,
    pub body: String,
}

/// Insertion-ordered catalog of saved recipes with at most one entry per
/// title. Entries live for the process lifetime unless cleared in bulk.
#[derive(Debug, Clone, Default)]
pub struct RecipeShelf {
    entries: Vec<RecipeEntry>,
}

impl RecipeShelf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a recipe under `title`, replacing any existing entry with the
    /// same title. The new entry always lands at the end, so re-saving a
    /// recipe moves it to the most-recent position.
    pub fn keep(&mut self, title: impl Into<String>, body: impl Into<String>) {
        let title = title.into();
        self.entries.retain(|e| e.title != title);
        self.entries.push(RecipeEntry {
            title,
            body: body.into(),
        });
    }

    /// Remove every saved recipe.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[RecipeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the display state for the saved-recipes panel.
    pub fn render(&self) -> ShelfView {
        ShelfView {
            visible: !self.entries.is_empty(),
            items: self.entries.iter().map(ShelfItem::from_entry).collect(),
        }
    }
}

/// Render state for the saved-recipes panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfView {
    /// The panel is shown only when there is something to show.
    pub visible: bool,
    pub items: Vec<ShelfItem>,
}

/// One downloadable recipe in the panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfItem {
    pub title: String,
    /// Title with spaces replaced by hyphens, plain-text extension.
    pub filename: String,
    /// Raw download payload: the recipe body.
    pub content: String,
}

impl ShelfItem {
    fn from_entry(entry: &RecipeEntry) -> Self {
        Self {
            title: entry.title.clone(),
            filename: format!("{}.txt", entry.title.replace(' ', "-")),
            content: entry.body.clone(),
        }
    }
}
