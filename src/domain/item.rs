use serde::{Deserialize, Serialize};

/// A single to-do entry as persisted in the backing file.
///
/// `id` is provisional until the store assigns one on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: i32,
    pub text: String,
    pub complete: bool,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self { id: 0, text: text.into(), complete: false }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub text: String,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub text: Option<String>,
    pub complete: Option<bool>,
}

impl UpdateItem {
    pub fn apply(self, item: &mut Item) {
        if let Some(t) = self.text { item.text = t; }
        if let Some(c) = self.complete { item.complete = c; }
    }
}
