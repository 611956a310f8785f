use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recommend::tags::extract_tags;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Comma-separated free text; the source of the item's tag set.
    pub description: Option<String>,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>, description: Option<&str>) -> Self {
        Self { id: ItemId(id), name: name.into(), description: description.map(str::to_owned) }
    }

    pub fn tags(&self) -> BTreeSet<String> {
        extract_tags(self.description.as_deref())
    }
}
