use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::item::ItemId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Storefront action that produced an interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    View,
    AddToCart,
    Purchase,
}

impl ActionKind {
    pub fn default_score(&self) -> u32 {
        match self {
            ActionKind::View => 1,
            ActionKind::AddToCart => 3,
            ActionKind::Purchase => 5,
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "add_to_cart" | "cart" => Ok(Self::AddToCart),
            "purchase" => Ok(Self::Purchase),
            other => Err(format!("unsupported action `{other}` (expected view|add_to_cart|purchase)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub action_score: u32,
    pub occurred_at: DateTime<Utc>,
}

impl InteractionEvent {
    pub fn new(user_id: i64, item_id: i64, action_score: u32) -> Self {
        Self { user_id: UserId(user_id), item_id: ItemId(item_id), action_score, occurred_at: Utc::now() }
    }

    pub fn from_action(
        user_id: UserId,
        item_id: ItemId,
        action: ActionKind,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self { user_id, item_id, action_score: action.default_score(), occurred_at }
    }
}
