use thiserror::Error;

use recommend_core::errors::ApplicationError;

pub mod interaction;
pub mod item;
pub mod memory;

pub use interaction::SqlInteractionRepository;
pub use item::SqlItemRepository;
pub use memory::{InMemoryCatalog, InMemoryInteractionLog};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl RepositoryError {
    pub fn into_catalog_error(self) -> ApplicationError {
        ApplicationError::Catalog(self.to_string())
    }

    pub fn into_interaction_log_error(self) -> ApplicationError {
        ApplicationError::InteractionLog(self.to_string())
    }
}
