mod memory;
pub use memory::*;
mod mongo;
pub use mongo::*;

use async_trait::async_trait;

use crate::models::Blueprint;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    AlreadyExists(String),
    /// The store refused the write for a reason other than a duplicate key.
    #[error("{0}")]
    Persistence(String),
    #[error("database error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

impl StoreError {
    pub fn blueprint_not_found(author: &str, name: &str) -> Self {
        StoreError::NotFound(format!("Blueprint not found: {}/{}", author, name))
    }

    pub fn author_not_found(author: &str) -> Self {
        StoreError::NotFound(format!("No blueprints found for author: {}", author))
    }

    pub fn already_exists(author: &str, name: &str) -> Self {
        StoreError::AlreadyExists(format!("Blueprint already exists: {}/{}", author, name))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable storage of blueprints keyed by `(author, name)`.
///
/// Implementations must hand points back in the order they were stored, including points
/// appended later through [`BlueprintStore::add_point`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlueprintStore: Send + Sync {
    /// Fails with [`StoreError::AlreadyExists`] if the pair is already taken.
    async fn save(&self, blueprint: Blueprint) -> StoreResult<()>;

    async fn get(&self, author: &str, name: &str) -> StoreResult<Blueprint>;

    /// Fails with [`StoreError::NotFound`] when the author has no blueprints.
    async fn get_by_author(&self, author: &str) -> StoreResult<Vec<Blueprint>>;

    async fn get_all(&self) -> StoreResult<Vec<Blueprint>>;

    /// Appends a point after the last one currently stored for the blueprint.
    async fn add_point(&self, author: &str, name: &str, x: i32, y: i32) -> StoreResult<()>;
}
