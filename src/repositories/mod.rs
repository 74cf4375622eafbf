//! Persistence port for operations
//!
//! The repository is the only owner of durable state. Implementations never
//! inspect or change an operation's status; they store what they are given.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::operation::Operation;

pub mod database;
pub mod in_memory;

pub use database::SeaOrmOperationRepository;
pub use in_memory::InMemoryOperationRepository;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// `update` targeted an operation that does not exist
    #[error("operation {0} not found")]
    NotFound(Uuid),

    /// The stored version no longer matches the one the caller loaded
    #[error("operation {0} was modified by another request")]
    Conflict(Uuid),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sea_orm::DbErr> for RepositoryError {
    fn from(err: sea_orm::DbErr) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

/// Storage for operations.
///
/// Every call is a future; dropping it cancels the in-flight I/O.
#[async_trait]
pub trait OperationRepository: Send + Sync {
    /// Persist a brand-new operation
    async fn add(&self, operation: &Operation) -> Result<(), RepositoryError>;

    /// Load an operation, `None` when it does not exist
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Operation>, RepositoryError>;

    /// Load every operation. Callers must not rely on the order.
    async fn list(&self) -> Result<Vec<Operation>, RepositoryError>;

    /// Persist the current state of an existing operation.
    ///
    /// Succeeds only if the stored version still equals `operation.version()`;
    /// returns the operation as stored, carrying the bumped version.
    async fn update(&self, operation: &Operation) -> Result<Operation, RepositoryError>;
}
