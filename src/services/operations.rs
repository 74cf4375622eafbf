//! Operation use cases
//!
//! Each mutating use case does one load, one entity call and one write, then
//! flattens the entity into an [`OperationResponse`]. There is no retry and no
//! compensation: if the write fails the stored state is whatever was last
//! committed.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::operation::{Operation, OperationError, OperationResponse};
use crate::repositories::{OperationRepository, RepositoryError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("operation {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("operation {0} was modified by another request")]
    Conflict(Uuid),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<OperationError> for ServiceError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::InvalidArgument(_) => ServiceError::InvalidArgument(err.to_string()),
            OperationError::InvalidTransition { .. } => {
                ServiceError::InvalidTransition(err.to_string())
            }
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ServiceError::NotFound(id),
            RepositoryError::Conflict(id) => ServiceError::Conflict(id),
            RepositoryError::Storage(msg) => ServiceError::Storage(msg),
        }
    }
}

/// Create / Approve / Process / List use cases over a shared repository
#[derive(Clone)]
pub struct OperationService {
    repository: Arc<dyn OperationRepository>,
}

impl OperationService {
    pub fn new(repository: Arc<dyn OperationRepository>) -> Self {
        Self { repository }
    }

    /// Create a new operation in status `Criada`
    pub async fn create(&self, amount: Decimal) -> Result<OperationResponse, ServiceError> {
        let operation = Operation::new(amount).inspect_err(|e| {
            warn!("Rejected operation with amount {}: {}", amount, e);
        })?;

        self.repository
            .add(&operation)
            .await
            .inspect_err(|e| error!("Failed to store operation {}: {}", operation.id(), e))?;

        info!("Created operation {} ({})", operation.id(), operation.amount());
        Ok(OperationResponse::from(&operation))
    }

    pub async fn approve(&self, id: Uuid) -> Result<OperationResponse, ServiceError> {
        self.apply(id, "approve", Operation::approve).await
    }

    pub async fn process(&self, id: Uuid) -> Result<OperationResponse, ServiceError> {
        self.apply(id, "process", Operation::process).await
    }

    /// All operations in repository order
    pub async fn list(&self) -> Result<Vec<OperationResponse>, ServiceError> {
        let operations = self
            .repository
            .list()
            .await
            .inspect_err(|e| error!("Failed to list operations: {}", e))?;

        Ok(operations.iter().map(OperationResponse::from).collect())
    }

    async fn apply(
        &self,
        id: Uuid,
        action: &str,
        transition: fn(&mut Operation) -> Result<(), OperationError>,
    ) -> Result<OperationResponse, ServiceError> {
        let mut operation = self
            .repository
            .get_by_id(id)
            .await
            .inspect_err(|e| error!("Failed to load operation {}: {}", id, e))?
            .ok_or(ServiceError::NotFound(id))?;

        transition(&mut operation).inspect_err(|e| {
            warn!("Refused to {} operation {}: {}", action, id, e);
        })?;

        let stored = self.repository.update(&operation).await.inspect_err(|e| match e {
            RepositoryError::Conflict(_) => warn!("Concurrent update on operation {}", id),
            _ => error!("Failed to {} operation {}: {}", action, id, e),
        })?;

        info!("Operation {} is now {}", id, stored.status());
        Ok(OperationResponse::from(&stored))
    }
}
