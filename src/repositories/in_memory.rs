//! In-process operation repository
//!
//! Used when no `DATABASE_URL` is configured and by the HTTP tests. Applies
//! the same version check as the SeaORM repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{OperationRepository, RepositoryError};
use crate::models::operation::Operation;

#[derive(Clone, Default)]
pub struct InMemoryOperationRepository {
    operations: Arc<RwLock<HashMap<Uuid, Operation>>>,
}

impl InMemoryOperationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.operations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.read().is_empty()
    }
}

#[async_trait]
impl OperationRepository for InMemoryOperationRepository {
    async fn add(&self, operation: &Operation) -> Result<(), RepositoryError> {
        let mut operations = self.operations.write();
        if operations.contains_key(&operation.id()) {
            return Err(RepositoryError::Storage(format!(
                "Duplicate operation id {}",
                operation.id()
            )));
        }
        operations.insert(operation.id(), operation.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Operation>, RepositoryError> {
        Ok(self.operations.read().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Operation>, RepositoryError> {
        let mut operations: Vec<Operation> = self.operations.read().values().cloned().collect();
        operations.sort_by_key(|op| op.created_at());
        Ok(operations)
    }

    async fn update(&self, operation: &Operation) -> Result<Operation, RepositoryError> {
        let mut operations = self.operations.write();
        let stored = operations
            .get_mut(&operation.id())
            .ok_or(RepositoryError::NotFound(operation.id()))?;

        if stored.version() != operation.version() {
            return Err(RepositoryError::Conflict(operation.id()));
        }

        let updated = Operation::restore(
            operation.id(),
            operation.amount(),
            operation.status(),
            operation.created_at(),
            operation.version() + 1,
        );
        *stored = updated.clone();
        Ok(updated)
    }
}
