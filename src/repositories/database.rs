//! SeaORM-backed operation repository (PostgreSQL in production)

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use super::{OperationRepository, RepositoryError};
use crate::entities::{operacoes, prelude::Operacoes};
use crate::models::operation::{Operation, OperationStatus};

#[derive(Clone)]
pub struct SeaOrmOperationRepository {
    db: DatabaseConnection,
}

impl SeaOrmOperationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OperationRepository for SeaOrmOperationRepository {
    async fn add(&self, operation: &Operation) -> Result<(), RepositoryError> {
        let row = operacoes::ActiveModel {
            id: Set(operation.id()),
            amount: Set(operation.amount()),
            status: Set(operation.status().code()),
            version: Set(operation.version()),
            created_at: Set(operation.created_at()),
        };

        Operacoes::insert(row).exec_without_returning(&self.db).await?;

        debug!("Inserted operation {}", operation.id());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Operation>, RepositoryError> {
        Operacoes::find_by_id(id)
            .one(&self.db)
            .await?
            .map(into_operation)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Operation>, RepositoryError> {
        Operacoes::find()
            .order_by_asc(operacoes::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(into_operation)
            .collect()
    }

    async fn update(&self, operation: &Operation) -> Result<Operation, RepositoryError> {
        let next_version = operation.version() + 1;

        let result = Operacoes::update_many()
            .col_expr(operacoes::Column::Status, Expr::value(operation.status().code()))
            .col_expr(operacoes::Column::Version, Expr::value(next_version))
            .filter(operacoes::Column::Id.eq(operation.id()))
            .filter(operacoes::Column::Version.eq(operation.version()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            let exists = Operacoes::find_by_id(operation.id())
                .one(&self.db)
                .await?
                .is_some();

            return Err(if exists {
                RepositoryError::Conflict(operation.id())
            } else {
                RepositoryError::NotFound(operation.id())
            });
        }

        debug!(
            "Updated operation {} to {} (version {})",
            operation.id(),
            operation.status(),
            next_version
        );

        Ok(Operation::restore(
            operation.id(),
            operation.amount(),
            operation.status(),
            operation.created_at(),
            next_version,
        ))
    }
}

fn into_operation(model: operacoes::Model) -> Result<Operation, RepositoryError> {
    let status = OperationStatus::try_from(model.status).map_err(|e| {
        RepositoryError::Storage(format!("Corrupt row for operation {}: {}", model.id, e))
    })?;

    Ok(Operation::restore(
        model.id,
        model.amount,
        status,
        model.created_at,
        model.version,
    ))
}
