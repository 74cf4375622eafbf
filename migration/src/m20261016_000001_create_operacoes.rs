//! Migration to create the operacoes table
//!
//! One row per operation. `status` holds the stable integer code of the
//! lifecycle state (0=Criada, 1=Aprovada, 2=Processada, 3=Cancelada) and
//! `version` backs the conditional update used for optimistic concurrency.

use sea_orm_migration::{prelude::*, sea_orm::DbBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut amount = ColumnDef::new(Operacoes::Amount);
        match manager.get_database_backend() {
            // SQLite has no fixed-point type and sea-query caps its precision at 16
            DbBackend::Sqlite => amount.decimal(),
            _ => amount.decimal_len(18, 2), // numeric(18,2) in PostgreSQL
        };
        amount.not_null();

        manager
            .create_table(
                Table::create()
                    .table(Operacoes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Operacoes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(&mut amount)
                    .col(
                        ColumnDef::new(Operacoes::Status)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Operacoes::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Operacoes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for filtering by status
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_operacoes_status")
                    .table(Operacoes::Table)
                    .col(Operacoes::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Operacoes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Operacoes {
    Table,
    Id,
    Amount,
    Status,
    Version,
    CreatedAt,
}
