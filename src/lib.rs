// src/lib.rs

use std::sync::Arc;

use repositories::OperationRepository;
use services::{operations::OperationService, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub operations: OperationService,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(repository: Arc<dyn OperationRepository>, sessions: SessionStore) -> Self {
        Self {
            operations: OperationService::new(repository),
            sessions,
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod operacoes;
}

pub mod services {
    pub mod operations;
    pub mod session;
}

pub mod handlers {
    pub mod auth;
    pub mod error;
    pub mod health;
    pub mod operations;
}

pub mod models {
    pub mod auth;
    pub mod error;
    pub mod operation;
}

pub mod config;
pub mod repositories;
pub mod routes;
