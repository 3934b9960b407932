mod memory;
mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;
use crate::error::ErrorKind;
use crate::models::{Client, NewClient, NewProject, Project, ProjectPatch};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    IntegrityViolation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn client_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "Client",
            id: id.to_string(),
        }
    }

    pub fn project_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        }
    }

    pub fn duplicate_project_name(name: &str) -> Self {
        StoreError::IntegrityViolation(format!("a project named {name:?} already exists"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::IntegrityViolation(_) => ErrorKind::IntegrityViolation,
            StoreError::Database(_) | StoreError::Corrupt(_) => ErrorKind::StoreFailure,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A client removed together with the projects that referenced it
#[derive(Debug, Clone)]
pub struct ClientRemoval {
    pub client: Client,
    pub projects_removed: u64,
}

/// Persistence for clients and projects.
///
/// Lookups return `Ok(None)` for unknown ids; the resolvers decide whether
/// that is an error.
#[async_trait]
pub trait Store: Send + Sync {
    // Client operations
    async fn get_client(&self, id: &str) -> StoreResult<Option<Client>>;

    async fn list_clients(&self) -> StoreResult<Vec<Client>>;

    async fn create_client(&self, client: NewClient) -> StoreResult<Client>;

    /// Delete a client and every project referencing it as one atomic step.
    /// Returns `None` and changes nothing when the client does not exist.
    async fn delete_client_cascade(&self, id: &str) -> StoreResult<Option<ClientRemoval>>;

    // Project operations
    async fn get_project(&self, id: &str) -> StoreResult<Option<Project>>;

    async fn list_projects(&self) -> StoreResult<Vec<Project>>;

    /// Insert a project. Fails with `IntegrityViolation` on a duplicate name.
    async fn create_project(&self, project: NewProject) -> StoreResult<Project>;

    /// Apply a partial update, returning the updated record or `None` if absent.
    async fn update_project(&self, id: &str, patch: ProjectPatch) -> StoreResult<Option<Project>>;

    async fn delete_project(&self, id: &str) -> StoreResult<Option<Project>>;
}

/// Shared handle injected into the GraphQL schema
pub type SharedStore = Arc<dyn Store>;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Initialize the configured store
pub async fn init(config: &Config, in_memory: bool) -> Result<SharedStore> {
    if in_memory {
        tracing::warn!("using the in-memory store, data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(config.database_url()?, config.database_max_connections).await?;
    store.ensure_schema().await?;

    Ok(Arc::new(store))
}
