//! Read-only root fields

use async_graphql::{Context, ID, Object, Result as GQLResult};

use super::store;
use crate::error::OperationContext;
use crate::models::{Client, Project};

/// Root query type for GraphQL
#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Get a client by ID
    async fn client(&self, ctx: &Context<'_>, id: ID) -> GQLResult<Option<Client>> {
        store(ctx)?.get_client(&id).await.during("fetch client")
    }

    /// List all clients
    async fn clients(&self, ctx: &Context<'_>) -> GQLResult<Vec<Client>> {
        store(ctx)?.list_clients().await.during("list clients")
    }

    /// Get a project by ID
    async fn project(&self, ctx: &Context<'_>, id: ID) -> GQLResult<Option<Project>> {
        store(ctx)?.get_project(&id).await.during("fetch project")
    }

    /// List all projects
    async fn projects(&self, ctx: &Context<'_>) -> GQLResult<Vec<Project>> {
        store(ctx)?.list_projects().await.during("list projects")
    }
}
