//! GraphQL mutations for creating, updating, and deleting clients and projects

use async_graphql::{Context, ID, Object, Result as GQLResult};
use tracing::info;

use super::store;
use crate::db::StoreError;
use crate::error::OperationContext;
use crate::models::{Client, NewClient, NewProject, Project, ProjectPatch, ProjectStatus};

/// Empty strings count as "not provided" in partial updates
fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Root mutation type for GraphQL
#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Create a new client
    async fn add_client(
        &self,
        ctx: &Context<'_>,
        #[graphql(validator(min_length = 1))] name: String,
        #[graphql(validator(min_length = 1))] email: String,
        #[graphql(validator(min_length = 1))] phone: String,
    ) -> GQLResult<Client> {
        let client = store(ctx)?
            .create_client(NewClient { name, email, phone })
            .await
            .during("add client")?;

        info!(client_id = %client.id, "client added");
        Ok(client)
    }

    /// Delete a client together with all of its projects
    async fn delete_client(&self, ctx: &Context<'_>, id: ID) -> GQLResult<Client> {
        let removal = store(ctx)?
            .delete_client_cascade(&id)
            .await
            .and_then(|removal| removal.ok_or_else(|| StoreError::client_not_found(&id)))
            .during("delete client")?;

        info!(
            client_id = %removal.client.id,
            projects_removed = removal.projects_removed,
            "client deleted"
        );
        Ok(removal.client)
    }

    /// Create a project for an existing client
    async fn add_project(
        &self,
        ctx: &Context<'_>,
        name: String,
        description: String,
        #[graphql(default)] status: ProjectStatus,
        client_id: ID,
    ) -> GQLResult<Project> {
        let store = store(ctx)?;

        // The owning client must exist before anything is written
        store
            .get_client(&client_id)
            .await
            .and_then(|client| client.ok_or_else(|| StoreError::client_not_found(&client_id)))
            .during("add project")?;

        let project = store
            .create_project(NewProject {
                client_id: client_id.0,
                name,
                description,
                status,
            })
            .await
            .during("add project")?;

        info!(project_id = %project.id, client_id = %project.client_id, "project added");
        Ok(project)
    }

    /// Delete a project
    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> GQLResult<Project> {
        let project = store(ctx)?
            .delete_project(&id)
            .await
            .and_then(|project| project.ok_or_else(|| StoreError::project_not_found(&id)))
            .during("delete project")?;

        info!(project_id = %project.id, "project deleted");
        Ok(project)
    }

    /// Update a project's fields, keeping any that are omitted
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        description: Option<String>,
        status: Option<ProjectStatus>,
    ) -> GQLResult<Project> {
        let patch = ProjectPatch {
            name: provided(name),
            description: provided(description),
            status,
        };

        let project = store(ctx)?
            .update_project(&id, patch)
            .await
            .and_then(|project| project.ok_or_else(|| StoreError::project_not_found(&id)))
            .during("update project")?;

        info!(project_id = %project.id, status = %project.status, "project updated");
        Ok(project)
    }
}
