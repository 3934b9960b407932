//! GraphQL object types for the stored records

use async_graphql::{Context, ID, Object, Result as GQLResult};

use super::store;
use crate::error::OperationContext;
use crate::models::{Client, Project};

#[Object]
impl Client {
    async fn id(&self) -> ID {
        ID(self.id.clone())
    }

    async fn name(&self) -> &str {
        &self.name
    }

    async fn email(&self) -> &str {
        &self.email
    }

    async fn phone(&self) -> &str {
        &self.phone
    }
}

#[Object]
impl Project {
    async fn id(&self) -> ID {
        ID(self.id.clone())
    }

    async fn name(&self) -> &str {
        &self.name
    }

    async fn description(&self) -> &str {
        &self.description
    }

    /// Human-readable status label, e.g. "Not Started"
    async fn status(&self) -> &str {
        self.status.label()
    }

    /// The owning client, or null if the reference no longer resolves
    async fn client(&self, ctx: &Context<'_>) -> GQLResult<Option<Client>> {
        let client = store(ctx)?
            .get_client(&self.client_id)
            .await
            .during("fetch project client")?;

        if client.is_none() {
            tracing::warn!(
                project_id = %self.id,
                client_id = %self.client_id,
                "project references a missing client"
            );
        }

        Ok(client)
    }
}
