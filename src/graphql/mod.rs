//! GraphQL API module
//!
//! Declares the schema over clients and projects and the axum handlers that
//! serve it. The store is injected as schema data when the schema is built.

mod mutation;
mod query;
mod types;


pub use mutation::MutationRoot;
pub use query::QueryRoot;

use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::db::SharedStore;
use crate::error::tag_untagged;

/// GraphQL schema type
pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Path the schema is served on
pub const ENDPOINT: &str = "/graphql";

/// Create a new GraphQL schema backed by the given store
pub fn build_schema(store: SharedStore) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(store)
        .finish()
}

pub(crate) fn store<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a SharedStore> {
    ctx.data::<SharedStore>()
}

/// Execute a request, making sure every error carries a `code` extension
pub async fn execute(schema: &AppSchema, request: async_graphql::Request) -> async_graphql::Response {
    let mut response = schema.execute(request).await;
    response.errors.iter_mut().for_each(tag_untagged);
    response
}

/// GraphQL query handler
pub async fn graphql_handler(
    State(schema): State<AppSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    execute(&schema, req.into_inner()).await.into()
}

/// GraphiQL explorer, only routed in development
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(ENDPOINT).finish())
}
