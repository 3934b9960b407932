use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::graphql::{self, AppSchema, ENDPOINT};

async fn health() -> &'static str {
    "ok"
}

/// Build the HTTP router. GraphiQL is mounted on `GET /graphql` only when
/// `graphiql` is set.
pub fn router(schema: AppSchema, graphiql: bool) -> Router {
    let graphql_route = if graphiql {
        get(graphql::graphiql).post(graphql::graphql_handler)
    } else {
        post(graphql::graphql_handler)
    };

    Router::new()
        .route(ENDPOINT, graphql_route)
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}

/// Bind on all interfaces and serve until Ctrl-C
pub async fn serve(router: Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "server is running");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryStore;
    use crate::graphql::build_schema;

    fn app(graphiql: bool) -> Router {
        router(build_schema(Arc::new(MemoryStore::new())), graphiql)
    }

    async fn make_request(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");

        let request = match body {
            Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap_or_default())
    }

    #[tokio::test]
    async fn health_check() {
        let (status, body) = make_request(&app(false), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn mutation_and_query_over_http() {
        let app = app(false);
        let (status, body) = make_request(
            &app,
            Method::POST,
            "/graphql",
            Some(json!({
                "query": "mutation($name: String!) { addClient(name: $name, email: \"a@x.com\", phone: \"555-1\") { id name } }",
                "variables": { "name": "Acme" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(created["data"]["addClient"]["name"], "Acme");
        assert!(created.get("errors").is_none());

        let (_, body) = make_request(
            &app,
            Method::POST,
            "/graphql",
            Some(json!({ "query": "{ clients { name email phone } }" })),
        )
        .await;
        let listed: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            listed["data"]["clients"],
            json!([{ "name": "Acme", "email": "a@x.com", "phone": "555-1" }])
        );
    }

    #[tokio::test]
    async fn malformed_documents_get_validation_code() {
        let (status, body) = make_request(
            &app(false),
            Method::POST,
            "/graphql",
            Some(json!({ "query": "{ clients { nope } }" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let response: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(response["errors"][0]["extensions"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn graphiql_only_in_development() {
        let (status, body) = make_request(&app(true), Method::GET, "/graphql", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.to_lowercase().contains("graphiql"));

        let (status, _) = make_request(&app(false), Method::GET, "/graphql", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
