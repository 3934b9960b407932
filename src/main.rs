mod config;
mod db;
mod error;
mod graphql;
mod models;
mod server;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// GraphQL API for clients and their projects
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Keep data in process memory instead of PostgreSQL
    #[arg(long, global = true)]
    in_memory: bool,

    /// Port to listen on, overrides PORT
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the GraphQL schema in SDL form and exit
    PrintSchema,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "project_tracker=info,tower_http=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::PrintSchema) = cli.command {
        // The SDL does not depend on the store contents
        let schema = graphql::build_schema(Arc::new(db::MemoryStore::new()));
        println!("{}", schema.sdl());
        return Ok(());
    }

    init_tracing();

    let config = config::init()?;
    let port = cli.port.unwrap_or(config.port);
    info!(app_env = ?config.app_env, port, in_memory = cli.in_memory, "starting project tracker");

    let store = db::init(&config, cli.in_memory).await?;
    let schema = graphql::build_schema(store);

    if config.is_development() {
        info!("GraphiQL enabled at {}", graphql::ENDPOINT);
    }
    let app = server::router(schema, config.is_development());

    server::serve(app, port).await
}
