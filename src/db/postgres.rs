use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{ClientRemoval, Store, StoreError, StoreResult, new_id};
use crate::models::{Client, NewClient, NewProject, Project, ProjectPatch};

const CREATE_CLIENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS clients (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL
    )
"#;

// No foreign key on client_id: projects are removed by delete_client_cascade.
const CREATE_PROJECTS: &str = r#"
    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY,
        client_id TEXT NOT NULL,
        name TEXT NOT NULL UNIQUE,
        description TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Not Started'
            CHECK (status IN ('Not Started', 'In Progress', 'Done'))
    )
"#;

const PROJECT_COLUMNS: &str = "id, client_id, name, description, status";

/// Row shape of the projects table; status is kept as its stored label
#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: String,
    client_id: String,
    name: String,
    description: String,
    status: String,
}

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("project {}: {e}", row.id)))?;

        Ok(Project {
            id: row.id,
            client_id: row.client_id,
            name: row.name,
            description: row.description,
            status,
        })
    }
}

/// Map a unique-constraint failure on `projects.name` to an integrity error
fn project_write_error(err: sqlx::Error, name: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::duplicate_project_name(name)
        }
        _ => StoreError::Database(err),
    }
}

/// PostgreSQL-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store with a connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "database connection established");

        Ok(Self { pool })
    }

    /// Create the two tables if they do not exist yet
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in [CREATE_CLIENTS, CREATE_PROJECTS] {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_client(&self, id: &str) -> StoreResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, phone FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>("SELECT id, name, email, phone FROM clients")
            .fetch_all(&self.pool)
            .await?;

        Ok(clients)
    }

    async fn create_client(&self, client: NewClient) -> StoreResult<Client> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone
            "#,
        )
        .bind(new_id())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(client)
    }

    async fn delete_client_cascade(&self, id: &str) -> StoreResult<Option<ClientRemoval>> {
        let mut tx = self.pool.begin().await?;

        // Lock the client row so a concurrent delete waits for us
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, name, email, phone FROM clients WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(client) = client else {
            // Dropping the transaction rolls it back
            return Ok(None);
        };

        let projects_removed = sqlx::query("DELETE FROM projects WHERE client_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(ClientRemoval {
            client,
            projects_removed,
        }))
    }

    async fn get_project(&self, id: &str) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!("SELECT {PROJECT_COLUMNS} FROM projects"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Project::try_from).collect()
    }

    async fn create_project(&self, project: NewProject) -> StoreResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (id, client_id, name, description, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(new_id())
        .bind(&project.client_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.label())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| project_write_error(e, &project.name))?;

        row.try_into()
    }

    async fn update_project(&self, id: &str, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        let new_name = patch.name.clone().unwrap_or_default();
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status)
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.description)
        .bind(patch.status.map(|s| s.label()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| project_write_error(e, &new_name))?;

        row.map(Project::try_from).transpose()
    }

    async fn delete_project(&self, id: &str) -> StoreResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "DELETE FROM projects WHERE id = $1 RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Project::try_from).transpose()
    }
}
