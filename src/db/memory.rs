use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ClientRemoval, Store, StoreError, StoreResult, new_id};
use crate::models::{Client, NewClient, NewProject, Project, ProjectPatch};

#[derive(Default)]
struct Collections {
    clients: HashMap<String, Client>,
    projects: HashMap<String, Project>,
}

impl Collections {
    fn name_taken(&self, name: &str, except: Option<&str>) -> bool {
        self.projects
            .values()
            .any(|p| p.name == name && Some(p.id.as_str()) != except)
    }
}

/// In-process store. Both collections sit behind one lock, so multi-record
/// operations such as the client cascade are atomic.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_client(&self, id: &str) -> StoreResult<Option<Client>> {
        Ok(self.inner.read().await.clients.get(id).cloned())
    }

    async fn list_clients(&self) -> StoreResult<Vec<Client>> {
        Ok(self.inner.read().await.clients.values().cloned().collect())
    }

    async fn create_client(&self, client: NewClient) -> StoreResult<Client> {
        let client = client.with_id(new_id());
        self.inner
            .write()
            .await
            .clients
            .insert(client.id.clone(), client.clone());

        Ok(client)
    }

    async fn delete_client_cascade(&self, id: &str) -> StoreResult<Option<ClientRemoval>> {
        let mut inner = self.inner.write().await;

        let Some(client) = inner.clients.remove(id) else {
            return Ok(None);
        };

        let before = inner.projects.len();
        inner.projects.retain(|_, p| p.client_id != id);
        let projects_removed = (before - inner.projects.len()) as u64;

        Ok(Some(ClientRemoval {
            client,
            projects_removed,
        }))
    }

    async fn get_project(&self, id: &str) -> StoreResult<Option<Project>> {
        Ok(self.inner.read().await.projects.get(id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.inner.read().await.projects.values().cloned().collect())
    }

    async fn create_project(&self, project: NewProject) -> StoreResult<Project> {
        let mut inner = self.inner.write().await;

        if inner.name_taken(&project.name, None) {
            return Err(StoreError::duplicate_project_name(&project.name));
        }

        let project = project.with_id(new_id());
        inner.projects.insert(project.id.clone(), project.clone());

        Ok(project)
    }

    async fn update_project(&self, id: &str, patch: ProjectPatch) -> StoreResult<Option<Project>> {
        let mut inner = self.inner.write().await;

        if !inner.projects.contains_key(id) {
            return Ok(None);
        }
        if let Some(name) = &patch.name {
            if inner.name_taken(name, Some(id)) {
                return Err(StoreError::duplicate_project_name(name));
            }
        }

        let Some(project) = inner.projects.get_mut(id) else {
            return Ok(None);
        };
        patch.apply(project);

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: &str) -> StoreResult<Option<Project>> {
        Ok(self.inner.write().await.projects.remove(id))
    }
}
