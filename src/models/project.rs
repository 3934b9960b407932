use std::fmt;
use std::str::FromStr;

use async_graphql::Enum;
use thiserror::Error;

/// Progress of a project. Stored as its label ("Not Started", ...).
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    #[graphql(name = "COMPLETED")]
    Done,
}

impl ProjectStatus {
    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Done => "Done",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("unknown project status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ProjectStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not Started" => Ok(ProjectStatus::NotStarted),
            "In Progress" => Ok(ProjectStatus::InProgress),
            "Done" => Ok(ProjectStatus::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
}

/// Fields supplied when creating a project; the id is assigned by the store
#[derive(Debug, Clone)]
pub struct NewProject {
    pub client_id: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
}

impl NewProject {
    pub fn with_id(self, id: String) -> Project {
        Project {
            id,
            client_id: self.client_id,
            name: self.name,
            description: self.description,
            status: self.status,
        }
    }
}

/// Partial update of a project. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(description) = self.description {
            project.description = description;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}
