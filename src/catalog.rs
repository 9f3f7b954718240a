//! Store boundary used by the UI. Storage faults stop here: they are logged,
//! turned into a message fit for the status line, and the caller gets a
//! `false` or an empty listing instead of an error.

use std::path::Path;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{NewResource, Resource, ResourceFilter};

/// Result of a catalog call. `error` is set only when the store failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    pub value: T,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    fn ok(value: T) -> Self {
        Self { value, error: None }
    }

    fn failed(value: T, message: String) -> Self {
        tracing::error!("{}", message);
        Self {
            value,
            error: Some(message),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Clone)]
pub struct Catalog {
    repository: Repository,
}

impl Catalog {
    /// Opens (or creates) the database. Called once at startup; the returned
    /// catalog is cloned into whoever needs it.
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let repository = Repository::open(db_path).await?;
        Ok(Self { repository })
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let repository = Repository::open_in_memory().await?;
        Ok(Self { repository })
    }

    pub async fn add(&self, resource: NewResource) -> Outcome<bool> {
        let title = resource.title.clone();
        match self.repository.insert_resource(resource).await {
            Ok(id) => {
                tracing::info!("Added resource {} ({:?})", id, title);
                Outcome::ok(true)
            }
            Err(e) => Outcome::failed(false, format!("Error adding resource: {e}")),
        }
    }

    pub async fn list(&self, filter: &ResourceFilter) -> Outcome<Vec<Resource>> {
        match self.repository.list_resources(filter.clone()).await {
            Ok(resources) => Outcome::ok(resources),
            Err(e) => Outcome::failed(Vec::new(), format!("Error retrieving resources: {e}")),
        }
    }

    /// Deletes every resource titled `title`. A title nobody uses is still a
    /// success.
    pub async fn delete(&self, title: &str) -> Outcome<bool> {
        match self.repository.delete_resources_by_title(title).await {
            Ok(deleted) => {
                tracing::info!("Deleted {} resource(s) titled {:?}", deleted, title);
                Outcome::ok(true)
            }
            Err(e) => Outcome::failed(false, format!("Error deleting resource: {e}")),
        }
    }

    pub async fn delete_by_id(&self, id: i64) -> Outcome<bool> {
        match self.repository.delete_resource(id).await {
            Ok(deleted) => {
                if !deleted {
                    tracing::debug!("Resource {} was already gone", id);
                }
                Outcome::ok(true)
            }
            Err(e) => Outcome::failed(false, format!("Error deleting resource: {e}")),
        }
    }

    pub async fn count(&self) -> Outcome<i64> {
        match self.repository.count_resources().await {
            Ok(count) => Outcome::ok(count),
            Err(e) => Outcome::failed(0, format!("Error retrieving resources: {e}")),
        }
    }
}
