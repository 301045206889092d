//! Transformation repository and use cases
//!
//! The transformations list endpoint is unpaginated, so the repository
//! fetches the whole set at once; everything else mirrors the other features.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use storage::EntityStore;
use tokio::sync::watch;

use crate::observe::watch_entity;
use dragonball_api::{ApiError, TransformationDataSource, TransformationDetail};

/// Errors surfaced by transformation operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformationError {
    /// The requested transformation does not exist
    #[error("{0}")]
    NotFound(String),

    /// The API could not be reached or answered with a transient failure
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ApiError> for TransformationError {
    fn from(e: ApiError) -> Self {
        if e.is_not_found() {
            TransformationError::NotFound("Transformation not found".to_string())
        } else if e.is_network_error() {
            TransformationError::Network(e.to_string())
        } else {
            TransformationError::Unknown(e.to_string())
        }
    }
}

/// Result type for transformation operations
pub type Result<T> = std::result::Result<T, TransformationError>;

/// Repository for Dragon Ball transformation data
#[async_trait]
pub trait TransformationRepository: Send + Sync {
    /// Get all transformations
    async fn get_transformations(&self) -> Result<Vec<TransformationDetail>>;

    /// Get a single transformation by id
    async fn get_transformation(&self, transformation_id: u32) -> Result<TransformationDetail>;

    /// Search transformations by name; a blank query returns the cached set
    async fn search_transformations(&self, query: &str) -> Result<Vec<TransformationDetail>>;

    /// Observe every cached transformation
    fn watch_transformations(&self) -> watch::Receiver<HashMap<u32, TransformationDetail>>;

    /// Observe a single transformation by id
    ///
    /// Call from within a tokio runtime; without one the receiver holds a
    /// snapshot of the current cache entry and never updates.
    fn watch_transformation(
        &self,
        transformation_id: u32,
    ) -> watch::Receiver<Option<TransformationDetail>>;
}

/// API-backed [`TransformationRepository`] with an in-memory cache
pub struct ApiTransformationRepository {
    source: Arc<dyn TransformationDataSource>,
    store: EntityStore<TransformationDetail>,
}

impl ApiTransformationRepository {
    /// Create a repository over the given data source
    pub fn new(source: Arc<dyn TransformationDataSource>) -> Self {
        Self { source, store: EntityStore::new() }
    }
}

#[async_trait]
impl TransformationRepository for ApiTransformationRepository {
    async fn get_transformations(&self) -> Result<Vec<TransformationDetail>> {
        let transformations = self.source.fetch_transformations().await?;
        self.store.insert_many(transformations.iter().map(|t| (t.id, t.clone())));
        Ok(transformations)
    }

    async fn get_transformation(&self, transformation_id: u32) -> Result<TransformationDetail> {
        if let Some(cached) = self.store.get(transformation_id) {
            return Ok(cached);
        }

        let transformation = self.source.fetch_transformation(transformation_id).await?;
        self.store.insert(transformation.id, transformation.clone());
        Ok(transformation)
    }

    async fn search_transformations(&self, query: &str) -> Result<Vec<TransformationDetail>> {
        if query.trim().is_empty() {
            return Ok(self.store.values());
        }

        let transformations = self.source.search_transformations(query).await?;
        self.store.insert_many(transformations.iter().map(|t| (t.id, t.clone())));
        Ok(transformations)
    }

    fn watch_transformations(&self) -> watch::Receiver<HashMap<u32, TransformationDetail>> {
        self.store.watch()
    }

    fn watch_transformation(
        &self,
        transformation_id: u32,
    ) -> watch::Receiver<Option<TransformationDetail>> {
        watch_entity(&self.store, transformation_id)
    }
}

/// Use case: fetch all transformations
#[derive(Clone)]
pub struct GetTransformations {
    repository: Arc<dyn TransformationRepository>,
}

impl GetTransformations {
    /// Create the use case
    pub fn new(repository: Arc<dyn TransformationRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self) -> Result<Vec<TransformationDetail>> {
        self.repository.get_transformations().await
    }
}

/// Use case: fetch one transformation's details
#[derive(Clone)]
pub struct GetTransformationDetails {
    repository: Arc<dyn TransformationRepository>,
}

impl GetTransformationDetails {
    /// Create the use case
    pub fn new(repository: Arc<dyn TransformationRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, transformation_id: u32) -> Result<TransformationDetail> {
        self.repository.get_transformation(transformation_id).await
    }
}

/// Use case: search transformations by name
#[derive(Clone)]
pub struct SearchTransformations {
    repository: Arc<dyn TransformationRepository>,
}

impl SearchTransformations {
    /// Create the use case
    pub fn new(repository: Arc<dyn TransformationRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, query: &str) -> Result<Vec<TransformationDetail>> {
        self.repository.search_transformations(query).await
    }
}
