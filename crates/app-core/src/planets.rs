//! Planet repository and use cases

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use storage::EntityStore;
use tokio::sync::watch;
use tracing::debug;

use crate::observe::watch_entity;
use dragonball_api::{ApiError, Planet, PlanetDataSource};

/// Errors surfaced by planet operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanetError {
    /// The requested planet does not exist
    #[error("{0}")]
    NotFound(String),

    /// The API could not be reached or answered with a transient failure
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ApiError> for PlanetError {
    fn from(e: ApiError) -> Self {
        if e.is_not_found() {
            PlanetError::NotFound("Planet not found".to_string())
        } else if e.is_network_error() {
            PlanetError::Network(e.to_string())
        } else {
            PlanetError::Unknown(e.to_string())
        }
    }
}

/// Result type for planet operations
pub type Result<T> = std::result::Result<T, PlanetError>;

/// Repository for Dragon Ball planet data
#[async_trait]
pub trait PlanetRepository: Send + Sync {
    /// Get a page of planets
    async fn get_planets(&self, page: u32, limit: u32) -> Result<Vec<Planet>>;

    /// Get a single planet by id
    async fn get_planet(&self, planet_id: u32) -> Result<Planet>;

    /// Search planets by name; a blank query returns the cached set
    async fn search_planets(&self, query: &str) -> Result<Vec<Planet>>;

    /// Observe every cached planet
    fn watch_planets(&self) -> watch::Receiver<HashMap<u32, Planet>>;

    /// Observe a single planet by id
    ///
    /// Call from within a tokio runtime; without one the receiver holds a
    /// snapshot of the current cache entry and never updates.
    fn watch_planet(&self, planet_id: u32) -> watch::Receiver<Option<Planet>>;
}

/// API-backed [`PlanetRepository`] with an in-memory cache
pub struct ApiPlanetRepository {
    source: Arc<dyn PlanetDataSource>,
    store: EntityStore<Planet>,
}

impl ApiPlanetRepository {
    /// Create a repository over the given data source
    pub fn new(source: Arc<dyn PlanetDataSource>) -> Self {
        Self { source, store: EntityStore::new() }
    }
}

#[async_trait]
impl PlanetRepository for ApiPlanetRepository {
    async fn get_planets(&self, page: u32, limit: u32) -> Result<Vec<Planet>> {
        let response = self.source.fetch_planets(page, limit).await?;

        self.store.insert_many(response.items.iter().map(|p| (p.id, p.clone())));
        debug!(page, count = response.items.len(), "planets loaded");
        Ok(response.items)
    }

    async fn get_planet(&self, planet_id: u32) -> Result<Planet> {
        if let Some(cached) = self.store.get(planet_id) {
            return Ok(cached);
        }

        let planet = self.source.fetch_planet(planet_id).await?;
        self.store.insert(planet.id, planet.clone());
        Ok(planet)
    }

    async fn search_planets(&self, query: &str) -> Result<Vec<Planet>> {
        if query.trim().is_empty() {
            return Ok(self.store.values());
        }

        let planets = self.source.search_planets(query).await?;
        self.store.insert_many(planets.iter().map(|p| (p.id, p.clone())));
        Ok(planets)
    }

    fn watch_planets(&self) -> watch::Receiver<HashMap<u32, Planet>> {
        self.store.watch()
    }

    fn watch_planet(&self, planet_id: u32) -> watch::Receiver<Option<Planet>> {
        watch_entity(&self.store, planet_id)
    }
}

/// Use case: fetch a page of planets
#[derive(Clone)]
pub struct GetPlanets {
    repository: Arc<dyn PlanetRepository>,
}

impl GetPlanets {
    /// Create the use case
    pub fn new(repository: Arc<dyn PlanetRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, page: u32, limit: u32) -> Result<Vec<Planet>> {
        self.repository.get_planets(page, limit).await
    }
}

/// Use case: fetch one planet's details
#[derive(Clone)]
pub struct GetPlanetDetails {
    repository: Arc<dyn PlanetRepository>,
}

impl GetPlanetDetails {
    /// Create the use case
    pub fn new(repository: Arc<dyn PlanetRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, planet_id: u32) -> Result<Planet> {
        self.repository.get_planet(planet_id).await
    }
}

/// Use case: search planets by name
#[derive(Clone)]
pub struct SearchPlanets {
    repository: Arc<dyn PlanetRepository>,
}

impl SearchPlanets {
    /// Create the use case
    pub fn new(repository: Arc<dyn PlanetRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, query: &str) -> Result<Vec<Planet>> {
        self.repository.search_planets(query).await
    }
}
