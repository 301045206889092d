//! Data-source traits and their HTTP implementation
//!
//! Repositories talk to these traits; [`DragonBallApi`] is the one real
//! implementation, backed by [`ApiClient`]. The API has no search endpoint,
//! so search fetches a wide first page and filters by name client-side,
//! matching what the original app does.

use async_trait::async_trait;
use tracing::debug;

use crate::models::{Character, Page, Planet, TransformationDetail};
use crate::{ApiClient, Result};

/// Page size used when fetching a wide page to search or filter through
const SEARCH_PAGE_LIMIT: u32 = 100;

/// Data source for character endpoints
#[async_trait]
pub trait CharacterDataSource: Send + Sync {
    /// Fetch a page of characters
    async fn fetch_characters(&self, page: u32, limit: u32) -> Result<Page<Character>>;

    /// Fetch a single character by id
    async fn fetch_character(&self, character_id: u32) -> Result<Character>;

    /// Search characters by name (case-insensitive substring match)
    async fn search_characters(&self, query: &str) -> Result<Vec<Character>>;
}

/// Data source for planet endpoints
#[async_trait]
pub trait PlanetDataSource: Send + Sync {
    /// Fetch a page of planets
    async fn fetch_planets(&self, page: u32, limit: u32) -> Result<Page<Planet>>;

    /// Fetch a single planet by id
    async fn fetch_planet(&self, planet_id: u32) -> Result<Planet>;

    /// Search planets by name (case-insensitive substring match)
    async fn search_planets(&self, query: &str) -> Result<Vec<Planet>>;
}

/// Data source for transformation endpoints
///
/// The transformations list endpoint is unpaginated and returns a bare array.
#[async_trait]
pub trait TransformationDataSource: Send + Sync {
    /// Fetch all transformations
    async fn fetch_transformations(&self) -> Result<Vec<TransformationDetail>>;

    /// Fetch a single transformation by id
    async fn fetch_transformation(&self, transformation_id: u32) -> Result<TransformationDetail>;

    /// Search transformations by name (case-insensitive substring match)
    async fn search_transformations(&self, query: &str) -> Result<Vec<TransformationDetail>>;
}

/// Dragon Ball API data source implementation over HTTP
#[derive(Debug, Clone)]
pub struct DragonBallApi {
    client: ApiClient,
}

impl DragonBallApi {
    /// Create a new data source over the given client
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn page_params(page: u32, limit: u32) -> Vec<(&'static str, String)> {
        vec![("page", page.to_string()), ("limit", limit.to_string())]
    }
}

fn name_matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

#[async_trait]
impl CharacterDataSource for DragonBallApi {
    async fn fetch_characters(&self, page: u32, limit: u32) -> Result<Page<Character>> {
        debug!(page, limit, "fetching characters");
        self.client.get_json("/characters", &Self::page_params(page, limit)).await
    }

    async fn fetch_character(&self, character_id: u32) -> Result<Character> {
        debug!(character_id, "fetching character");
        self.client.get_json(&format!("/characters/{character_id}"), &[]).await
    }

    async fn search_characters(&self, query: &str) -> Result<Vec<Character>> {
        let page: Page<Character> = self
            .client
            .get_json("/characters", &[("limit", SEARCH_PAGE_LIMIT.to_string())])
            .await?;

        Ok(page.items.into_iter().filter(|c| name_matches(&c.name, query)).collect())
    }
}

#[async_trait]
impl PlanetDataSource for DragonBallApi {
    async fn fetch_planets(&self, page: u32, limit: u32) -> Result<Page<Planet>> {
        debug!(page, limit, "fetching planets");
        self.client.get_json("/planets", &Self::page_params(page, limit)).await
    }

    async fn fetch_planet(&self, planet_id: u32) -> Result<Planet> {
        debug!(planet_id, "fetching planet");
        self.client.get_json(&format!("/planets/{planet_id}"), &[]).await
    }

    async fn search_planets(&self, query: &str) -> Result<Vec<Planet>> {
        let page: Page<Planet> = self
            .client
            .get_json("/planets", &[("limit", SEARCH_PAGE_LIMIT.to_string())])
            .await?;

        Ok(page.items.into_iter().filter(|p| name_matches(&p.name, query)).collect())
    }
}

#[async_trait]
impl TransformationDataSource for DragonBallApi {
    async fn fetch_transformations(&self) -> Result<Vec<TransformationDetail>> {
        debug!("fetching transformations");
        self.client.get_json("/transformations", &[]).await
    }

    async fn fetch_transformation(&self, transformation_id: u32) -> Result<TransformationDetail> {
        debug!(transformation_id, "fetching transformation");
        self.client.get_json(&format!("/transformations/{transformation_id}"), &[]).await
    }

    async fn search_transformations(&self, query: &str) -> Result<Vec<TransformationDetail>> {
        let all: Vec<TransformationDetail> = self.client.get_json("/transformations", &[]).await?;

        Ok(all.into_iter().filter(|t| name_matches(&t.name, query)).collect())
    }
}
