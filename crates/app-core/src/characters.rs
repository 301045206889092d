//! Character repository and use cases
//!
//! The repository layers an id-keyed cache and error normalization over the
//! character data source. List fetches populate the cache; detail lookups are
//! cache-first; a blank search query answers straight from the cache.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use storage::EntityStore;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::observe::watch_entity;
use dragonball_api::{ApiError, Character, CharacterDataSource};

/// Page fetched when filtering by affiliation (the API has no filter param)
const AFFILIATION_SCAN_LIMIT: u32 = 100;

/// Errors surfaced by character operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CharacterError {
    /// The requested character does not exist
    #[error("{0}")]
    NotFound(String),

    /// The API could not be reached or answered with a transient failure
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<ApiError> for CharacterError {
    fn from(e: ApiError) -> Self {
        if e.is_not_found() {
            CharacterError::NotFound("Character not found".to_string())
        } else if e.is_network_error() {
            CharacterError::Network(e.to_string())
        } else {
            CharacterError::Unknown(e.to_string())
        }
    }
}

/// Result type for character operations
pub type Result<T> = std::result::Result<T, CharacterError>;

/// Repository for Dragon Ball character data
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Get a page of characters
    async fn get_characters(&self, page: u32, limit: u32) -> Result<Vec<Character>>;

    /// Get a single character by id
    async fn get_character(&self, character_id: u32) -> Result<Character>;

    /// Search characters by name; a blank query returns the cached set
    async fn search_characters(&self, query: &str) -> Result<Vec<Character>>;

    /// Get characters whose affiliation contains the given text
    async fn characters_by_affiliation(&self, affiliation: &str) -> Result<Vec<Character>>;

    /// Observe every cached character
    fn watch_characters(&self) -> watch::Receiver<HashMap<u32, Character>>;

    /// Observe a single character by id
    ///
    /// Call from within a tokio runtime; without one the receiver holds a
    /// snapshot of the current cache entry and never updates.
    fn watch_character(&self, character_id: u32) -> watch::Receiver<Option<Character>>;
}

/// API-backed [`CharacterRepository`] with an in-memory cache
pub struct ApiCharacterRepository {
    source: Arc<dyn CharacterDataSource>,
    store: EntityStore<Character>,
}

impl ApiCharacterRepository {
    /// Create a repository over the given data source
    pub fn new(source: Arc<dyn CharacterDataSource>) -> Self {
        Self { source, store: EntityStore::new() }
    }

    fn cache(&self, characters: &[Character]) {
        self.store.insert_many(characters.iter().map(|c| (c.id, c.clone())));
    }
}

#[async_trait]
impl CharacterRepository for ApiCharacterRepository {
    async fn get_characters(&self, page: u32, limit: u32) -> Result<Vec<Character>> {
        let response = self.source.fetch_characters(page, limit).await.map_err(|e| {
            warn!(page, error = %e, "character page fetch failed");
            CharacterError::from(e)
        })?;

        self.cache(&response.items);
        debug!(page, count = response.items.len(), cached = self.store.len(), "characters loaded");
        Ok(response.items)
    }

    async fn get_character(&self, character_id: u32) -> Result<Character> {
        if let Some(cached) = self.store.get(character_id) {
            return Ok(cached);
        }

        let character = self.source.fetch_character(character_id).await?;
        self.store.insert(character.id, character.clone());
        Ok(character)
    }

    async fn search_characters(&self, query: &str) -> Result<Vec<Character>> {
        if query.trim().is_empty() {
            return Ok(self.store.values());
        }

        let characters = self.source.search_characters(query).await?;
        self.cache(&characters);
        Ok(characters)
    }

    async fn characters_by_affiliation(&self, affiliation: &str) -> Result<Vec<Character>> {
        let response = self.source.fetch_characters(1, AFFILIATION_SCAN_LIMIT).await?;
        let needle = affiliation.to_lowercase();

        Ok(response
            .items
            .into_iter()
            .filter(|c| c.affiliation.to_lowercase().contains(&needle))
            .collect())
    }

    fn watch_characters(&self) -> watch::Receiver<HashMap<u32, Character>> {
        self.store.watch()
    }

    fn watch_character(&self, character_id: u32) -> watch::Receiver<Option<Character>> {
        watch_entity(&self.store, character_id)
    }
}

/// Use case: fetch a page of characters
#[derive(Clone)]
pub struct GetCharacters {
    repository: Arc<dyn CharacterRepository>,
}

impl GetCharacters {
    /// Create the use case
    pub fn new(repository: Arc<dyn CharacterRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, page: u32, limit: u32) -> Result<Vec<Character>> {
        self.repository.get_characters(page, limit).await
    }
}

/// Use case: fetch one character's details
#[derive(Clone)]
pub struct GetCharacterDetails {
    repository: Arc<dyn CharacterRepository>,
}

impl GetCharacterDetails {
    /// Create the use case
    pub fn new(repository: Arc<dyn CharacterRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, character_id: u32) -> Result<Character> {
        self.repository.get_character(character_id).await
    }
}

/// Use case: search characters by name
#[derive(Clone)]
pub struct SearchCharacters {
    repository: Arc<dyn CharacterRepository>,
}

impl SearchCharacters {
    /// Create the use case
    pub fn new(repository: Arc<dyn CharacterRepository>) -> Self {
        Self { repository }
    }

    /// Run the use case
    pub async fn run(&self, query: &str) -> Result<Vec<Character>> {
        self.repository.search_characters(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::builders;
    use dragonball_api::Page;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        CharacterSource {}

        #[async_trait]
        impl CharacterDataSource for CharacterSource {
            async fn fetch_characters(
                &self,
                page: u32,
                limit: u32,
            ) -> dragonball_api::Result<Page<Character>>;
            async fn fetch_character(&self, character_id: u32) -> dragonball_api::Result<Character>;
            async fn search_characters(&self, query: &str) -> dragonball_api::Result<Vec<Character>>;
        }
    }

    fn network_error() -> ApiError {
        ApiError::Api { status: 503, message: "service unavailable".to_string() }
    }

    #[tokio::test]
    async fn test_get_characters_populates_cache() {
        let mut source = MockCharacterSource::new();
        source
            .expect_fetch_characters()
            .with(eq(1), eq(10))
            .times(1)
            .returning(|_, _| Ok(builders::character_page(builders::character_list(3, 1), 1, 1)));

        let repo = ApiCharacterRepository::new(Arc::new(source));
        let characters = repo.get_characters(1, 10).await.unwrap();

        assert_eq!(characters.len(), 3);
        // Cached entries answer detail lookups without another fetch.
        let cached = repo.get_character(2).await.unwrap();
        assert_eq!(cached.id, 2);
    }

    #[tokio::test]
    async fn test_get_character_cache_miss_fetches_and_caches() {
        let mut source = MockCharacterSource::new();
        source
            .expect_fetch_character()
            .with(eq(7))
            .times(1)
            .returning(|id| Ok(builders::character(id, "Piccolo")));

        let repo = ApiCharacterRepository::new(Arc::new(source));

        let first = repo.get_character(7).await.unwrap();
        assert_eq!(first.name, "Piccolo");

        // Second lookup hits the cache; the mock's times(1) would fail
        // otherwise.
        let second = repo.get_character(7).await.unwrap();
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn test_get_character_not_found() {
        let mut source = MockCharacterSource::new();
        source
            .expect_fetch_character()
            .returning(|_| Err(ApiError::Api { status: 404, message: "missing".to_string() }));

        let repo = ApiCharacterRepository::new(Arc::new(source));
        let err = repo.get_character(999).await.unwrap_err();

        assert_eq!(err, CharacterError::NotFound("Character not found".to_string()));
    }

    #[tokio::test]
    async fn test_network_failure_classification() {
        let mut source = MockCharacterSource::new();
        source.expect_fetch_characters().returning(|_, _| Err(network_error()));

        let repo = ApiCharacterRepository::new(Arc::new(source));
        let err = repo.get_characters(1, 10).await.unwrap_err();

        assert!(matches!(err, CharacterError::Network(_)));
    }

    #[tokio::test]
    async fn test_json_failure_is_unknown() {
        let mut source = MockCharacterSource::new();
        source.expect_fetch_character().returning(|_| {
            Err(serde_json::from_str::<Character>("not json").unwrap_err().into())
        });

        let repo = ApiCharacterRepository::new(Arc::new(source));
        let err = repo.get_character(1).await.unwrap_err();

        assert!(matches!(err, CharacterError::Unknown(_)));
    }

    #[tokio::test]
    async fn test_search_blank_query_returns_cache() {
        let mut source = MockCharacterSource::new();
        source
            .expect_fetch_characters()
            .returning(|_, _| Ok(builders::character_page(builders::character_list(4, 1), 1, 1)));
        source.expect_search_characters().never();

        let repo = ApiCharacterRepository::new(Arc::new(source));
        repo.get_characters(1, 10).await.unwrap();

        let cached = repo.search_characters("   ").await.unwrap();
        assert_eq!(cached.len(), 4);
    }

    #[tokio::test]
    async fn test_search_delegates_and_caches() {
        let mut source = MockCharacterSource::new();
        source
            .expect_search_characters()
            .with(eq("go"))
            .times(1)
            .returning(|_| Ok(vec![builders::character(1, "Goku"), builders::character(2, "Gohan")]));
        source.expect_fetch_character().never();

        let repo = ApiCharacterRepository::new(Arc::new(source));
        let found = repo.search_characters("go").await.unwrap();

        assert_eq!(found.len(), 2);
        // Search results land in the cache too.
        assert_eq!(repo.get_character(1).await.unwrap().name, "Goku");
    }

    #[tokio::test]
    async fn test_characters_by_affiliation_filters() {
        let mut source = MockCharacterSource::new();
        source.expect_fetch_characters().with(eq(1), eq(100)).returning(|_, _| {
            let mut frieza = builders::character(10, "Frieza");
            frieza.affiliation = "Frieza Army".to_string();
            Ok(builders::character_page(vec![builders::character(1, "Goku"), frieza], 1, 1))
        });

        let repo = ApiCharacterRepository::new(Arc::new(source));
        let villains = repo.characters_by_affiliation("army").await.unwrap();

        assert_eq!(villains.len(), 1);
        assert_eq!(villains[0].name, "Frieza");
    }

    #[tokio::test]
    async fn test_watch_characters_sees_fetch() {
        let mut source = MockCharacterSource::new();
        source
            .expect_fetch_characters()
            .returning(|_, _| Ok(builders::character_page(builders::character_list(2, 1), 1, 1)));

        let repo = ApiCharacterRepository::new(Arc::new(source));
        let mut rx = repo.watch_characters();

        repo.get_characters(1, 10).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 2);
    }

    #[tokio::test]
    async fn test_use_cases_pass_through() {
        let mut source = MockCharacterSource::new();
        source
            .expect_fetch_characters()
            .returning(|_, _| Ok(builders::character_page(builders::character_list(1, 1), 1, 1)));
        source.expect_search_characters().returning(|_| Ok(vec![]));

        let repo: Arc<dyn CharacterRepository> = Arc::new(ApiCharacterRepository::new(Arc::new(source)));

        let page = GetCharacters::new(repo.clone()).run(1, 10).await.unwrap();
        assert_eq!(page.len(), 1);

        let details = GetCharacterDetails::new(repo.clone()).run(1).await.unwrap();
        assert_eq!(details.id, 1);

        let found = SearchCharacters::new(repo).run("x").await.unwrap();
        assert!(found.is_empty());
    }
}
