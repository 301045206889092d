//! Test builders and fake repositories
//!
//! Shared by this crate's tests, the view-model tests in `app-state`, and the
//! workspace integration tests. The fakes default to serving whatever was
//! seeded into them (with id-ordered pagination and name filtering) and can
//! be forced into a failure mode.

#![allow(clippy::missing_panics_doc)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use storage::EntityStore;
use tokio::sync::watch;

use crate::characters::{CharacterError, CharacterRepository};
use crate::observe::watch_entity;
use crate::planets::{PlanetError, PlanetRepository};
use crate::transformations::{TransformationError, TransformationRepository};
use dragonball_api::{
    Character, Page, PageLinks, PageMeta, Planet, TransformationDetail,
};

/// Builders for domain model instances with sensible defaults
pub mod builders {
    use super::*;

    /// Build a character; only id and name vary per test
    pub fn character(id: u32, name: &str) -> Character {
        Character {
            id,
            name: name.to_string(),
            ki: "60,000,000".to_string(),
            max_ki: "90 Septillion".to_string(),
            race: "Saiyan".to_string(),
            gender: "Male".to_string(),
            description: "El protagonista de la serie".to_string(),
            image: format!("https://dragonball-api.com/characters/{id}.webp"),
            affiliation: "Z Fighter".to_string(),
            origin_planet: None,
            transformations: Vec::new(),
        }
    }

    /// Build `count` characters with sequential ids starting at `start_id`
    pub fn character_list(count: u32, start_id: u32) -> Vec<Character> {
        (start_id..start_id + count)
            .map(|id| character(id, &format!("Character {id}")))
            .collect()
    }

    /// Build a planet
    pub fn planet(id: u32, name: &str) -> Planet {
        Planet {
            id,
            name: name.to_string(),
            is_destroyed: false,
            description: "A planet".to_string(),
            image: format!("https://dragonball-api.com/planets/{id}.webp"),
            deleted_at: None,
        }
    }

    /// Build `count` planets with sequential ids starting at `start_id`
    pub fn planet_list(count: u32, start_id: u32) -> Vec<Planet> {
        (start_id..start_id + count).map(|id| planet(id, &format!("Planet {id}"))).collect()
    }

    /// Build a transformation detail
    pub fn transformation_detail(id: u32, name: &str) -> TransformationDetail {
        TransformationDetail {
            id,
            name: name.to_string(),
            image: format!("https://dragonball-api.com/transformations/{id}.webp"),
            ki: "3 Billion".to_string(),
            deleted_at: None,
        }
    }

    /// Build `count` transformation details with sequential ids
    pub fn transformation_detail_list(count: u32, start_id: u32) -> Vec<TransformationDetail> {
        (start_id..start_id + count)
            .map(|id| transformation_detail(id, &format!("Transformation {id}")))
            .collect()
    }

    /// Wrap items in the API's paginated envelope
    pub fn page<T>(items: Vec<T>, current_page: u32, total_pages: u32) -> Page<T> {
        let item_count = items.len() as u32;
        Page {
            meta: PageMeta {
                total_items: total_pages * item_count.max(1),
                item_count,
                items_per_page: item_count.max(1),
                total_pages,
                current_page,
            },
            links: PageLinks {
                first: "/api/items?page=1".to_string(),
                previous: (current_page > 1)
                    .then(|| format!("/api/items?page={}", current_page - 1)),
                next: (current_page < total_pages)
                    .then(|| format!("/api/items?page={}", current_page + 1)),
                last: format!("/api/items?page={total_pages}"),
            },
            items,
        }
    }

    /// Paginated character envelope
    pub fn character_page(
        items: Vec<Character>,
        current_page: u32,
        total_pages: u32,
    ) -> Page<Character> {
        page(items, current_page, total_pages)
    }

    /// Paginated planet envelope
    pub fn planet_page(items: Vec<Planet>, current_page: u32, total_pages: u32) -> Page<Planet> {
        page(items, current_page, total_pages)
    }
}

fn slice_page<T: Clone>(mut all: Vec<(u32, T)>, page: u32, limit: u32) -> Vec<T> {
    all.sort_by_key(|(id, _)| *id);
    let start = ((page.max(1) - 1) * limit) as usize;
    all.into_iter().skip(start).take(limit as usize).map(|(_, v)| v).collect()
}

/// Fake [`CharacterRepository`] with a seedable store and call tracking
pub struct FakeCharacterRepository {
    store: EntityStore<Character>,
    forced_error: Mutex<Option<CharacterError>>,
    /// (page, limit) of every `get_characters` call
    pub get_characters_calls: Mutex<Vec<(u32, u32)>>,
    /// Query of every `search_characters` call
    pub search_calls: Mutex<Vec<String>>,
}

impl FakeCharacterRepository {
    /// Create an empty fake
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(),
            forced_error: Mutex::new(None),
            get_characters_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
        }
    }

    /// Seed the backing store
    pub fn set_characters(&self, characters: Vec<Character>) {
        self.store.clear();
        self.store.insert_many(characters.into_iter().map(|c| (c.id, c)));
    }

    /// Make every operation fail with the given error
    pub fn fail_with(&self, error: CharacterError) {
        *self.forced_error.lock().unwrap() = Some(error);
    }

    fn check_forced(&self) -> Result<(), CharacterError> {
        match self.forced_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn entries(&self) -> Vec<(u32, Character)> {
        self.store.values().into_iter().map(|c| (c.id, c)).collect()
    }
}

impl Default for FakeCharacterRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CharacterRepository for FakeCharacterRepository {
    async fn get_characters(
        &self,
        page: u32,
        limit: u32,
    ) -> crate::characters::Result<Vec<Character>> {
        self.get_characters_calls.lock().unwrap().push((page, limit));
        self.check_forced()?;
        Ok(slice_page(self.entries(), page, limit))
    }

    async fn get_character(&self, character_id: u32) -> crate::characters::Result<Character> {
        self.check_forced()?;
        self.store.get(character_id).ok_or_else(|| {
            CharacterError::NotFound(format!("Character with id {character_id} not found"))
        })
    }

    async fn search_characters(&self, query: &str) -> crate::characters::Result<Vec<Character>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        self.check_forced()?;
        let needle = query.to_lowercase();
        let mut found: Vec<Character> = self
            .store
            .values()
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect();
        found.sort_by_key(|c| c.id);
        Ok(found)
    }

    async fn characters_by_affiliation(
        &self,
        affiliation: &str,
    ) -> crate::characters::Result<Vec<Character>> {
        self.check_forced()?;
        let needle = affiliation.to_lowercase();
        Ok(self
            .store
            .values()
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

/// Fake [`PlanetRepository`] with a seedable store and call tracking
pub struct FakePlanetRepository {
    store: EntityStore<Planet>,
    forced_error: Mutex<Option<PlanetError>>,
    /// (page, limit) of every `get_planets` call
    pub get_planets_calls: Mutex<Vec<(u32, u32)>>,
}

impl FakePlanetRepository {
    /// Create an empty fake
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(),
            forced_error: Mutex::new(None),
            get_planets_calls: Mutex::new(Vec::new()),
        }
    }

    /// Seed the backing store
    pub fn set_planets(&self, planets: Vec<Planet>) {
        self.store.clear();
        self.store.insert_many(planets.into_iter().map(|p| (p.id, p)));
    }

    /// Make every operation fail with the given error
    pub fn fail_with(&self, error: PlanetError) {
        *self.forced_error.lock().unwrap() = Some(error);
    }

    fn check_forced(&self) -> Result<(), PlanetError> {
        match self.forced_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for FakePlanetRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlanetRepository for FakePlanetRepository {
    async fn get_planets(&self, page: u32, limit: u32) -> crate::planets::Result<Vec<Planet>> {
        self.get_planets_calls.lock().unwrap().push((page, limit));
        self.check_forced()?;
        let entries = self.store.values().into_iter().map(|p| (p.id, p)).collect();
        Ok(slice_page(entries, page, limit))
    }

    async fn get_planet(&self, planet_id: u32) -> crate::planets::Result<Planet> {
        self.check_forced()?;
        self.store
            .get(planet_id)
            .ok_or_else(|| PlanetError::NotFound(format!("Planet with id {planet_id} not found")))
    }

    async fn search_planets(&self, query: &str) -> crate::planets::Result<Vec<Planet>> {
        self.check_forced()?;
        let needle = query.to_lowercase();
        let mut found: Vec<Planet> = self
            .store
            .values()
            .into_iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect();
        found.sort_by_key(|p| p.id);
        Ok(found)
    }

    fn watch_planets(&self) -> watch::Receiver<HashMap<u32, Planet>> {
        self.store.watch()
    }

    fn watch_planet(&self, planet_id: u32) -> watch::Receiver<Option<Planet>> {
        watch_entity(&self.store, planet_id)
    }
}

/// Fake [`TransformationRepository`] with a seedable store
pub struct FakeTransformationRepository {
    store: EntityStore<TransformationDetail>,
    forced_error: Mutex<Option<TransformationError>>,
    /// Number of `get_transformations` calls
    pub get_transformations_calls: Mutex<u32>,
}

impl FakeTransformationRepository {
    /// Create an empty fake
    pub fn new() -> Self {
        Self {
            store: EntityStore::new(),
            forced_error: Mutex::new(None),
            get_transformations_calls: Mutex::new(0),
        }
    }

    /// Seed the backing store
    pub fn set_transformations(&self, transformations: Vec<TransformationDetail>) {
        self.store.clear();
        self.store.insert_many(transformations.into_iter().map(|t| (t.id, t)));
    }

    /// Make every operation fail with the given error
    pub fn fail_with(&self, error: TransformationError) {
        *self.forced_error.lock().unwrap() = Some(error);
    }

    fn check_forced(&self) -> Result<(), TransformationError> {
        match self.forced_error.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for FakeTransformationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransformationRepository for FakeTransformationRepository {
    async fn get_transformations(
        &self,
    ) -> crate::transformations::Result<Vec<TransformationDetail>> {
        *self.get_transformations_calls.lock().unwrap() += 1;
        self.check_forced()?;
        let mut all = self.store.values();
        all.sort_by_key(|t| t.id);
        Ok(all)
    }

    async fn get_transformation(
        &self,
        transformation_id: u32,
    ) -> crate::transformations::Result<TransformationDetail> {
        self.check_forced()?;
        self.store.get(transformation_id).ok_or_else(|| {
            TransformationError::NotFound(format!(
                "Transformation with id {transformation_id} not found"
            ))
        })
    }

    async fn search_transformations(
        &self,
        query: &str,
    ) -> crate::transformations::Result<Vec<TransformationDetail>> {
        self.check_forced()?;
        let needle = query.to_lowercase();
        let mut found: Vec<TransformationDetail> = self
            .store
            .values()
            .into_iter()
            .filter(|t| t.name.to_lowercase().contains(&needle))
            .collect();
        found.sort_by_key(|t| t.id);
        Ok(found)
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
