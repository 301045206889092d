//! Wire models for the Dragon Ball API
//!
//! These mirror the JSON the API returns. `ki` and `max_ki` are in-fiction
//! power-level strings ("60,000,000", "90 Septillion") and stay opaque text.

use serde::{Deserialize, Serialize};

/// A Dragon Ball character with all their attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Character id
    pub id: u32,
    /// Character name
    pub name: String,
    /// Base power level (opaque text)
    pub ki: String,
    /// Maximum power level (opaque text)
    pub max_ki: String,
    /// Race (e.g. "Saiyan")
    pub race: String,
    /// Gender
    pub gender: String,
    /// Description text
    pub description: String,
    /// Image URL
    pub image: String,
    /// Affiliation (e.g. "Z Fighter")
    pub affiliation: String,
    /// Planet of origin, when the API embeds it
    #[serde(default)]
    pub origin_planet: Option<OriginPlanet>,
    /// Known transformations, when the API embeds them
    #[serde(default)]
    pub transformations: Vec<Transformation>,
}

impl Character {
    /// Whether this character counts as a hero
    ///
    /// Carried from the original model: anyone not affiliated with an
    /// "Army" is a hero.
    pub fn is_hero(&self) -> bool {
        !self.affiliation.to_lowercase().contains("army")
    }
}

/// A character's planet of origin, as embedded in character payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginPlanet {
    /// Planet id, when the API provides it
    #[serde(default)]
    pub id: Option<u32>,
    /// Planet name
    pub name: String,
    /// Whether the planet has been destroyed
    #[serde(default)]
    pub is_destroyed: bool,
    /// Description text
    #[serde(default)]
    pub description: String,
}

/// A transformation embedded in a character payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformation {
    /// Transformation id
    pub id: u32,
    /// Transformation name
    pub name: String,
    /// Image URL
    pub image: String,
    /// Power level in this form (opaque text)
    pub ki: String,
}

/// A Dragon Ball planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    /// Planet id
    pub id: u32,
    /// Planet name
    pub name: String,
    /// Whether the planet has been destroyed
    #[serde(default)]
    pub is_destroyed: bool,
    /// Description text
    #[serde(default)]
    pub description: String,
    /// Image URL
    #[serde(default)]
    pub image: String,
    /// Soft-delete timestamp from the API (opaque text)
    #[serde(default)]
    pub deleted_at: Option<String>,
}

/// A transformation as served by the standalone transformation endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationDetail {
    /// Transformation id
    pub id: u32,
    /// Transformation name
    pub name: String,
    /// Image URL
    pub image: String,
    /// Power level in this form (opaque text)
    pub ki: String,
    /// Soft-delete timestamp from the API (opaque text)
    #[serde(default)]
    pub deleted_at: Option<String>,
}

/// A page of results from a paginated list endpoint
///
/// The API wraps paginated lists as `{ items, meta, links }`. The
/// transformations list endpoint returns a bare array instead and does not
/// use this wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Pagination counters
    pub meta: PageMeta,
    /// Navigation links
    pub links: PageLinks,
}

/// Pagination counters reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total items across all pages
    pub total_items: u32,
    /// Items on this page
    pub item_count: u32,
    /// Requested page size
    pub items_per_page: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// This page's number (1-based)
    pub current_page: u32,
}

/// Pagination navigation links reported by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLinks {
    /// Link to the first page
    pub first: String,
    /// Link to the previous page, absent on the first page
    #[serde(default)]
    pub previous: Option<String>,
    /// Link to the next page, absent on the last page
    #[serde(default)]
    pub next: Option<String>,
    /// Link to the last page
    pub last: String,
}
