//! Core business logic for the Dragon Ball browser
//!
//! This crate contains the repositories (in-memory caching plus error
//! normalization over the API data sources) and the single-method use cases
//! the view-models call, one module per feature.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod characters;
pub mod planets;
pub mod test_support;
pub mod transformations;

mod observe;
