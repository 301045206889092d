//! In-memory entity storage for the Dragon Ball browser
//!
//! This crate provides the observable id-keyed store the repositories cache
//! fetched entities in. Entries live for the lifetime of the process; there
//! is no eviction and no persistence.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod store;

pub use store::EntityStore;
