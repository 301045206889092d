//! Screen state for the Dragon Ball browser
//!
//! This crate provides the view-models the native front-ends bind to: one
//! list view-model (pagination + search) and one detail view-model per
//! feature. State is published through `tokio::sync::watch` channels and
//! one-shot UI events through `tokio::sync::broadcast`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod characters;
pub mod events;
pub mod planets;
pub mod transformations;

pub use events::UiEvent;

/// Number of items requested per list page
pub const PAGE_SIZE: u32 = 20;

/// Capacity of every view-model's event channel
pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 16;
