//! One-shot UI events emitted by view-models
//!
//! Unlike state, events are fire-and-forget: a toast to show or a navigation
//! to perform. Hosts subscribe through [`broadcast`](tokio::sync::broadcast)
//! receivers returned by each view-model's `events()`.

/// A one-shot event for the host UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Show an error message to the user
    ShowError(String),
    /// Navigate to the detail screen for the given entity id
    NavigateToDetail(u32),
    /// Navigate back from a detail screen
    NavigateBack,
}
