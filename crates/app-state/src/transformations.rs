//! Transformation list and detail view-models
//!
//! The transformations endpoint is unpaginated, so the list view-model has a
//! single `load()` and never reports more pages.

use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::events::UiEvent;
use crate::EVENT_CHANNEL_CAPACITY;
use app_core::transformations::{
    GetTransformationDetails, GetTransformations, SearchTransformations,
    TransformationRepository,
};
use dragonball_api::TransformationDetail;

/// State of the transformation list screen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformationListState {
    /// All loaded transformations
    pub items: Vec<TransformationDetail>,
    /// Whether a load is in flight
    pub is_loading: bool,
    /// Last error message, cleared on the next load
    pub error: Option<String>,
    /// Current search query ("" when browsing)
    pub search_query: String,
}

impl TransformationListState {
    /// Whether the screen has nothing to show
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.is_loading
    }

    /// Transformations matching the current search query
    pub fn filtered_transformations(&self) -> Vec<TransformationDetail> {
        if self.search_query.trim().is_empty() {
            return self.items.clone();
        }
        let needle = self.search_query.to_lowercase();
        self.items.iter().filter(|t| t.name.to_lowercase().contains(&needle)).cloned().collect()
    }
}

/// View-model for the transformation list
pub struct TransformationListViewModel {
    get_transformations: GetTransformations,
    search_transformations: SearchTransformations,
    state: watch::Sender<TransformationListState>,
    events: broadcast::Sender<UiEvent>,
}

impl TransformationListViewModel {
    /// Create the view-model over a repository
    pub fn new(repository: Arc<dyn TransformationRepository>) -> Self {
        let (state, _) = watch::channel(TransformationListState::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            get_transformations: GetTransformations::new(repository.clone()),
            search_transformations: SearchTransformations::new(repository),
            state,
            events,
        }
    }

    /// Subscribe to state changes
    pub fn state(&self) -> watch::Receiver<TransformationListState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> TransformationListState {
        self.state.borrow().clone()
    }

    /// Subscribe to one-shot UI events
    pub fn events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Load the full transformation list
    pub async fn load(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.get_transformations.run().await {
            Ok(transformations) => {
                debug!(count = transformations.len(), "transformations loaded");
                self.state.send_modify(|s| {
                    s.items = transformations;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!(error = %e, "transformation load failed");
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                let _ = self.events.send(UiEvent::ShowError(message));
            }
        }
    }

    /// Search by name; a blank query reloads the full list
    pub async fn search(&self, query: &str) {
        self.state.send_modify(|s| s.search_query = query.to_string());

        if query.trim().is_empty() {
            self.load().await;
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.search_transformations.run(query).await {
            Ok(transformations) => {
                self.state.send_modify(|s| {
                    s.items = transformations;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!(query, error = %e, "transformation search failed");
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                let _ = self.events.send(UiEvent::ShowError(message));
            }
        }
    }

    /// Emit navigation to the selected transformation's detail screen
    pub fn on_select(&self, transformation_id: u32) {
        let _ = self.events.send(UiEvent::NavigateToDetail(transformation_id));
    }

    /// Reload the full list
    pub async fn refresh(&self) {
        self.load().await;
    }
}

/// State of the transformation detail screen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformationDetailState {
    /// The transformation, once loaded
    pub transformation: Option<TransformationDetail>,
    /// Whether a load is in flight
    pub is_loading: bool,
    /// Last error message, cleared on the next load
    pub error: Option<String>,
}

/// View-model for a single transformation's detail screen
pub struct TransformationDetailViewModel {
    get_details: GetTransformationDetails,
    transformation_id: u32,
    state: watch::Sender<TransformationDetailState>,
    events: broadcast::Sender<UiEvent>,
}

impl TransformationDetailViewModel {
    /// Create the view-model for the given transformation id
    pub fn new(repository: Arc<dyn TransformationRepository>, transformation_id: u32) -> Self {
        let (state, _) = watch::channel(TransformationDetailState::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            get_details: GetTransformationDetails::new(repository),
            transformation_id,
            state,
            events,
        }
    }

    /// Subscribe to state changes
    pub fn state(&self) -> watch::Receiver<TransformationDetailState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> TransformationDetailState {
        self.state.borrow().clone()
    }

    /// Subscribe to one-shot UI events
    pub fn events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Load the transformation
    pub async fn load(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.get_details.run(self.transformation_id).await {
            Ok(transformation) => {
                self.state.send_modify(|s| {
                    s.transformation = Some(transformation);
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!(
                    transformation_id = self.transformation_id,
                    error = %e,
                    "transformation detail load failed"
                );
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                let _ = self.events.send(UiEvent::ShowError(message));
            }
        }
    }

    /// Emit back navigation
    pub fn on_back(&self) {
        let _ = self.events.send(UiEvent::NavigateBack);
    }

    /// Reload the transformation
    pub async fn refresh(&self) {
        self.load().await;
    }
}
