//! Planet list and detail view-models

use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::events::UiEvent;
use crate::{EVENT_CHANNEL_CAPACITY, PAGE_SIZE};
use app_core::planets::{GetPlanetDetails, GetPlanets, PlanetRepository, SearchPlanets};
use dragonball_api::Planet;

/// State of the planet list screen
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetListState {
    /// Planets loaded so far
    pub items: Vec<Planet>,
    /// Whether a load is in flight
    pub is_loading: bool,
    /// Last error message, cleared on the next load
    pub error: Option<String>,
    /// Current search query ("" when browsing)
    pub search_query: String,
    /// Last page that was loaded
    pub current_page: u32,
    /// Whether another page may exist
    pub has_more_pages: bool,
}

impl Default for PlanetListState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
            search_query: String::new(),
            current_page: 1,
            has_more_pages: true,
        }
    }
}

impl PlanetListState {
    /// Whether the screen has nothing to show
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.is_loading
    }

    /// Planets matching the current search query
    pub fn filtered_planets(&self) -> Vec<Planet> {
        if self.search_query.trim().is_empty() {
            return self.items.clone();
        }
        let needle = self.search_query.to_lowercase();
        self.items.iter().filter(|p| p.name.to_lowercase().contains(&needle)).cloned().collect()
    }
}

/// View-model for the paginated planet list
pub struct PlanetListViewModel {
    get_planets: GetPlanets,
    search_planets: SearchPlanets,
    state: watch::Sender<PlanetListState>,
    events: broadcast::Sender<UiEvent>,
}

impl PlanetListViewModel {
    /// Create the view-model over a repository
    pub fn new(repository: Arc<dyn PlanetRepository>) -> Self {
        let (state, _) = watch::channel(PlanetListState::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            get_planets: GetPlanets::new(repository.clone()),
            search_planets: SearchPlanets::new(repository),
            state,
            events,
        }
    }

    /// Subscribe to state changes
    pub fn state(&self) -> watch::Receiver<PlanetListState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> PlanetListState {
        self.state.borrow().clone()
    }

    /// Subscribe to one-shot UI events
    pub fn events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Load the given page; page 1 replaces the list, later pages append
    pub async fn load(&self, page: u32) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.get_planets.run(page, PAGE_SIZE).await {
            Ok(planets) => {
                debug!(page, count = planets.len(), "planet page loaded");
                self.state.send_modify(|s| {
                    s.has_more_pages = !planets.is_empty();
                    if page == 1 {
                        s.items = planets;
                    } else {
                        s.items.extend(planets);
                    }
                    s.current_page = page;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!(page, error = %e, "planet page load failed");
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                let _ = self.events.send(UiEvent::ShowError(message));
            }
        }
    }

    /// Load the next page, unless a load is in flight or the list is exhausted
    pub async fn load_next_page(&self) {
        let next = {
            let s = self.state.borrow();
            if s.is_loading || !s.has_more_pages {
                return;
            }
            s.current_page + 1
        };
        self.load(next).await;
    }

    /// Search by name; a blank query returns to browsing from page 1
    pub async fn search(&self, query: &str) {
        self.state.send_modify(|s| s.search_query = query.to_string());

        if query.trim().is_empty() {
            self.load(1).await;
            return;
        }

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.search_planets.run(query).await {
            Ok(planets) => {
                self.state.send_modify(|s| {
                    s.items = planets;
                    s.is_loading = false;
                    s.has_more_pages = false;
                });
            }
            Err(e) => {
                warn!(query, error = %e, "planet search failed");
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                let _ = self.events.send(UiEvent::ShowError(message));
            }
        }
    }

    /// Emit navigation to the selected planet's detail screen
    pub fn on_select(&self, planet_id: u32) {
        let _ = self.events.send(UiEvent::NavigateToDetail(planet_id));
    }

    /// Reload from the first page
    pub async fn refresh(&self) {
        self.load(1).await;
    }
}

/// State of the planet detail screen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanetDetailState {
    /// The planet, once loaded
    pub planet: Option<Planet>,
    /// Whether a load is in flight
    pub is_loading: bool,
    /// Last error message, cleared on the next load
    pub error: Option<String>,
}

/// View-model for a single planet's detail screen
pub struct PlanetDetailViewModel {
    get_details: GetPlanetDetails,
    planet_id: u32,
    state: watch::Sender<PlanetDetailState>,
    events: broadcast::Sender<UiEvent>,
}

impl PlanetDetailViewModel {
    /// Create the view-model for the given planet id
    pub fn new(repository: Arc<dyn PlanetRepository>, planet_id: u32) -> Self {
        let (state, _) = watch::channel(PlanetDetailState::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { get_details: GetPlanetDetails::new(repository), planet_id, state, events }
    }

    /// Subscribe to state changes
    pub fn state(&self) -> watch::Receiver<PlanetDetailState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> PlanetDetailState {
        self.state.borrow().clone()
    }

    /// Subscribe to one-shot UI events
    pub fn events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Load the planet
    pub async fn load(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.get_details.run(self.planet_id).await {
            Ok(planet) => {
                self.state.send_modify(|s| {
                    s.planet = Some(planet);
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!(planet_id = self.planet_id, error = %e, "planet detail load failed");
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

    /// Reload the planet
    pub async fn refresh(&self) {
        self.load().await;
    }
}
