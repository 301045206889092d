//! Character list and detail view-models

use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use crate::events::UiEvent;
use crate::{EVENT_CHANNEL_CAPACITY, PAGE_SIZE};
use app_core::characters::{
    CharacterRepository, GetCharacterDetails, GetCharacters, SearchCharacters,
};
use dragonball_api::Character;

/// State of the character list screen
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterListState {
    /// Characters loaded so far
    pub items: Vec<Character>,
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

impl Default for CharacterListState {
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

impl CharacterListState {
    /// Whether the screen has nothing to show
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.is_loading
    }

    /// Items matching the current search query
    ///
    /// A blank query matches everything; otherwise a case-insensitive
    /// substring match on the name.
    pub fn filtered_characters(&self) -> Vec<Character> {
        if self.search_query.trim().is_empty() {
            return self.items.clone();
        }
        let needle = self.search_query.to_lowercase();
        self.items.iter().filter(|c| c.name.to_lowercase().contains(&needle)).cloned().collect()
    }
}

/// View-model for the paginated character list
pub struct CharacterListViewModel {
    get_characters: GetCharacters,
    search_characters: SearchCharacters,
    state: watch::Sender<CharacterListState>,
    events: broadcast::Sender<UiEvent>,
}

impl CharacterListViewModel {
    /// Create the view-model over a repository
    pub fn new(repository: Arc<dyn CharacterRepository>) -> Self {
        let (state, _) = watch::channel(CharacterListState::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            get_characters: GetCharacters::new(repository.clone()),
            search_characters: SearchCharacters::new(repository),
            state,
            events,
        }
    }

    /// Subscribe to state changes
    pub fn state(&self) -> watch::Receiver<CharacterListState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> CharacterListState {
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

        match self.get_characters.run(page, PAGE_SIZE).await {
            Ok(characters) => {
                debug!(page, count = characters.len(), "character page loaded");
                self.state.send_modify(|s| {
                    s.has_more_pages = !characters.is_empty();
                    if page == 1 {
                        s.items = characters;
                    } else {
                        s.items.extend(characters);
                    }
                    s.current_page = page;
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!(page, error = %e, "character page load failed");
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

        match self.search_characters.run(query).await {
            Ok(characters) => {
                self.state.send_modify(|s| {
                    s.items = characters;
                    s.is_loading = false;
                    s.has_more_pages = false;
                });
            }
            Err(e) => {
                warn!(query, error = %e, "character search failed");
                let message = e.to_string();
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = Some(message.clone());
                });
                let _ = self.events.send(UiEvent::ShowError(message));
            }
        }
    }

    /// Emit navigation to the selected character's detail screen
    pub fn on_select(&self, character_id: u32) {
        let _ = self.events.send(UiEvent::NavigateToDetail(character_id));
    }

    /// Reload from the first page
    pub async fn refresh(&self) {
        self.load(1).await;
    }
}

/// State of the character detail screen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CharacterDetailState {
    /// The character, once loaded
    pub character: Option<Character>,
    /// Whether a load is in flight
    pub is_loading: bool,
    /// Last error message, cleared on the next load
    pub error: Option<String>,
}

/// View-model for a single character's detail screen
pub struct CharacterDetailViewModel {
    get_details: GetCharacterDetails,
    character_id: u32,
    state: watch::Sender<CharacterDetailState>,
    events: broadcast::Sender<UiEvent>,
}

impl CharacterDetailViewModel {
    /// Create the view-model for the given character id
    pub fn new(repository: Arc<dyn CharacterRepository>, character_id: u32) -> Self {
        let (state, _) = watch::channel(CharacterDetailState::default());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { get_details: GetCharacterDetails::new(repository), character_id, state, events }
    }

    /// Subscribe to state changes
    pub fn state(&self) -> watch::Receiver<CharacterDetailState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current_state(&self) -> CharacterDetailState {
        self.state.borrow().clone()
    }

    /// Subscribe to one-shot UI events
    pub fn events(&self) -> broadcast::Receiver<UiEvent> {
        self.events.subscribe()
    }

    /// Load the character
    pub async fn load(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        match self.get_details.run(self.character_id).await {
            Ok(character) => {
                self.state.send_modify(|s| {
                    s.character = Some(character);
                    s.is_loading = false;
                });
            }
            Err(e) => {
                warn!(character_id = self.character_id, error = %e, "character detail load failed");
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

    /// Reload the character
    pub async fn refresh(&self) {
        self.load().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_core::characters::CharacterError;
    use app_core::test_support::{builders, FakeCharacterRepository};

    fn seeded_repo(count: u32) -> Arc<FakeCharacterRepository> {
        let repo = FakeCharacterRepository::new();
        repo.set_characters(builders::character_list(count, 1));
        Arc::new(repo)
    }

    #[tokio::test]
    async fn test_load_replaces_items_on_first_page() {
        let vm = CharacterListViewModel::new(seeded_repo(5));

        vm.load(1).await;

        let state = vm.current_state();
        assert_eq!(state.items.len(), 5);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
        assert_eq!(state.current_page, 1);
        assert!(state.has_more_pages);
    }

    #[tokio::test]
    async fn test_load_next_page_appends() {
        let vm = CharacterListViewModel::new(seeded_repo(25));

        vm.load(1).await;
        vm.load_next_page().await;

        let state = vm.current_state();
        assert_eq!(state.items.len(), 25);
        assert_eq!(state.current_page, 2);
        assert_eq!(state.items[20].id, 21);
    }

    #[tokio::test]
    async fn test_empty_page_stops_pagination() {
        let repo = seeded_repo(20);
        let vm = CharacterListViewModel::new(repo.clone());

        vm.load(1).await;
        vm.load_next_page().await;
        assert!(!vm.current_state().has_more_pages);

        // Exhausted: further calls must not hit the repository
        vm.load_next_page().await;
        assert_eq!(repo.get_characters_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_sets_error_and_emits_event() {
        let repo = Arc::new(FakeCharacterRepository::new());
        repo.fail_with(CharacterError::Network("connection reset".to_string()));
        let vm = CharacterListViewModel::new(repo);
        let mut events = vm.events();

        vm.load(1).await;

        let state = vm.current_state();
        assert!(!state.is_loading);
        assert!(state.is_empty());
        let message = state.error.unwrap();
        assert!(message.contains("connection reset"));
        assert_eq!(events.try_recv().unwrap(), UiEvent::ShowError(message));
    }

    #[tokio::test]
    async fn test_search_replaces_items_and_stops_pagination() {
        let repo = Arc::new(FakeCharacterRepository::new());
        repo.set_characters(vec![
            builders::character(1, "Goku"),
            builders::character(2, "Gohan"),
            builders::character(3, "Vegeta"),
        ]);
        let vm = CharacterListViewModel::new(repo);

        vm.search("go").await;

        let state = vm.current_state();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.search_query, "go");
        assert!(!state.has_more_pages);
    }

    #[tokio::test]
    async fn test_blank_search_reloads_first_page() {
        let repo = seeded_repo(3);
        let vm = CharacterListViewModel::new(repo.clone());

        vm.search("   ").await;

        let state = vm.current_state();
        assert_eq!(state.items.len(), 3);
        assert!(repo.search_calls.lock().unwrap().is_empty());
        assert_eq!(*repo.get_characters_calls.lock().unwrap(), vec![(1, PAGE_SIZE)]);
    }

    #[tokio::test]
    async fn test_on_select_emits_navigation() {
        let vm = CharacterListViewModel::new(seeded_repo(1));
        let mut events = vm.events();

        vm.on_select(42);

        assert_eq!(events.try_recv().unwrap(), UiEvent::NavigateToDetail(42));
    }

    #[tokio::test]
    async fn test_refresh_resets_to_first_page() {
        let vm = CharacterListViewModel::new(seeded_repo(25));

        vm.load(1).await;
        vm.load_next_page().await;
        vm.refresh().await;

        let state = vm.current_state();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.items.len(), 20);
    }

    #[test]
    fn test_filtered_characters_uses_query() {
        let state = CharacterListState {
            items: vec![builders::character(1, "Goku"), builders::character(2, "Piccolo")],
            search_query: "PICC".to_string(),
            ..Default::default()
        };

        let filtered = state.filtered_characters();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Piccolo");
    }

    #[tokio::test]
    async fn test_detail_load_success() {
        let repo = Arc::new(FakeCharacterRepository::new());
        repo.set_characters(vec![builders::character(7, "Piccolo")]);
        let vm = CharacterDetailViewModel::new(repo, 7);

        vm.load().await;

        let state = vm.current_state();
        assert_eq!(state.character.as_ref().map(|c| c.name.as_str()), Some("Piccolo"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let vm = CharacterDetailViewModel::new(Arc::new(FakeCharacterRepository::new()), 99);
        let mut events = vm.events();

        vm.load().await;

        let state = vm.current_state();
        assert!(state.character.is_none());
        assert!(state.error.is_some());
        assert!(matches!(events.try_recv().unwrap(), UiEvent::ShowError(_)));
    }

    #[tokio::test]
    async fn test_detail_on_back() {
        let vm = CharacterDetailViewModel::new(Arc::new(FakeCharacterRepository::new()), 1);
        let mut events = vm.events();

        vm.on_back();

        assert_eq!(events.try_recv().unwrap(), UiEvent::NavigateBack);
    }

    #[tokio::test]
    async fn test_state_watch_notifies() {
        let vm = CharacterListViewModel::new(seeded_repo(2));
        let mut rx = vm.state();

        vm.load(1).await;

        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().items.is_empty());
    }
}
