//! Dragon Ball browser shared logic
//!
//! This is the facade a native front-end binds to: [`AppServices`] wires the
//! API client, repositories, and use cases together and hands out view-models
//! per screen. The member crates carry the layers: `dragonball-api` (HTTP
//! client and wire models), `storage` (in-memory entity store), `app-core`
//! (repositories and use cases), `app-state` (view-models and UI state).

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::Arc;

use app_core::characters::{ApiCharacterRepository, CharacterRepository};
use app_core::planets::{ApiPlanetRepository, PlanetRepository};
use app_core::transformations::{ApiTransformationRepository, TransformationRepository};
use app_state::characters::{CharacterDetailViewModel, CharacterListViewModel};
use app_state::planets::{PlanetDetailViewModel, PlanetListViewModel};
use app_state::transformations::{TransformationDetailViewModel, TransformationListViewModel};
use dragonball_api::{ApiClient, DragonBallApi};

pub use app_core::characters::CharacterError;
pub use app_core::planets::PlanetError;
pub use app_core::transformations::TransformationError;
pub use app_state::characters::{CharacterDetailState, CharacterListState};
pub use app_state::planets::{PlanetDetailState, PlanetListState};
pub use app_state::transformations::{TransformationDetailState, TransformationListState};
pub use app_state::{UiEvent, PAGE_SIZE};
pub use dragonball_api::{
    ApiClientConfig, ApiError, Character, OriginPlanet, Page, Planet, Transformation,
    TransformationDetail,
};

/// Initialize tracing for host applications
///
/// Respects `RUST_LOG`; safe to call more than once.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dragonball_browser=info,app_state=info"));

    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

/// Wiring for the whole shared-logic stack
///
/// One `AppServices` holds one API client and one repository (and therefore
/// one cache) per feature. View-models created from it share those caches.
pub struct AppServices {
    characters: Arc<dyn CharacterRepository>,
    planets: Arc<dyn PlanetRepository>,
    transformations: Arc<dyn TransformationRepository>,
}

impl AppServices {
    /// Build the stack against the given API configuration
    pub fn new(config: ApiClientConfig) -> Self {
        let api = Arc::new(DragonBallApi::new(ApiClient::new(config)));
        Self {
            characters: Arc::new(ApiCharacterRepository::new(api.clone())),
            planets: Arc::new(ApiPlanetRepository::new(api.clone())),
            transformations: Arc::new(ApiTransformationRepository::new(api)),
        }
    }

    /// Build the stack against the public Dragon Ball API
    pub fn with_defaults() -> Self {
        Self::new(ApiClientConfig::default())
    }

    /// The character repository
    pub fn character_repository(&self) -> Arc<dyn CharacterRepository> {
        self.characters.clone()
    }

    /// The planet repository
    pub fn planet_repository(&self) -> Arc<dyn PlanetRepository> {
        self.planets.clone()
    }

    /// The transformation repository
    pub fn transformation_repository(&self) -> Arc<dyn TransformationRepository> {
        self.transformations.clone()
    }

    /// View-model for the character list screen
    pub fn character_list_view_model(&self) -> CharacterListViewModel {
        CharacterListViewModel::new(self.characters.clone())
    }

    /// View-model for a character detail screen
    pub fn character_detail_view_model(&self, character_id: u32) -> CharacterDetailViewModel {
        CharacterDetailViewModel::new(self.characters.clone(), character_id)
    }

    /// View-model for the planet list screen
    pub fn planet_list_view_model(&self) -> PlanetListViewModel {
        PlanetListViewModel::new(self.planets.clone())
    }

    /// View-model for a planet detail screen
    pub fn planet_detail_view_model(&self, planet_id: u32) -> PlanetDetailViewModel {
        PlanetDetailViewModel::new(self.planets.clone(), planet_id)
    }

    /// View-model for the transformation list screen
    pub fn transformation_list_view_model(&self) -> TransformationListViewModel {
        TransformationListViewModel::new(self.transformations.clone())
    }

    /// View-model for a transformation detail screen
    pub fn transformation_detail_view_model(
        &self,
        transformation_id: u32,
    ) -> TransformationDetailViewModel {
        TransformationDetailViewModel::new(self.transformations.clone(), transformation_id)
    }
}
