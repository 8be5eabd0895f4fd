use std::sync::Arc;

use storage::Stores;
use storage::services::championship::LeagueDataSource;

/// Shared by every handler: the repositories and the upstream league data.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub data_source: Arc<dyn LeagueDataSource>,
}

impl AppState {
    pub fn new(stores: Stores, data_source: Arc<dyn LeagueDataSource>) -> Self {
        Self {
            stores,
            data_source,
        }
    }
}
