pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod logger;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod scraper;

use std::sync::Arc;
use config::Config;
use scraper::ScrapeClient;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<ScrapeClient>,
}
