use std::sync::Arc;
use log::info;
use tokio::net::TcpListener;
use golden_scraper::{
    AppState,
    api::routes::create_router,
    config::Config,
    logger,
    scraper::ScrapeClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    if config.scrape.base_url.is_none() {
        log::warn!("SCRAPE_BASE_URL is not set; scrape requests will fail until it is configured");
    }

    // Create application state
    let client = ScrapeClient::new(config.scrape.clone());
    let app_state = AppState {
        config: Arc::new(config),
        client: Arc::new(client),
    };

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
