use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

/// Connection details for the remote scrape endpoint. Injected into the
/// orchestrator at construction so tests can point it at a fake server.
#[derive(Clone, Debug, Default)]
pub struct ScrapeConfig {
    /// Base address of the remote service. Missing here, fatal at call time.
    pub base_url: Option<String>,
    /// Static bearer token sent with every request.
    pub token: String,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub scrape: ScrapeConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        // The base URL may be absent at boot; scrape requests then fail with
        // a configuration error instead of the server refusing to start.
        let base_url = env::var("SCRAPE_BASE_URL")
            .ok()
            .filter(|value| !value.is_empty());
        let token = env::var("SCRAPE_API_TOKEN").unwrap_or_default();

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        Ok(Config {
            server_addr,
            scrape: ScrapeConfig { base_url, token },
        })
    }
}
