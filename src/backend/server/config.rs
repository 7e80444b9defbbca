/**
 * Server Configuration
 *
 * Configuration comes from environment variables with local-development
 * defaults. A malformed value is logged and replaced by the default
 * rather than aborting startup.
 *
 * # Variables
 *
 * - `PORT` - TCP port to listen on (default 8000)
 * - `WEB_ROOT` - directory served for non-API paths (default `web`)
 */

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_WEB_ROOT: &str = "web";

/// Resolved server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub web_root: String,
}

impl ServerConfig {
    /// Load configuration from the environment.
    pub fn from_env() -> Self {
        let port = match std::env::var("PORT") {
            Ok(raw) => match raw.parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    tracing::warn!(value = %raw, "invalid PORT, using {}", DEFAULT_PORT);
                    DEFAULT_PORT
                }
            },
            Err(_) => DEFAULT_PORT,
        };

        let web_root =
            std::env::var("WEB_ROOT").unwrap_or_else(|_| DEFAULT_WEB_ROOT.to_string());

        Self { port, web_root }
    }
}
