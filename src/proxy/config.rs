use std::env;

/// Fixed upstream chat-completions endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://integrate.api.nvidia.com/v1/chat/completions";

const DEFAULT_PORT: u16 = 3000;

/// Proxy service configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Inbound listener port
    pub port: u16,

    /// Upstream bearer credential; absence surfaces per request, not at startup
    pub api_key: Option<String>,

    /// Upstream chat-completions URL
    pub upstream_url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
        }
    }
}

impl ProxyConfig {
    /// Read configuration from the process environment.
    ///
    /// `PORT` falls back to 3000 when unset or unparseable. `NIM_API_KEY` is
    /// not required here: the credential check happens per request.
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let api_key = env::var("NIM_API_KEY").ok().filter(|k| !k.is_empty());

        Self {
            port,
            api_key,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
        }
    }

    /// Listener bind address
    pub fn bind_address(&self) -> &str {
        "0.0.0.0"
    }

    /// Point the proxy at a different upstream endpoint.
    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }
}
