//! HTTP server configuration.

use serde::Deserialize;

/// Listener and CORS settings for the HTTP adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind. Defaults to `0.0.0.0:8080`.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Trust `X-Forwarded-For` instead of the peer address.
    ///
    /// Enable only behind a proxy that overwrites the header.
    #[serde(default)]
    pub behind_proxy: bool,

    /// Value of `Access-Control-Allow-Origin`. Defaults to `*`.
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            behind_proxy: false,
            allowed_origin: default_allowed_origin(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".into()
}

fn default_allowed_origin() -> String {
    "*".into()
}
