//! Panel configuration.

use std::time::Duration;

/// Environment variable that overrides [`PanelConfig::base_url`].
pub const BASE_URL_ENV: &str = "DIMMER_PANEL_URL";

/// Settings shared by the transport, the status banner, and the pickers.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Root URL of the device service.
    pub base_url: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
    /// How long a response message stays in the status banner.
    pub status_hold: Duration,
    /// Outer radius of the hue/lightness ring.
    pub ring_radius: f64,
    /// Width of the warmth/intensity pad.
    pub pad_width: f64,
    /// Height of the warmth/intensity pad.
    pub pad_height: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.4.1/".to_string(),
            request_timeout: Duration::from_secs(5),
            status_hold: Duration::from_secs(3),
            ring_radius: 150.0,
            pad_width: 300.0,
            pad_height: 200.0,
        }
    }
}

impl PanelConfig {
    /// Defaults, with the base URL taken from `DIMMER_PANEL_URL` when set.
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        }
    }

    /// Use a different service URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a different request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Use a different status banner hold time.
    pub fn with_status_hold(mut self, hold: Duration) -> Self {
        self.status_hold = hold;
        self
    }

    /// Use a different ring radius.
    pub fn with_ring_radius(mut self, radius: f64) -> Self {
        self.ring_radius = radius;
        self
    }

    /// Use a different pad size.
    pub fn with_pad_size(mut self, width: f64, height: f64) -> Self {
        self.pad_width = width;
        self.pad_height = height;
        self
    }
}
