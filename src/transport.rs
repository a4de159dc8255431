//! Access to the remote device-control service.

use crate::config::PanelConfig;
use crate::device::{DeviceRecord, DiscoveredDevice, parse_device_list, parse_discovered};
use crate::error::PanelError;
use crate::values::{FanSpeed, LightSetting};

use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;

// =============================================================================
// Control command
// =============================================================================

/// The complete new state of one device, as sent to `/control`.
///
/// Commands are authoritative: every field is sent every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlCommand {
    /// Target device address.
    pub address: String,
    /// Light mode with its values.
    pub setting: LightSetting,
    /// Fan speed.
    pub fan: FanSpeed,
}

impl ControlCommand {
    /// Query parameters in wire order: address, mode, mode values, fan.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("address", self.address.clone()),
            ("mode", self.setting.mode().as_str().to_string()),
        ];
        match self.setting {
            LightSetting::Main(value) => {
                pairs.push(("bright", value.intensity.to_string()));
                pairs.push(("warm", value.warmth.to_string()));
            }
            LightSetting::Rgb(value) => {
                pairs.push(("hue", value.hue.to_string()));
                pairs.push(("rgbValue", value.brightness.to_string()));
            }
            LightSetting::Off => {}
        }
        pairs.push(("fan", self.fan.level().to_string()));
        pairs
    }
}

// =============================================================================
// Transport Trait
// =============================================================================

/// Trait for device-service implementations.
///
/// This allows for mock implementations in tests.
pub trait DeviceTransport {
    /// Push a complete device state. Returns the response body text.
    fn control(&self, command: &ControlCommand) -> Result<String, PanelError>;

    /// Fetch every registered device.
    fn fetch_devices(&self) -> Result<Vec<DeviceRecord>, PanelError>;

    /// Scan for nearby devices.
    fn discover(&self) -> Result<Vec<DiscoveredDevice>, PanelError>;

    /// Register a device. Returns the response body text.
    fn add_device(&self, name: &str, address: &str) -> Result<String, PanelError>;

    /// Forget a device. Returns the response body text.
    fn remove_device(&self, address: &str) -> Result<String, PanelError>;
}

// =============================================================================
// HttpTransport
// =============================================================================

/// Talks to the device service over plain HTTP GET requests.
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    /// Create a transport from the panel configuration.
    ///
    /// # Errors
    ///
    /// - [`PanelError::InvalidUrl`] if the base URL does not parse
    /// - [`PanelError::Http`] if the HTTP client cannot be built
    pub fn new(config: &PanelConfig) -> Result<Self, PanelError> {
        let mut raw = config.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base =
            Url::parse(&raw).map_err(|e| PanelError::InvalidUrl(format!("{}: {}", raw, e)))?;
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, PanelError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| PanelError::InvalidUrl(format!("{}: {}", path, e)))?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, PanelError> {
        let url = self.endpoint(path, query)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PanelError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        Ok(response.text()?)
    }
}

impl DeviceTransport for HttpTransport {
    fn control(&self, command: &ControlCommand) -> Result<String, PanelError> {
        self.get("control", &command.query_pairs())
    }

    fn fetch_devices(&self) -> Result<Vec<DeviceRecord>, PanelError> {
        let body = self.get("get_all_devices", &[])?;
        parse_device_list(&body)
    }

    fn discover(&self) -> Result<Vec<DiscoveredDevice>, PanelError> {
        let body = self.get("discover_devices", &[])?;
        parse_discovered(&body)
    }

    fn add_device(&self, name: &str, address: &str) -> Result<String, PanelError> {
        self.get(
            "add_device",
            &[("name", name.to_string()), ("address", address.to_string())],
        )
    }

    fn remove_device(&self, address: &str) -> Result<String, PanelError> {
        self.get("remove_device", &[("address", address.to_string())])
    }
}
