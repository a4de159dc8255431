//! Mock device service for testing.

use crate::device::{DeviceRecord, DiscoveredDevice, parse_device_list};
use crate::error::PanelError;
use crate::transport::{ControlCommand, DeviceTransport};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct MockState {
    registered: BTreeMap<String, DeviceRecord>,
    nearby: Vec<DiscoveredDevice>,
    sent: Vec<ControlCommand>,
    failure: Option<u16>,
    malformed: bool,
}

/// An in-memory stand-in for the device service.
///
/// This allows testing code that depends on [`DeviceTransport`] without a
/// reachable device. It applies control commands to its own records the way
/// the service does and remembers every command it received.
///
/// # Example
///
/// ```
/// use dimmer_panel::{DeviceRecord, DeviceTransport, MockTransport};
///
/// let mock = MockTransport::with_devices([DeviceRecord::new("AA:BB", "Lamp")]);
/// assert_eq!(mock.fetch_devices().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    state: Mutex<MockState>,
}

impl MockTransport {
    /// Create a mock service with no devices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock service with these registered devices.
    pub fn with_devices(records: impl IntoIterator<Item = DeviceRecord>) -> Self {
        let mock = Self::new();
        mock.state.lock().unwrap().registered = records
            .into_iter()
            .map(|record| (record.address.clone(), record))
            .collect();
        mock
    }

    /// Set the devices a discovery scan will report.
    pub fn set_nearby(&self, nearby: Vec<DiscoveredDevice>) {
        self.state.lock().unwrap().nearby = nearby;
    }

    /// Make every following request fail with this HTTP status, or succeed again with `None`.
    pub fn set_failure(&self, status: Option<u16>) {
        self.state.lock().unwrap().failure = status;
    }

    /// Make the device list come back as an unreadable body until reset.
    pub fn set_malformed(&self, malformed: bool) {
        self.state.lock().unwrap().malformed = malformed;
    }

    /// Every control command received so far, oldest first.
    pub fn sent(&self) -> Vec<ControlCommand> {
        self.state.lock().unwrap().sent.clone()
    }

    /// The service-side record for an address.
    pub fn record(&self, address: &str) -> Option<DeviceRecord> {
        self.state.lock().unwrap().registered.get(address).cloned()
    }

    fn check_failure(state: &MockState) -> Result<(), PanelError> {
        match state.failure {
            Some(code) => Err(PanelError::Status {
                code,
                reason: "Mock Failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl DeviceTransport for MockTransport {
    fn control(&self, command: &ControlCommand) -> Result<String, PanelError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        state.sent.push(command.clone());

        match state.registered.get_mut(&command.address) {
            Some(record) => {
                record.apply_setting(command.setting);
                record.fan_speed = command.fan;
                Ok("OK".to_string())
            }
            None => Ok("ERROR: Device not found.".to_string()),
        }
    }

    fn fetch_devices(&self) -> Result<Vec<DeviceRecord>, PanelError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        if state.malformed {
            return parse_device_list("<html>Internal Server Error</html>");
        }
        Ok(state.registered.values().cloned().collect())
    }

    fn discover(&self) -> Result<Vec<DiscoveredDevice>, PanelError> {
        let state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        Ok(state
            .nearby
            .iter()
            .map(|device| DiscoveredDevice {
                is_configured: state.registered.contains_key(&device.address),
                ..device.clone()
            })
            .collect())
    }

    fn add_device(&self, name: &str, address: &str) -> Result<String, PanelError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        if state.registered.contains_key(address) {
            return Ok(format!("Device {} ({}) already registered.", name, address));
        }
        state
            .registered
            .insert(address.to_string(), DeviceRecord::new(address, name));
        Ok(format!("Device {} ({}) added successfully.", name, address))
    }

    fn remove_device(&self, address: &str) -> Result<String, PanelError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        state.registered.remove(address);
        Ok("OK".to_string())
    }
}
