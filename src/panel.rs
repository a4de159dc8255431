//! The control panel: device list, pickers, and pushes wired together.

use crate::config::PanelConfig;
use crate::device::{DeviceRegistry, DiscoveredDevice};
use crate::error::PanelError;
use crate::geometry::PointerPosition;
use crate::sync::{ControlSync, DeviceBadge, StatusKind, StatusMessage};
use crate::transport::DeviceTransport;
use crate::values::{FanSpeed, LightMode, LightSetting};
use crate::view::{PickerSample, ViewCoordinator};

use log::{info, warn};

const NO_DEVICES: &str = "No devices configured yet.";

/// One panel instance talking to one device service.
///
/// Owns the device registry; the view coordinator and the sync layer only
/// ever see it through this type.
pub struct ControlPanel<T: DeviceTransport> {
    transport: T,
    registry: DeviceRegistry,
    view: ViewCoordinator,
    sync: ControlSync,
    list_notice: Option<String>,
}

impl<T: DeviceTransport> ControlPanel<T> {
    /// Create a panel with an empty registry. Call [`reload`](Self::reload) to populate it.
    ///
    /// # Errors
    /// Returns [`PanelError::InvalidGeometry`] if the configured picker sizes are invalid.
    pub fn new(transport: T, config: &PanelConfig) -> Result<Self, PanelError> {
        Ok(Self {
            transport,
            registry: DeviceRegistry::new(),
            view: ViewCoordinator::from_config(config)?,
            sync: ControlSync::new(config.status_hold),
            list_notice: Some(NO_DEVICES.to_string()),
        })
    }

    // -------------------------------------------------------------------------
    // Device list
    // -------------------------------------------------------------------------

    /// Rebuild the registry from the service. Returns the number of devices.
    ///
    /// An unreadable list leaves the registry and pickers untouched and shows
    /// an inline notice instead.
    pub fn reload(&mut self) -> Result<usize, PanelError> {
        let records = match self.transport.fetch_devices() {
            Ok(records) => records,
            Err(e) => {
                warn!("device list reload failed: {}", e);
                match &e {
                    PanelError::MalformedPayload(_) => {
                        self.list_notice = Some("Could not read the device list.".to_string());
                    }
                    _ => self.sync.report(StatusKind::Error, format!("Error: {}", e)),
                }
                return Err(e);
            }
        };

        self.registry.replace(records);
        self.sync.render_all(&self.registry);
        self.list_notice = self.registry.is_empty().then(|| NO_DEVICES.to_string());

        match self.view.active_device().map(str::to_string) {
            Some(active) if !self.registry.contains(&active) => {
                info!("active device {} is gone, closing it", active);
                self.view.close_device();
            }
            Some(_) => self.view.refresh(&self.registry),
            None => {}
        }
        Ok(self.registry.len())
    }

    /// Scan for nearby devices, not-yet-registered ones first.
    pub fn discover(&self) -> Result<Vec<DiscoveredDevice>, PanelError> {
        let mut found = self.transport.discover()?;
        found.sort_by_key(|d| d.is_configured);
        info!("discovery found {} device(s)", found.len());
        Ok(found)
    }

    /// Register a device with the service, then reload the whole list.
    ///
    /// The list is reloaded even when the request fails; the failure is shown
    /// in the status banner and returned.
    pub fn add_device(&mut self, name: &str, address: &str) -> Result<usize, PanelError> {
        info!("adding device {} ({})", name, address);
        let outcome = self.transport.add_device(name, address);
        self.finish_list_change(outcome)
    }

    /// Remove a device from the service, then reload the whole list.
    ///
    /// Failures are handled as for [`add_device`](Self::add_device).
    pub fn remove_device(&mut self, address: &str) -> Result<usize, PanelError> {
        info!("removing device {}", address);
        let outcome = self.transport.remove_device(address);
        self.finish_list_change(outcome.map(|_| String::new()))
    }

    fn finish_list_change(
        &mut self,
        outcome: Result<String, PanelError>,
    ) -> Result<usize, PanelError> {
        match outcome {
            Ok(message) => {
                if !message.is_empty() {
                    self.sync.report(StatusKind::Success, message);
                }
                self.reload()
            }
            Err(e) => {
                warn!("device list change failed: {}", e);
                // Reload errors are already reported; the request error wins the banner.
                let _ = self.reload();
                self.sync.report(StatusKind::Error, format!("Error: {}", e));
                Err(e)
            }
        }
    }

    /// Open a device: its mode selects the picker and both pickers show its values.
    pub fn open_device(&mut self, address: &str) -> Result<(), PanelError> {
        self.view.open_device(address, &self.registry)
    }

    /// Close the open device.
    pub fn close_device(&mut self) {
        self.view.close_device();
    }

    // -------------------------------------------------------------------------
    // Controls
    // -------------------------------------------------------------------------

    /// Change the light mode of the open device and push its stored values for that mode.
    pub fn select_mode(&mut self, mode: LightMode) -> Option<u64> {
        self.view.set_mode(mode, &self.registry);
        let setting = self.active_setting(mode)?;
        self.commit(setting)
    }

    /// Press on the visible picker and commit the value under the pointer.
    pub fn press(&mut self, pos: PointerPosition) -> Option<PickerSample> {
        let sample = self.view.press(pos)?;
        self.commit(sample.setting());
        Some(sample)
    }

    /// Drag on the visible picker and commit the new value.
    pub fn drag(&mut self, pos: PointerPosition) -> Option<PickerSample> {
        let sample = self.view.drag(pos)?;
        self.commit(sample.setting());
        Some(sample)
    }

    /// End the current gesture.
    pub fn release(&mut self) {
        self.view.release();
    }

    /// Set the fan speed of the open device, keeping its light as shown.
    pub fn set_fan_speed(&mut self, fan: FanSpeed) -> Option<u64> {
        let setting = self.active_setting(self.view.mode())?;
        let address = self.view.active_device()?.to_string();
        self.sync
            .apply(&mut self.registry, &self.transport, &address, setting, fan)
    }

    /// One fan step faster.
    pub fn increase_fan(&mut self) -> Option<u64> {
        let fan = self.active_fan()?.step_up();
        self.set_fan_speed(fan)
    }

    /// One fan step slower.
    pub fn decrease_fan(&mut self) -> Option<u64> {
        let fan = self.active_fan()?.step_down();
        self.set_fan_speed(fan)
    }

    fn active_fan(&self) -> Option<FanSpeed> {
        let address = self.view.active_device()?;
        self.registry.get(address).map(|r| r.fan_speed)
    }

    fn active_setting(&self, mode: LightMode) -> Option<LightSetting> {
        let address = self.view.active_device()?;
        match self.registry.get(address) {
            Some(record) => Some(record.setting_for(mode)),
            None => {
                warn!("open device {} is not in the registry", address);
                None
            }
        }
    }

    fn commit(&mut self, setting: LightSetting) -> Option<u64> {
        let address = self.view.active_device()?.to_string();
        let fan = self.active_fan().unwrap_or_default();
        self.sync
            .apply(&mut self.registry, &self.transport, &address, setting, fan)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The device registry.
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// The view coordinator.
    pub fn view(&self) -> &ViewCoordinator {
        &self.view
    }

    /// The status badge for a device.
    pub fn badge(&self, address: &str) -> Option<&DeviceBadge> {
        self.sync.badge(address)
    }

    /// The transient status message, if one is showing.
    pub fn status(&self) -> Option<&StatusMessage> {
        self.sync.banner().visible()
    }

    /// Inline notice for the device list (empty or unreadable).
    pub fn list_notice(&self) -> Option<&str> {
        self.list_notice.as_deref()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
