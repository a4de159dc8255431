//! Device records, the in-memory registry, and parsing of service payloads.

use crate::error::PanelError;
use crate::values::{FanSpeed, LightMode, LightSetting, RadialValue, RectValue};
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;

/// Last-known configuration of one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Stable MAC-like identifier; unique registry key.
    pub address: String,
    /// Display name.
    pub name: String,
    /// Whether any light is on.
    pub is_on: bool,
    /// Selected light mode.
    pub light_mode: LightMode,
    /// Main light intensity (1-16).
    pub main_brightness: u8,
    /// Main light warmth (0-255).
    pub main_warmth: u8,
    /// Ring hue (0-100).
    pub ring_hue: u8,
    /// Ring brightness (0-255).
    pub ring_brightness: u8,
    /// Fan speed.
    pub fan_speed: FanSpeed,
}

impl DeviceRecord {
    /// A freshly registered device: main light, off, fan off.
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: name.into(),
            is_on: false,
            light_mode: LightMode::Main,
            main_brightness: RectValue::default().intensity,
            main_warmth: 150,
            ring_hue: 0,
            ring_brightness: 0,
            fan_speed: FanSpeed::Off,
        }
    }

    /// The stored main light value.
    pub fn main_value(&self) -> RectValue {
        RectValue::clamped(self.main_warmth.into(), self.main_brightness.into())
    }

    /// The stored ring value.
    pub fn ring_value(&self) -> RadialValue {
        RadialValue::clamped(self.ring_hue.into(), self.ring_brightness.into())
    }

    /// The mode the view should show for this device.
    pub fn effective_mode(&self) -> LightMode {
        if self.is_on {
            self.light_mode
        } else {
            LightMode::Off
        }
    }

    /// The complete light setting for `mode`, built from stored values.
    pub fn setting_for(&self, mode: LightMode) -> LightSetting {
        match mode {
            LightMode::Main => LightSetting::Main(self.main_value()),
            LightMode::Rgb => LightSetting::Rgb(self.ring_value()),
            LightMode::Off => LightSetting::Off,
        }
    }

    /// The device's current light setting.
    pub fn setting(&self) -> LightSetting {
        self.setting_for(self.effective_mode())
    }

    /// Write a light setting into the record.
    ///
    /// Only the fields belonging to the setting's mode change; `Off` keeps the
    /// stored values so they can be restored later.
    pub fn apply_setting(&mut self, setting: LightSetting) {
        match setting {
            LightSetting::Main(value) => {
                self.main_brightness = value.intensity;
                self.main_warmth = value.warmth;
            }
            LightSetting::Rgb(value) => {
                self.ring_hue = value.hue;
                self.ring_brightness = value.brightness;
            }
            LightSetting::Off => {}
        }
        self.light_mode = setting.mode();
        self.is_on = setting.mode() != LightMode::Off;
    }
}

/// All known devices keyed by address.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, DeviceRecord>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every record with the given list.
    pub fn replace(&mut self, records: impl IntoIterator<Item = DeviceRecord>) {
        self.devices = records
            .into_iter()
            .map(|record| (record.address.clone(), record))
            .collect();
        info!("device registry reloaded: {} device(s)", self.devices.len());
    }

    /// Look up a device.
    pub fn get(&self, address: &str) -> Option<&DeviceRecord> {
        self.devices.get(address)
    }

    /// Look up a device for mutation.
    pub fn get_mut(&mut self, address: &str) -> Option<&mut DeviceRecord> {
        self.devices.get_mut(address)
    }

    /// Whether a device is known.
    pub fn contains(&self, address: &str) -> bool {
        self.devices.contains_key(address)
    }

    /// Number of devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether there are no devices.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Iterate over records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.devices.values()
    }

    /// Records sorted by name, then address, for stable listings.
    pub fn sorted(&self) -> Vec<&DeviceRecord> {
        let mut records: Vec<_> = self.devices.values().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.address.cmp(&b.address)));
        records
    }
}

// =============================================================================
// Discovery
// =============================================================================

/// A candidate device reported by a discovery scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscoveredDevice {
    /// Advertised name.
    pub name: String,
    /// Device address.
    #[serde(alias = "mac_address")]
    pub address: String,
    /// Signal strength in dBm, when the service reports it.
    #[serde(default)]
    pub rssi: Option<i32>,
    /// Whether the device is already registered.
    #[serde(default)]
    pub is_configured: bool,
}

/// Parse a `/discover_devices` response body.
pub fn parse_discovered(body: &str) -> Result<Vec<DiscoveredDevice>, PanelError> {
    Ok(serde_json::from_str(body)?)
}

// =============================================================================
// Device list payloads
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeviceListPayload {
    List(Vec<DevicePayload>),
    Map(HashMap<String, DevicePayload>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(i64),
    Text(String),
}

impl Flag {
    fn as_bool(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Number(n) => *n != 0,
            Flag::Text(s) => s.eq_ignore_ascii_case("true") || s == "1",
        }
    }
}

#[derive(Debug, Deserialize)]
struct DevicePayload {
    #[serde(default, alias = "mac_address")]
    address: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_on: Option<Flag>,
    #[serde(default)]
    light_mode: Option<String>,
    #[serde(default)]
    main_brightness: i64,
    #[serde(default, alias = "main_warmness")]
    main_warmth: i64,
    #[serde(default)]
    ring_hue: i64,
    #[serde(default)]
    ring_brightness: i64,
    #[serde(default)]
    fan_speed: i64,
}

fn clamp_field(address: &str, field: &str, value: i64, min: i64, max: i64) -> u8 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!(
            "device {}: {} value {} out of range {}-{}, clamped to {}",
            address, field, value, min, max, clamped
        );
    }
    clamped as u8
}

impl DevicePayload {
    fn into_record(self, key: Option<String>) -> Option<DeviceRecord> {
        let Some(address) = self
            .address
            .filter(|a| !a.is_empty())
            .or(key)
            .filter(|a| !a.is_empty())
        else {
            warn!("skipping device entry without an address");
            return None;
        };

        let light_mode = match self.light_mode.as_deref() {
            None => LightMode::Main,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("device {}: unknown light mode '{}', using main", address, raw);
                LightMode::Main
            }),
        };

        Some(DeviceRecord {
            name: self
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| address.clone()),
            is_on: self.is_on.as_ref().is_some_and(Flag::as_bool),
            light_mode,
            main_brightness: clamp_field(&address, "main_brightness", self.main_brightness, 1, 16),
            main_warmth: clamp_field(&address, "main_warmth", self.main_warmth, 0, 255),
            ring_hue: clamp_field(&address, "ring_hue", self.ring_hue, 0, 100),
            ring_brightness: clamp_field(&address, "ring_brightness", self.ring_brightness, 0, 255),
            fan_speed: FanSpeed::clamped(self.fan_speed),
            address,
        })
    }
}

/// Parse a `/get_all_devices` response body.
///
/// Accepts either a JSON array of records or an object keyed by address.
pub fn parse_device_list(body: &str) -> Result<Vec<DeviceRecord>, PanelError> {
    let payload: DeviceListPayload = serde_json::from_str(body)?;
    let records = match payload {
        DeviceListPayload::List(entries) => entries
            .into_iter()
            .filter_map(|entry| entry.into_record(None))
            .collect(),
        DeviceListPayload::Map(entries) => entries
            .into_iter()
            .filter_map(|(key, entry)| entry.into_record(Some(key)))
            .collect(),
    };
    Ok(records)
}
