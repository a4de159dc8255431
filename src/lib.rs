//! Control panel core for networked smart dimmer and fan devices.
//!
//! This crate provides the client side of a small device-control service:
//! two color pickers that map pointer positions to device values and back,
//! an in-memory registry of known devices, and the logic that keeps picker
//! pointers, status badges, and the remote device state in step.
//!
//! # Pickers
//!
//! - [`RadialPicker`]: a hue/lightness ring. The angle selects one of 100
//!   hue steps and the distance from the center selects a brightness
//!   (black at the center, full color at half radius, white at the edge).
//! - [`RectPicker`]: a warmth/intensity pad. The x axis runs from cool white
//!   to warm yellow, the y axis from intensity 16 (top) to 1 (bottom).
//!
//! Both pickers can place their pointer from a stored value, and mapping that
//! pointer forward again yields the stored value.
//!
//! # Example
//!
//! ```no_run
//! use dimmer_panel::{ControlPanel, HttpTransport, PanelConfig, PointerPosition};
//!
//! fn main() -> Result<(), dimmer_panel::PanelError> {
//!     let config = PanelConfig::from_env();
//!     let mut panel = ControlPanel::new(HttpTransport::new(&config)?, &config)?;
//!
//!     // Load every registered device
//!     panel.reload()?;
//!
//!     // Open one and drag on whichever picker its mode shows
//!     panel.open_device("AA:BB:CC:DD:EE:F1")?;
//!     panel.press(PointerPosition::new(75.0, 0.0));
//!     panel.drag(PointerPosition::new(0.0, 75.0));
//!     panel.release();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! Use [`MockTransport`] to test code without a device:
//!
//! ```
//! use dimmer_panel::{ControlPanel, DeviceRecord, LightMode, MockTransport, PanelConfig};
//!
//! let mock = MockTransport::with_devices([DeviceRecord::new("AA:BB", "Lamp")]);
//! let mut panel = ControlPanel::new(mock, &PanelConfig::default()).unwrap();
//! panel.reload().unwrap();
//! panel.open_device("AA:BB").unwrap();
//! panel.select_mode(LightMode::Rgb);
//! assert_eq!(panel.badge("AA:BB").unwrap().light, "rgb");
//! ```

#![warn(missing_docs)]

mod color;
mod config;
mod device;
mod error;
mod geometry;
mod mock;
mod panel;
mod sync;
mod transport;
mod values;
mod view;

pub mod radial;
pub mod rect;

// Re-export public API
pub use color::{Rgb, hsl_to_rgb, lerp_color};
pub use config::{BASE_URL_ENV, PanelConfig};
pub use device::{
    DeviceRecord, DeviceRegistry, DiscoveredDevice, parse_device_list, parse_discovered,
};
pub use error::PanelError;
pub use geometry::{DragState, PointerPosition, RadialSurface, RectSurface};
pub use mock::MockTransport;
pub use panel::ControlPanel;
pub use radial::{RadialPicker, RadialSample};
pub use rect::{RectPicker, RectSample};
pub use sync::{ControlSync, DeviceBadge, PendingPush, StatusBanner, StatusKind, StatusMessage};
pub use transport::{ControlCommand, DeviceTransport, HttpTransport};
pub use values::{FanSpeed, LightMode, LightSetting, RadialValue, RectValue};
pub use view::{PickerSample, PickerSlot, ViewCoordinator, VisiblePicker};
