//! Which picker is visible, and keeping its pointer in step with the active device.

use crate::config::PanelConfig;
use crate::device::{DeviceRecord, DeviceRegistry};
use crate::error::PanelError;
use crate::geometry::{PointerPosition, RadialSurface, RectSurface};
use crate::radial::{RadialPicker, RadialSample};
use crate::rect::{RectPicker, RectSample};
use crate::values::{LightMode, LightSetting};
use log::{debug, info};

/// Lifecycle of a picker: created the first time its mode is entered, then kept.
#[derive(Debug, Clone, Default)]
pub enum PickerSlot<P> {
    /// Never shown yet.
    #[default]
    Uninitialized,
    /// Bound to its surface.
    Bound(P),
}

impl<P> PickerSlot<P> {
    /// Bind on first use; later calls return the existing picker untouched.
    pub fn bind_with(&mut self, bind: impl FnOnce() -> P) -> &mut P {
        if let PickerSlot::Uninitialized = self {
            *self = PickerSlot::Bound(bind());
        }
        match self {
            PickerSlot::Bound(picker) => picker,
            PickerSlot::Uninitialized => unreachable!("slot was bound above"),
        }
    }

    /// The picker, if bound.
    pub fn get(&self) -> Option<&P> {
        match self {
            PickerSlot::Bound(picker) => Some(picker),
            PickerSlot::Uninitialized => None,
        }
    }

    /// The picker for mutation, if bound.
    pub fn get_mut(&mut self) -> Option<&mut P> {
        match self {
            PickerSlot::Bound(picker) => Some(picker),
            PickerSlot::Uninitialized => None,
        }
    }

    /// Whether the picker has been bound.
    pub fn is_bound(&self) -> bool {
        matches!(self, PickerSlot::Bound(_))
    }
}

/// The picker currently accepting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisiblePicker {
    /// Lights off; no picker is shown.
    None,
    /// The hue/lightness ring.
    Ring,
    /// The warmth/intensity pad.
    Pad,
}

/// A sample from whichever picker handled a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerSample {
    /// From the ring.
    Ring(RadialSample),
    /// From the pad.
    Pad(RectSample),
}

impl PickerSample {
    /// The light setting this sample commits.
    pub fn setting(&self) -> LightSetting {
        match self {
            PickerSample::Ring(s) => LightSetting::Rgb(s.value),
            PickerSample::Pad(s) => LightSetting::Main(s.value),
        }
    }
}

/// Routes gestures to the visible picker and restores pointers from device state.
#[derive(Debug, Clone)]
pub struct ViewCoordinator {
    mode: LightMode,
    active: Option<String>,
    ring_surface: RadialSurface,
    pad_surface: RectSurface,
    ring: PickerSlot<RadialPicker>,
    pad: PickerSlot<RectPicker>,
}

impl ViewCoordinator {
    /// Create a coordinator with both pickers unbound and lights off.
    pub fn new(ring_surface: RadialSurface, pad_surface: RectSurface) -> Self {
        Self {
            mode: LightMode::Off,
            active: None,
            ring_surface,
            pad_surface,
            ring: PickerSlot::Uninitialized,
            pad: PickerSlot::Uninitialized,
        }
    }

    /// Create a coordinator using the surface sizes from the configuration.
    ///
    /// # Errors
    /// Returns [`PanelError::InvalidGeometry`] if a configured dimension is not positive.
    pub fn from_config(config: &PanelConfig) -> Result<Self, PanelError> {
        Ok(Self::new(
            RadialSurface::new(config.ring_radius)?,
            RectSurface::new(config.pad_width, config.pad_height)?,
        ))
    }

    /// Make `address` the active device and show its stored state.
    ///
    /// # Errors
    /// Returns [`PanelError::UnknownDevice`] if the registry has no such device.
    pub fn open_device(
        &mut self,
        address: &str,
        registry: &DeviceRegistry,
    ) -> Result<(), PanelError> {
        let record = registry
            .get(address)
            .ok_or_else(|| PanelError::UnknownDevice(address.to_string()))?;
        debug!("opening device {} ({})", record.name, address);

        self.active = Some(address.to_string());
        self.release();
        self.enter(record.effective_mode(), Some(record));
        self.restore_bound(record);
        Ok(())
    }

    /// Forget the active device and hide both pickers.
    pub fn close_device(&mut self) {
        self.release();
        self.active = None;
        self.mode = LightMode::Off;
    }

    /// Switch the visible picker, restoring it from the active device.
    pub fn set_mode(&mut self, mode: LightMode, registry: &DeviceRegistry) {
        self.release();
        let record = self.active.as_deref().and_then(|a| registry.get(a));
        self.enter(mode, record);
    }

    /// Re-select the picker and re-render every bound one from the active
    /// device, e.g. after a reload.
    pub fn refresh(&mut self, registry: &DeviceRegistry) {
        if let Some(record) = self.active.as_deref().and_then(|a| registry.get(a)) {
            self.release();
            self.enter(record.effective_mode(), Some(record));
            self.restore_bound(record);
        }
    }

    fn enter(&mut self, mode: LightMode, record: Option<&DeviceRecord>) {
        self.mode = mode;
        match mode {
            LightMode::Rgb => {
                let surface = self.ring_surface;
                let picker = self.ring.bind_with(|| {
                    info!("binding ring picker (radius {})", surface.radius());
                    RadialPicker::new(surface)
                });
                if let Some(record) = record {
                    picker.restore(record.ring_value());
                }
            }
            LightMode::Main => {
                let surface = self.pad_surface;
                let picker = self.pad.bind_with(|| {
                    info!(
                        "binding pad picker ({}x{})",
                        surface.width(),
                        surface.height()
                    );
                    RectPicker::new(surface)
                });
                if let Some(record) = record {
                    picker.restore(record.main_value());
                }
            }
            LightMode::Off => {}
        }
    }

    fn restore_bound(&mut self, record: &DeviceRecord) {
        if let Some(ring) = self.ring.get_mut() {
            ring.restore(record.ring_value());
        }
        if let Some(pad) = self.pad.get_mut() {
            pad.restore(record.main_value());
        }
    }

    /// Press on the visible picker.
    pub fn press(&mut self, pos: PointerPosition) -> Option<PickerSample> {
        match self.visible() {
            VisiblePicker::Ring => self.ring.get_mut().map(|p| PickerSample::Ring(p.press(pos))),
            VisiblePicker::Pad => self.pad.get_mut().map(|p| PickerSample::Pad(p.press(pos))),
            VisiblePicker::None => None,
        }
    }

    /// Move on the visible picker. `None` unless it is being dragged.
    pub fn drag(&mut self, pos: PointerPosition) -> Option<PickerSample> {
        match self.visible() {
            VisiblePicker::Ring => self
                .ring
                .get_mut()
                .and_then(|p| p.move_to(pos))
                .map(PickerSample::Ring),
            VisiblePicker::Pad => self
                .pad
                .get_mut()
                .and_then(|p| p.move_to(pos))
                .map(PickerSample::Pad),
            VisiblePicker::None => None,
        }
    }

    /// End any drag on either picker.
    pub fn release(&mut self) {
        if let Some(ring) = self.ring.get_mut() {
            ring.release();
        }
        if let Some(pad) = self.pad.get_mut() {
            pad.release();
        }
    }

    /// The picker currently shown.
    pub fn visible(&self) -> VisiblePicker {
        match self.mode {
            LightMode::Rgb => VisiblePicker::Ring,
            LightMode::Main => VisiblePicker::Pad,
            LightMode::Off => VisiblePicker::None,
        }
    }

    /// The selected mode.
    pub fn mode(&self) -> LightMode {
        self.mode
    }

    /// Address of the active device.
    pub fn active_device(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The ring picker, once bound.
    pub fn ring(&self) -> Option<&RadialPicker> {
        self.ring.get()
    }

    /// The pad picker, once bound.
    pub fn pad(&self) -> Option<&RectPicker> {
        self.pad.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DragState;
    use crate::values::{RadialValue, RectValue};

    fn coordinator() -> ViewCoordinator {
        ViewCoordinator::from_config(&PanelConfig::default()).unwrap()
    }

    fn registry() -> DeviceRegistry {
        let mut a = DeviceRecord::new("AA", "Alpha");
        a.apply_setting(LightSetting::Rgb(RadialValue::new(25, 64).unwrap()));
        a.apply_setting(LightSetting::Main(RectValue::new(255, 16).unwrap()));

        let mut b = DeviceRecord::new("BB", "Beta");
        b.apply_setting(LightSetting::Main(RectValue::new(0, 1).unwrap()));
        b.apply_setting(LightSetting::Rgb(RadialValue::new(50, 192).unwrap()));

        let mut registry = DeviceRegistry::new();
        registry.replace([a, b]);
        registry
    }

    #[test]
    fn test_pickers_bind_lazily() {
        let mut view = coordinator();
        let registry = registry();
        assert!(view.ring().is_none());
        assert!(view.pad().is_none());

        view.open_device("AA", &registry).unwrap();
        assert_eq!(view.visible(), VisiblePicker::Pad);
        assert!(view.pad().is_some());
        assert!(view.ring().is_none());

        view.set_mode(LightMode::Rgb, &registry);
        assert_eq!(view.visible(), VisiblePicker::Ring);
        assert!(view.ring().is_some());

        view.set_mode(LightMode::Off, &registry);
        assert_eq!(view.visible(), VisiblePicker::None);
        assert!(view.press(PointerPosition::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_binding_is_idempotent() {
        let mut slot: PickerSlot<u32> = PickerSlot::Uninitialized;
        let mut calls = 0;
        *slot.bind_with(|| {
            calls += 1;
            1
        }) += 10;
        slot.bind_with(|| {
            calls += 1;
            99
        });
        assert_eq!(calls, 1);
        assert_eq!(slot.get(), Some(&11));
    }

    #[test]
    fn test_switching_device_restores_both_pickers() {
        let mut view = coordinator();
        let registry = registry();

        view.open_device("AA", &registry).unwrap();
        view.set_mode(LightMode::Rgb, &registry);
        view.set_mode(LightMode::Main, &registry);

        let pad = view.pad().unwrap().current();
        assert_eq!(pad.value, RectValue::new(255, 16).unwrap());
        assert_eq!(pad.pointer, PointerPosition::new(300.0, 0.0));

        view.open_device("BB", &registry).unwrap();
        assert_eq!(view.visible(), VisiblePicker::Ring);
        assert_eq!(
            view.ring().unwrap().current().value,
            RadialValue::new(50, 192).unwrap()
        );
        let pad = view.pad().unwrap().current();
        assert_eq!(pad.value, RectValue::new(0, 1).unwrap());
        assert_eq!(pad.pointer, PointerPosition::new(0.0, 200.0));
    }

    #[test]
    fn test_gestures_route_to_visible_picker() {
        let mut view = coordinator();
        let registry = registry();
        view.open_device("BB", &registry).unwrap();

        assert!(view.drag(PointerPosition::new(10.0, 0.0)).is_none());
        let pressed = view.press(PointerPosition::new(75.0, 0.0)).unwrap();
        assert_eq!(
            pressed.setting(),
            LightSetting::Rgb(RadialValue::new(0, 128).unwrap())
        );
        assert!(view.drag(PointerPosition::new(0.0, 75.0)).is_some());

        view.set_mode(LightMode::Main, &registry);
        assert_eq!(view.ring().unwrap().drag_state(), DragState::Idle);
        assert!(view.drag(PointerPosition::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_refresh_follows_reloaded_mode() {
        let mut view = coordinator();
        let mut registry = registry();
        view.open_device("AA", &registry).unwrap();
        view.press(PointerPosition::new(10.0, 10.0)).unwrap();

        let mut reloaded = registry.get("AA").unwrap().clone();
        reloaded.apply_setting(LightSetting::Rgb(RadialValue::new(40, 100).unwrap()));
        registry.replace([reloaded]);
        view.refresh(&registry);

        assert_eq!(view.visible(), VisiblePicker::Ring);
        assert_eq!(view.pad().unwrap().drag_state(), DragState::Idle);
        assert_eq!(
            view.ring().unwrap().current().value,
            RadialValue::new(40, 100).unwrap()
        );

        registry.get_mut("AA").unwrap().apply_setting(LightSetting::Off);
        view.refresh(&registry);
        assert_eq!(view.visible(), VisiblePicker::None);
    }

    #[test]
    fn test_open_unknown_device() {
        let mut view = coordinator();
        assert!(matches!(
            view.open_device("nope", &registry()),
            Err(PanelError::UnknownDevice(_))
        ));
        assert_eq!(view.active_device(), None);
    }
}
