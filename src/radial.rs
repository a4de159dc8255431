//! Hue/lightness ring picker.
//!
//! A point inside the ring maps to a hue (its angle, quantized to 100 steps)
//! and a brightness (its distance from the center). The radius is split into
//! two ramps: black to full color over the inner half, full color to white
//! over the outer half.

use crate::color::{Rgb, hsl_to_rgb};
use crate::geometry::{DragState, PointerPosition, RadialSurface};
use crate::values::RadialValue;
use log::trace;

const DEGREES_PER_HUE_STEP: f64 = 3.6;
const MID_RATIO: f64 = 0.5;

/// Everything a ring picker renders for one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialSample {
    /// The value exposed to the device API.
    pub value: RadialValue,
    /// Pointer offset from the ring center.
    pub pointer: PointerPosition,
    /// Display color under the pointer.
    pub color: Rgb,
}

/// Map a pointer offset from the center to a ring value.
///
/// Points outside the ring are pulled back onto its edge along the same angle.
pub fn forward(surface: &RadialSurface, pos: PointerPosition) -> RadialSample {
    let radius = surface.radius();

    let mut angle = pos.y.atan2(pos.x).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    let hue = (angle / DEGREES_PER_HUE_STEP).round() as i64;

    let raw_distance = pos.x.hypot(pos.y);
    let distance = raw_distance.clamp(0.0, radius);
    let mid = radius * MID_RATIO;

    let (lightness, saturation) = if distance <= 0.0 {
        (0.0, 0.0)
    } else if distance <= mid {
        let progress = distance / mid;
        (progress * 0.5, progress)
    } else {
        let progress = (distance - mid) / (radius - mid);
        (0.5 + progress * 0.5, 1.0 - progress)
    };

    let brightness = (lightness * 255.0).round() as i64;
    let pointer = if raw_distance > radius {
        let scale = radius / raw_distance;
        PointerPosition::new(pos.x * scale, pos.y * scale)
    } else {
        pos
    };

    RadialSample {
        value: RadialValue::clamped(hue, brightness),
        pointer,
        color: hsl_to_rgb(angle / 360.0, saturation, lightness),
    }
}

/// Place the pointer for a stored ring value.
///
/// Hue 0 points along the positive x axis.
pub fn inverse(surface: &RadialSurface, value: RadialValue) -> RadialSample {
    let radius = surface.radius();
    let mid = radius * MID_RATIO;
    let lightness = f64::from(value.brightness) / 255.0;

    let (distance, saturation) = if lightness <= 0.5 {
        let progress = lightness / 0.5;
        (progress * mid, progress)
    } else {
        let progress = (lightness - 0.5) / 0.5;
        (mid + progress * (radius - mid), 1.0 - progress)
    };
    let distance = distance.min(radius);

    let angle = f64::from(value.hue) * DEGREES_PER_HUE_STEP;
    let radians = angle.to_radians();

    RadialSample {
        value,
        pointer: PointerPosition::new(distance * radians.cos(), distance * radians.sin()),
        color: hsl_to_rgb(angle / 360.0, saturation, lightness),
    }
}

/// A ring picker bound to one surface.
#[derive(Debug, Clone)]
pub struct RadialPicker {
    surface: RadialSurface,
    drag: DragState,
    current: RadialSample,
}

impl RadialPicker {
    /// Create a picker with its pointer at the center.
    pub fn new(surface: RadialSurface) -> Self {
        let current = forward(&surface, PointerPosition::default());
        Self {
            surface,
            drag: DragState::Idle,
            current,
        }
    }

    /// Start a drag at `pos`. Always yields a sample to commit.
    pub fn press(&mut self, pos: PointerPosition) -> RadialSample {
        self.drag = DragState::Dragging;
        self.sample(pos)
    }

    /// Follow the pointer. Returns `None` unless a drag is in progress.
    pub fn move_to(&mut self, pos: PointerPosition) -> Option<RadialSample> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging => Some(self.sample(pos)),
        }
    }

    /// End the drag.
    pub fn release(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Re-render the pointer from a stored value without committing anything.
    pub fn restore(&mut self, value: RadialValue) -> RadialSample {
        self.current = inverse(&self.surface, value);
        self.current
    }

    fn sample(&mut self, pos: PointerPosition) -> RadialSample {
        self.current = forward(&self.surface, pos);
        trace!(
            "ring sample: pos=({:.1}, {:.1}) hue={} brightness={}",
            pos.x, pos.y, self.current.value.hue, self.current.value.brightness
        );
        self.current
    }

    /// Current drag state.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// The last rendered sample.
    pub fn current(&self) -> RadialSample {
        self.current
    }

    /// The surface this picker maps over.
    pub fn surface(&self) -> &RadialSurface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RadialSurface {
        RadialSurface::new(150.0).unwrap()
    }

    fn hue_distance(a: u8, b: u8) -> u8 {
        let d = a.abs_diff(b) % 100;
        d.min(100 - d)
    }

    #[test]
    fn test_center_is_black() {
        let s = forward(&surface(), PointerPosition::new(0.0, 0.0));
        assert_eq!(s.value, RadialValue::new(0, 0).unwrap());
        assert_eq!(s.color, Rgb::BLACK);
    }

    #[test]
    fn test_mid_radius_is_full_red() {
        let s = forward(&surface(), PointerPosition::new(75.0, 0.0));
        assert_eq!(s.value.hue, 0);
        assert_eq!(s.value.brightness, 128);
        assert_eq!(s.color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_outer_edge_is_white() {
        let s = forward(&surface(), PointerPosition::new(0.0, 150.0));
        assert_eq!(s.value.hue, 25);
        assert_eq!(s.value.brightness, 255);
        assert_eq!(s.color, Rgb::COOL_WHITE);
    }

    #[test]
    fn test_outside_is_clamped_to_edge() {
        let s = forward(&surface(), PointerPosition::new(-300.0, 0.0));
        assert_eq!(s.value.hue, 50);
        assert_eq!(s.value.brightness, 255);
        assert!((s.pointer.x + 150.0).abs() < 1e-9);
        assert!(s.pointer.y.abs() < 1e-9);
    }

    #[test]
    fn test_negative_angles_wrap() {
        let s = forward(&surface(), PointerPosition::new(0.0, -75.0));
        assert_eq!(s.value.hue, 75);
    }

    #[test]
    fn test_inverse_then_forward_round_trip() {
        let surface = surface();
        for hue in 0..=100u8 {
            for brightness in 0..=255u8 {
                let value = RadialValue::new(hue, brightness).unwrap();
                let placed = inverse(&surface, value);
                let back = forward(&surface, placed.pointer);

                assert!(back.value.brightness.abs_diff(brightness) <= 1);
                if brightness > 0 {
                    assert!(
                        hue_distance(back.value.hue, hue) <= 1,
                        "hue {hue} came back as {}",
                        back.value.hue
                    );
                }
            }
        }
    }

    #[test]
    fn test_inverse_color_matches_forward_color() {
        let surface = surface();
        let value = RadialValue::new(33, 90).unwrap();
        let placed = inverse(&surface, value);
        let again = forward(&surface, placed.pointer).color;
        assert!(again.r.abs_diff(placed.color.r) <= 1);
        assert!(again.g.abs_diff(placed.color.g) <= 1);
        assert!(again.b.abs_diff(placed.color.b) <= 1);
    }

    #[test]
    fn test_inverse_stays_inside_ring() {
        let surface = surface();
        let placed = inverse(&surface, RadialValue::new(12, 255).unwrap());
        let d = placed.pointer.x.hypot(placed.pointer.y);
        assert!(d <= 150.0 + 1e-9);
    }

    #[test]
    fn test_gesture_state_machine() {
        let mut picker = RadialPicker::new(surface());
        assert_eq!(picker.drag_state(), DragState::Idle);
        assert!(picker.move_to(PointerPosition::new(10.0, 10.0)).is_none());

        let first = picker.press(PointerPosition::new(75.0, 0.0));
        assert_eq!(first.value.brightness, 128);
        assert_eq!(picker.drag_state(), DragState::Dragging);

        let moved = picker.move_to(PointerPosition::new(0.0, 75.0)).unwrap();
        assert_eq!(moved.value.hue, 25);
        assert_eq!(picker.current(), moved);

        picker.release();
        assert!(picker.move_to(PointerPosition::new(1.0, 1.0)).is_none());
        assert_eq!(picker.current(), moved);
    }

    #[test]
    fn test_restore_does_not_start_drag() {
        let mut picker = RadialPicker::new(surface());
        let restored = picker.restore(RadialValue::new(50, 64).unwrap());
        assert_eq!(picker.drag_state(), DragState::Idle);
        assert!(restored.pointer.x < 0.0);
    }
}
