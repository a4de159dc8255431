//! Warmth/intensity pad picker.
//!
//! The x axis runs from cool white (left) to warm yellow (right); the y axis
//! runs from full intensity (top) down to the lowest level (bottom).

use crate::color::{Rgb, lerp_color};
use crate::geometry::{DragState, PointerPosition, RectSurface};
use crate::values::{MAX_INTENSITY, MIN_INTENSITY, RectValue};
use log::trace;

const INTENSITY_SPAN: f64 = (MAX_INTENSITY - MIN_INTENSITY) as f64;

/// Everything a pad picker renders for one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSample {
    /// The value exposed to the device API.
    pub value: RectValue,
    /// Pointer offset from the top-left corner.
    pub pointer: PointerPosition,
    /// Display color under the pointer.
    pub color: Rgb,
}

/// Warmth first, then darken toward black as the pointer moves down.
fn pad_color(surface: &RectSurface, pointer: PointerPosition) -> Rgb {
    let top = lerp_color(
        Rgb::COOL_WHITE,
        Rgb::WARM_YELLOW,
        pointer.x / surface.width(),
    );
    lerp_color(top, Rgb::BLACK, pointer.y / surface.height())
}

/// Map a pointer offset from the top-left corner to a pad value.
pub fn forward(surface: &RectSurface, pos: PointerPosition) -> RectSample {
    let pointer = surface.clamp(pos);

    let warmth = ((pointer.x / surface.width()) * 255.0).round() as i64;
    let ratio = (surface.height() - pointer.y) / surface.height();
    let intensity = (ratio * INTENSITY_SPAN).round() as i64 + i64::from(MIN_INTENSITY);

    RectSample {
        value: RectValue::clamped(warmth, intensity),
        pointer,
        color: pad_color(surface, pointer),
    }
}

/// Place the pointer for a stored pad value.
pub fn inverse(surface: &RectSurface, value: RectValue) -> RectSample {
    let x = (f64::from(value.warmth) / 255.0) * surface.width();
    let steps = f64::from(value.intensity.saturating_sub(MIN_INTENSITY));
    let y = surface.height() - (steps / INTENSITY_SPAN) * surface.height();
    let pointer = surface.clamp(PointerPosition::new(x, y));

    RectSample {
        value,
        pointer,
        color: pad_color(surface, pointer),
    }
}

/// A pad picker bound to one surface.
#[derive(Debug, Clone)]
pub struct RectPicker {
    surface: RectSurface,
    drag: DragState,
    current: RectSample,
}

impl RectPicker {
    /// Create a picker with its pointer at the bottom-left (coolest, dimmest).
    pub fn new(surface: RectSurface) -> Self {
        let current = inverse(&surface, RectValue::default());
        Self {
            surface,
            drag: DragState::Idle,
            current,
        }
    }

    /// Start a drag at `pos`. Always yields a sample to commit.
    pub fn press(&mut self, pos: PointerPosition) -> RectSample {
        self.drag = DragState::Dragging;
        self.sample(pos)
    }

    /// Follow the pointer. Returns `None` unless a drag is in progress.
    pub fn move_to(&mut self, pos: PointerPosition) -> Option<RectSample> {
        if self.drag == DragState::Idle {
            return None;
        }
        Some(self.sample(pos))
    }

    /// End the drag.
    pub fn release(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Re-render the pointer from a stored value without committing anything.
    pub fn restore(&mut self, value: RectValue) -> RectSample {
        self.current = inverse(&self.surface, value);
        self.current
    }

    fn sample(&mut self, pos: PointerPosition) -> RectSample {
        self.current = forward(&self.surface, pos);
        trace!(
            "pad sample: pos=({:.1}, {:.1}) warmth={} intensity={}",
            pos.x, pos.y, self.current.value.warmth, self.current.value.intensity
        );
        self.current
    }

    /// Current drag state.
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// The last rendered sample.
    pub fn current(&self) -> RectSample {
        self.current
    }

    /// The surface this picker maps over.
    pub fn surface(&self) -> &RectSurface {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RectSurface {
        RectSurface::new(300.0, 200.0).unwrap()
    }

    #[test]
    fn test_top_left_is_cool_white_full_intensity() {
        let s = forward(&surface(), PointerPosition::new(0.0, 0.0));
        assert_eq!(s.value, RectValue::new(0, 16).unwrap());
        assert_eq!(s.color, Rgb::COOL_WHITE);
    }

    #[test]
    fn test_bottom_right_is_black_lowest_intensity() {
        let s = forward(&surface(), PointerPosition::new(300.0, 200.0));
        assert_eq!(s.value, RectValue::new(255, 1).unwrap());
        assert_eq!(s.color, Rgb::BLACK);
    }

    #[test]
    fn test_top_right_is_warm_yellow() {
        let s = forward(&surface(), PointerPosition::new(300.0, 0.0));
        assert_eq!(s.color, Rgb::WARM_YELLOW);
    }

    #[test]
    fn test_pointer_is_clamped() {
        let s = forward(&surface(), PointerPosition::new(-40.0, 900.0));
        assert_eq!(s.pointer, PointerPosition::new(0.0, 200.0));
        assert_eq!(s.value, RectValue::new(0, 1).unwrap());
    }

    #[test]
    fn test_inverse_then_forward_is_exact() {
        let surface = surface();
        for warmth in 0..=255u8 {
            for intensity in 1..=16u8 {
                let value = RectValue::new(warmth, intensity).unwrap();
                let placed = inverse(&surface, value);
                let back = forward(&surface, placed.pointer);
                assert_eq!(back.value, value);
                assert_eq!(back.color, placed.color);
            }
        }
    }

    #[test]
    fn test_gesture_state_machine() {
        let mut picker = RectPicker::new(surface());
        assert!(picker.move_to(PointerPosition::new(5.0, 5.0)).is_none());

        picker.press(PointerPosition::new(150.0, 100.0));
        let moved = picker.move_to(PointerPosition::new(300.0, 0.0)).unwrap();
        assert_eq!(moved.value, RectValue::new(255, 16).unwrap());

        picker.release();
        assert_eq!(picker.drag_state(), DragState::Idle);
        assert!(picker.move_to(PointerPosition::new(0.0, 0.0)).is_none());
        assert_eq!(picker.current(), moved);
    }
}
