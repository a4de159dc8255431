//! Picker surfaces and pointer coordinates.

use crate::error::PanelError;

/// A pointer location in surface-local coordinates.
///
/// The origin is the center for the ring and the top-left corner for the pad.
/// Recomputed whenever a value is rendered; never the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

impl PointerPosition {
    /// Create a pointer position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Drag gesture state on a picker surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress; moves are ignored.
    #[default]
    Idle,
    /// The pointer is pressed on the surface.
    Dragging,
}

fn check_dimension(value: f64) -> Result<f64, PanelError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PanelError::InvalidGeometry(value))
    }
}

/// A circular picker surface described by its outer radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialSurface {
    radius: f64,
}

impl RadialSurface {
    /// Create a surface with the given outer radius.
    ///
    /// # Errors
    /// Returns [`PanelError::InvalidGeometry`] if the radius is not a positive finite number.
    pub fn new(radius: f64) -> Result<Self, PanelError> {
        Ok(Self {
            radius: check_dimension(radius)?,
        })
    }

    /// The outer radius.
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// A rectangular picker surface anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSurface {
    width: f64,
    height: f64,
}

impl RectSurface {
    /// Create a surface with the given size.
    ///
    /// # Errors
    /// Returns [`PanelError::InvalidGeometry`] if either side is not a positive finite number.
    pub fn new(width: f64, height: f64) -> Result<Self, PanelError> {
        Ok(Self {
            width: check_dimension(width)?,
            height: check_dimension(height)?,
        })
    }

    /// Surface width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Surface height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Clamp a pointer into `[0, width] x [0, height]`.
    pub fn clamp(&self, pos: PointerPosition) -> PointerPosition {
        PointerPosition::new(pos.x.clamp(0.0, self.width), pos.y.clamp(0.0, self.height))
    }
}
