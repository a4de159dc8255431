//! Strongly typed value tuples exchanged with the device API.

use crate::error::PanelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest hue step; the ring quantizes a full turn into 100 steps.
pub const HUE_STEPS: u8 = 100;
/// Lowest main-light intensity level.
pub const MIN_INTENSITY: u8 = 1;
/// Highest main-light intensity level.
pub const MAX_INTENSITY: u8 = 16;

// =============================================================================
// Light Mode
// =============================================================================

/// Which light source a device is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    /// The dimmable white main light.
    #[default]
    Main,
    /// The RGB ring.
    Rgb,
    /// Lights off.
    Off,
}

impl LightMode {
    /// The wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            LightMode::Main => "main",
            LightMode::Rgb => "rgb",
            LightMode::Off => "off",
        }
    }
}

impl fmt::Display for LightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightMode {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(LightMode::Main),
            "rgb" => Ok(LightMode::Rgb),
            "off" => Ok(LightMode::Off),
            other => Err(PanelError::UnknownMode(other.to_string())),
        }
    }
}

// =============================================================================
// Fan Speed
// =============================================================================

/// Fan speed level (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FanSpeed {
    /// Fan stopped.
    #[default]
    Off = 0,
    /// Low speed.
    Low = 1,
    /// Medium speed.
    Medium = 2,
    /// High speed.
    High = 3,
}

const FAN_NAMES: [&str; 4] = ["Off", "Low", "Medium", "High"];

impl FanSpeed {
    /// Create from the numeric level.
    ///
    /// # Errors
    /// Returns an error if level > 3.
    pub fn new(level: u8) -> Result<Self, PanelError> {
        match level {
            0 => Ok(FanSpeed::Off),
            1 => Ok(FanSpeed::Low),
            2 => Ok(FanSpeed::Medium),
            3 => Ok(FanSpeed::High),
            _ => Err(PanelError::InvalidValue {
                field: "fan",
                value: i64::from(level),
                min: 0,
                max: 3,
            }),
        }
    }

    /// Create from any integer, saturating into 0-3.
    pub fn clamped(level: i64) -> Self {
        match level {
            i64::MIN..=0 => FanSpeed::Off,
            1 => FanSpeed::Low,
            2 => FanSpeed::Medium,
            _ => FanSpeed::High,
        }
    }

    /// The numeric level sent on the wire.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Human-readable name shown in the status badge.
    pub fn name(self) -> &'static str {
        FAN_NAMES[self as usize]
    }

    /// One step faster, saturating at [`FanSpeed::High`].
    pub fn step_up(self) -> Self {
        Self::clamped(i64::from(self.level()) + 1)
    }

    /// One step slower, saturating at [`FanSpeed::Off`].
    pub fn step_down(self) -> Self {
        Self::clamped(i64::from(self.level()) - 1)
    }
}

// =============================================================================
// Ring value
// =============================================================================

/// A value selected on the hue/lightness ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RadialValue {
    /// Hue in 100 steps per turn (0-100, where 100 and 0 name the same angle).
    pub hue: u8,
    /// Brightness derived from the radial lightness ramp (0-255).
    pub brightness: u8,
}

impl RadialValue {
    /// Create a ring value.
    ///
    /// # Errors
    /// Returns an error if hue > 100.
    pub fn new(hue: u8, brightness: u8) -> Result<Self, PanelError> {
        if hue > HUE_STEPS {
            return Err(PanelError::InvalidValue {
                field: "hue",
                value: i64::from(hue),
                min: 0,
                max: i64::from(HUE_STEPS),
            });
        }
        Ok(Self { hue, brightness })
    }

    /// Create from arbitrary integers, saturating into range.
    pub fn clamped(hue: i64, brightness: i64) -> Self {
        Self {
            hue: hue.clamp(0, i64::from(HUE_STEPS)) as u8,
            brightness: brightness.clamp(0, 255) as u8,
        }
    }
}

// =============================================================================
// Main light value
// =============================================================================

/// A value selected on the warmth/intensity pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectValue {
    /// Position on the cool-white to warm-yellow axis (0-255).
    pub warmth: u8,
    /// Main light intensity level (1-16).
    pub intensity: u8,
}

impl Default for RectValue {
    fn default() -> Self {
        Self {
            warmth: 0,
            intensity: MIN_INTENSITY,
        }
    }
}

impl RectValue {
    /// Create a pad value.
    ///
    /// # Errors
    /// Returns an error if intensity is not in range 1-16.
    pub fn new(warmth: u8, intensity: u8) -> Result<Self, PanelError> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&intensity) {
            return Err(PanelError::InvalidValue {
                field: "intensity",
                value: i64::from(intensity),
                min: i64::from(MIN_INTENSITY),
                max: i64::from(MAX_INTENSITY),
            });
        }
        Ok(Self { warmth, intensity })
    }

    /// Create from arbitrary integers, saturating into range.
    pub fn clamped(warmth: i64, intensity: i64) -> Self {
        Self {
            warmth: warmth.clamp(0, 255) as u8,
            intensity: intensity.clamp(i64::from(MIN_INTENSITY), i64::from(MAX_INTENSITY)) as u8,
        }
    }
}

// =============================================================================
// Light setting
// =============================================================================

/// A complete light state: the mode together with the values it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSetting {
    /// Main light at the given warmth and intensity.
    Main(RectValue),
    /// RGB ring at the given hue and brightness.
    Rgb(RadialValue),
    /// Lights off; no values are sent.
    Off,
}

impl LightSetting {
    /// The mode this setting selects.
    pub fn mode(&self) -> LightMode {
        match self {
            LightSetting::Main(_) => LightMode::Main,
            LightSetting::Rgb(_) => LightMode::Rgb,
            LightSetting::Off => LightMode::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_mode_strings() {
        for mode in [LightMode::Main, LightMode::Rgb, LightMode::Off] {
            assert_eq!(mode.as_str().parse::<LightMode>().unwrap(), mode);
        }
        assert!("disco".parse::<LightMode>().is_err());
        assert_eq!(serde_json::to_string(&LightMode::Rgb).unwrap(), "\"rgb\"");
    }

    #[test]
    fn test_fan_speed() {
        assert_eq!(FanSpeed::new(2).unwrap(), FanSpeed::Medium);
        assert!(FanSpeed::new(4).is_err());
        assert_eq!(FanSpeed::clamped(-1), FanSpeed::Off);
        assert_eq!(FanSpeed::clamped(9), FanSpeed::High);
        assert_eq!(FanSpeed::High.step_up(), FanSpeed::High);
        assert_eq!(FanSpeed::Off.step_down(), FanSpeed::Off);
        assert_eq!(FanSpeed::Low.step_up(), FanSpeed::Medium);
        assert_eq!(FanSpeed::Medium.name(), "Medium");
        assert_eq!(FanSpeed::Off.name(), "Off");
    }

    #[test]
    fn test_value_validation() {
        assert!(RadialValue::new(100, 255).is_ok());
        assert!(RadialValue::new(101, 0).is_err());
        assert!(RectValue::new(0, 0).is_err());
        assert!(RectValue::new(255, 17).is_err());
        assert_eq!(RectValue::clamped(300, 0), RectValue::new(255, 1).unwrap());
        assert_eq!(RadialValue::clamped(120, -4), RadialValue::new(100, 0).unwrap());
    }
}
