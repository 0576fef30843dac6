#![forbid(unsafe_code)]

//! Width bounds and breakpoint configuration for the dual-pane layout.
//!
//! [`LayoutBounds`] is the single configuration object the controller is
//! built from: the chat pane's `{min, max, default}` width percentages plus
//! the viewport breakpoint separating side-by-side from stacked layout.
//!
//! # Shipped default
//!
//! `min = 5`, `max = 95`, `default = 20`, `breakpoint = 1024`. Collapsing a
//! pane drives the chat width to one of the extremes, so a wide range keeps
//! the collapsed pane a thin strip. The tighter `[25, 60]` split with a
//! one-third default is available as [`LayoutBounds::NARROW_CHAT`]; it is
//! never mixed into the default.
//!
//! # Loading
//!
//! ```toml
//! min_percent = 10.0
//! max_percent = 90.0
//! default_percent = 30.0
//! breakpoint_px = 1200
//! ```
//!
//! ```rust,ignore
//! let bounds = LayoutBounds::from_toml_file("layout.toml")?;
//! ```
//!
//! Every loader validates; an invalid file never produces a `LayoutBounds`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default breakpoint between stacked and side-by-side layout, in logical pixels.
pub const DEFAULT_BREAKPOINT_PX: u32 = 1024;

/// Validated chat-pane width bounds and layout breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutBounds")]
pub struct LayoutBounds {
    min_percent: f64,
    max_percent: f64,
    default_percent: f64,
    breakpoint_px: u32,
}

impl LayoutBounds {
    /// Wide range: a collapsed pane keeps 5% of the container.
    pub const WIDE_RANGE: Self = Self {
        min_percent: 5.0,
        max_percent: 95.0,
        default_percent: 20.0,
        breakpoint_px: DEFAULT_BREAKPOINT_PX,
    };

    /// Narrow range: the chat pane stays between a quarter and 60%.
    pub const NARROW_CHAT: Self = Self {
        min_percent: 25.0,
        max_percent: 60.0,
        default_percent: 33.33,
        breakpoint_px: DEFAULT_BREAKPOINT_PX,
    };

    /// Create validated bounds with the default breakpoint.
    pub fn new(
        min_percent: f64,
        max_percent: f64,
        default_percent: f64,
    ) -> Result<Self, LayoutBoundsError> {
        let bounds = Self {
            min_percent,
            max_percent,
            default_percent,
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Replace the breakpoint.
    pub fn with_breakpoint(mut self, breakpoint_px: u32) -> Result<Self, LayoutBoundsError> {
        if breakpoint_px == 0 {
            return Err(LayoutBoundsError::ZeroBreakpoint);
        }
        self.breakpoint_px = breakpoint_px;
        Ok(self)
    }

    /// Smallest chat width, in percent.
    #[must_use]
    pub const fn min_percent(&self) -> f64 {
        self.min_percent
    }

    /// Largest chat width, in percent.
    #[must_use]
    pub const fn max_percent(&self) -> f64 {
        self.max_percent
    }

    /// Chat width restored by `expand_both` and used when nothing is persisted.
    #[must_use]
    pub const fn default_percent(&self) -> f64 {
        self.default_percent
    }

    /// Viewport width at or above which panes sit side by side.
    #[must_use]
    pub const fn breakpoint_px(&self) -> u32 {
        self.breakpoint_px
    }

    /// Clamp `value` into `[min, max]`.
    ///
    /// Non-finite input yields the default width.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default_percent;
        }
        value.max(self.min_percent).min(self.max_percent)
    }

    /// Whether `value` lies inside `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_percent && value <= self.max_percent
    }

    /// Check all invariants, reporting the first violation.
    pub fn validate(&self) -> Result<(), LayoutBoundsError> {
        for (field, value) in [
            ("min_percent", self.min_percent),
            ("max_percent", self.max_percent),
            ("default_percent", self.default_percent),
        ] {
            if !value.is_finite() {
                return Err(LayoutBoundsError::NonFinite { field });
            }
            if !(0.0..=100.0).contains(&value) {
                return Err(LayoutBoundsError::OutOfRange { field, value });
            }
        }
        if self.min_percent >= self.max_percent {
            return Err(LayoutBoundsError::EmptyRange {
                min: self.min_percent,
                max: self.max_percent,
            });
        }
        if !self.contains(self.default_percent) {
            return Err(LayoutBoundsError::DefaultOutsideRange {
                default: self.default_percent,
                min: self.min_percent,
                max: self.max_percent,
            });
        }
        if self.breakpoint_px == 0 {
            return Err(LayoutBoundsError::ZeroBreakpoint);
        }
        Ok(())
    }

    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutBoundsError> {
        toml::from_str(s).map_err(LayoutBoundsError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LayoutBoundsError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(LayoutBoundsError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, LayoutBoundsError> {
        serde_json::from_str(s).map_err(LayoutBoundsError::Json)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, LayoutBoundsError> {
        toml::to_string(self).map_err(LayoutBoundsError::TomlSer)
    }
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self::WIDE_RANGE
    }
}

/// Unvalidated on-disk shape; missing fields take the shipped defaults.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct RawLayoutBounds {
    min_percent: f64,
    max_percent: f64,
    default_percent: f64,
    breakpoint_px: u32,
}

impl Default for RawLayoutBounds {
    fn default() -> Self {
        let bounds = LayoutBounds::default();
        Self {
            min_percent: bounds.min_percent,
            max_percent: bounds.max_percent,
            default_percent: bounds.default_percent,
            breakpoint_px: bounds.breakpoint_px,
        }
    }
}

impl TryFrom<RawLayoutBounds> for LayoutBounds {
    type Error = LayoutBoundsError;

    fn try_from(raw: RawLayoutBounds) -> Result<Self, Self::Error> {
        let bounds = Self {
            min_percent: raw.min_percent,
            max_percent: raw.max_percent,
            default_percent: raw.default_percent,
            breakpoint_px: raw.breakpoint_px,
        };
        bounds.validate()?;
        Ok(bounds)
    }
}

/// Bounds validation and loading errors.
#[derive(Debug)]
pub enum LayoutBoundsError {
    NonFinite {
        field: &'static str,
    },
    OutOfRange {
        field: &'static str,
        value: f64,
    },
    EmptyRange {
        min: f64,
        max: f64,
    },
    DefaultOutsideRange {
        default: f64,
        min: f64,
        max: f64,
    },
    ZeroBreakpoint,
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML serialization error.
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    Json(serde_json::Error),
}

impl fmt::Display for LayoutBoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
            Self::OutOfRange { field, value } => {
                write!(f, "{field} must be within [0, 100] (got {value})")
            }
            Self::EmptyRange { min, max } => {
                write!(f, "min_percent ({min}) must be below max_percent ({max})")
            }
            Self::DefaultOutsideRange { default, min, max } => {
                write!(f, "default_percent ({default}) must lie within [{min}, {max}]")
            }
            Self::ZeroBreakpoint => write!(f, "breakpoint_px must be > 0"),
            Self::Io(error) => write!(f, "I/O error: {error}"),
            Self::Toml(error) => write!(f, "TOML parse error: {error}"),
            Self::TomlSer(error) => write!(f, "TOML serialize error: {error}"),
            Self::Json(error) => write!(f, "JSON parse error: {error}"),
        }
    }
}

impl std::error::Error for LayoutBoundsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Toml(error) => Some(error),
            Self::TomlSer(error) => Some(error),
            Self::Json(error) => Some(error),
            _ => None,
        }
    }
}
