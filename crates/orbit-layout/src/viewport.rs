#![forbid(unsafe_code)]

//! Viewport width tracking against a single breakpoint.
//!
//! Hosts forward every resize notification; the monitor reduces them to the
//! one bit the layout cares about (wide vs. narrow) and reports a change only
//! when that bit flips. Repeated identical widths are free.

use serde::{Deserialize, Serialize};

/// How the two panes are arranged for the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Panes sit next to each other and the separator can be dragged.
    #[default]
    Wide,
    /// Panes stack vertically at full width.
    Narrow,
}

impl LayoutMode {
    /// Mode for `width` against `breakpoint_px`.
    #[must_use]
    pub fn for_width(width: f64, breakpoint_px: u32) -> Self {
        if width >= f64::from(breakpoint_px) {
            Self::Wide
        } else {
            Self::Narrow
        }
    }

    #[must_use]
    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Wide)
    }
}

/// Emitted when the derived layout mode flips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportChange {
    pub width: f64,
    pub from: LayoutMode,
    pub to: LayoutMode,
}

/// Reduces raw viewport widths to a [`LayoutMode`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMonitor {
    breakpoint_px: u32,
    width: Option<f64>,
    mode: LayoutMode,
}

impl ViewportMonitor {
    /// Create a monitor. Until the first observation the layout is assumed wide.
    #[must_use]
    pub const fn new(breakpoint_px: u32) -> Self {
        Self {
            breakpoint_px,
            width: None,
            mode: LayoutMode::Wide,
        }
    }

    #[must_use]
    pub const fn breakpoint_px(&self) -> u32 {
        self.breakpoint_px
    }

    /// Last accepted viewport width.
    #[must_use]
    pub const fn width(&self) -> Option<f64> {
        self.width
    }

    #[must_use]
    pub const fn mode(&self) -> LayoutMode {
        self.mode
    }

    #[must_use]
    pub const fn is_wide(&self) -> bool {
        self.mode.is_wide()
    }

    /// Record a viewport width.
    ///
    /// Non-finite or negative widths are ignored. Returns `Some` only when
    /// the layout mode flips.
    pub fn observe(&mut self, width: f64) -> Option<ViewportChange> {
        if !width.is_finite() || width < 0.0 {
            tracing::trace!(width, "viewport width ignored");
            return None;
        }
        self.width = Some(width);
        let to = LayoutMode::for_width(width, self.breakpoint_px);
        if to == self.mode {
            return None;
        }
        let from = self.mode;
        self.mode = to;
        tracing::debug!(width, ?from, ?to, "viewport layout mode changed");
        Some(ViewportChange { width, from, to })
    }
}

impl Default for ViewportMonitor {
    fn default() -> Self {
        Self::new(crate::bounds::DEFAULT_BREAKPOINT_PX)
    }
}
