#![forbid(unsafe_code)]

//! Layout: the analysis/chat split controller and its inputs.
//!
//! # Role in the dashboard
//! The dashboard body shows two panes side by side: generated analysis on the
//! left and the assistant chat on the right. This crate owns everything about
//! how they share the container:
//! - [`LayoutBounds`]: the validated `{min, max, default}` chat width triple
//!   and the viewport breakpoint.
//! - [`ViewportMonitor`]: wide vs. narrow layout from raw viewport widths.
//! - [`LayoutController`]: width, visibility, collapse and resize-session state,
//!   persisted through an [`orbit_core::PreferenceStore`].
//! - [`PaneLayout`]: the geometry a host renders.
//!
//! Pointer plumbing (document listeners during a drag) lives in `orbit-web`.

pub mod bounds;
pub mod controller;
pub mod projection;
pub mod viewport;

pub use bounds::{DEFAULT_BREAKPOINT_PX, LayoutBounds, LayoutBoundsError};
pub use controller::{
    CollapseState, DEFAULT_CHAT_VISIBLE, LayoutChange, LayoutController, LayoutInvariantError,
    LayoutState, PREF_CHAT_VISIBLE, PREF_CHAT_WIDTH,
};
pub use projection::{PaneArrangement, PaneLayout, PaneSlot, SeparatorState};
pub use viewport::{LayoutMode, ViewportChange, ViewportMonitor};
