#![forbid(unsafe_code)]

//! Dual-pane layout controller.
//!
//! Owns the chat pane's width, visibility, and collapse state, plus the
//! resize gesture session. Every operation is a synchronous transition on an
//! explicit state object; rendering hosts read [`LayoutController::snapshot`]
//! or [`LayoutController::pane_layout`] afterwards.
//!
//! ```text
//!            collapse_analysis()             collapse_chat()
//!   Balanced ------------------> AnalysisCollapsed <------------> ChatCollapsed
//!      ^                                 |                              |
//!      +------------ expand_both() ------+------------------------------+
//! ```
//!
//! # Invariants
//!
//! 1. `chat_width_percent` always lies in `[min, max]` of the bounds.
//! 2. `AnalysisCollapsed` implies the width equals `max`; `ChatCollapsed`
//!    implies it equals `min`.
//! 3. A resize session is open only in `Balanced` while the chat pane is visible.
//!
//! # Failure Modes
//!
//! Nothing here returns an error. Malformed persisted values fall back to
//! defaults, and operations invoked in the wrong state (or with non-finite
//! pointer input or a degenerate container) are no-ops.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use orbit_core::{ContainerRect, PreferenceStore};
use serde::{Deserialize, Serialize};

use crate::bounds::LayoutBounds;
use crate::projection::PaneLayout;
use crate::viewport::{LayoutMode, ViewportMonitor};

/// Preference key holding the chat width as a decimal string.
pub const PREF_CHAT_WIDTH: &str = "chatbotWidth";

/// Preference key holding `"true"` or `"false"`.
pub const PREF_CHAT_VISIBLE: &str = "chatbotVisible";

/// Chat pane visibility used when nothing valid is persisted.
pub const DEFAULT_CHAT_VISIBLE: bool = true;

/// Position in the collapse state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapseState {
    #[default]
    Balanced,
    AnalysisCollapsed,
    ChatCollapsed,
}

/// Serializable view of the controller state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    pub chat_width_percent: f64,
    pub visible: bool,
    pub analysis_collapsed: bool,
    pub chat_collapsed: bool,
    pub is_resizing: bool,
    pub is_wide_layout: bool,
}

impl LayoutState {
    /// Collapse dimension of this state.
    #[must_use]
    pub const fn collapse_state(&self) -> CollapseState {
        match (self.analysis_collapsed, self.chat_collapsed) {
            (true, _) => CollapseState::AnalysisCollapsed,
            (false, true) => CollapseState::ChatCollapsed,
            (false, false) => CollapseState::Balanced,
        }
    }

    /// Check the controller invariants against `bounds`.
    pub fn validate(&self, bounds: &LayoutBounds) -> Result<(), LayoutInvariantError> {
        let width = self.chat_width_percent;
        if !bounds.contains(width) {
            return Err(LayoutInvariantError::WidthOutOfBounds { width });
        }
        if self.analysis_collapsed && self.chat_collapsed {
            return Err(LayoutInvariantError::BothCollapsed);
        }
        if self.analysis_collapsed && width != bounds.max_percent() {
            return Err(LayoutInvariantError::CollapsedWidthMismatch {
                state: CollapseState::AnalysisCollapsed,
                width,
            });
        }
        if self.chat_collapsed && width != bounds.min_percent() {
            return Err(LayoutInvariantError::CollapsedWidthMismatch {
                state: CollapseState::ChatCollapsed,
                width,
            });
        }
        if self.is_resizing && (self.analysis_collapsed || self.chat_collapsed) {
            return Err(LayoutInvariantError::ResizingWhileCollapsed);
        }
        Ok(())
    }
}

/// Broken controller invariant, reported by [`LayoutState::validate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutInvariantError {
    WidthOutOfBounds { width: f64 },
    BothCollapsed,
    CollapsedWidthMismatch { state: CollapseState, width: f64 },
    ResizingWhileCollapsed,
}

impl fmt::Display for LayoutInvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidthOutOfBounds { width } => write!(f, "chat width {width} outside bounds"),
            Self::BothCollapsed => write!(f, "both panes collapsed"),
            Self::CollapsedWidthMismatch { state, width } => {
                write!(f, "{state:?} with chat width {width}")
            }
            Self::ResizingWhileCollapsed => write!(f, "resize session open while collapsed"),
        }
    }
}

impl std::error::Error for LayoutInvariantError {}

/// Which observable fields a transition touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutChange {
    pub width: bool,
    pub visibility: bool,
    pub collapse: bool,
    pub resizing: bool,
    pub layout_mode: bool,
}

impl LayoutChange {
    pub const NONE: Self = Self {
        width: false,
        visibility: false,
        collapse: false,
        resizing: false,
        layout_mode: false,
    };

    /// Whether anything observable changed.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.width || self.visibility || self.collapse || self.resizing || self.layout_mode
    }
}

impl BitOr for LayoutChange {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            width: self.width || rhs.width,
            visibility: self.visibility || rhs.visibility,
            collapse: self.collapse || rhs.collapse,
            resizing: self.resizing || rhs.resizing,
            layout_mode: self.layout_mode || rhs.layout_mode,
        }
    }
}

impl BitOrAssign for LayoutChange {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

/// An open resize gesture session.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeSession {
    origin_x: f64,
    start_percent: f64,
}

/// State owner for the analysis/chat split.
#[derive(Debug)]
pub struct LayoutController<S: PreferenceStore> {
    bounds: LayoutBounds,
    store: S,
    chat_width_percent: f64,
    visible: bool,
    collapse: CollapseState,
    session: Option<ResizeSession>,
    viewport: ViewportMonitor,
}

impl<S: PreferenceStore> LayoutController<S> {
    /// Build a controller, reading persisted width and visibility once.
    pub fn new(bounds: LayoutBounds, store: S) -> Self {
        let chat_width_percent = read_width(&store, &bounds);
        let visible = read_visible(&store);
        tracing::debug!(
            chat_width_percent,
            visible,
            min = bounds.min_percent(),
            max = bounds.max_percent(),
            "layout controller mounted"
        );
        Self {
            bounds,
            store,
            chat_width_percent,
            visible,
            collapse: CollapseState::Balanced,
            session: None,
            viewport: ViewportMonitor::new(bounds.breakpoint_px()),
        }
    }

    #[must_use]
    pub const fn bounds(&self) -> &LayoutBounds {
        &self.bounds
    }

    /// Current chat width in percent of the container.
    #[must_use]
    pub const fn chat_width_percent(&self) -> f64 {
        self.chat_width_percent
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub const fn collapse_state(&self) -> CollapseState {
        self.collapse
    }

    #[must_use]
    pub const fn is_analysis_collapsed(&self) -> bool {
        matches!(self.collapse, CollapseState::AnalysisCollapsed)
    }

    #[must_use]
    pub const fn is_chat_collapsed(&self) -> bool {
        matches!(self.collapse, CollapseState::ChatCollapsed)
    }

    /// Whether a resize gesture session is open.
    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub const fn is_wide_layout(&self) -> bool {
        self.viewport.is_wide()
    }

    #[must_use]
    pub const fn layout_mode(&self) -> LayoutMode {
        self.viewport.mode()
    }

    /// Pointer position that opened the current session.
    #[must_use]
    pub fn resize_origin_x(&self) -> Option<f64> {
        self.session.map(|session| session.origin_x)
    }

    /// Width change accumulated since the current session opened.
    #[must_use]
    pub fn session_delta_percent(&self) -> Option<f64> {
        self.session
            .map(|session| self.chat_width_percent - session.start_percent)
    }

    /// Preference store backing this controller.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Tear the controller down, handing back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Serializable state snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> LayoutState {
        LayoutState {
            chat_width_percent: self.chat_width_percent,
            visible: self.visible,
            analysis_collapsed: self.is_analysis_collapsed(),
            chat_collapsed: self.is_chat_collapsed(),
            is_resizing: self.is_resizing(),
            is_wide_layout: self.is_wide_layout(),
        }
    }

    /// Geometry the host should render.
    #[must_use]
    pub fn pane_layout(&self) -> PaneLayout {
        PaneLayout::from_state(&self.snapshot())
    }

    /// Show or hide the chat pane. Always persists `visible`.
    ///
    /// Hiding the pane ends an open resize session.
    pub fn set_visible(&mut self, visible: bool) -> LayoutChange {
        let mut change = LayoutChange::NONE;
        if !visible {
            change |= self.close_session("chat hidden");
        }
        if self.visible != visible {
            self.visible = visible;
            change.visibility = true;
            tracing::debug!(visible, "chat visibility changed");
        }
        self.persist_visible();
        change
    }

    /// Open a resize session at `pointer_x`.
    ///
    /// No-op when a session is already open, the container is degenerate,
    /// the pointer is non-finite, the chat pane is hidden, or a pane is
    /// collapsed.
    pub fn begin_resize(&mut self, pointer_x: f64, container: ContainerRect) -> LayoutChange {
        if self.session.is_some() {
            tracing::trace!("begin_resize ignored: session already open");
            return LayoutChange::NONE;
        }
        if container.is_degenerate() || !pointer_x.is_finite() {
            tracing::trace!(pointer_x, ?container, "begin_resize ignored: bad geometry");
            return LayoutChange::NONE;
        }
        if !self.visible || self.collapse != CollapseState::Balanced {
            tracing::trace!(
                visible = self.visible,
                collapse = ?self.collapse,
                "begin_resize ignored: separator inactive"
            );
            return LayoutChange::NONE;
        }
        self.session = Some(ResizeSession {
            origin_x: pointer_x,
            start_percent: self.chat_width_percent,
        });
        tracing::debug!(pointer_x, start = self.chat_width_percent, "resize session opened");
        LayoutChange {
            resizing: true,
            ..LayoutChange::NONE
        }
    }

    /// Move the separator to `pointer_x` within `container`.
    ///
    /// Ignored without an open session, with a degenerate container, or with
    /// non-finite input.
    pub fn update_resize(&mut self, pointer_x: f64, container: ContainerRect) -> LayoutChange {
        if self.session.is_none() {
            return LayoutChange::NONE;
        }
        let Some(raw) = container.percent_right_of(pointer_x) else {
            tracing::trace!(pointer_x, ?container, "update_resize ignored: bad geometry");
            return LayoutChange::NONE;
        };
        let next = self.bounds.clamp(raw);
        if next == self.chat_width_percent {
            return LayoutChange::NONE;
        }
        tracing::trace!(pointer_x, raw, width = next, "resize update");
        self.chat_width_percent = next;
        LayoutChange {
            width: true,
            ..LayoutChange::NONE
        }
    }

    /// Close the session and persist the final width.
    pub fn end_resize(&mut self) -> LayoutChange {
        self.close_session("pointer released")
    }

    /// Give the chat pane the maximum width.
    pub fn collapse_analysis(&mut self) -> LayoutChange {
        self.collapse_to(CollapseState::AnalysisCollapsed, self.bounds.max_percent())
    }

    /// Give the chat pane the minimum width.
    pub fn collapse_chat(&mut self) -> LayoutChange {
        self.collapse_to(CollapseState::ChatCollapsed, self.bounds.min_percent())
    }

    /// Return to `Balanced` with the default width.
    pub fn expand_both(&mut self) -> LayoutChange {
        self.collapse_to(CollapseState::Balanced, self.bounds.default_percent())
    }

    /// Recompute the wide-layout flag. Never persists.
    pub fn on_viewport_change(&mut self, width: f64) -> LayoutChange {
        LayoutChange {
            layout_mode: self.viewport.observe(width).is_some(),
            ..LayoutChange::NONE
        }
    }

    fn collapse_to(&mut self, target: CollapseState, width: f64) -> LayoutChange {
        let mut change = self.close_session("layout command");
        if self.collapse != target {
            tracing::debug!(from = ?self.collapse, to = ?target, "collapse state changed");
            self.collapse = target;
            change.collapse = true;
        }
        if self.chat_width_percent != width {
            self.chat_width_percent = width;
            change.width = true;
        }
        self.persist_width();
        change
    }

    fn close_session(&mut self, reason: &'static str) -> LayoutChange {
        let Some(session) = self.session.take() else {
            return LayoutChange::NONE;
        };
        tracing::debug!(
            reason,
            start = session.start_percent,
            end = self.chat_width_percent,
            "resize session closed"
        );
        self.persist_width();
        LayoutChange {
            resizing: true,
            ..LayoutChange::NONE
        }
    }

    fn persist_width(&mut self) {
        let value = self.chat_width_percent.to_string();
        self.store.set(PREF_CHAT_WIDTH, &value);
    }

    fn persist_visible(&mut self) {
        let value = if self.visible { "true" } else { "false" };
        self.store.set(PREF_CHAT_VISIBLE, value);
    }
}

fn read_width<S: PreferenceStore>(store: &S, bounds: &LayoutBounds) -> f64 {
    let Some(raw) = store.get(PREF_CHAT_WIDTH) else {
        return bounds.default_percent();
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => bounds.clamp(value),
        _ => {
            tracing::debug!(raw = %raw, "persisted chat width unusable; using default");
            bounds.default_percent()
        }
    }
}

fn read_visible<S: PreferenceStore>(store: &S) -> bool {
    match store.get(PREF_CHAT_VISIBLE).as_deref() {
        Some("true") => true,
        Some("false") => false,
        None => DEFAULT_CHAT_VISIBLE,
        Some(other) => {
            tracing::debug!(raw = other, "persisted chat visibility unusable; using default");
            DEFAULT_CHAT_VISIBLE
        }
    }
}
