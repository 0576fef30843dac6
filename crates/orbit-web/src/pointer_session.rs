#![forbid(unsafe_code)]

//! Deterministic resize-gesture adapter for the analysis/chat separator.
//!
//! This module bridges browser pointer lifecycle signals into
//! [`LayoutController`] resize operations while enforcing:
//! - one active pointer at a time, started only by the primary button,
//! - a document-scope listener lease that exists exactly while a resize
//!   session is open, and
//! - cancellation on interruption paths (pointer cancel, blur, hidden page,
//!   teardown).
//!
//! # Invariants
//!
//! 1. `lease.is_some()` iff the controller reports `is_resizing()` after any
//!    public call returns.
//! 2. Every attached lease is detached exactly once: on pointer up, cancel,
//!    blur, hidden page, a layout command that ends the session, explicit
//!    teardown, or drop.
//! 3. Signals from any pointer other than the session's are ignored and never
//!    reach the controller.

use orbit_core::{ContainerRect, PointerButton, PreferenceStore};
use orbit_layout::{LayoutChange, LayoutController};

use crate::listeners::{ListenerId, ListenerRegistry, ListenerScope};

/// Host command emitted for browser pointer-capture control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureCommand {
    Acquire { pointer_id: u32 },
    Release { pointer_id: u32 },
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    Blur,
    VisibilityHidden,
    LayoutCommand,
    Teardown,
}

/// Reason an incoming signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureIgnoredReason {
    ButtonNotAllowed,
    ButtonMismatch,
    SessionAlreadyActive,
    NoActiveSession,
    PointerMismatch,
    /// The controller declined to open a session (hidden, collapsed, bad geometry).
    ControllerRejected,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    SessionStarted,
    SessionUpdated,
    SessionEnded,
    /// Forwarded to the controller without touching the session.
    Applied,
    Ignored(GestureIgnoredReason),
}

/// Structured record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureLogEntry {
    pub phase: GesturePhase,
    pub pointer_id: Option<u32>,
    pub pointer_x: Option<f64>,
    pub lease: Option<ListenerId>,
    pub command: Option<GestureCommand>,
    pub outcome: GestureOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDispatch {
    pub change: LayoutChange,
    pub command: Option<GestureCommand>,
    pub log: GestureLogEntry,
}

impl GestureDispatch {
    fn ignored(
        phase: GesturePhase,
        reason: GestureIgnoredReason,
        pointer_id: Option<u32>,
        pointer_x: Option<f64>,
    ) -> Self {
        tracing::trace!(?phase, ?reason, ?pointer_id, "gesture signal ignored");
        Self {
            change: LayoutChange::NONE,
            command: None,
            log: GestureLogEntry {
                phase,
                pointer_id,
                pointer_x,
                lease: None,
                command: None,
                outcome: GestureOutcome::Ignored(reason),
            },
        }
    }

    /// Whether the dispatch was dropped without effect.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self.log.outcome, GestureOutcome::Ignored(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveGesture {
    pointer_id: u32,
    button: PointerButton,
    lease: ListenerId,
}

/// Resize gesture tracker for web hosts.
///
/// Owns the [`LayoutController`] so that every path that can end a resize
/// session also releases the listener lease.
#[derive(Debug)]
pub struct ResizeGestureTracker<S: PreferenceStore, R: ListenerRegistry> {
    controller: LayoutController<S>,
    registry: R,
    scope: ListenerScope,
    active: Option<ActiveGesture>,
}

impl<S: PreferenceStore, R: ListenerRegistry> ResizeGestureTracker<S, R> {
    /// Construct a tracker attaching listeners at document scope.
    pub fn new(controller: LayoutController<S>, registry: R) -> Self {
        Self::with_scope(controller, registry, ListenerScope::Document)
    }

    pub fn with_scope(controller: LayoutController<S>, registry: R, scope: ListenerScope) -> Self {
        Self {
            controller,
            registry,
            scope,
            active: None,
        }
    }

    #[must_use]
    pub const fn controller(&self) -> &LayoutController<S> {
        &self.controller
    }

    #[must_use]
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    #[must_use]
    pub const fn scope(&self) -> ListenerScope {
        self.scope
    }

    /// Pointer driving the open session, if any.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|active| active.pointer_id)
    }

    /// Lease held for the open session, if any.
    #[must_use]
    pub fn lease(&self) -> Option<ListenerId> {
        self.active.map(|active| active.lease)
    }

    /// Handle pointer-down on the separator.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        button: PointerButton,
        pointer_x: f64,
        container: ContainerRect,
    ) -> GestureDispatch {
        let phase = GesturePhase::PointerDown;
        if button != PointerButton::Primary {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::ButtonNotAllowed,
                Some(pointer_id),
                Some(pointer_x),
            );
        }
        if self.active.is_some() {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::SessionAlreadyActive,
                Some(pointer_id),
                Some(pointer_x),
            );
        }

        let change = self.controller.begin_resize(pointer_x, container);
        if !self.controller.is_resizing() {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::ControllerRejected,
                Some(pointer_id),
                Some(pointer_x),
            );
        }

        let lease = self.registry.attach(self.scope);
        self.active = Some(ActiveGesture {
            pointer_id,
            button,
            lease,
        });
        tracing::debug!(
            pointer_id,
            pointer_x,
            %lease,
            scope = ?self.scope,
            "resize gesture started"
        );
        let command = Some(GestureCommand::Acquire { pointer_id });
        GestureDispatch {
            change,
            command,
            log: GestureLogEntry {
                phase,
                pointer_id: Some(pointer_id),
                pointer_x: Some(pointer_x),
                lease: Some(lease),
                command,
                outcome: GestureOutcome::SessionStarted,
            },
        }
    }

    /// Handle pointer-move anywhere in the listener scope.
    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        pointer_x: f64,
        container: ContainerRect,
    ) -> GestureDispatch {
        let phase = GesturePhase::PointerMove;
        let Some(active) = self.active else {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::NoActiveSession,
                Some(pointer_id),
                Some(pointer_x),
            );
        };
        if active.pointer_id != pointer_id {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(pointer_x),
            );
        }

        let change = self.controller.update_resize(pointer_x, container);
        GestureDispatch {
            change,
            command: None,
            log: GestureLogEntry {
                phase,
                pointer_id: Some(pointer_id),
                pointer_x: Some(pointer_x),
                lease: Some(active.lease),
                command: None,
                outcome: GestureOutcome::SessionUpdated,
            },
        }
    }

    /// Handle pointer-up anywhere in the listener scope.
    pub fn pointer_up(&mut self, pointer_id: u32, button: PointerButton) -> GestureDispatch {
        let phase = GesturePhase::PointerUp;
        let Some(active) = self.active else {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::NoActiveSession,
                Some(pointer_id),
                None,
            );
        };
        if active.pointer_id != pointer_id {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::PointerMismatch,
                Some(pointer_id),
                None,
            );
        }
        if active.button != button {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::ButtonMismatch,
                Some(pointer_id),
                None,
            );
        }
        self.end_active(phase)
    }

    /// Handle browser `pointercancel`. `None` cancels whatever is active.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> GestureDispatch {
        let phase = GesturePhase::PointerCancel;
        let Some(active) = self.active else {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::NoActiveSession,
                pointer_id,
                None,
            );
        };
        if pointer_id.is_some_and(|id| id != active.pointer_id) {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::PointerMismatch,
                pointer_id,
                None,
            );
        }
        self.end_active(phase)
    }

    /// Handle window blur.
    pub fn blur(&mut self) -> GestureDispatch {
        self.interrupt(GesturePhase::Blur)
    }

    /// Handle the page becoming hidden.
    pub fn visibility_hidden(&mut self) -> GestureDispatch {
        self.interrupt(GesturePhase::VisibilityHidden)
    }

    /// End any session and release listeners. Idempotent.
    pub fn teardown(&mut self) -> GestureDispatch {
        self.interrupt(GesturePhase::Teardown)
    }

    /// Show or hide the chat pane.
    pub fn set_visible(&mut self, visible: bool) -> GestureDispatch {
        self.layout_command(|controller| controller.set_visible(visible))
    }

    pub fn collapse_analysis(&mut self) -> GestureDispatch {
        self.layout_command(LayoutController::collapse_analysis)
    }

    pub fn collapse_chat(&mut self) -> GestureDispatch {
        self.layout_command(LayoutController::collapse_chat)
    }

    pub fn expand_both(&mut self) -> GestureDispatch {
        self.layout_command(LayoutController::expand_both)
    }

    /// Forward a viewport width report.
    pub fn viewport_changed(&mut self, width: f64) -> GestureDispatch {
        self.layout_command(|controller| controller.on_viewport_change(width))
    }

    fn interrupt(&mut self, phase: GesturePhase) -> GestureDispatch {
        if self.active.is_none() {
            return GestureDispatch::ignored(
                phase,
                GestureIgnoredReason::NoActiveSession,
                None,
                None,
            );
        }
        self.end_active(phase)
    }

    fn end_active(&mut self, phase: GesturePhase) -> GestureDispatch {
        let change = self.controller.end_resize();
        let (pointer_id, lease, command) = match self.release_lease() {
            Some(active) => (
                Some(active.pointer_id),
                Some(active.lease),
                Some(GestureCommand::Release {
                    pointer_id: active.pointer_id,
                }),
            ),
            None => (None, None, None),
        };
        tracing::debug!(
            ?phase,
            ?pointer_id,
            width = self.controller.chat_width_percent(),
            "resize gesture ended"
        );
        GestureDispatch {
            change,
            command,
            log: GestureLogEntry {
                phase,
                pointer_id,
                pointer_x: None,
                lease,
                command,
                outcome: GestureOutcome::SessionEnded,
            },
        }
    }

    fn layout_command(
        &mut self,
        apply: impl FnOnce(&mut LayoutController<S>) -> LayoutChange,
    ) -> GestureDispatch {
        let change = apply(&mut self.controller);
        let released = if self.controller.is_resizing() {
            None
        } else {
            self.release_lease()
        };
        let command = released.map(|active| GestureCommand::Release {
            pointer_id: active.pointer_id,
        });
        if let Some(active) = released {
            tracing::debug!(
                pointer_id = active.pointer_id,
                "resize gesture ended by layout command"
            );
        }
        GestureDispatch {
            change,
            command,
            log: GestureLogEntry {
                phase: GesturePhase::LayoutCommand,
                pointer_id: released.map(|active| active.pointer_id),
                pointer_x: None,
                lease: released.map(|active| active.lease),
                command,
                outcome: if released.is_some() {
                    GestureOutcome::SessionEnded
                } else {
                    GestureOutcome::Applied
                },
            },
        }
    }

    fn release_lease(&mut self) -> Option<ActiveGesture> {
        let active = self.active.take()?;
        self.registry.detach(active.lease);
        Some(active)
    }
}

impl<S: PreferenceStore, R: ListenerRegistry> Drop for ResizeGestureTracker<S, R> {
    fn drop(&mut self) {
        if self.active.is_some() {
            self.controller.end_resize();
            self.release_lease();
            tracing::debug!("resize gesture released on drop");
        }
    }
}
