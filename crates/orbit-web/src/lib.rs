#![forbid(unsafe_code)]

//! Web host adapter for the dashboard layout.
//!
//! A browser host forwards raw pointer and page-lifecycle signals here. The
//! adapter decides when document-scope listeners must exist, drives the
//! [`orbit_layout::LayoutController`], and answers every signal with a
//! [`GestureDispatch`] describing what changed and what the host must do.

pub mod coalescer;
pub mod listeners;
pub mod pointer_session;

pub use coalescer::{PendingMove, PointerMoveCoalescer};
pub use listeners::{ListenerId, ListenerRegistry, ListenerScope, TrackedListeners};
pub use pointer_session::{
    GestureCommand, GestureDispatch, GestureIgnoredReason, GestureLogEntry, GestureOutcome,
    GesturePhase, ResizeGestureTracker,
};
