#![forbid(unsafe_code)]

//! Frame-rate coalescing for pointer moves.
//!
//! Browsers can deliver several `pointermove` events per animation frame.
//! Hosts that want at most one layout update per frame push every move here
//! and drain once per `requestAnimationFrame`.

use orbit_core::ContainerRect;

/// Latest pointer move waiting for the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMove {
    pub pointer_id: u32,
    pub pointer_x: f64,
    pub container: ContainerRect,
}

/// Keeps only the newest pending move.
#[derive(Debug, Clone, Default)]
pub struct PointerMoveCoalescer {
    pending: Option<PendingMove>,
    superseded: u64,
}

impl PointerMoveCoalescer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a move. Returns `true` when it replaced an undelivered one.
    pub fn push(&mut self, pointer_id: u32, pointer_x: f64, container: ContainerRect) -> bool {
        let replaced = self
            .pending
            .replace(PendingMove {
                pointer_id,
                pointer_x,
                container,
            })
            .is_some();
        if replaced {
            self.superseded += 1;
        }
        replaced
    }

    /// Drain the pending move for this frame.
    pub fn take_for_frame(&mut self) -> Option<PendingMove> {
        self.pending.take()
    }

    /// Drop the pending move, e.g. when the gesture ends before the frame.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Moves dropped because a newer one arrived in the same frame.
    #[must_use]
    pub const fn superseded_count(&self) -> u64 {
        self.superseded
    }
}
