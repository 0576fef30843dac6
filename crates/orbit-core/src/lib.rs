#![forbid(unsafe_code)]

//! Core: geometry, input vocabulary, and preference persistence.
//!
//! # Role in the dashboard
//! `orbit-core` holds the small host-agnostic pieces shared by the layout
//! controller and the selection widgets:
//! - **geometry**: the container rectangle a resize gesture is measured against.
//! - **event**: the key and pointer-button vocabulary hosts translate into.
//! - **prefs**: the string key-value store that outlives a view.
//!
//! Nothing here renders or blocks; every call returns immediately.

pub mod event;
pub mod geometry;
pub mod prefs;

pub use event::{Key, PointerButton};
pub use geometry::ContainerRect;
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
