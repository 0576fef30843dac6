#![forbid(unsafe_code)]

//! Widgets: selection controls for the dashboard header.
//!
//! - [`combobox`]: a type-ahead dropdown generic over the option type, driven
//!   entirely through explicit operations so any host can wire it up.
//! - [`selection`]: the project/meeting pair of comboboxes the dashboard uses
//!   to choose which analysis to show.

pub mod combobox;
pub mod selection;

pub use combobox::{
    AccessorError, Combobox, ComboboxBuilder, ComboboxConfigError, ComboboxRender, ComboboxRow,
    ComboboxStatus, ComboboxView, CommitOutcome, FilteredOption, HighlightDirection,
};
pub use selection::{Meeting, Project, Selection, SelectionPanel};
