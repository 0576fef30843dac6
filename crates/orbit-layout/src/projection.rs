#![forbid(unsafe_code)]

//! Pane geometry projected from a [`LayoutState`].
//!
//! Hosts size the two content regions from a [`PaneLayout`] instead of
//! re-deriving rules from raw flags. The projection is a pure function of
//! the state, so it can be recomputed on every render.

use serde::{Deserialize, Serialize};

use crate::controller::LayoutState;

/// How the panes are placed relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneArrangement {
    SideBySide,
    Stacked,
}

/// One rendered content region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneSlot {
    /// Width in percent of the container.
    pub width_percent: f64,
    /// Rendered as a collapsed strip.
    pub collapsed: bool,
}

/// Drag handle between the panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparatorState {
    pub visible: bool,
    /// Accepts pointer-down to start a resize.
    pub interactive: bool,
    /// A resize session is in progress.
    pub active: bool,
}

/// Everything a host needs to lay out the dashboard body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneLayout {
    pub arrangement: PaneArrangement,
    pub analysis: PaneSlot,
    /// `None` while the chat pane is hidden.
    pub chat: Option<PaneSlot>,
    pub separator: SeparatorState,
}

impl PaneLayout {
    /// Project `state` into pane geometry.
    #[must_use]
    pub fn from_state(state: &LayoutState) -> Self {
        let arrangement = if state.is_wide_layout {
            PaneArrangement::SideBySide
        } else {
            PaneArrangement::Stacked
        };

        if !state.visible {
            return Self {
                arrangement,
                analysis: PaneSlot {
                    width_percent: 100.0,
                    collapsed: false,
                },
                chat: None,
                separator: SeparatorState {
                    visible: false,
                    interactive: false,
                    active: false,
                },
            };
        }

        let (analysis_width, chat_width) = match arrangement {
            PaneArrangement::SideBySide => {
                (100.0 - state.chat_width_percent, state.chat_width_percent)
            }
            PaneArrangement::Stacked => (100.0, 100.0),
        };
        let side_by_side = arrangement == PaneArrangement::SideBySide;
        let balanced = !state.analysis_collapsed && !state.chat_collapsed;

        Self {
            arrangement,
            analysis: PaneSlot {
                width_percent: analysis_width,
                collapsed: state.analysis_collapsed,
            },
            chat: Some(PaneSlot {
                width_percent: chat_width,
                collapsed: state.chat_collapsed,
            }),
            separator: SeparatorState {
                visible: side_by_side,
                interactive: side_by_side && balanced,
                active: state.is_resizing,
            },
        }
    }
}
