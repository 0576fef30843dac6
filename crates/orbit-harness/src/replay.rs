#![forbid(unsafe_code)]

//! Scripted replay of layout interactions.
//!
//! A script is a JSON document with an optional container rectangle and a list
//! of steps. Each step is applied to a [`ResizeGestureTracker`] and one JSON
//! line with the resulting layout state is written to the output.
//!
//! ```json
//! {
//!   "container": { "left": 0, "width": 1000 },
//!   "steps": [
//!     { "step": "viewport", "width": 1280 },
//!     { "step": "pointer_down", "x": 800 },
//!     { "step": "pointer_move", "x": 550 },
//!     { "step": "pointer_up" }
//!   ]
//! }
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use orbit_core::{
    ContainerRect, FilePreferenceStore, MemoryPreferenceStore, PointerButton, PreferenceStore,
};
use orbit_layout::{LayoutBounds, LayoutController, LayoutState};
use orbit_web::{GestureDispatch, ResizeGestureTracker, TrackedListeners};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// JSON replay script.
    #[arg(long)]
    pub script: PathBuf,

    /// Preference file; omitted means an in-memory store.
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    /// Layout bounds file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

const fn default_pointer_id() -> u32 {
    1
}

fn default_container() -> ContainerRect {
    ContainerRect::new(0.0, 1000.0)
}

/// One scripted host signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ReplayStep {
    Viewport {
        width: f64,
    },
    PointerDown {
        #[serde(default = "default_pointer_id")]
        pointer_id: u32,
        #[serde(default)]
        button: u8,
        x: f64,
    },
    PointerMove {
        #[serde(default = "default_pointer_id")]
        pointer_id: u32,
        x: f64,
    },
    PointerUp {
        #[serde(default = "default_pointer_id")]
        pointer_id: u32,
        #[serde(default)]
        button: u8,
    },
    PointerCancel {
        #[serde(default)]
        pointer_id: Option<u32>,
    },
    Blur,
    VisibilityHidden,
    CollapseAnalysis,
    CollapseChat,
    ExpandBoth,
    SetVisible {
        visible: bool,
    },
    Teardown,
}

impl ReplayStep {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Viewport { .. } => "viewport",
            Self::PointerDown { .. } => "pointer_down",
            Self::PointerMove { .. } => "pointer_move",
            Self::PointerUp { .. } => "pointer_up",
            Self::PointerCancel { .. } => "pointer_cancel",
            Self::Blur => "blur",
            Self::VisibilityHidden => "visibility_hidden",
            Self::CollapseAnalysis => "collapse_analysis",
            Self::CollapseChat => "collapse_chat",
            Self::ExpandBoth => "expand_both",
            Self::SetVisible { .. } => "set_visible",
            Self::Teardown => "teardown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default = "default_container")]
    pub container: ContainerRect,
    pub steps: Vec<ReplayStep>,
}

impl ReplayScript {
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Output line for one applied step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub index: usize,
    pub step: String,
    pub ignored: bool,
    #[serde(flatten)]
    pub state: LayoutState,
}

/// Totals for a finished replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub ignored: usize,
    pub final_state: LayoutState,
    /// Listener leases attached over the whole replay.
    pub leases_attached: u64,
    /// Listener leases released, including the release on tracker drop.
    pub leases_released: u64,
}

/// Apply `script` and write one record per step to `out`.
pub fn replay<S, W>(
    script: &ReplayScript,
    bounds: LayoutBounds,
    store: S,
    out: &mut W,
) -> Result<ReplaySummary>
where
    S: PreferenceStore,
    W: Write,
{
    let mut listeners = TrackedListeners::new();
    let mut ignored = 0;
    let final_state = {
        let controller = LayoutController::new(bounds, store);
        let mut tracker = ResizeGestureTracker::new(controller, &mut listeners);
        for (index, step) in script.steps.iter().enumerate() {
            let dispatch = apply(&mut tracker, step, script.container);
            if dispatch.is_ignored() {
                ignored += 1;
            }
            let record = ReplayRecord {
                index,
                step: step.name().to_owned(),
                ignored: dispatch.is_ignored(),
                state: tracker.controller().snapshot(),
            };
            serde_json::to_writer(&mut *out, &record)?;
            out.write_all(b"\n")?;
        }
        tracker.controller().snapshot()
    };
    out.flush()?;

    tracing::info!(
        steps = script.steps.len(),
        ignored,
        leases = listeners.attach_count(),
        width = final_state.chat_width_percent,
        "replay finished"
    );
    Ok(ReplaySummary {
        steps: script.steps.len(),
        ignored,
        final_state,
        leases_attached: listeners.attach_count(),
        leases_released: listeners.detach_count(),
    })
}

fn apply<S: PreferenceStore>(
    tracker: &mut ResizeGestureTracker<S, &mut TrackedListeners>,
    step: &ReplayStep,
    container: ContainerRect,
) -> GestureDispatch {
    match *step {
        ReplayStep::Viewport { width } => tracker.viewport_changed(width),
        ReplayStep::PointerDown {
            pointer_id,
            button,
            x,
        } => tracker.pointer_down(
            pointer_id,
            PointerButton::from_dom_button(button),
            x,
            container,
        ),
        ReplayStep::PointerMove { pointer_id, x } => tracker.pointer_move(pointer_id, x, container),
        ReplayStep::PointerUp { pointer_id, button } => {
            tracker.pointer_up(pointer_id, PointerButton::from_dom_button(button))
        }
        ReplayStep::PointerCancel { pointer_id } => tracker.pointer_cancel(pointer_id),
        ReplayStep::Blur => tracker.blur(),
        ReplayStep::VisibilityHidden => tracker.visibility_hidden(),
        ReplayStep::CollapseAnalysis => tracker.collapse_analysis(),
        ReplayStep::CollapseChat => tracker.collapse_chat(),
        ReplayStep::ExpandBoth => tracker.expand_both(),
        ReplayStep::SetVisible { visible } => tracker.set_visible(visible),
        ReplayStep::Teardown => tracker.teardown(),
    }
}

/// Load bounds from a `.json` or TOML file, or the shipped defaults.
pub fn load_bounds(path: Option<&Path>) -> Result<LayoutBounds> {
    let Some(path) = path else {
        return Ok(LayoutBounds::default());
    };
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let raw = read_to_string(path)?;
        Ok(LayoutBounds::from_json_str(&raw)?)
    } else {
        Ok(LayoutBounds::from_toml_file(path)?)
    }
}

pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let raw = read_to_string(path)?;
    ReplayScript::from_json_str(&raw).map_err(|source| HarnessError::Script {
        path: path.to_path_buf(),
        source,
    })
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| HarnessError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn run_replay(args: ReplayArgs) -> Result<()> {
    let bounds = load_bounds(args.config.as_deref())?;
    let script = load_script(&args.script)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.prefs {
        Some(path) => replay(&script, bounds, FilePreferenceStore::open(path), &mut out)?,
        None => replay(&script, bounds, MemoryPreferenceStore::new(), &mut out)?,
    };
    Ok(())
}
