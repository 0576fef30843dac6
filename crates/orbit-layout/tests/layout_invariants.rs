//! Property-style invariants for the layout controller.
//!
//! Random operation streams are applied to a controller and the state is
//! validated after every step: width within bounds, collapse flags mutually
//! exclusive and pinned to the extremes, no resize session while collapsed.

use orbit_core::{ContainerRect, MemoryPreferenceStore};
use orbit_layout::{CollapseState, LayoutBounds, LayoutController};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Begin { x: f64, left: f64, width: f64 },
    Update { x: f64, left: f64, width: f64 },
    End,
    CollapseAnalysis,
    CollapseChat,
    ExpandBoth,
    SetVisible(bool),
    Viewport(f64),
}

fn coordinate() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => -500.0f64..3000.0,
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(0.0),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (coordinate(), -100.0f64..400.0, coordinate())
            .prop_map(|(x, left, width)| Op::Begin { x, left, width }),
        6 => (coordinate(), -100.0f64..400.0, coordinate())
            .prop_map(|(x, left, width)| Op::Update { x, left, width }),
        2 => Just(Op::End),
        1 => Just(Op::CollapseAnalysis),
        1 => Just(Op::CollapseChat),
        1 => Just(Op::ExpandBoth),
        1 => any::<bool>().prop_map(Op::SetVisible),
        1 => (0.0f64..2500.0).prop_map(Op::Viewport),
    ]
}

fn bounds() -> impl Strategy<Value = LayoutBounds> {
    prop_oneof![
        Just(LayoutBounds::WIDE_RANGE),
        Just(LayoutBounds::NARROW_CHAT),
        (0.0f64..50.0, 50.0f64..100.0, 0.0f64..1.0).prop_filter_map(
            "valid bounds",
            |(min, max, t)| LayoutBounds::new(min, max, min + (max - min) * t).ok()
        ),
    ]
}

fn apply(c: &mut LayoutController<MemoryPreferenceStore>, op: &Op) {
    match *op {
        Op::Begin { x, left, width } => {
            c.begin_resize(x, ContainerRect::new(left, width));
        }
        Op::Update { x, left, width } => {
            c.update_resize(x, ContainerRect::new(left, width));
        }
        Op::End => {
            c.end_resize();
        }
        Op::CollapseAnalysis => {
            c.collapse_analysis();
        }
        Op::CollapseChat => {
            c.collapse_chat();
        }
        Op::ExpandBoth => {
            c.expand_both();
        }
        Op::SetVisible(v) => {
            c.set_visible(v);
        }
        Op::Viewport(w) => {
            c.on_viewport_change(w);
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_for_any_operation_stream(
        bounds in bounds(),
        ops in proptest::collection::vec(op(), 0..64),
    ) {
        let mut c = LayoutController::new(bounds, MemoryPreferenceStore::new());
        for op in &ops {
            apply(&mut c, op);
            let state = c.snapshot();
            prop_assert!(state.validate(&bounds).is_ok(), "{op:?} -> {state:?}");
            prop_assert!(state.chat_width_percent.is_finite());
        }
    }

    #[test]
    fn updates_never_leave_bounds(
        bounds in bounds(),
        xs in proptest::collection::vec(-5000.0f64..5000.0, 1..32),
        width in 1.0f64..4000.0,
        left in -200.0f64..200.0,
    ) {
        let mut c = LayoutController::new(bounds, MemoryPreferenceStore::new());
        let rect = ContainerRect::new(left, width);
        c.begin_resize(left + width / 2.0, rect);
        for x in xs {
            c.update_resize(x, rect);
            let w = c.chat_width_percent();
            prop_assert!(w >= bounds.min_percent() && w <= bounds.max_percent());
        }
    }

    #[test]
    fn last_collapse_wins(first_analysis in any::<bool>(), second_analysis in any::<bool>()) {
        let mut c = LayoutController::new(LayoutBounds::default(), MemoryPreferenceStore::new());
        for analysis in [first_analysis, second_analysis] {
            if analysis { c.collapse_analysis(); } else { c.collapse_chat(); }
        }
        let expected = if second_analysis {
            CollapseState::AnalysisCollapsed
        } else {
            CollapseState::ChatCollapsed
        };
        prop_assert_eq!(c.collapse_state(), expected);
        let state = c.snapshot();
        prop_assert!(!(state.analysis_collapsed && state.chat_collapsed));
    }
}

#[test]
fn expand_after_any_collapse_restores_default() {
    for bounds in [LayoutBounds::WIDE_RANGE, LayoutBounds::NARROW_CHAT] {
        let mut c = LayoutController::new(bounds, MemoryPreferenceStore::new());
        c.collapse_analysis();
        c.expand_both();
        assert_eq!(c.chat_width_percent(), bounds.default_percent());
        assert_eq!(c.collapse_state(), CollapseState::Balanced);
    }
}
