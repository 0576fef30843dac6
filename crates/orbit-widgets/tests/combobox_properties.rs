//! Property tests for the combobox interaction model.

use std::cell::Cell;
use std::rc::Rc;

use orbit_core::Key;
use orbit_widgets::{Combobox, ComboboxView, CommitOutcome};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Key(Key),
    Query(String),
    Click(usize),
    Outside,
    Replace(Vec<String>),
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Enter),
        Just(Key::Escape),
        Just(Key::Backspace),
        Just(Key::Tab),
        prop::char::range('a', 'e').prop_map(Key::Char),
    ]
}

fn labels_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-eA-E]{1,6}", 0..8)
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => key_strategy().prop_map(Action::Key),
        1 => "[a-eA-E]{0,3}".prop_map(Action::Query),
        1 => (0usize..10).prop_map(Action::Click),
        1 => Just(Action::Outside),
        1 => labels_strategy().prop_map(Action::Replace),
    ]
}

fn build(labels: Vec<String>, commits: Rc<Cell<usize>>) -> Combobox<String, String> {
    Combobox::builder()
        .options(labels)
        .label(|label: &String| label.clone())
        .value(|label: &String| label.to_uppercase())
        .on_change(move |_| commits.set(commits.get() + 1))
        .build()
}

fn expected_filter(labels: &[String], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect()
}

proptest! {
    #[test]
    fn highlight_always_indexes_filtered_list(
        labels in labels_strategy(),
        actions in prop::collection::vec(action_strategy(), 0..60),
    ) {
        let commits = Rc::new(Cell::new(0));
        let mut cb = build(labels.clone(), Rc::clone(&commits));
        let mut current = labels;

        for action in actions {
            let before = commits.get();
            let outcome = match action {
                Action::Key(key) => {
                    cb.handle_key(key);
                    None
                }
                Action::Query(text) => {
                    cb.set_query(text);
                    None
                }
                Action::Click(index) => Some(cb.select_option(index)),
                Action::Outside => {
                    cb.handle_outside_interaction();
                    prop_assert!(!cb.is_open());
                    prop_assert_eq!(cb.query(), "");
                    None
                }
                Action::Replace(labels) => {
                    current = labels.clone();
                    cb.set_options(labels);
                    None
                }
            };

            if let Some(row) = cb.highlighted_index() {
                prop_assert!(row < cb.filtered_len());
            }
            let indices: Vec<usize> = cb.filtered().iter().map(|option| option.index).collect();
            prop_assert_eq!(indices, expected_filter(&current, cb.query()));

            let delta = commits.get() - before;
            prop_assert!(delta <= 1);
            if let Some(outcome) = outcome {
                prop_assert_eq!(delta == 1, outcome == CommitOutcome::Committed);
            }
            if delta == 1 {
                prop_assert!(!cb.is_open());
                prop_assert_eq!(cb.highlighted_index(), None);
            }
        }
    }

    #[test]
    fn closed_view_never_lists_rows(labels in labels_strategy(), query in "[a-e]{0,2}") {
        let mut cb = build(labels, Rc::new(Cell::new(0)));
        cb.set_query(query);
        cb.handle_key(Key::Escape);
        match cb.view() {
            ComboboxView::Ready(render) => {
                prop_assert!(!render.is_open);
                prop_assert!(render.rows.is_empty());
            }
            ComboboxView::Error { .. } => {
                prop_assert!(false, "configured combobox rendered an error");
            }
        }
    }
}

#[test]
fn view_serializes_with_kind_tag() {
    let cb = build(vec!["Alpha".into()], Rc::new(Cell::new(0)));
    let json = serde_json::to_value(cb.view()).expect("serialize view");
    assert_eq!(json["kind"], "ready");
    assert_eq!(json["is_open"], false);
}
