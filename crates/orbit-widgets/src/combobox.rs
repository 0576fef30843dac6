#![forbid(unsafe_code)]

//! Searchable combobox.
//!
//! A [`Combobox<O, V>`] holds a caller-owned list of options of any type `O`
//! and two accessors: `label` (what the user sees and types against) and
//! `value` (what is reported on commit). The widget owns only interaction
//! state: the query text, whether the list is open, the highlighted row, and
//! the committed value.
//!
//! # Keyboard contract
//!
//! | Key   | Closed | Open, no highlight | Open, highlighted     |
//! |-------|--------|--------------------|-----------------------|
//! | Down  | open   | highlight row 0    | next row (clamped)    |
//! | Up    | -      | -                  | previous row (clamped)|
//! | Enter | open   | close              | commit                |
//! | Esc   | -      | close + reset      | close + reset         |
//!
//! # Invariants
//!
//! 1. The filtered list is a pure function of `(options, query)`: options
//!    whose label contains the query case-insensitively, in option order.
//! 2. The highlight is `None` or a valid index into the filtered list; it is
//!    re-clamped whenever the filtered list changes.
//! 3. Closing (Escape, outside interaction, commit) always clears the query
//!    and the highlight.
//! 4. The selected value changes only through a commit, which calls
//!    `on_change` exactly once, or through the silent `clear_selection` and
//!    `restore_selection` used when the option list is refreshed.
//!
//! # Failure Modes
//!
//! - A missing accessor puts the widget in a terminal `Misconfigured` state:
//!   every operation is a no-op and the view is an error.
//! - An accessor failing for one option drops that option from the list and
//!   logs a warning; the rest of the widget keeps working.

use std::fmt;

use orbit_core::Key;
use serde::{Deserialize, Serialize};

type LabelFn<O> = Box<dyn Fn(&O) -> Result<String, AccessorError>>;
type ValueFn<O, V> = Box<dyn Fn(&O) -> Result<V, AccessorError>>;
type ChangeFn<V> = Box<dyn FnMut(V)>;

/// Failure reported by a label or value accessor for a single option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorError {
    message: String,
}

impl AccessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AccessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "accessor failed: {}", self.message)
    }
}

impl std::error::Error for AccessorError {}

/// Construction-time configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboboxConfigError {
    MissingLabelAccessor,
    MissingValueAccessor,
}

impl fmt::Display for ComboboxConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLabelAccessor => write!(f, "combobox requires a label accessor"),
            Self::MissingValueAccessor => write!(f, "combobox requires a value accessor"),
        }
    }
}

impl std::error::Error for ComboboxConfigError {}

/// Whether the widget accepts operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboboxStatus {
    Ready,
    Misconfigured(ComboboxConfigError),
}

/// Highlight step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightDirection {
    Up,
    Down,
}

/// Result of a commit attempt (Enter or click).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A value was committed and `on_change` was called.
    Committed,
    /// The list was closed; it opened instead of committing.
    Opened,
    /// The list was open without a highlight; it closed without committing.
    Closed,
    /// Nothing happened (disabled, misconfigured, or no such option).
    Ignored,
}

/// One entry of the filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredOption {
    /// Index into the caller's option list.
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone)]
struct ResolvedOption<V> {
    label: String,
    folded: String,
    value: V,
}

struct Accessors<O, V> {
    label_of: LabelFn<O>,
    value_of: ValueFn<O, V>,
}

/// Builder for [`Combobox`].
pub struct ComboboxBuilder<O, V> {
    options: Vec<O>,
    label_of: Option<LabelFn<O>>,
    value_of: Option<ValueFn<O, V>>,
    on_change: Option<ChangeFn<V>>,
    disabled: bool,
    placeholder: Option<String>,
}

impl<O, V> Default for ComboboxBuilder<O, V> {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            label_of: None,
            value_of: None,
            on_change: None,
            disabled: false,
            placeholder: None,
        }
    }
}

impl<O, V> ComboboxBuilder<O, V>
where
    V: Clone + PartialEq,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Option list, in display order.
    #[must_use]
    pub fn options(mut self, options: Vec<O>) -> Self {
        self.options = options;
        self
    }

    /// Infallible label accessor.
    #[must_use]
    pub fn label(mut self, label_of: impl Fn(&O) -> String + 'static) -> Self {
        self.label_of = Some(Box::new(move |option| Ok(label_of(option))));
        self
    }

    /// Label accessor that may fail for individual options.
    #[must_use]
    pub fn try_label(
        mut self,
        label_of: impl Fn(&O) -> Result<String, AccessorError> + 'static,
    ) -> Self {
        self.label_of = Some(Box::new(label_of));
        self
    }

    /// Infallible value accessor.
    #[must_use]
    pub fn value(mut self, value_of: impl Fn(&O) -> V + 'static) -> Self {
        self.value_of = Some(Box::new(move |option| Ok(value_of(option))));
        self
    }

    /// Value accessor that may fail for individual options.
    #[must_use]
    pub fn try_value(
        mut self,
        value_of: impl Fn(&O) -> Result<V, AccessorError> + 'static,
    ) -> Self {
        self.value_of = Some(Box::new(value_of));
        self
    }

    /// Callback invoked once per commit with the committed value.
    #[must_use]
    pub fn on_change(mut self, on_change: impl FnMut(V) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Text shown while the input is empty.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Build the widget. A missing accessor yields a misconfigured widget.
    #[must_use]
    pub fn build(self) -> Combobox<O, V> {
        let fault = self.missing_accessor();
        let accessors = match (self.label_of, self.value_of) {
            (Some(label_of), Some(value_of)) => Some(Accessors { label_of, value_of }),
            _ => None,
        };
        if let Some(error) = fault {
            tracing::error!(%error, "combobox misconfigured; widget disabled");
        }
        let mut combobox = Combobox {
            options: self.options,
            accessors,
            fault,
            on_change: self.on_change,
            disabled: self.disabled,
            placeholder: self.placeholder,
            query: String::new(),
            is_open: false,
            highlighted: None,
            selected: None,
            resolved: Vec::new(),
            filtered: Vec::new(),
        };
        combobox.resolve_options();
        combobox
    }

    /// Build the widget, failing fast on a missing accessor.
    pub fn try_build(self) -> Result<Combobox<O, V>, ComboboxConfigError> {
        if let Some(error) = self.missing_accessor() {
            return Err(error);
        }
        Ok(self.build())
    }

    fn missing_accessor(&self) -> Option<ComboboxConfigError> {
        if self.label_of.is_none() {
            Some(ComboboxConfigError::MissingLabelAccessor)
        } else if self.value_of.is_none() {
            Some(ComboboxConfigError::MissingValueAccessor)
        } else {
            None
        }
    }
}

/// Type-ahead selection widget state.
pub struct Combobox<O, V> {
    options: Vec<O>,
    accessors: Option<Accessors<O, V>>,
    fault: Option<ComboboxConfigError>,
    on_change: Option<ChangeFn<V>>,
    disabled: bool,
    placeholder: Option<String>,
    query: String,
    is_open: bool,
    highlighted: Option<usize>,
    selected: Option<V>,
    /// Per-option accessor results; `None` for options whose accessors failed.
    resolved: Vec<Option<ResolvedOption<V>>>,
    /// Indices into `options`, in option order.
    filtered: Vec<usize>,
}

impl<O, V: fmt::Debug> fmt::Debug for Combobox<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combobox")
            .field("options", &self.options.len())
            .field("fault", &self.fault)
            .field("disabled", &self.disabled)
            .field("query", &self.query)
            .field("is_open", &self.is_open)
            .field("highlighted", &self.highlighted)
            .field("selected", &self.selected)
            .field("filtered", &self.filtered)
            .finish_non_exhaustive()
    }
}

impl<O, V> Combobox<O, V>
where
    V: Clone + PartialEq,
{
    /// Start building a combobox.
    #[must_use]
    pub fn builder() -> ComboboxBuilder<O, V> {
        ComboboxBuilder::new()
    }

    #[must_use]
    pub fn status(&self) -> ComboboxStatus {
        match self.fault {
            Some(error) => ComboboxStatus::Misconfigured(error),
            None => ComboboxStatus::Ready,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[O] {
        &self.options
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Highlighted row in the filtered list; `None` means no highlight.
    #[must_use]
    pub const fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    /// Last committed value.
    #[must_use]
    pub fn selected_value(&self) -> Option<&V> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Number of options passing the current query.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Options passing the current query, in option order.
    #[must_use]
    pub fn filtered(&self) -> Vec<FilteredOption> {
        self.filtered
            .iter()
            .filter_map(|&index| {
                self.resolved[index].as_ref().map(|resolved| FilteredOption {
                    index,
                    label: resolved.label.clone(),
                })
            })
            .collect()
    }

    /// References to the options passing the current query.
    #[must_use]
    pub fn filtered_options(&self) -> Vec<&O> {
        self.filtered.iter().map(|&index| &self.options[index]).collect()
    }

    /// Replace the option list. Re-filters and re-clamps the highlight.
    pub fn set_options(&mut self, options: Vec<O>) {
        self.options = options;
        self.resolve_options();
    }

    /// Enable or disable the widget. Disabling closes it.
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled && self.is_open {
            self.close_and_reset();
        }
        self.disabled = disabled;
    }

    /// Drop the committed value without notifying `on_change`.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Reinstate a committed value without a commit.
    ///
    /// Takes effect only when a usable option still carries `value`. Open
    /// state, query and highlight are left untouched and `on_change` is not
    /// called.
    pub fn restore_selection(&mut self, value: V) -> bool {
        let present = self
            .resolved
            .iter()
            .flatten()
            .any(|resolved| resolved.value == value);
        if present {
            self.selected = Some(value);
        }
        present
    }

    /// Open the list.
    pub fn open(&mut self) -> bool {
        if !self.is_ready() || self.is_open {
            return false;
        }
        self.is_open = true;
        tracing::trace!(filtered = self.filtered.len(), "combobox opened");
        true
    }

    /// Close the list, clearing the query and the highlight.
    pub fn close(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.close_and_reset()
    }

    /// Replace the query text. Resets the highlight and opens the list.
    pub fn set_query(&mut self, text: impl Into<String>) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.query = text.into();
        self.highlighted = None;
        self.refilter();
        self.is_open = true;
        true
    }

    /// Step the highlight.
    ///
    /// From the closed state `Down` only opens the list. `Up` without a
    /// highlight does nothing.
    pub fn move_highlight(&mut self, direction: HighlightDirection) -> bool {
        if !self.is_ready() {
            return false;
        }
        if !self.is_open {
            return match direction {
                HighlightDirection::Down => self.open(),
                HighlightDirection::Up => false,
            };
        }
        let Some(last) = self.filtered.len().checked_sub(1) else {
            return false;
        };
        let next = match (self.highlighted, direction) {
            (None, HighlightDirection::Down) => 0,
            (None, HighlightDirection::Up) => return false,
            (Some(index), HighlightDirection::Down) => (index + 1).min(last),
            (Some(index), HighlightDirection::Up) => index.saturating_sub(1),
        };
        if self.highlighted == Some(next) {
            return false;
        }
        self.highlighted = Some(next);
        true
    }

    /// Commit the highlighted row, or open/close when nothing is highlighted.
    pub fn commit_highlighted(&mut self) -> CommitOutcome {
        if !self.is_ready() {
            return CommitOutcome::Ignored;
        }
        match self.highlighted {
            Some(row) => match self.filtered.get(row).copied() {
                Some(index) => self.commit_index(index),
                None => CommitOutcome::Ignored,
            },
            None if !self.is_open => {
                self.open();
                CommitOutcome::Opened
            }
            None => {
                self.close_and_reset();
                CommitOutcome::Closed
            }
        }
    }

    /// Commit the option at `index` in the caller's option list (click path).
    pub fn select_option(&mut self, index: usize) -> CommitOutcome {
        if !self.is_ready() || index >= self.options.len() {
            return CommitOutcome::Ignored;
        }
        self.commit_index(index)
    }

    /// Close on a click or focus move outside the widget. Never commits.
    pub fn handle_outside_interaction(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.close_and_reset()
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.is_ready() {
            return false;
        }
        match key {
            Key::Down => self.move_highlight(HighlightDirection::Down),
            Key::Up => self.move_highlight(HighlightDirection::Up),
            Key::Enter => self.commit_highlighted() != CommitOutcome::Ignored,
            Key::Escape => self.is_open && self.close_and_reset(),
            Key::Char(c) => {
                let mut query = std::mem::take(&mut self.query);
                query.push(c);
                self.set_query(query)
            }
            Key::Backspace => {
                if self.query.is_empty() {
                    return false;
                }
                let mut query = std::mem::take(&mut self.query);
                query.pop();
                self.set_query(query)
            }
            Key::Tab | Key::Other => false,
        }
    }

    /// Render model for the host.
    #[must_use]
    pub fn view(&self) -> ComboboxView {
        if let Some(error) = self.fault {
            return ComboboxView::Error {
                message: error.to_string(),
            };
        }
        let input_text = if self.is_open {
            self.query.clone()
        } else {
            self.selected_label().unwrap_or_default().to_owned()
        };
        let rows = if self.is_open {
            self.filtered
                .iter()
                .enumerate()
                .filter_map(|(row, &index)| {
                    self.resolved[index].as_ref().map(|resolved| ComboboxRow {
                        option_index: index,
                        label: resolved.label.clone(),
                        highlighted: self.highlighted == Some(row),
                        selected: self.selected.as_ref() == Some(&resolved.value),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };
        ComboboxView::Ready(ComboboxRender {
            showing_placeholder: input_text.is_empty() && self.placeholder.is_some(),
            input_text,
            placeholder: self.placeholder.clone(),
            disabled: self.disabled,
            is_open: self.is_open,
            no_matches: self.is_open && self.filtered.is_empty(),
            rows,
        })
    }

    /// Label of the committed value, if it is still among the options.
    #[must_use]
    pub fn selected_label(&self) -> Option<&str> {
        let selected = self.selected.as_ref()?;
        self.resolved
            .iter()
            .flatten()
            .find(|resolved| &resolved.value == selected)
            .map(|resolved| resolved.label.as_str())
    }

    fn is_ready(&self) -> bool {
        self.accessors.is_some() && !self.disabled
    }

    fn commit_index(&mut self, index: usize) -> CommitOutcome {
        let Some(resolved) = self.resolved.get(index).and_then(Option::as_ref) else {
            tracing::warn!(index, "commit ignored: option has no usable label or value");
            return CommitOutcome::Ignored;
        };
        let value = resolved.value.clone();
        tracing::debug!(index, label = %resolved.label, "combobox commit");
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(value.clone());
        }
        self.selected = Some(value);
        self.close_and_reset();
        CommitOutcome::Committed
    }

    fn close_and_reset(&mut self) -> bool {
        let changed = self.is_open || !self.query.is_empty() || self.highlighted.is_some();
        self.is_open = false;
        self.highlighted = None;
        if !self.query.is_empty() {
            self.query.clear();
            self.refilter();
        }
        changed
    }

    fn resolve_options(&mut self) {
        let Some(accessors) = self.accessors.as_ref() else {
            self.resolved.clear();
            self.filtered.clear();
            self.highlighted = None;
            return;
        };
        self.resolved = self
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let label = (accessors.label_of)(option)
                    .inspect_err(|error| {
                        tracing::warn!(index, %error, "option skipped: label accessor failed");
                    })
                    .ok()?;
                let value = (accessors.value_of)(option)
                    .inspect_err(|error| {
                        tracing::warn!(index, %error, "option skipped: value accessor failed");
                    })
                    .ok()?;
                Some(ResolvedOption {
                    folded: label.to_lowercase(),
                    label,
                    value,
                })
            })
            .collect();
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.filtered = self
            .resolved
            .iter()
            .enumerate()
            .filter_map(|(index, resolved)| {
                let resolved = resolved.as_ref()?;
                resolved.folded.contains(needle.as_str()).then_some(index)
            })
            .collect();
        self.highlighted = match (self.highlighted, self.filtered.len().checked_sub(1)) {
            (Some(_), None) => None,
            (Some(row), Some(last)) => Some(row.min(last)),
            (None, _) => None,
        };
    }
}

/// Host-facing render model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComboboxView {
    /// Terminal configuration error; render the message and nothing else.
    Error { message: String },
    Ready(ComboboxRender),
}

/// Render model of a working combobox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboboxRender {
    /// Query while open; committed label while closed.
    pub input_text: String,
    pub showing_placeholder: bool,
    pub placeholder: Option<String>,
    pub disabled: bool,
    pub is_open: bool,
    /// Open with a query that matches nothing.
    pub no_matches: bool,
    pub rows: Vec<ComboboxRow>,
}

/// One visible list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboboxRow {
    pub option_index: usize,
    pub label: String,
    pub highlighted: bool,
    pub selected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    use tracing::Subscriber;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                label: "Alpha",
            },
            Item { id: 2, label: "Beta" },
            Item {
                id: 3,
                label: "Gamma",
            },
        ]
    }

    fn combobox_with(
        options: Vec<Item>,
        committed: Rc<RefCell<Vec<u32>>>,
    ) -> Combobox<Item, u32> {
        Combobox::builder()
            .options(options)
            .label(|item: &Item| item.label.to_owned())
            .value(|item: &Item| item.id)
            .on_change(move |id| committed.borrow_mut().push(id))
            .placeholder("Select a project")
            .build()
    }

    fn combobox() -> (Combobox<Item, u32>, Rc<RefCell<Vec<u32>>>) {
        let committed = Rc::new(RefCell::new(Vec::new()));
        (combobox_with(items(), Rc::clone(&committed)), committed)
    }

    #[test]
    fn empty_query_keeps_all_options_in_order() {
        let (cb, _) = combobox();
        let ids: Vec<u32> = cb.filtered_options().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn query_filters_case_insensitively() {
        let (mut cb, _) = combobox();
        cb.set_query("al");
        let matched: Vec<&Item> = cb.filtered_options();
        assert_eq!(matched, vec![&items()[0]]);
        cb.set_query("A");
        assert_eq!(cb.filtered_len(), 3);
        cb.set_query("MM");
        assert_eq!(cb.filtered()[0].label, "Gamma");
    }

    #[test]
    fn set_query_opens_and_resets_highlight() {
        let (mut cb, _) = combobox();
        cb.open();
        cb.move_highlight(HighlightDirection::Down);
        cb.move_highlight(HighlightDirection::Down);
        assert_eq!(cb.highlighted_index(), Some(1));
        cb.close();
        cb.set_query("a");
        assert!(cb.is_open());
        assert_eq!(cb.highlighted_index(), None);
    }

    #[test]
    fn first_down_only_opens() {
        let (mut cb, _) = combobox();
        assert!(cb.handle_key(Key::Down));
        assert!(cb.is_open());
        assert_eq!(cb.highlighted_index(), None);
        cb.handle_key(Key::Down);
        assert_eq!(cb.highlighted_index(), Some(0));
    }

    #[test]
    fn highlight_clamps_at_both_ends() {
        let (mut cb, _) = combobox();
        cb.open();
        for _ in 0..10 {
            cb.handle_key(Key::Down);
        }
        assert_eq!(cb.highlighted_index(), Some(2));
        for _ in 0..10 {
            cb.handle_key(Key::Up);
        }
        assert_eq!(cb.highlighted_index(), Some(0));
    }

    #[test]
    fn up_without_highlight_is_noop() {
        let (mut cb, _) = combobox();
        assert!(!cb.handle_key(Key::Up));
        assert!(!cb.is_open());
        cb.open();
        assert!(!cb.handle_key(Key::Up));
        assert_eq!(cb.highlighted_index(), None);
    }

    #[test]
    fn down_with_no_matches_keeps_no_highlight() {
        let (mut cb, _) = combobox();
        cb.set_query("zzz");
        assert!(!cb.handle_key(Key::Down));
        assert_eq!(cb.highlighted_index(), None);
    }

    #[test]
    fn enter_when_closed_opens_without_commit() {
        let (mut cb, committed) = combobox();
        assert_eq!(cb.commit_highlighted(), CommitOutcome::Opened);
        assert!(cb.is_open());
        assert!(committed.borrow().is_empty());
    }

    #[test]
    fn enter_when_open_without_highlight_closes() {
        let (mut cb, committed) = combobox();
        cb.set_query("be");
        assert_eq!(cb.commit_highlighted(), CommitOutcome::Closed);
        assert!(!cb.is_open());
        assert_eq!(cb.query(), "");
        assert!(committed.borrow().is_empty());
    }

    #[test]
    fn enter_commits_highlighted_option_once() {
        let (mut cb, committed) = combobox();
        cb.set_query("a");
        cb.handle_key(Key::Down);
        cb.handle_key(Key::Down);
        assert!(cb.handle_key(Key::Enter));
        assert_eq!(*committed.borrow(), vec![2]);
        assert_eq!(cb.selected_value(), Some(&2));
        assert!(!cb.is_open());
        assert_eq!(cb.query(), "");
        assert_eq!(cb.highlighted_index(), None);
    }

    #[test]
    fn click_commits_regardless_of_highlight() {
        let (mut cb, committed) = combobox();
        cb.open();
        cb.handle_key(Key::Down);
        assert_eq!(cb.select_option(2), CommitOutcome::Committed);
        assert_eq!(*committed.borrow(), vec![3]);
        assert_eq!(cb.select_option(9), CommitOutcome::Ignored);
    }

    #[test]
    fn escape_closes_and_resets() {
        let (mut cb, _) = combobox();
        assert!(!cb.handle_key(Key::Escape));
        cb.set_query("ga");
        cb.handle_key(Key::Down);
        assert!(cb.handle_key(Key::Escape));
        assert!(!cb.is_open());
        assert_eq!(cb.query(), "");
        assert_eq!(cb.highlighted_index(), None);
        assert_eq!(cb.filtered_len(), 3);
    }

    #[test]
    fn outside_interaction_always_closes() {
        let (mut cb, committed) = combobox();
        cb.handle_outside_interaction();
        assert!(!cb.is_open());
        cb.set_query("bet");
        cb.handle_key(Key::Down);
        cb.handle_outside_interaction();
        assert!(!cb.is_open());
        assert_eq!(cb.query(), "");
        assert!(committed.borrow().is_empty());
    }

    #[test]
    fn typing_and_backspace_edit_query() {
        let (mut cb, _) = combobox();
        cb.handle_key(Key::Char('G'));
        cb.handle_key(Key::Char('a'));
        assert_eq!(cb.query(), "Ga");
        assert_eq!(cb.filtered_len(), 1);
        cb.handle_key(Key::Backspace);
        assert_eq!(cb.query(), "G");
        cb.handle_key(Key::Backspace);
        assert!(!cb.handle_key(Key::Backspace));
    }

    #[test]
    fn replacing_options_clamps_highlight() {
        let (mut cb, _) = combobox();
        cb.open();
        cb.handle_key(Key::Down);
        cb.handle_key(Key::Down);
        cb.handle_key(Key::Down);
        assert_eq!(cb.highlighted_index(), Some(2));
        cb.set_options(items().into_iter().take(1).collect());
        assert_eq!(cb.highlighted_index(), Some(0));
        cb.set_options(Vec::new());
        assert_eq!(cb.highlighted_index(), None);
    }

    #[test]
    fn restore_selection_keeps_open_state_and_skips_on_change() {
        let (mut cb, committed) = combobox();
        cb.set_query("a");
        cb.handle_key(Key::Down);
        cb.clear_selection();

        assert!(cb.restore_selection(2));
        assert_eq!(cb.selected_value(), Some(&2));
        assert!(cb.is_open());
        assert_eq!(cb.query(), "a");
        assert_eq!(cb.highlighted_index(), Some(0));
        assert!(committed.borrow().is_empty());

        assert!(!cb.restore_selection(9));
        assert_eq!(cb.selected_value(), Some(&2));
    }

    #[test]
    fn disabled_widget_ignores_everything() {
        let committed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&committed);
        let mut cb: Combobox<Item, u32> = Combobox::builder()
            .options(items())
            .label(|item: &Item| item.label.to_owned())
            .value(|item: &Item| item.id)
            .on_change(move |id| sink.borrow_mut().push(id))
            .disabled(true)
            .build();
        assert!(!cb.open());
        assert!(!cb.set_query("a"));
        assert!(!cb.handle_key(Key::Down));
        assert_eq!(cb.select_option(0), CommitOutcome::Ignored);
        assert!(committed.borrow().is_empty());
    }

    #[test]
    fn disabling_closes_open_widget() {
        let (mut cb, _) = combobox();
        cb.set_query("a");
        cb.set_disabled(true);
        assert!(!cb.is_open());
        assert_eq!(cb.query(), "");
        cb.set_disabled(false);
        assert!(cb.open());
    }

    #[test]
    fn missing_accessor_is_terminal() {
        let mut cb: Combobox<Item, u32> = Combobox::builder()
            .options(items())
            .label(|item: &Item| item.label.to_owned())
            .build();
        assert_eq!(
            cb.status(),
            ComboboxStatus::Misconfigured(ComboboxConfigError::MissingValueAccessor)
        );
        assert!(!cb.open());
        assert!(!cb.handle_key(Key::Enter));
        assert_eq!(cb.filtered_len(), 0);
        assert!(matches!(cb.view(), ComboboxView::Error { .. }));
    }

    #[test]
    fn try_build_reports_missing_label() {
        let result: Result<Combobox<Item, u32>, _> = Combobox::builder()
            .value(|item: &Item| item.id)
            .try_build();
        assert_eq!(
            result.err(),
            Some(ComboboxConfigError::MissingLabelAccessor)
        );
    }

    #[test]
    fn view_shows_placeholder_then_selected_label() {
        let (mut cb, _) = combobox();
        let ComboboxView::Ready(render) = cb.view() else {
            panic!("expected ready view");
        };
        assert!(render.showing_placeholder);
        assert!(render.rows.is_empty());

        cb.open();
        cb.handle_key(Key::Down);
        let ComboboxView::Ready(render) = cb.view() else {
            panic!("expected ready view");
        };
        assert_eq!(render.rows.len(), 3);
        assert!(render.rows[0].highlighted);

        cb.handle_key(Key::Enter);
        let ComboboxView::Ready(render) = cb.view() else {
            panic!("expected ready view");
        };
        assert_eq!(render.input_text, "Alpha");
        assert!(!render.showing_placeholder);
    }

    #[test]
    fn view_flags_no_matches() {
        let (mut cb, _) = combobox();
        cb.set_query("nothing");
        let ComboboxView::Ready(render) = cb.view() else {
            panic!("expected ready view");
        };
        assert!(render.no_matches);
    }

    #[derive(Default)]
    struct WarnCapture {
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl<S: Subscriber> Layer<S> for WarnCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() != tracing::Level::WARN {
                return;
            }

            #[derive(Default)]
            struct MessageVisitor(String);

            impl tracing::field::Visit for MessageVisitor {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.0 = format!("{value:?}");
                    }
                }
            }

            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            self.messages
                .lock()
                .expect("capture lock")
                .push(visitor.0);
        }
    }

    #[test]
    fn failing_accessor_skips_only_that_option() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(WarnCapture {
            messages: Arc::clone(&messages),
        });

        let cb = tracing::subscriber::with_default(subscriber, || {
            Combobox::<Item, u32>::builder()
                .options(items())
                .try_label(|item: &Item| {
                    if item.id == 2 {
                        Err(AccessorError::new("label missing"))
                    } else {
                        Ok(item.label.to_owned())
                    }
                })
                .value(|item: &Item| item.id)
                .build()
        });

        let ids: Vec<u32> = cb.filtered_options().iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(cb.status(), ComboboxStatus::Ready);
        let messages = messages.lock().expect("capture lock");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("label accessor failed"));
    }

    #[test]
    fn failing_value_accessor_skips_option_and_blocks_click() {
        let mut cb: Combobox<Item, u32> = Combobox::builder()
            .options(items())
            .label(|item: &Item| item.label.to_owned())
            .try_value(|item: &Item| {
                if item.id == 1 {
                    Err(AccessorError::new("no id"))
                } else {
                    Ok(item.id)
                }
            })
            .build();
        assert_eq!(cb.filtered_len(), 2);
        assert_eq!(cb.select_option(0), CommitOutcome::Ignored);
        assert_eq!(cb.select_option(1), CommitOutcome::Committed);
        assert_eq!(cb.selected_value(), Some(&2));
    }
}
