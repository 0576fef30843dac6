#![forbid(unsafe_code)]

//! Project and meeting pickers.
//!
//! The dashboard header shows two comboboxes: one over projects, one over the
//! meetings of the chosen project. Committing a project clears the meeting
//! choice and narrows the meeting list; the meeting picker stays disabled
//! until a project is chosen.

use orbit_core::Key;
use serde::{Deserialize, Serialize};

use crate::combobox::{Combobox, ComboboxView, CommitOutcome};

/// A project the dashboard can show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A processed meeting belonging to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub project_id: String,
    pub name: String,
}

impl Meeting {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: name.into(),
        }
    }
}

/// Current `(project, meeting)` choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub project_id: Option<String>,
    pub meeting_id: Option<String>,
}

/// Paired project/meeting comboboxes.
#[derive(Debug)]
pub struct SelectionPanel {
    projects: Combobox<Project, String>,
    meetings: Combobox<Meeting, String>,
    all_meetings: Vec<Meeting>,
}

impl SelectionPanel {
    #[must_use]
    pub fn new(projects: Vec<Project>, all_meetings: Vec<Meeting>) -> Self {
        let projects = Combobox::builder()
            .options(projects)
            .label(|project: &Project| project.name.clone())
            .value(|project: &Project| project.id.clone())
            .placeholder("Select a project")
            .build();
        let meetings = Combobox::builder()
            .label(|meeting: &Meeting| meeting.name.clone())
            .value(|meeting: &Meeting| meeting.id.clone())
            .placeholder("Select a meeting")
            .disabled(true)
            .build();
        Self {
            projects,
            meetings,
            all_meetings,
        }
    }

    /// Current choice.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            project_id: self.projects.selected_value().cloned(),
            meeting_id: self.meetings.selected_value().cloned(),
        }
    }

    #[must_use]
    pub fn projects(&self) -> &Combobox<Project, String> {
        &self.projects
    }

    #[must_use]
    pub fn meetings(&self) -> &Combobox<Meeting, String> {
        &self.meetings
    }

    #[must_use]
    pub fn project_view(&self) -> ComboboxView {
        self.projects.view()
    }

    #[must_use]
    pub fn meeting_view(&self) -> ComboboxView {
        self.meetings.view()
    }

    /// Replace the project list. A chosen project that disappears is cleared.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        let still_present = self
            .projects
            .selected_value()
            .is_none_or(|id| projects.iter().any(|project| &project.id == id));
        self.projects.set_options(projects);
        if !still_present {
            tracing::debug!("selected project removed; clearing selection");
            self.projects.clear_selection();
            self.narrow_meetings();
        }
    }

    /// Replace the full meeting list; the picker shows only the chosen project's.
    pub fn set_meetings(&mut self, all_meetings: Vec<Meeting>) {
        self.all_meetings = all_meetings;
        let keep = self.meetings.selected_value().cloned();
        self.narrow_meetings();
        // Narrowing clears the choice; restore it if the meeting survived.
        if let Some(id) = keep {
            self.meetings.restore_selection(id);
        }
    }

    /// Key press in the project picker.
    pub fn handle_project_key(&mut self, key: Key) -> bool {
        if key == Key::Enter {
            let outcome = self.projects.commit_highlighted();
            if outcome == CommitOutcome::Committed {
                self.narrow_meetings();
            }
            return outcome != CommitOutcome::Ignored;
        }
        self.projects.handle_key(key)
    }

    /// Click on a project row.
    pub fn select_project(&mut self, index: usize) -> CommitOutcome {
        let outcome = self.projects.select_option(index);
        if outcome == CommitOutcome::Committed {
            self.narrow_meetings();
        }
        outcome
    }

    /// Key press in the meeting picker.
    pub fn handle_meeting_key(&mut self, key: Key) -> bool {
        self.meetings.handle_key(key)
    }

    /// Click on a meeting row.
    pub fn select_meeting(&mut self, index: usize) -> CommitOutcome {
        self.meetings.select_option(index)
    }

    /// Pointer or focus moved outside both pickers.
    pub fn handle_outside_interaction(&mut self) {
        self.projects.handle_outside_interaction();
        self.meetings.handle_outside_interaction();
    }

    fn narrow_meetings(&mut self) {
        let project_id = self.projects.selected_value().cloned();
        let options: Vec<Meeting> = match &project_id {
            Some(id) => self
                .all_meetings
                .iter()
                .filter(|meeting| &meeting.project_id == id)
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        tracing::debug!(
            project = project_id.as_deref().unwrap_or(""),
            meetings = options.len(),
            "meeting picker narrowed"
        );
        self.meetings.clear_selection();
        self.meetings.set_options(options);
        self.meetings.set_disabled(project_id.is_none());
    }
}
