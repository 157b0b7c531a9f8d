use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::issue::{Issue, UpdateIssueRequest};
use crate::resource::Resource;
use crate::task::{Task, UpdateTaskRequest};
use crate::timeline;

/// One saved project's complete editable state.
///
/// Costs are not part of a snapshot; they are derived from `resources` and
/// `tasks` whenever they are needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    /// Empty until the snapshot is first saved.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub tasks: Vec<Task>,
    pub resources: Vec<Resource>,
    pub issues: Vec<Issue>,
    pub timeline_dates: Vec<String>,
    /// Overwritten by the store on every save.
    #[serde(default = "Utc::now")]
    pub last_modified: DateTime<Utc>,
}

impl ProjectSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            tasks: Vec::new(),
            resources: Vec::new(),
            issues: Vec::new(),
            timeline_dates: Vec::new(),
            last_modified: Utc::now(),
        }
    }

    /// A fresh project with the default team and a one-week timeline.
    pub fn starter(name: impl Into<String>) -> Self {
        let mut project = Self::new(name);
        project.resources = vec![
            Resource::new("Alex", 200.0),
            Resource::new("Bob", 180.0),
            Resource::new("Chris", 250.0),
        ];
        project.timeline_dates = (1..=7).map(|d| format!("1/{d}")).collect();
        project
    }

    pub fn is_saved(&self) -> bool {
        !self.id.is_empty()
    }

    /// Re-apply the sparse and non-negative rules to every task. Used on
    /// snapshots that did not come through the editing methods, such as an
    /// imported file.
    pub fn compact(&mut self) {
        for task in &mut self.tasks {
            task.compact();
        }
    }

    // Tasks

    /// Append a task with a fresh `"{n}.0"` id. Ids of removed tasks are
    /// never handed out again while another task still holds them.
    pub fn add_task(&mut self) -> &mut Task {
        let mut n = self.tasks.len() + 1;
        let id = loop {
            let candidate = format!("{n}.0");
            if !self.tasks.iter().any(|t| t.id == candidate) {
                break candidate;
            }
            n += 1;
        };

        self.tasks.push(Task::new(id, "New task"));
        let last = self.tasks.len() - 1;
        &mut self.tasks[last]
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn update_task(&mut self, id: &str, update: UpdateTaskRequest) -> bool {
        match self.task_mut(id) {
            Some(task) => {
                update.apply(task);
                true
            }
            None => false,
        }
    }

    pub fn remove_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    // Resources

    pub fn resource_index(&self, name: &str) -> Option<usize> {
        self.resources.iter().position(|r| r.name == name)
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.push(resource);
    }

    pub fn update_resource(&mut self, index: usize, resource: Resource) -> bool {
        match self.resources.get_mut(index) {
            Some(slot) => {
                *slot = resource;
                true
            }
            None => false,
        }
    }

    /// Remove a resource. Task allocations naming it are left in place and
    /// simply stop contributing cost.
    pub fn remove_resource(&mut self, index: usize) -> Option<Resource> {
        if index < self.resources.len() {
            Some(self.resources.remove(index))
        } else {
            None
        }
    }

    // Issues

    /// Highest existing id plus one, or 1 for a project without issues.
    /// `None` once the highest id is `u32::MAX`.
    pub fn next_issue_id(&self) -> Option<u32> {
        match self.issues.iter().map(|i| i.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    pub fn add_issue(&mut self) -> Option<&mut Issue> {
        let issue = Issue::new(self.next_issue_id()?);
        self.issues.push(issue);
        self.issues.last_mut()
    }

    pub fn update_issue(&mut self, id: u32, update: UpdateIssueRequest) -> bool {
        match self.issues.iter_mut().find(|i| i.id == id) {
            Some(issue) => {
                update.apply(issue);
                true
            }
            None => false,
        }
    }

    pub fn remove_issue(&mut self, id: u32) -> bool {
        let before = self.issues.len();
        self.issues.retain(|i| i.id != id);
        self.issues.len() != before
    }

    // Timeline

    /// Replace the timeline and prune every task's recorded hours down to the
    /// surviving labels.
    pub fn set_timeline_dates(&mut self, dates: Vec<String>) {
        for task in &mut self.tasks {
            task.retain_dates(&dates);
        }
        self.timeline_dates = dates;
    }

    /// Append the next hand-made label and return it.
    pub fn add_timeline_label(&mut self) -> String {
        let label = timeline::next_label(&self.timeline_dates);
        self.timeline_dates.push(label.clone());
        label
    }

    /// Remove one label, pruning the hours recorded on it. The last remaining
    /// label is never removed.
    pub fn remove_timeline_label(&mut self, label: &str) -> bool {
        let Some(index) = self.timeline_dates.iter().position(|d| d == label) else {
            return false;
        };
        match timeline::remove_label(&self.timeline_dates, index) {
            Some(dates) => {
                self.set_timeline_dates(dates);
                true
            }
            None => false,
        }
    }
}
