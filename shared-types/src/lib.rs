use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod issue;
pub mod project;
pub mod resource;
pub mod task;
pub mod timeline;

pub use issue::{Issue, IssueStatus, UnknownStatus, UpdateIssueRequest};
pub use project::ProjectSnapshot;
pub use resource::{rate_of, Resource};
pub use task::{Task, UpdateTaskRequest};
pub use timeline::TimelineError;

/// Variable (hours x rate) and total (variable + fixed) cost of one task
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaskCosts {
    pub variable: f64,
    pub total: f64,
}

