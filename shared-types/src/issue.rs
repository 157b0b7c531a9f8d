use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Traffic-light status of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Red,
    Yellow,
    Green,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown issue status '{0}', expected red, yellow or green")]
pub struct UnknownStatus(pub String);

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Red => "red",
            IssueStatus::Yellow => "yellow",
            IssueStatus::Green => "green",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(IssueStatus::Red),
            "yellow" => Ok(IssueStatus::Yellow),
            "green" => Ok(IssueStatus::Green),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// A status-tracked log entry attached to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Issue {
    pub id: u32,
    pub desc: String,
    pub owner: String,
    pub status: IssueStatus,
    pub impact: String,
}

impl Issue {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            desc: "New issue".to_string(),
            owner: "Unassigned".to_string(),
            status: IssueStatus::Yellow,
            impact: "To be assessed".to_string(),
        }
    }
}

/// Partial update applied by [`crate::ProjectSnapshot::update_issue`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateIssueRequest {
    pub desc: Option<String>,
    pub owner: Option<String>,
    pub status: Option<IssueStatus>,
    pub impact: Option<String>,
}

impl UpdateIssueRequest {
    pub fn apply(self, issue: &mut Issue) {
        if let Some(desc) = self.desc {
            issue.desc = desc;
        }
        if let Some(owner) = self.owner {
            issue.owner = owner;
        }
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(impact) = self.impact {
            issue.impact = impact;
        }
    }
}
