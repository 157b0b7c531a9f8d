use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// A unit of work with a fixed cost, per-resource hour allocations and the
/// hours actually recorded against each timeline date.
///
/// `resource_alloc` and `timeline_data` are sparse: a zero entry is never
/// stored. Go through [`Task::set_allocation`] and [`Task::set_hours`] to keep
/// it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub fixed_cost: f64,
    /// Days
    pub duration: f64,
    /// Percent complete, 0 to 100
    pub completion: f64,
    #[serde(default)]
    pub resource_alloc: BTreeMap<String, f64>,
    #[serde(default)]
    pub timeline_data: BTreeMap<String, f64>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fixed_cost: 0.0,
            duration: 1.0,
            completion: 0.0,
            resource_alloc: BTreeMap::new(),
            timeline_data: BTreeMap::new(),
        }
    }

    /// Record `hours` worked on `date`. Zero removes the entry.
    pub fn set_hours(&mut self, date: impl Into<String>, hours: f64) {
        set_sparse(&mut self.timeline_data, date.into(), hours);
    }

    /// Allocate `hours` of `resource` to this task. Zero removes the entry.
    pub fn set_allocation(&mut self, resource: impl Into<String>, hours: f64) {
        set_sparse(&mut self.resource_alloc, resource.into(), hours);
    }

    pub fn hours_on(&self, date: &str) -> f64 {
        self.timeline_data.get(date).copied().unwrap_or(0.0)
    }

    /// Sum of every resource allocation, including ones whose resource no
    /// longer exists.
    pub fn total_allocated_hours(&self) -> f64 {
        self.resource_alloc.values().sum()
    }

    /// Drop zero or negative map entries and clamp the scalar fields into
    /// range.
    pub fn compact(&mut self) {
        self.timeline_data.retain(|_, hours| *hours > 0.0);
        self.resource_alloc.retain(|_, hours| *hours > 0.0);
        self.fixed_cost = self.fixed_cost.max(0.0);
        self.duration = self.duration.max(0.0);
        self.completion = self.completion.clamp(0.0, 100.0);
    }

    /// Drop timeline entries whose label is not in `dates`.
    pub fn retain_dates(&mut self, dates: &[String]) {
        self.timeline_data
            .retain(|date, _| dates.iter().any(|d| d == date));
    }
}

fn set_sparse(map: &mut BTreeMap<String, f64>, key: String, value: f64) {
    if value > 0.0 {
        map.insert(key, value);
    } else {
        map.remove(&key);
    }
}

/// Partial update applied by [`crate::ProjectSnapshot::update_task`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub fixed_cost: Option<f64>,
    pub duration: Option<f64>,
    pub completion: Option<f64>,
}

impl UpdateTaskRequest {
    pub fn apply(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(fixed_cost) = self.fixed_cost {
            task.fixed_cost = fixed_cost.max(0.0);
        }
        if let Some(duration) = self.duration {
            task.duration = duration.max(0.0);
        }
        if let Some(completion) = self.completion {
            task.completion = completion.clamp(0.0, 100.0);
        }
    }
}
