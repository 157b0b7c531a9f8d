use serde::Serialize;
use shared_types::{ProjectSnapshot, TaskCosts};

use crate::costs::{cumulative_costs, period_costs, task_cost};

/// Headline figures shown next to the cost table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Last cumulative value, or zero for an empty timeline
    pub budget_at_completion: f64,
    /// Number of periods in the timeline
    pub total_duration: usize,
}

pub fn project_summary(cumulative: &[f64], timeline_len: usize) -> ProjectSummary {
    ProjectSummary {
        budget_at_completion: cumulative.last().copied().unwrap_or(0.0),
        total_duration: timeline_len,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCostRow {
    pub task_id: String,
    pub costs: TaskCosts,
}

/// Every derived figure for one snapshot, computed in a single pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSheet {
    pub tasks: Vec<TaskCostRow>,
    pub period_costs: Vec<f64>,
    pub cumulative_costs: Vec<f64>,
    pub summary: ProjectSummary,
}

impl CostSheet {
    pub fn build(project: &ProjectSnapshot) -> Self {
        let tasks = project
            .tasks
            .iter()
            .map(|task| TaskCostRow {
                task_id: task.id.clone(),
                costs: task_cost(task, &project.resources),
            })
            .collect();

        let period_costs =
            period_costs(&project.tasks, &project.resources, &project.timeline_dates);
        let cumulative_costs = cumulative_costs(&period_costs);
        let summary = project_summary(&cumulative_costs, project.timeline_dates.len());

        Self {
            tasks,
            period_costs,
            cumulative_costs,
            summary,
        }
    }

    pub fn task_costs(&self, task_id: &str) -> Option<TaskCosts> {
        self.tasks
            .iter()
            .find(|row| row.task_id == task_id)
            .map(|row| row.costs)
    }
}

/// Round to the nearest whole currency unit for display. Halves round away
/// from zero.
pub fn round_display(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Resource, Task};

    fn sample_project() -> ProjectSnapshot {
        let mut project = ProjectSnapshot::new("Sample");
        project.resources = vec![Resource::new("Alex", 350.0), Resource::new("Dell", 150.0)];
        project.timeline_dates = vec!["1/1".to_string(), "1/2".to_string(), "1/3".to_string()];

        let mut design = Task::new("1.0", "Design");
        design.set_allocation("Alex", 16.0);
        design.set_hours("1/1", 8.0);
        design.set_hours("1/2", 8.0);

        let mut hosting = Task::new("2.0", "Hosting");
        hosting.fixed_cost = 999.0;

        project.tasks = vec![design, hosting];
        project
    }

    #[test]
    fn test_build_sheet() {
        let sheet = CostSheet::build(&sample_project());

        assert_eq!(sheet.tasks.len(), 2);
        assert_eq!(sheet.task_costs("2.0").unwrap().total, 999.0);
        assert_eq!(sheet.period_costs, vec![2800.0, 2800.0, 0.0]);
        assert_eq!(sheet.cumulative_costs, vec![2800.0, 5600.0, 5600.0]);
        assert_eq!(sheet.summary.budget_at_completion, 5600.0);
        assert_eq!(sheet.summary.total_duration, 3);
        assert!(sheet.task_costs("9.0").is_none());
    }

    #[test]
    fn test_summary_of_empty_timeline() {
        let summary = project_summary(&[], 0);
        assert_eq!(summary.budget_at_completion, 0.0);
        assert_eq!(summary.total_duration, 0);
    }

    #[test]
    fn test_round_display() {
        assert_eq!(round_display(2799.5), 2800);
        assert_eq!(round_display(2799.49), 2799);
        assert_eq!(round_display(0.0), 0);
    }

    #[test]
    fn test_sheet_keeps_full_precision() {
        let mut project = sample_project();
        project.resources[0].rate = 100.0 / 3.0;

        let sheet = CostSheet::build(&project);
        assert!((sheet.period_costs[0] - 800.0 / 3.0).abs() < 1e-9);
        assert_ne!(sheet.period_costs[0].fract(), 0.0);
        assert_eq!(round_display(sheet.period_costs[0]), 267);
    }

    #[test]
    fn test_sheet_serialization() {
        let sheet = CostSheet::build(&sample_project());
        let json = serde_json::to_value(&sheet).unwrap();

        assert_eq!(json["summary"]["budgetAtCompletion"], 5600.0);
        assert_eq!(json["tasks"][0]["taskId"], "1.0");
        assert_eq!(json["periodCosts"].as_array().unwrap().len(), 3);
    }
}
