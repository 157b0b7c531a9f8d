use shared_types::{rate_of, Resource, Task, TaskCosts};

/// Variable cost is the sum of `hours x rate` over the task's allocations;
/// allocations naming an unknown resource are skipped. Total adds the fixed
/// cost.
pub fn task_cost(task: &Task, resources: &[Resource]) -> TaskCosts {
    let variable = task
        .resource_alloc
        .iter()
        .filter_map(|(name, hours)| rate_of(resources, name).map(|rate| rate * hours))
        .sum::<f64>();

    TaskCosts {
        variable,
        total: variable + task.fixed_cost,
    }
}

/// Apportioned hourly rate: the task's variable cost spread evenly over its
/// allocated hours, or zero when nothing is allocated.
fn apportioned_rate(task: &Task, resources: &[Resource]) -> f64 {
    let total_hours = task.total_allocated_hours();
    if total_hours > 0.0 {
        task_cost(task, resources).variable / total_hours
    } else {
        0.0
    }
}

/// Cost of each period, in timeline order.
///
/// For every date the hours recorded by each task are priced at that task's
/// apportioned rate, regardless of which resource did the work. Fixed costs
/// never reach the period series.
pub fn period_costs(
    tasks: &[Task],
    resources: &[Resource],
    timeline_dates: &[String],
) -> Vec<f64> {
    let rates: Vec<f64> = tasks
        .iter()
        .map(|task| apportioned_rate(task, resources))
        .collect();

    timeline_dates
        .iter()
        .map(|date| {
            tasks
                .iter()
                .zip(&rates)
                .fold(0.0, |sum, (task, rate)| sum + task.hours_on(date) * rate)
        })
        .collect()
}

/// Running prefix sum of `period_costs`.
pub fn cumulative_costs(period_costs: &[f64]) -> Vec<f64> {
    period_costs
        .iter()
        .scan(0.0, |running, cost| {
            *running += cost;
            Some(*running)
        })
        .collect()
}
