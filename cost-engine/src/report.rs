use shared_types::ProjectSnapshot;
use std::io::Write;

use crate::sheet::{round_display, CostSheet};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const FIXED_COLUMNS: [&str; 7] = [
    "ID",
    "Task",
    "Variable cost",
    "Fixed cost",
    "Total cost",
    "Duration",
    "Completion %",
];

/// Write the printable cost report: one row per task with its hours per
/// period, followed by the period and cumulative rows. Money is rounded to
/// whole units.
pub fn write_csv<W: Write>(
    project: &ProjectSnapshot,
    sheet: &CostSheet,
    writer: W,
) -> Result<(), ReportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(project.timeline_dates.iter().cloned());
    wtr.write_record(&header)?;

    for task in &project.tasks {
        let costs = sheet.task_costs(&task.id).unwrap_or_default();
        let mut record = vec![
            task.id.clone(),
            task.name.clone(),
            round_display(costs.variable).to_string(),
            round_display(task.fixed_cost).to_string(),
            round_display(costs.total).to_string(),
            task.duration.to_string(),
            task.completion.to_string(),
        ];
        record.extend(project.timeline_dates.iter().map(|date| {
            let hours = task.hours_on(date);
            if hours > 0.0 {
                hours.to_string()
            } else {
                String::new()
            }
        }));
        wtr.write_record(&record)?;
    }

    wtr.write_record(&summary_row("Period cost", &sheet.period_costs))?;
    wtr.write_record(&summary_row("Cumulative", &sheet.cumulative_costs))?;

    wtr.flush()?;
    Ok(())
}

fn summary_row(label: &str, values: &[f64]) -> Vec<String> {
    let mut record = vec![String::new(); FIXED_COLUMNS.len()];
    record[1] = label.to_string();
    record.extend(values.iter().map(|v| round_display(*v).to_string()));
    record
}
