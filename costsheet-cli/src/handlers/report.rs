use anyhow::{Context, Result};
use cost_engine::CostSheet;
use project_store::ProjectStore;
use std::io::Write;
use std::path::Path;

use super::projects::load;

/// Write the CSV cost report for one project to `output`.
pub async fn write_report(
    store: &dyn ProjectStore,
    id: &str,
    output: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let project = load(store, id).await?;
    let sheet = CostSheet::build(&project);

    let file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    cost_engine::write_csv(&project, &sheet, file)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;

    tracing::info!(project_id = %id, "Wrote cost report to {}", output.display());
    writeln!(out, "Report written to {}", output.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use project_store::SqliteProjectStore;
    use shared_types::{ProjectSnapshot, Resource};

    #[tokio::test]
    async fn test_report_file() {
        let store = SqliteProjectStore::open_in_memory().unwrap();
        let mut project = ProjectSnapshot::new("Report");
        project.resources = vec![Resource::new("Bob", 350.0)];
        project.timeline_dates = vec!["1/3".to_string(), "1/4".to_string(), "1/5".to_string()];
        let task = project.add_task();
        task.set_allocation("Bob", 24.0);
        for date in ["1/3", "1/4", "1/5"] {
            task.set_hours(date, 8.0);
        }
        let id = store.save(project).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        write_report(&store, &id, &path, &mut Vec::new()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let last = text.lines().last().unwrap();
        assert_eq!(last, ",Cumulative,,,,,,2800,5600,8400");
    }

    #[tokio::test]
    async fn test_report_unknown_project() {
        let store = SqliteProjectStore::open_in_memory().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        assert!(write_report(&store, "missing", &path, &mut Vec::new())
            .await
            .is_err());
        assert!(!path.exists());
    }
}
