use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use cost_engine::CostSheet;
use project_store::{DeleteOutcome, ProjectStore};
use shared_types::{timeline, ProjectSnapshot};
use std::io::Write;
use std::path::Path;

use crate::helpers::format::{money, quantity};

/// Fetch a project or fail with a not-found message.
pub async fn load(store: &dyn ProjectStore, id: &str) -> Result<ProjectSnapshot> {
    store
        .get(id)
        .await
        .with_context(|| format!("Failed to load project {id}"))?
        .ok_or_else(|| anyhow::anyhow!("Project {id} not found"))
}

/// Load a project, apply `change` and save the result. Nothing is written
/// when `change` fails.
pub async fn edit<T>(
    store: &dyn ProjectStore,
    id: &str,
    change: impl FnOnce(&mut ProjectSnapshot) -> Result<T>,
) -> Result<T> {
    let mut project = load(store, id).await?;
    let value = change(&mut project)?;
    store
        .save(project)
        .await
        .with_context(|| format!("Failed to save project {id}"))?;
    Ok(value)
}

pub async fn create(store: &dyn ProjectStore, name: &str, out: &mut dyn Write) -> Result<String> {
    let project = ProjectSnapshot::starter(name);
    let id = store
        .save(project)
        .await
        .context("Failed to save new project")?;

    tracing::info!(project_id = %id, "Created project");
    writeln!(out, "{id}")?;
    Ok(id)
}

pub async fn list(
    store: &dyn ProjectStore,
    search: Option<&str>,
    currency: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let projects = store.list_all().await.context("Failed to list projects")?;
    let needle = search.map(str::to_lowercase);

    let matching: Vec<&ProjectSnapshot> = projects
        .iter()
        .filter(|p| match &needle {
            Some(needle) => p.name.to_lowercase().contains(needle),
            None => true,
        })
        .collect();

    if matching.is_empty() {
        writeln!(out, "No projects found")?;
        return Ok(());
    }

    for project in matching {
        let sheet = CostSheet::build(project);
        writeln!(
            out,
            "{:<36} {:<24} {:<20} {:>12}",
            project.id,
            project.name,
            project.last_modified.format("%Y-%m-%d %H:%M").to_string(),
            money(currency, sheet.summary.budget_at_completion),
        )?;
    }

    Ok(())
}

pub async fn show(
    store: &dyn ProjectStore,
    id: &str,
    currency: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let project = load(store, id).await?;
    let sheet = CostSheet::build(&project);

    writeln!(out, "{} ({})", project.name, project.id)?;
    writeln!(
        out,
        "Last modified: {}",
        project.last_modified.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out)?;

    let resources: Vec<String> = project
        .resources
        .iter()
        .map(|r| format!("{} ({})", r.name, money(currency, r.rate)))
        .collect();
    writeln!(out, "Resources: {}", resources.join(", "))?;
    writeln!(out)?;

    write!(
        out,
        "{:<6} {:<20} {:>10} {:>10} {:>10} {:>5} {:>5}",
        "ID", "Task", "Variable", "Fixed", "Total", "Days", "Done"
    )?;
    for date in &project.timeline_dates {
        write!(out, " {:>8}", date)?;
    }
    writeln!(out)?;

    for task in &project.tasks {
        let costs = sheet.task_costs(&task.id).unwrap_or_default();
        write!(
            out,
            "{:<6} {:<20} {:>10} {:>10} {:>10} {:>5} {:>4}%",
            task.id,
            task.name,
            money(currency, costs.variable),
            money(currency, task.fixed_cost),
            money(currency, costs.total),
            task.duration,
            task.completion,
        )?;
        for date in &project.timeline_dates {
            write!(out, " {:>8}", quantity(task.hours_on(date)))?;
        }
        writeln!(out)?;
    }

    write_series(out, "Period cost", &sheet.period_costs, currency)?;
    write_series(out, "Cumulative", &sheet.cumulative_costs, currency)?;
    writeln!(out)?;

    writeln!(
        out,
        "Budget at completion: {}",
        money(currency, sheet.summary.budget_at_completion)
    )?;
    writeln!(out, "Total duration: {} periods", sheet.summary.total_duration)?;

    if !project.issues.is_empty() {
        writeln!(out)?;
        writeln!(out, "Issues:")?;
        for issue in &project.issues {
            writeln!(
                out,
                "  #{} [{}] {} (owner: {}, impact: {})",
                issue.id,
                issue.status,
                issue.desc,
                issue.owner,
                issue.impact
            )?;
        }
    }

    Ok(())
}

fn write_series(out: &mut dyn Write, label: &str, values: &[f64], currency: &str) -> Result<()> {
    // Align with the timeline columns of the task table
    write!(out, "{:<72}", label)?;
    for value in values {
        write!(out, " {:>8}", money(currency, *value))?;
    }
    writeln!(out)?;
    Ok(())
}

pub async fn import(store: &dyn ProjectStore, file: &Path, out: &mut dyn Write) -> Result<String> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let mut project: ProjectSnapshot = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a valid project snapshot", file.display()))?;
    project.compact();

    let id = store
        .save(project)
        .await
        .context("Failed to save imported project")?;

    tracing::info!(project_id = %id, "Imported project from {}", file.display());
    writeln!(out, "{id}")?;
    Ok(id)
}

pub async fn export(
    store: &dyn ProjectStore,
    id: &str,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let project = load(store, id).await?;
    let json = serde_json::to_string_pretty(&project)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(project_id = %id, "Exported project to {}", path.display());
        }
        None => writeln!(out, "{json}")?,
    }

    Ok(())
}

/// How the new timeline is chosen
#[derive(Debug, Clone)]
pub enum TimelineSpec {
    Range { start: String, end: String },
    Days { today: NaiveDate, days: u32 },
}

pub async fn set_timeline(
    store: &dyn ProjectStore,
    id: &str,
    spec: TimelineSpec,
    out: &mut dyn Write,
) -> Result<()> {
    let mut project = load(store, id).await?;

    let dates = match spec {
        TimelineSpec::Range { start, end } => timeline::generate_dates_from_str(&start, &end)?,
        TimelineSpec::Days { today, days } => timeline::quick_range(today, days)?,
    };
    if dates.is_empty() {
        bail!("The requested range contains no dates");
    }

    let count = dates.len();
    project.set_timeline_dates(dates);
    store
        .save(project)
        .await
        .with_context(|| format!("Failed to save project {id}"))?;

    writeln!(out, "Timeline set to {count} periods")?;
    Ok(())
}

pub async fn add_date(store: &dyn ProjectStore, id: &str, out: &mut dyn Write) -> Result<String> {
    let label = edit(store, id, |project| Ok(project.add_timeline_label())).await?;
    writeln!(out, "Added {label}")?;
    Ok(label)
}

pub async fn remove_date(
    store: &dyn ProjectStore,
    id: &str,
    label: &str,
    out: &mut dyn Write,
) -> Result<()> {
    edit(store, id, |project| {
        if !project.timeline_dates.iter().any(|d| d == label) {
            bail!("{label} is not on the timeline of project {id}");
        }
        if !project.remove_timeline_label(label) {
            bail!("{label} is the only period left; a timeline needs at least one");
        }
        Ok(())
    })
    .await?;

    writeln!(out, "Removed {label}")?;
    Ok(())
}

pub async fn delete(store: &dyn ProjectStore, id: &str, out: &mut dyn Write) -> Result<()> {
    match store
        .delete(id)
        .await
        .with_context(|| format!("Failed to delete project {id}"))?
    {
        DeleteOutcome::Deleted => writeln!(out, "Deleted {id}")?,
        DeleteOutcome::NotFound => writeln!(out, "Project {id} not found, nothing deleted")?,
    }
    Ok(())
}

pub async fn clear(store: &dyn ProjectStore, confirmed: bool, out: &mut dyn Write) -> Result<()> {
    if !confirmed {
        bail!("Refusing to delete every project without --yes");
    }
    store.clear().await.context("Failed to clear projects")?;
    writeln!(out, "All projects removed")?;
    Ok(())
}
