use anyhow::{anyhow, bail, Result};
use project_store::ProjectStore;
use shared_types::{ProjectSnapshot, Task, UpdateTaskRequest};
use std::io::Write;

use super::projects::edit;
use crate::helpers::format::quantity;

fn find_task<'a>(project: &'a mut ProjectSnapshot, task_id: &str) -> Result<&'a mut Task> {
    let project_id = project.id.clone();
    project
        .task_mut(task_id)
        .ok_or_else(|| anyhow!("Task {task_id} not found in project {project_id}"))
}

/// Append a task and print its id.
pub async fn add(
    store: &dyn ProjectStore,
    id: &str,
    name: Option<&str>,
    out: &mut dyn Write,
) -> Result<String> {
    let task_id = edit(store, id, |project| {
        let task = project.add_task();
        if let Some(name) = name {
            task.name = name.to_string();
        }
        Ok(task.id.clone())
    })
    .await?;

    tracing::info!(project_id = %id, task_id = %task_id, "Added task");
    writeln!(out, "{task_id}")?;
    Ok(task_id)
}

pub async fn update(
    store: &dyn ProjectStore,
    id: &str,
    task_id: &str,
    update: UpdateTaskRequest,
    out: &mut dyn Write,
) -> Result<()> {
    edit(store, id, |project| {
        if !project.update_task(task_id, update) {
            bail!("Task {task_id} not found in project {id}");
        }
        Ok(())
    })
    .await?;

    writeln!(out, "Updated task {task_id}")?;
    Ok(())
}

/// Record hours worked on one timeline date. Zero clears the entry.
pub async fn set_hours(
    store: &dyn ProjectStore,
    id: &str,
    task_id: &str,
    date: &str,
    hours: f64,
    out: &mut dyn Write,
) -> Result<()> {
    let recorded = edit(store, id, |project| {
        if !project.timeline_dates.iter().any(|d| d == date) {
            bail!("{date} is not on the timeline of project {id}");
        }
        let task = find_task(project, task_id)?;
        task.set_hours(date, hours);
        Ok(task.hours_on(date))
    })
    .await?;

    if recorded > 0.0 {
        writeln!(out, "Task {task_id}: {} hours on {date}", quantity(recorded))?;
    } else {
        writeln!(out, "Task {task_id}: cleared {date}")?;
    }
    Ok(())
}

/// Allocate hours of a resource to a task. Zero clears the allocation, which
/// also works for resources that no longer exist.
pub async fn set_allocation(
    store: &dyn ProjectStore,
    id: &str,
    task_id: &str,
    resource: &str,
    hours: f64,
    out: &mut dyn Write,
) -> Result<()> {
    let allocated = edit(store, id, |project| {
        if hours > 0.0 && project.resource_index(resource).is_none() {
            bail!("Resource {resource} does not exist in project {id}");
        }
        let task = find_task(project, task_id)?;
        task.set_allocation(resource, hours);
        Ok(task.resource_alloc.get(resource).copied().unwrap_or(0.0))
    })
    .await?;

    if allocated > 0.0 {
        writeln!(
            out,
            "Task {task_id}: {} hours of {resource}",
            quantity(allocated)
        )?;
    } else {
        writeln!(out, "Task {task_id}: {resource} no longer allocated")?;
    }
    Ok(())
}

pub async fn remove(
    store: &dyn ProjectStore,
    id: &str,
    task_id: &str,
    out: &mut dyn Write,
) -> Result<()> {
    edit(store, id, |project| {
        if !project.remove_task(task_id) {
            bail!("Task {task_id} not found in project {id}");
        }
        Ok(())
    })
    .await?;

    tracing::info!(project_id = %id, task_id = %task_id, "Removed task");
    writeln!(out, "Removed task {task_id}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cost_engine::CostSheet;
    use project_store::SqliteProjectStore;
    use shared_types::Resource;

    async fn seeded(store: &SqliteProjectStore) -> String {
        let mut project = ProjectSnapshot::new("Website");
        project.resources = vec![Resource::new("Alex", 350.0)];
        project.timeline_dates = vec!["1/1".to_string(), "1/2".to_string()];
        store.save(project).await.unwrap()
    }

    #[tokio::test]
    async fn test_build_task_from_commands() {
        let store = SqliteProjectStore::open_in_memory().unwrap();
        let id = seeded(&store).await;

        let task_id = add(&store, &id, Some("Plan A"), &mut Vec::new())
            .await
            .unwrap();
        assert_eq!(task_id, "1.0");

        set_allocation(&store, &id, &task_id, "Alex", 16.0, &mut Vec::new())
            .await
            .unwrap();
        set_hours(&store, &id, &task_id, "1/1", 8.0, &mut Vec::new())
            .await
            .unwrap();
        set_hours(&store, &id, &task_id, "1/2", 8.0, &mut Vec::new())
            .await
            .unwrap();
        update(
            &store,
            &id,
            &task_id,
            UpdateTaskRequest {
                fixed_cost: Some(100.0),
                completion: Some(50.0),
                ..Default::default()
            },
            &mut Vec::new(),
        )
        .await
        .unwrap();

        let project = store.get(&id).await.unwrap().unwrap();
        let task = project.task(&task_id).unwrap();
        assert_eq!(task.name, "Plan A");
        assert_eq!(task.completion, 50.0);

        let sheet = CostSheet::build(&project);
        let costs = sheet.task_costs(&task_id).unwrap();
        assert_eq!(costs.variable, 5600.0);
        assert_eq!(costs.total, 5700.0);
        assert_eq!(sheet.period_costs, vec![2800.0, 2800.0]);
    }

    #[tokio::test]
    async fn test_zero_hours_clears_entry() {
        let store = SqliteProjectStore::open_in_memory().unwrap();
        let id = seeded(&store).await;
        let task_id = add(&store, &id, None, &mut Vec::new()).await.unwrap();

        set_hours(&store, &id, &task_id, "1/1", 8.0, &mut Vec::new())
            .await
            .unwrap();
        let mut buf = Vec::new();
        set_hours(&store, &id, &task_id, "1/1", 0.0, &mut buf)
            .await
            .unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("cleared 1/1"));

        let project = store.get(&id).await.unwrap().unwrap();
        assert!(project.tasks[0].timeline_data.is_empty());
    }

    #[tokio::test]
    async fn test_hours_outside_timeline_rejected() {
        let store = SqliteProjectStore::open_in_memory().unwrap();
        let id = seeded(&store).await;
        let task_id = add(&store, &id, None, &mut Vec::new()).await.unwrap();

        let err = set_hours(&store, &id, &task_id, "3/1", 8.0, &mut Vec::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not on the timeline"));

        let project = store.get(&id).await.unwrap().unwrap();
        assert!(project.tasks[0].timeline_data.is_empty());
    }

    #[tokio::test]
    async fn test_allocation_needs_existing_resource() {
        let store = SqliteProjectStore::open_in_memory().unwrap();
        let id = seeded(&store).await;
        let task_id = add(&store, &id, None, &mut Vec::new()).await.unwrap();

        assert!(
            set_allocation(&store, &id, &task_id, "Zoe", 4.0, &mut Vec::new())
                .await
                .is_err()
        );

        // A dangling allocation can still be cleared
        let mut project = store.get(&id).await.unwrap().unwrap();
        project.tasks[0].set_allocation("Zoe", 4.0);
        store.save(project).await.unwrap();

        set_allocation(&store, &id, &task_id, "Zoe", 0.0, &mut Vec::new())
            .await
            .unwrap();
        let project = store.get(&id).await.unwrap().unwrap();
        assert!(project.tasks[0].resource_alloc.is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_task_fails() {
        let store = SqliteProjectStore::open_in_memory().unwrap();
        let id = seeded(&store).await;
        let task_id = add(&store, &id, None, &mut Vec::new()).await.unwrap();

        remove(&store, &id, &task_id, &mut Vec::new()).await.unwrap();
        assert!(remove(&store, &id, &task_id, &mut Vec::new()).await.is_err());
        assert!(store.get(&id).await.unwrap().unwrap().tasks.is_empty());
    }
}
