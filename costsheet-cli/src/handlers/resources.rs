use anyhow::{anyhow, bail, Result};
use project_store::ProjectStore;
use shared_types::Resource;
use std::io::Write;

use super::projects::edit;

pub async fn add(
    store: &dyn ProjectStore,
    id: &str,
    name: &str,
    rate: f64,
    out: &mut dyn Write,
) -> Result<()> {
    edit(store, id, |project| {
        if project.resource_index(name).is_some() {
            bail!("Resource {name} already exists in project {id}");
        }
        project.add_resource(Resource::new(name, rate));
        Ok(())
    })
    .await?;

    writeln!(out, "Added resource {name}")?;
    Ok(())
}

/// Change the rate or the name of a resource. Task allocations keep the old
/// name and stop contributing cost until they are reallocated.
pub async fn update(
    store: &dyn ProjectStore,
    id: &str,
    name: &str,
    rename: Option<&str>,
    rate: Option<f64>,
    out: &mut dyn Write,
) -> Result<()> {
    let stranded = edit(store, id, |project| {
        let index = project
            .resource_index(name)
            .ok_or_else(|| anyhow!("Resource {name} not found in project {id}"))?;

        let new_name = rename.unwrap_or(name);
        if new_name != name && project.resource_index(new_name).is_some() {
            bail!("Resource {new_name} already exists in project {id}");
        }

        let current_rate = project.resources[index].rate;
        project.update_resource(index, Resource::new(new_name, rate.unwrap_or(current_rate)));

        let stranded = if new_name != name {
            project
                .tasks
                .iter()
                .filter(|t| t.resource_alloc.contains_key(name))
                .count()
        } else {
            0
        };
        Ok(stranded)
    })
    .await?;

    if stranded > 0 {
        tracing::warn!(
            project_id = %id,
            "{stranded} task(s) still allocate hours to the old name {name}"
        );
    }
    writeln!(out, "Updated resource {}", rename.unwrap_or(name))?;
    Ok(())
}

/// Remove a resource. Allocations naming it are kept and contribute nothing.
pub async fn remove(
    store: &dyn ProjectStore,
    id: &str,
    name: &str,
    out: &mut dyn Write,
) -> Result<()> {
    edit(store, id, |project| {
        let index = project
            .resource_index(name)
            .ok_or_else(|| anyhow!("Resource {name} not found in project {id}"))?;
        project.remove_resource(index);
        Ok(())
    })
    .await?;

    writeln!(out, "Removed resource {name}")?;
    Ok(())
}
