use anyhow::{anyhow, bail, Result};
use project_store::ProjectStore;
use shared_types::UpdateIssueRequest;
use std::io::Write;

use super::projects::edit;

/// Log a new issue, filling the given fields over the defaults, and print
/// its id.
pub async fn add(
    store: &dyn ProjectStore,
    id: &str,
    fields: UpdateIssueRequest,
    out: &mut dyn Write,
) -> Result<u32> {
    let issue_id = edit(store, id, |project| {
        let issue = project
            .add_issue()
            .ok_or_else(|| anyhow!("Project {id} has no issue ids left"))?;
        fields.apply(issue);
        Ok(issue.id)
    })
    .await?;

    writeln!(out, "{issue_id}")?;
    Ok(issue_id)
}

pub async fn update(
    store: &dyn ProjectStore,
    id: &str,
    issue_id: u32,
    fields: UpdateIssueRequest,
    out: &mut dyn Write,
) -> Result<()> {
    edit(store, id, |project| {
        if !project.update_issue(issue_id, fields) {
            bail!("Issue #{issue_id} not found in project {id}");
        }
        Ok(())
    })
    .await?;

    writeln!(out, "Updated issue #{issue_id}")?;
    Ok(())
}

pub async fn remove(
    store: &dyn ProjectStore,
    id: &str,
    issue_id: u32,
    out: &mut dyn Write,
) -> Result<()> {
    edit(store, id, |project| {
        if !project.remove_issue(issue_id) {
            bail!("Issue #{issue_id} not found in project {id}");
        }
        Ok(())
    })
    .await?;

    writeln!(out, "Removed issue #{issue_id}")?;
    Ok(())
}
