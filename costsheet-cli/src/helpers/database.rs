use anyhow::Context;
use project_store::SqliteProjectStore;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::CliConfig;

/// Returns the default path of the project database
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/costsheet/projects.sqlite3`
/// - **Linux**: `~/.local/share/costsheet/projects.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\costsheet\projects.sqlite3`
pub fn get_default_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("costsheet").join("projects.sqlite3"))
}

/// Resolve the database path: command line first, then config, then the
/// platform default.
pub fn resolve_db_path(cli_path: Option<PathBuf>, config: &CliConfig) -> anyhow::Result<PathBuf> {
    match cli_path.or_else(|| config.database_path()) {
        Some(path) => Ok(path),
        None => get_default_db_path(),
    }
}

/// Open the project store
pub fn initialize_store(db_path: &PathBuf) -> anyhow::Result<Arc<SqliteProjectStore>> {
    let store = SqliteProjectStore::open(db_path)
        .with_context(|| format!("Failed to open project store at {:?}", db_path))?;
    Ok(Arc::new(store))
}
