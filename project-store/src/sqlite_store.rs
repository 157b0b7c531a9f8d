use super::{DeleteOutcome, ProjectStore, StoreError};
use crate::{legacy, migrations};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use serde_json::Value;
use shared_types::ProjectSnapshot;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// SQLite-backed [`ProjectStore`].
///
/// Construct one with [`SqliteProjectStore::open`] and hand it (usually behind
/// an `Arc`) to whatever needs it. After [`SqliteProjectStore::close`] every
/// operation fails with [`StoreError::StorageUnavailable`].
pub struct SqliteProjectStore {
    conn: Mutex<Option<Connection>>,
}

impl SqliteProjectStore {
    /// Open (creating if needed) the database file at `path` and run migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::StorageUnavailable(format!(
                    "Failed to create directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(path).map_err(|e| {
            StoreError::StorageUnavailable(format!("Failed to open {}: {e}", path.display()))
        })?;
        conn.busy_timeout(Duration::from_secs(5))?;

        tracing::info!("Opened project store at {}", path.display());
        Self::new(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StoreError::StorageUnavailable(format!("Failed to open in-memory db: {e}"))
        })?;
        Self::new(conn)
    }

    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    /// Close the underlying connection. Closing twice is a no-op.
    pub fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let Some(conn) = guard.take() else {
            return Ok(());
        };

        if let Err((conn, e)) = conn.close() {
            *guard = Some(conn);
            return Err(StoreError::Storage(e));
        }

        tracing::info!("Closed project store");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Connection>>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::StorageUnavailable("Connection lock poisoned".to_string()))
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        let conn = guard
            .as_mut()
            .ok_or_else(|| StoreError::StorageUnavailable("Project store is closed".to_string()))?;
        f(conn)
    }
}

fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("project_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}

fn unused_id(tx: &Transaction<'_>) -> Result<String, StoreError> {
    loop {
        let candidate = generate_id();
        let taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = ?)",
            [&candidate],
            |row| row.get(0),
        )?;
        if !taken {
            return Ok(candidate);
        }
    }
}

/// Raw JSON to typed snapshot, applying the legacy migration first.
fn decode(
    id: &str,
    data: &str,
    last_modified: i64,
) -> Result<ProjectSnapshot, serde_json::Error> {
    let raw: Value = serde_json::from_str(data)?;
    let record = legacy::migrate(raw, last_modified);
    serde_json::from_value(record).map_err(|e| {
        tracing::debug!(project_id = %id, "Failed to decode project record: {e}");
        e
    })
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn save(&self, mut snapshot: ProjectSnapshot) -> Result<String, StoreError> {
        snapshot.last_modified = Utc::now();
        let last_modified = snapshot.last_modified.timestamp_micros();

        let id = self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            if snapshot.id.is_empty() {
                snapshot.id = unused_id(&tx)?;
            }
            let data = serde_json::to_string(&snapshot)?;

            tx.execute(
                "INSERT INTO projects (id, name, last_modified, data)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     last_modified = excluded.last_modified,
                     data = excluded.data",
                params![snapshot.id, snapshot.name, last_modified, data],
            )?;
            tx.commit()?;

            Ok(snapshot.id)
        })?;

        tracing::debug!(project_id = %id, "Saved project");
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<ProjectSnapshot>, StoreError> {
        let row: Option<(String, i64)> = self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT data, last_modified FROM projects WHERE id = ?",
                    [id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(row)
        })?;

        let Some((data, last_modified)) = row else {
            return Ok(None);
        };

        decode(id, &data, last_modified)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                id: id.to_string(),
                source,
            })
    }

    async fn list_all(&self) -> Result<Vec<ProjectSnapshot>, StoreError> {
        let rows: Vec<(String, i64, String)> = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, last_modified, data
                 FROM projects
                 ORDER BY last_modified DESC",
            )?;

            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })?;

        let mut projects = Vec::with_capacity(rows.len());
        for (id, last_modified, data) in rows {
            let raw: Value = match serde_json::from_str(&data) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(project_id = %id, "Skipping unreadable project record: {e}");
                    continue;
                }
            };

            let record = legacy::migrate(raw, last_modified);
            if !legacy::is_structurally_valid(&record) {
                tracing::warn!(project_id = %id, "Skipping structurally invalid project record");
                continue;
            }

            match serde_json::from_value::<ProjectSnapshot>(record) {
                Ok(project) => projects.push(project),
                Err(e) => {
                    tracing::warn!(project_id = %id, "Skipping project record: {e}");
                }
            }
        }

        Ok(projects)
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, StoreError> {
        let removed = self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
            Ok(removed)
        })?;

        if removed == 0 {
            tracing::debug!(project_id = %id, "Delete requested for unknown project");
            Ok(DeleteOutcome::NotFound)
        } else {
            tracing::debug!(project_id = %id, "Deleted project");
            Ok(DeleteOutcome::Deleted)
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let removed = self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM projects", [])?;
            Ok(removed)
        })?;

        tracing::debug!("Cleared {} projects", removed);
        Ok(())
    }
}
