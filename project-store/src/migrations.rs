use rusqlite::Connection;

/// Create the projects table and its lookup indexes
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    // `data` holds the full JSON record; `name` and `last_modified` mirror it
    // for the indexes
    conn.execute(
        "CREATE TABLE IF NOT EXISTS projects (
            id VARCHAR PRIMARY KEY NOT NULL,
            name VARCHAR NOT NULL,
            last_modified BIGINT NOT NULL,
            data VARCHAR NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_projects_name
            ON projects(name)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_projects_last_modified
            ON projects(last_modified)",
        [],
    )?;

    Ok(())
}
