pub mod database;
pub mod format;
