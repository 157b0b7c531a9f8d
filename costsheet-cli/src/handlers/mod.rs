pub mod issues;
pub mod projects;
pub mod report;
pub mod resources;
pub mod tasks;
