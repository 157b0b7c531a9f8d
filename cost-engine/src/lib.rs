//! Cost Engine
//!
//! Derives task, per-period and cumulative project cost from resources, tasks
//! and the timeline. Nothing here is persisted and nothing here fails: bad
//! references (an allocation naming a missing resource) contribute zero.
//!
//! # Example
//!
//! ```rust,ignore
//! use cost_engine::{cumulative_costs, period_costs};
//!
//! let periods = period_costs(&project.tasks, &project.resources, &project.timeline_dates);
//! let running = cumulative_costs(&periods);
//! ```

pub mod costs;
pub mod report;
pub mod sheet;

pub use costs::{cumulative_costs, period_costs, task_cost};
pub use report::{write_csv, ReportError};
pub use sheet::{project_summary, round_display, CostSheet, ProjectSummary, TaskCostRow};
