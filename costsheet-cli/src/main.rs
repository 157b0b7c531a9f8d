use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared_types::{IssueStatus, UpdateIssueRequest, UpdateTaskRequest};
use std::io::Write;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

use handlers::projects::TimelineSpec;

mod config;
mod handlers;
mod helpers;

#[derive(Parser, Debug)]
#[command(
    name = "costsheet",
    author,
    version,
    about = "Track project cost per period",
    long_about = None
)]
struct Cli {
    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file_path: Option<String>,

    /// Project database, overriding the config file
    #[arg(long, global = true, value_name = "PATH")]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a project with the default team and a one-week timeline
    New { name: String },

    /// List saved projects, most recently modified first
    List {
        /// Case-insensitive filter on the project name
        #[arg(long)]
        search: Option<String>,
    },

    /// Print the cost sheet of a project
    Show { id: String },

    /// Save a project snapshot read from a JSON file
    Import { file: PathBuf },

    /// Write a project snapshot as JSON
    Export {
        id: String,
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write the CSV cost report of a project
    Report {
        id: String,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Replace a project's timeline, dropping hours outside the new range
    Timeline {
        id: String,
        /// First day, YYYY-MM-DD
        #[arg(long, requires = "end", conflicts_with = "days")]
        start: Option<String>,
        /// Last day, YYYY-MM-DD
        #[arg(long, requires = "start")]
        end: Option<String>,
        /// Number of days starting today
        #[arg(long, required_unless_present = "start")]
        days: Option<u32>,
    },

    /// Append a period to a project's timeline or remove one
    Date {
        #[command(subcommand)]
        command: DateCommand,
    },

    /// Edit the tasks of a project
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Edit the resources of a project
    Resource {
        #[command(subcommand)]
        command: ResourceCommand,
    },

    /// Edit the issue log of a project
    Issue {
        #[command(subcommand)]
        command: IssueCommand,
    },

    /// Delete a project
    Delete { id: String },

    /// Delete every project
    Clear {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum DateCommand {
    /// Append the next label
    Add { id: String },
    /// Remove a label and the hours recorded on it
    Rm { id: String, label: String },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Append a task and print its id
    Add {
        id: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Change the name, fixed cost, duration or completion of a task
    Set {
        id: String,
        task: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        fixed_cost: Option<f64>,
        /// Days
        #[arg(long)]
        duration: Option<f64>,
        /// Percent, 0 to 100
        #[arg(long)]
        completion: Option<f64>,
    },
    /// Record hours worked on a timeline date; 0 clears it
    Hours {
        id: String,
        task: String,
        date: String,
        hours: f64,
    },
    /// Allocate hours of a resource to a task; 0 clears it
    Alloc {
        id: String,
        task: String,
        resource: String,
        hours: f64,
    },
    /// Remove a task
    Rm { id: String, task: String },
}

#[derive(Subcommand, Debug)]
enum ResourceCommand {
    /// Add a resource with an hourly rate
    Add { id: String, name: String, rate: f64 },
    /// Change the rate or name of a resource
    Set {
        id: String,
        name: String,
        #[arg(long)]
        rename: Option<String>,
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Remove a resource; allocations naming it stop counting
    Rm { id: String, name: String },
}

#[derive(Subcommand, Debug)]
enum IssueCommand {
    /// Log an issue and print its id
    Add {
        id: String,
        #[command(flatten)]
        fields: IssueFields,
    },
    /// Change the fields of an issue
    Set {
        id: String,
        issue: u32,
        #[command(flatten)]
        fields: IssueFields,
    },
    /// Remove an issue
    Rm { id: String, issue: u32 },
}

#[derive(Args, Debug)]
struct IssueFields {
    #[arg(long)]
    desc: Option<String>,
    #[arg(long)]
    owner: Option<String>,
    /// red, yellow or green
    #[arg(long)]
    status: Option<IssueStatus>,
    #[arg(long)]
    impact: Option<String>,
}

impl From<IssueFields> for UpdateIssueRequest {
    fn from(fields: IssueFields) -> Self {
        Self {
            desc: fields.desc,
            owner: fields.owner,
            status: fields.status,
            impact: fields.impact,
        }
    }
}

/// Returned guard flushes the log file when dropped.
fn init_tracing(log_file_path: Option<&str>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("costsheet.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file_path.as_deref());

    let (config, config_path) = config::CliConfig::load().context("Failed to load config")?;
    tracing::debug!("Loaded config from {:?}", config_path);

    let db_path = helpers::database::resolve_db_path(cli.db_path, &config)?;
    let store = helpers::database::initialize_store(&db_path)?;
    let currency = config.currency_symbol();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = run(cli.command, store.as_ref(), &currency, &mut out).await;

    out.flush()?;
    store.close().context("Failed to close project store")?;
    result
}

async fn run(
    command: Command,
    store: &project_store::SqliteProjectStore,
    currency: &str,
    out: &mut dyn Write,
) -> Result<()> {
    use handlers::{issues, projects, resources};

    match command {
        Command::New { name } => {
            projects::create(store, &name, out).await?;
        }
        Command::List { search } => {
            projects::list(store, search.as_deref(), currency, out).await?;
        }
        Command::Show { id } => projects::show(store, &id, currency, out).await?,
        Command::Import { file } => {
            projects::import(store, &file, out).await?;
        }
        Command::Export { id, output } => {
            projects::export(store, &id, output.as_deref(), out).await?
        }
        Command::Report { id, output } => {
            handlers::report::write_report(store, &id, &output, out).await?
        }
        Command::Timeline {
            id,
            start,
            end,
            days,
        } => {
            let spec = match (start, end, days) {
                (Some(start), Some(end), _) => TimelineSpec::Range { start, end },
                (_, _, Some(days)) => TimelineSpec::Days {
                    today: chrono::Local::now().date_naive(),
                    days,
                },
                _ => anyhow::bail!("Provide --start and --end, or --days"),
            };
            projects::set_timeline(store, &id, spec, out).await?
        }
        Command::Date { command } => match command {
            DateCommand::Add { id } => {
                projects::add_date(store, &id, out).await?;
            }
            DateCommand::Rm { id, label } => projects::remove_date(store, &id, &label, out).await?,
        },
        Command::Task { command } => run_task(command, store, out).await?,
        Command::Resource { command } => match command {
            ResourceCommand::Add { id, name, rate } => {
                resources::add(store, &id, &name, rate, out).await?
            }
            ResourceCommand::Set {
                id,
                name,
                rename,
                rate,
            } => resources::update(store, &id, &name, rename.as_deref(), rate, out).await?,
            ResourceCommand::Rm { id, name } => resources::remove(store, &id, &name, out).await?,
        },
        Command::Issue { command } => match command {
            IssueCommand::Add { id, fields } => {
                issues::add(store, &id, fields.into(), out).await?;
            }
            IssueCommand::Set { id, issue, fields } => {
                issues::update(store, &id, issue, fields.into(), out).await?
            }
            IssueCommand::Rm { id, issue } => issues::remove(store, &id, issue, out).await?,
        },
        Command::Delete { id } => projects::delete(store, &id, out).await?,
        Command::Clear { yes } => projects::clear(store, yes, out).await?,
    }

    Ok(())
}

async fn run_task(
    command: TaskCommand,
    store: &project_store::SqliteProjectStore,
    out: &mut dyn Write,
) -> Result<()> {
    use handlers::tasks;

    match command {
        TaskCommand::Add { id, name } => {
            tasks::add(store, &id, name.as_deref(), out).await?;
        }
        TaskCommand::Set {
            id,
            task,
            name,
            fixed_cost,
            duration,
            completion,
        } => {
            let update = UpdateTaskRequest {
                name,
                fixed_cost,
                duration,
                completion,
            };
            tasks::update(store, &id, &task, update, out).await?
        }
        TaskCommand::Hours {
            id,
            task,
            date,
            hours,
        } => tasks::set_hours(store, &id, &task, &date, hours, out).await?,
        TaskCommand::Alloc {
            id,
            task,
            resource,
            hours,
        } => tasks::set_allocation(store, &id, &task, &resource, hours, out).await?,
        TaskCommand::Rm { id, task } => tasks::remove(store, &id, &task, out).await?,
    }

    Ok(())
}
