use clap::{Parser, Subcommand};
use rusqlite::Connection;
use crate::config::Config;
use crate::db::DbConnection;
use crate::models::Task;
use crate::repo::TaskRepo;
use crate::recur::{next_date, parse_date, resolve_due_date};
use crate::cli::output::{format_task_list_table, format_task_summary};
use crate::cli::error::{user_error, validate_non_empty, validate_task_id};
use crate::utils::today;
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "tasksched")]
#[command(about = "Task scheduler with repeat rules")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Due date (YYYYMMDD or "today"; defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Free-form comment
        #[arg(long)]
        comment: Option<String>,
        /// Repeat rule (e.g. "d 7", "y", "w 1,5", "m 1,-1 3,6")
        #[arg(long, allow_hyphen_values = true)]
        repeat: Option<String>,
        /// Task title
        title: Vec<String>,
    },
    /// List tasks ordered by due date
    List {
        /// Text or date (YYYYMMDD or DD.MM.YYYY) to search for
        search: Vec<String>,
        /// Maximum number of tasks to show
        #[arg(long)]
        limit: Option<usize>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show a task
    Show {
        /// Task ID
        id: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Modify a task
    Modify {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New due date (YYYYMMDD or "today")
        #[arg(long)]
        date: Option<String>,
        /// New comment
        #[arg(long)]
        comment: Option<String>,
        /// New repeat rule (empty string removes it)
        #[arg(long, allow_hyphen_values = true)]
        repeat: Option<String>,
    },
    /// Complete a task: repeating tasks move to their next date, others are removed
    Done {
        /// Task ID
        id: String,
    },
    /// Permanently delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Compute the next date for a repeat rule
    NextDate {
        /// Task date (YYYYMMDD)
        #[arg(long)]
        date: String,
        /// Repeat rule
        #[arg(long, allow_hyphen_values = true)]
        repeat: String,
        /// Reference date (YYYYMMDD); defaults to today
        #[arg(long)]
        now: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Add { date, comment, repeat, title } => {
            handle_task_add(title, date, comment, repeat)
        }
        Commands::List { search, limit, json } => handle_task_list(search, limit, json),
        Commands::Show { id, json } => handle_task_show(id, json),
        Commands::Modify { id, title, date, comment, repeat } => {
            handle_task_modify(id, title, date, comment, repeat)
        }
        Commands::Done { id } => handle_task_done(id),
        Commands::Delete { id } => handle_task_delete(id),
        Commands::NextDate { date, repeat, now } => handle_next_date(date, repeat, now),
    }
}

fn connect() -> Result<(Config, Connection)> {
    let config = Config::load().context("Failed to load configuration")?;
    let conn = DbConnection::connect(&config)
        .context("Failed to connect to database")?;
    Ok((config, conn))
}

/// Fetch a task by its ID argument, exiting with a user error if it does not exist
fn load_task(conn: &Connection, id_str: &str) -> Result<Task> {
    let task_id = validate_task_id(id_str).unwrap_or_else(|e| user_error(&e));
    match TaskRepo::get_by_id(conn, task_id)? {
        Some(task) => Ok(task),
        None => user_error(&format!("Task {} not found", task_id)),
    }
}

fn handle_task_add(
    title: Vec<String>,
    date: Option<String>,
    comment: Option<String>,
    repeat: Option<String>,
) -> Result<()> {
    let title = title.join(" ");
    if let Err(e) = validate_non_empty(&title, "Task title") {
        user_error(&e);
    }

    let repeat = repeat.unwrap_or_default().trim().to_string();
    let due = resolve_due_date(today(), date.as_deref(), &repeat)?;

    let (_config, conn) = connect()?;

    let mut task = Task::new(title.trim().to_string(), due);
    task.comment = comment.unwrap_or_default();
    task.repeat = repeat;

    let created = TaskRepo::create(&conn, &task)?;
    println!(
        "Created task {} due {}",
        created.id.unwrap_or_default(),
        created.date
    );

    Ok(())
}

fn handle_task_list(search: Vec<String>, limit: Option<usize>, json: bool) -> Result<()> {
    let (config, conn) = connect()?;

    let limit = limit.unwrap_or(config.list_limit);
    if limit == 0 {
        user_error("Limit must be greater than 0");
    }

    let search = search.join(" ");
    let search = if search.trim().is_empty() { None } else { Some(search.as_str()) };

    let tasks = TaskRepo::list(&conn, limit, search)
        .context("Failed to list tasks")?;

    if json {
        let body = serde_json::json!({ "tasks": tasks });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    print!("{}", format_task_list_table(&tasks));
    Ok(())
}

fn handle_task_show(id: String, json: bool) -> Result<()> {
    let (_config, conn) = connect()?;
    let task = load_task(&conn, &id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        print!("{}", format_task_summary(&task));
    }
    Ok(())
}

fn handle_task_modify(
    id: String,
    title: Option<String>,
    date: Option<String>,
    comment: Option<String>,
    repeat: Option<String>,
) -> Result<()> {
    let (_config, conn) = connect()?;
    let mut task = load_task(&conn, &id)?;

    if let Some(title) = title {
        if let Err(e) = validate_non_empty(&title, "Task title") {
            user_error(&e);
        }
        task.title = title.trim().to_string();
    }
    if let Some(comment) = comment {
        task.comment = comment;
    }
    if let Some(repeat) = repeat {
        task.repeat = repeat.trim().to_string();
    }

    let date = date.unwrap_or_else(|| task.date.clone());
    task.date = resolve_due_date(today(), Some(date.as_str()), &task.repeat)?;

    TaskRepo::update(&conn, &task)?;
    println!("Modified task {} (due {})", task.id.unwrap_or_default(), task.date);

    Ok(())
}

fn handle_task_done(id: String) -> Result<()> {
    let (_config, conn) = connect()?;
    let task = load_task(&conn, &id)?;
    let task_id = task.id.ok_or_else(|| anyhow::anyhow!("Task has no ID"))?;

    if !task.is_repeating() {
        TaskRepo::delete(&conn, task_id)?;
        log::info!("Completed one-off task {}", task_id);
        println!("Completed task {}: {} (removed)", task_id, task.title);
        return Ok(());
    }

    let next = next_date(today(), &task.date, &task.repeat)
        .with_context(|| format!("Cannot reschedule task {}", task_id))?;
    TaskRepo::update_date(&conn, task_id, &next)?;

    log::info!("Completed task {}, next due {}", task_id, next);
    println!("Completed task {}: {} (next due {})", task_id, task.title, next);
    Ok(())
}

fn handle_task_delete(id: String) -> Result<()> {
    let (_config, conn) = connect()?;
    let task = load_task(&conn, &id)?;
    let task_id = task.id.ok_or_else(|| anyhow::anyhow!("Task has no ID"))?;

    TaskRepo::delete(&conn, task_id)?;
    println!("Deleted task {}: {}", task_id, task.title);
    Ok(())
}

fn handle_next_date(date: String, repeat: String, now: Option<String>) -> Result<()> {
    let now = match now {
        Some(text) => parse_date(&text).unwrap_or_else(|| {
            user_error(&format!("Invalid 'now' date '{}': expected YYYYMMDD", text))
        }),
        None => today(),
    };

    let next = next_date(now, &date, &repeat)?;
    println!("{}", next);
    Ok(())
}
