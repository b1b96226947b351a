use rusqlite::{Connection, OptionalExtension, Row};
use crate::models::Task;
use crate::recur::format_date;
use crate::utils::parse_search_date;
use anyhow::{Context, Result};

const SELECT_COLUMNS: &str = "SELECT id, date, title, comment, repeat FROM scheduler";

/// Task repository for database operations
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task and return it with its new ID
    pub fn create(conn: &Connection, task: &Task) -> Result<Task> {
        conn.execute(
            "INSERT INTO scheduler (date, title, comment, repeat) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![task.date, task.title, task.comment, task.repeat],
        )
        .with_context(|| format!("Failed to create task: {}", task.title))?;

        let id = conn.last_insert_rowid();
        log::debug!("Created task {} due {}", id, task.date);

        Ok(Task {
            id: Some(id),
            ..task.clone()
        })
    }

    /// Get task by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Task>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
        let task = stmt.query_row([id], Self::from_row).optional()?;
        Ok(task)
    }

    /// List tasks ordered by date, optionally filtered
    ///
    /// A search that parses as a date (YYYYMMDD or DD.MM.YYYY) matches tasks
    /// due on that date; anything else is a case-insensitive substring match
    /// on title or comment.
    pub fn list(conn: &Connection, limit: usize, search: Option<&str>) -> Result<Vec<Task>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let search = search.map(str::trim).filter(|s| !s.is_empty());

        let tasks = match search {
            None => {
                let mut stmt = conn.prepare(&format!(
                    "{} ORDER BY date, id LIMIT ?1",
                    SELECT_COLUMNS
                ))?;
                let rows = stmt.query_map([limit], Self::from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            Some(query) => match parse_search_date(query) {
                Some(date) => {
                    let mut stmt = conn.prepare(&format!(
                        "{} WHERE date = ?1 ORDER BY date, id LIMIT ?2",
                        SELECT_COLUMNS
                    ))?;
                    let rows = stmt.query_map(
                        rusqlite::params![format_date(date), limit],
                        Self::from_row,
                    )?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "{} WHERE instr(lower(title), lower(?1)) > 0
                            OR instr(lower(comment), lower(?1)) > 0
                         ORDER BY date, id LIMIT ?2",
                        SELECT_COLUMNS
                    ))?;
                    let rows = stmt.query_map(rusqlite::params![query, limit], Self::from_row)?;
                    rows.collect::<rusqlite::Result<Vec<_>>>()?
                }
            },
        };

        Ok(tasks)
    }

    /// Overwrite all fields of an existing task
    pub fn update(conn: &Connection, task: &Task) -> Result<()> {
        let id = task.id.ok_or_else(|| anyhow::anyhow!("Task has no ID"))?;
        let count = conn
            .execute(
                "UPDATE scheduler SET date = ?1, title = ?2, comment = ?3, repeat = ?4 WHERE id = ?5",
                rusqlite::params![task.date, task.title, task.comment, task.repeat, id],
            )
            .with_context(|| format!("Failed to update task {}", id))?;

        if count == 0 {
            anyhow::bail!("Task {} not found", id);
        }
        Ok(())
    }

    /// Move a task to a new date
    pub fn update_date(conn: &Connection, id: i64, date: &str) -> Result<()> {
        let count = conn
            .execute(
                "UPDATE scheduler SET date = ?1 WHERE id = ?2",
                rusqlite::params![date, id],
            )
            .with_context(|| format!("Failed to update date of task {}", id))?;

        if count == 0 {
            anyhow::bail!("Task {} not found", id);
        }
        log::debug!("Task {} moved to {}", id, date);
        Ok(())
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<()> {
        let count = conn
            .execute("DELETE FROM scheduler WHERE id = ?1", [id])
            .with_context(|| format!("Failed to delete task {}", id))?;

        if count == 0 {
            anyhow::bail!("Task {} not found", id);
        }
        log::debug!("Deleted task {}", id);
        Ok(())
    }

    fn from_row(row: &Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: Some(row.get(0)?),
            date: row.get(1)?,
            title: row.get(2)?,
            comment: row.get(3)?,
            repeat: row.get(4)?,
        })
    }
}
