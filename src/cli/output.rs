// Output formatting utilities

use crate::models::Task;
use crate::recur::{parse_date, RecurrenceRule};

/// Render a stored YYYYMMDD date as YYYY-MM-DD, or as-is if it does not parse
pub fn format_display_date(date: &str) -> String {
    match parse_date(date) {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => date.to_string(),
    }
}

/// Describe a stored repeat rule for humans
pub fn format_repeat(repeat: &str) -> String {
    if repeat.trim().is_empty() {
        return "(none)".to_string();
    }
    match RecurrenceRule::parse(repeat) {
        Ok(rule) => format!("{} ({})", repeat, rule.describe()),
        Err(e) => format!("{} (invalid: {})", repeat, e),
    }
}

/// Format tasks as an aligned table
pub fn format_task_list_table(tasks: &[Task]) -> String {
    let rows: Vec<[String; 4]> = tasks
        .iter()
        .map(|task| {
            [
                task.id.map(|id| id.to_string()).unwrap_or_default(),
                format_display_date(&task.date),
                task.title.clone(),
                task.repeat.clone(),
            ]
        })
        .collect();

    let headers = ["ID", "Due", "Title", "Repeat"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header_line = format_row(&headers.map(String::from), &widths);
    output.push_str(&header_line);
    output.push('\n');
    output.push_str(&"-".repeat(header_line.chars().count()));
    output.push('\n');
    for row in &rows {
        output.push_str(&format_row(row, &widths));
        output.push('\n');
    }
    output
}

fn format_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let line = format!(
        "{:>w0$}  {:<w1$}  {:<w2$}  {}",
        cells[0], cells[1], cells[2], cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
    line.trim_end().to_string()
}

/// Format a detailed summary of one task
pub fn format_task_summary(task: &Task) -> String {
    let mut output = String::new();

    let header = format!("Task {}: {}",
        task.id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string()),
        task.title);
    output.push_str(&header);
    output.push('\n');
    output.push_str(&"=".repeat(header.chars().count().max(40)));
    output.push_str("\n\n");

    output.push_str(&format!("  Due:      {}\n", format_display_date(&task.date)));
    output.push_str(&format!("  Repeat:   {}\n", format_repeat(&task.repeat)));
    if task.comment.is_empty() {
        output.push_str("  Comment:  (none)\n");
    } else {
        output.push_str(&format!("  Comment:  {}\n", task.comment));
    }

    output
}
