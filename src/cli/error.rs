// Error handling utilities for consistent error messages and exit codes

use std::process;
use crate::recur::RecurError;

/// Exit code for invalid input, missing tasks and rejected repeat rules
pub const EXIT_USER_ERROR: i32 = 1;
/// Exit code for unexpected failures (database, filesystem)
pub const EXIT_INTERNAL_ERROR: i32 = 2;

/// Exit with a user error (exit code 1)
/// User errors are for invalid input, missing resources, etc.
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(EXIT_USER_ERROR);
}

/// True if the error chain contains a rejected date or repeat rule
pub fn is_user_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<RecurError>())
}

/// Report an error from `run` and return the matching exit code
pub fn report_error(err: &anyhow::Error) -> i32 {
    if is_user_error(err) {
        eprintln!("Error: {:#}", err);
        return EXIT_USER_ERROR;
    }

    eprintln!("Internal error: {}", err);
    let mut source = err.source();
    if source.is_some() {
        eprintln!("\nCaused by:");
        let mut indent = 1;
        while let Some(cause) = source {
            eprintln!("{:indent$}  {}", "", cause);
            source = cause.source();
            indent += 1;
        }
    }
    EXIT_INTERNAL_ERROR
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a task ID is valid (positive integer)
pub fn validate_task_id(id_str: &str) -> Result<i64, String> {
    id_str.parse::<i64>()
        .map_err(|_| format!("Invalid task ID: '{}'. Task ID must be a number.", id_str))
        .and_then(|id| {
            if id > 0 {
                Ok(id)
            } else {
                Err(format!("Invalid task ID: {}. Task ID must be positive.", id))
            }
        })
}
