//! tasksched - a task scheduler with repeat rules
//!
//! This library provides the core functionality for tasksched, including:
//! - The repeat-rule engine that computes a task's next due date
//! - Configuration loading
//! - Database operations and migrations
//! - Task model and repository
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use tasksched::recur::next_date;
//!
//! let now = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! assert_eq!(next_date(now, "20240101", "d 7").unwrap(), "20240115");
//! ```

pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod recur;
pub mod repo;
pub mod utils;
