// Core data models for tasksched

pub mod task;

pub use task::*;
