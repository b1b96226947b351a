//! Repeat rules and next-date calculation
//!
//! A task stores its repeat rule as text. When the task is completed, or
//! saved with a date in the past, the rule is parsed and projected forward
//! from the task date to find the next date it is due.

pub mod calendar;
pub mod error;
pub mod parser;
pub mod generator;

pub use calendar::*;
pub use error::*;
pub use parser::*;
pub use generator::*;
