use serde::{Deserialize, Serialize};

/// Task model
///
/// `date` is the next due date in YYYYMMDD format. An empty `repeat` marks a
/// one-off task that is removed when completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repeat: String,
}

impl Task {
    /// Create a new, unsaved task
    pub fn new(title: String, date: String) -> Self {
        Self {
            id: None,
            date,
            title,
            comment: String::new(),
            repeat: String::new(),
        }
    }

    pub fn is_repeating(&self) -> bool {
        !self.repeat.trim().is_empty()
    }
}
