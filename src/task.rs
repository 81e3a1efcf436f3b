//! Task data structure and its human-readable rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tracked unit of work.
///
/// Serialises to `{"id": 1, "description": "...", "completed": false}`, the
/// element format of the backing JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    pub completed: bool,
}

impl Task {
    /// Create a new, not yet completed task.
    pub fn new(id: u64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
        }
    }

    /// Checkbox glyph used in listings.
    pub fn status_mark(&self) -> &'static str {
        if self.completed { "✔" } else { " " }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] #{}: {}", self.status_mark(), self.id, self.description)
    }
}
