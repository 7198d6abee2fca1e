use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: i64,
}

impl TodoItem {
    /// Creates an incomplete item with a fresh session-unique id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoListSnapshot {
    pub items: Vec<TodoItem>,
    pub pending_submission: bool,
}

/// Notifications broadcast to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum TodoEvent {
    /// The list or the pending flag changed; carries the full snapshot.
    ListChanged(TodoListSnapshot),

    /// An optimistic insert was rolled back after its submission failed.
    SubmissionFailed { message: String },
}
