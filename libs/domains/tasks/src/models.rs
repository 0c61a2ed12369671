use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Current time at the precision every supported backend can store (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Rejects deadlines earlier than today (UTC).
fn validate_deadline(deadline: &NaiveDate) -> Result<(), ValidationError> {
    if *deadline < Utc::now().date_naive() {
        return Err(ValidationError::new("deadline_in_past")
            .with_message("Deadline cannot be in the past".into()));
    }
    Ok(())
}

/// Task entity - a to-do item with a deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct Task {
    /// Unique identifier, assigned by the store and never reused
    pub id: i32,
    /// Task name
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Calendar date the task is due
    #[ts(as = "String")]
    pub deadline: NaiveDate,
    /// Creation timestamp
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Whether the task is completed
    pub completed: bool,
    /// When the task was last marked completed; `None` while incomplete
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// DTO for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[ts(as = "String")]
    #[validate(custom(function = "validate_deadline"))]
    pub deadline: NaiveDate,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Partial update for an existing task.
///
/// Every field is optional: `None` leaves the stored value untouched. A JSON
/// `null` and an omitted key both deserialize to `None`, so a description
/// cannot be cleared through this type.
///
/// `completed_at` is not accepted; it is derived from `completed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[ts(as = "Option<String>")]
    #[validate(custom(function = "validate_deadline"))]
    pub deadline: Option<NaiveDate>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// True when the patch carries no field to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.deadline.is_none()
            && self.description.is_none()
            && self.completed.is_none()
    }

    /// `(completed, completed_at)` to write when the patch carries `completed`
    pub fn completion(&self, now: DateTime<Utc>) -> Option<(bool, Option<DateTime<Utc>>)> {
        self.completed.map(|completed| (completed, completed.then_some(now)))
    }
}

/// Query filters for listing tasks
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TaskFilter {
    /// Restrict to completed (`true`) or open (`false`) tasks
    pub completed: Option<bool>,
}

/// Task collection response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub total_count: usize,
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self {
            total_count: tasks.len(),
            tasks,
        }
    }
}

impl Task {
    /// Build a fresh, incomplete task
    pub fn new(id: i32, input: CreateTask, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            deadline: input.deadline,
            created_at,
            completed: false,
            completed_at: None,
        }
    }

    /// Merge a patch into this task.
    ///
    /// When `completed` is present, `completed_at` is rewritten with it:
    /// `now` for `true` (even if the task was already completed), `None` for `false`.
    pub fn apply_update(&mut self, update: UpdateTask, now: DateTime<Utc>) {
        if let Some((completed, completed_at)) = update.completion(now) {
            self.completed = completed;
            self.completed_at = completed_at;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(deadline) = update.deadline {
            self.deadline = deadline;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
    }
}
