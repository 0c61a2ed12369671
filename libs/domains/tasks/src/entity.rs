use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM Entity for Tasks table
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub deadline: Date,
    pub created_at: DateTimeUtc,
    pub completed: bool,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// Conversion from Sea-ORM Model to domain Task
impl From<Model> for crate::models::Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            deadline: model.deadline,
            created_at: model.created_at,
            completed: model.completed,
            completed_at: model.completed_at,
        }
    }
}

// Insert shape for a new task; the id is left to the database
impl From<crate::models::CreateTask> for ActiveModel {
    fn from(input: crate::models::CreateTask) -> Self {
        ActiveModel {
            id: NotSet,
            name: Set(input.name),
            description: Set(input.description),
            deadline: Set(input.deadline),
            created_at: Set(crate::models::now()),
            completed: Set(false),
            completed_at: Set(None),
        }
    }
}

impl ActiveModel {
    /// Only the columns an update touches; everything else stays `NotSet`.
    pub fn from_patch(patch: crate::models::UpdateTask, now: DateTimeUtc) -> Self {
        let (completed, completed_at) = match patch.completion(now) {
            Some((completed, completed_at)) => (Set(completed), Set(completed_at)),
            None => (NotSet, NotSet),
        };

        ActiveModel {
            id: NotSet,
            name: patch.name.map_or(NotSet, Set),
            description: patch.description.map_or(NotSet, |d| Set(Some(d))),
            deadline: patch.deadline.map_or(NotSet, Set),
            created_at: NotSet,
            completed,
            completed_at,
        }
    }
}
