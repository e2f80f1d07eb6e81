use crudkit::{CrudResource, MaxNumber, MergeIntoActiveModel, MinNumber, Validatable, ValidationErrors};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "notes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub priority: Option<i32>,
    pub creator_id: Option<i32>,
    pub last_updater_id: Option<i32>,
    pub owner_id: Option<i32>,
    pub last_update: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// What clients send on create and update.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NoteInput {
    pub title: String,
    #[serde(default)]
    pub priority: Option<i32>,
}

impl NoteInput {
    pub fn new(title: &str, priority: Option<i32>) -> Self {
        Self {
            title: title.to_string(),
            priority,
        }
    }
}

impl From<NoteInput> for ActiveModel {
    fn from(input: NoteInput) -> Self {
        Self {
            title: Set(input.title),
            priority: Set(input.priority),
            ..Default::default()
        }
    }
}

impl MergeIntoActiveModel<ActiveModel> for NoteInput {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        existing.title = Set(self.title);
        existing.priority = Set(self.priority);
        Ok(existing)
    }
}

impl Validatable for NoteInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(MinNumber::new(1).check("priority", self.priority));
        errors.check(MaxNumber::new(5).check("priority", self.priority));
        errors.result()
    }
}

/// What clients get back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i32,
    pub title: String,
    pub priority: Option<i32>,
    pub owner_id: Option<i32>,
    pub last_update: Option<DateTimeUtc>,
}

impl From<Model> for Note {
    fn from(model: Model) -> Self {
        Note {
            id: model.id,
            title: model.title,
            priority: model.priority,
            owner_id: model.owner_id,
            last_update: model.last_update,
        }
    }
}

impl CrudResource for Note {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Row = Model;
    type Model = NoteInput;
    type Element = Note;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME: &'static str = "Note";

    fn sortable_columns() -> Vec<Self::ColumnType> {
        vec![Column::Id, Column::Title, Column::Priority, Column::LastUpdate]
    }
}
