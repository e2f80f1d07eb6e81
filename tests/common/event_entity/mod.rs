//! An entity whose audit columns use the less common column types.

use crudkit::{CrudResource, MergeIntoActiveModel, Validatable, ValidationErrors};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub creator_id: Option<i64>,
    pub last_updater_id: Option<i64>,
    // Text column, never stamped
    pub owner_id: Option<String>,
    // Declared as an integer column but held as i64, so no candidate value fits
    #[sea_orm(column_type = "Integer")]
    pub user_id: Option<i64>,
    pub last_update: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EventInput {
    pub name: String,
}

impl EventInput {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl From<EventInput> for ActiveModel {
    fn from(input: EventInput) -> Self {
        Self {
            name: Set(input.name),
            ..Default::default()
        }
    }
}

impl MergeIntoActiveModel<ActiveModel> for EventInput {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        existing.name = Set(self.name);
        Ok(existing)
    }
}

impl Validatable for EventInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

pub struct Event;

impl CrudResource for Event {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Row = Model;
    type Model = EventInput;
    type Element = Model;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME: &'static str = "Event";
}
