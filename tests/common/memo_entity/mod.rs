use crudkit::{CrudResource, MergeIntoActiveModel, Validatable, ValidationErrors};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "memos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub body: String,
    pub last_updater_id: Option<i32>,
    pub last_update: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MemoInput {
    pub body: String,
}

impl MemoInput {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

impl From<MemoInput> for ActiveModel {
    fn from(input: MemoInput) -> Self {
        Self {
            body: Set(input.body),
            ..Default::default()
        }
    }
}

impl MergeIntoActiveModel<ActiveModel> for MemoInput {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        existing.body = Set(self.body);
        Ok(existing)
    }
}

impl Validatable for MemoInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Ok(())
    }
}

pub struct Memo;

impl CrudResource for Memo {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Row = Model;
    type Model = MemoInput;
    type Element = Model;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME: &'static str = "Memo";
}
