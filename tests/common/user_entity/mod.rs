use crudkit::{
    AuditColumns, CrudResource, MergeIntoActiveModel, Validatable, ValidationError,
    ValidationErrors,
};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserInput {
    pub name: String,
}

impl From<UserInput> for ActiveModel {
    fn from(input: UserInput) -> Self {
        Self {
            name: Set(input.name),
            ..Default::default()
        }
    }
}

impl MergeIntoActiveModel<ActiveModel> for UserInput {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        existing.name = Set(self.name);
        Ok(existing)
    }
}

impl Validatable for UserInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add(ValidationError::new("name", "Name is required"));
        }
        errors.result()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
        }
    }
}

impl CrudResource for User {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;
    type Row = Model;
    type Model = UserInput;
    type Element = User;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const RESOURCE_NAME: &'static str = "User";

    fn audit_columns() -> AuditColumns {
        AuditColumns::none()
    }
}
