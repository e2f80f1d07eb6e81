use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, FromQueryResult,
    IdenStatic, IntoActiveModel, Iterable, ModelTrait,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::validation::Validatable;

/// Field-to-field mapping of an input payload onto a stored row.
pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this payload into an existing active model
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// Names of the columns the repository fills in on its own.
///
/// A name that does not match any column of the entity is ignored, so entities
/// only carry the audit columns they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditColumns {
    pub creator: Option<&'static str>,
    pub last_updater: Option<&'static str>,
    pub user: Option<&'static str>,
    pub owner: Option<&'static str>,
    pub last_update: Option<&'static str>,
}

impl AuditColumns {
    /// Columns set to the acting user's id on insert.
    #[must_use]
    pub fn on_insert(&self) -> Vec<&'static str> {
        [self.creator, self.last_updater, self.user, self.owner]
            .into_iter()
            .flatten()
            .collect()
    }

    /// No automatic columns at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            creator: None,
            last_updater: None,
            user: None,
            owner: None,
            last_update: None,
        }
    }
}

impl Default for AuditColumns {
    fn default() -> Self {
        Self {
            creator: Some("creator_id"),
            last_updater: Some("last_updater_id"),
            user: Some("user_id"),
            owner: Some("owner_id"),
            last_update: Some("last_update"),
        }
    }
}

/// Binds a Sea-ORM entity to the payload shapes served over HTTP.
///
/// `Model` is what clients send (create and update), `Element` is what they get
/// back. Rows are identified by an `i32` stored in [`CrudResource::ID_COLUMN`].
pub trait CrudResource: Send + Sync + 'static {
    type EntityType: EntityTrait<Model = Self::Row, Column = Self::ColumnType> + Sync;
    type ColumnType: ColumnTrait + Copy + std::fmt::Debug + Send + Sync;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + Send
        + Sync;
    type Row: ModelTrait<Entity = Self::EntityType>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModelType>
        + Clone
        + std::fmt::Debug
        + Send
        + Sync;
    type Model: Into<Self::ActiveModelType>
        + MergeIntoActiveModel<Self::ActiveModelType>
        + Validatable
        + DeserializeOwned
        + Send
        + Sync;
    type Element: From<Self::Row> + Serialize + Send + Sync;

    const ID_COLUMN: Self::ColumnType;
    /// Display name of the entity, e.g. `"Note"`.
    const RESOURCE_NAME: &'static str;

    /// Columns a list may be ordered by. Every column by default.
    #[must_use]
    fn sortable_columns() -> Vec<Self::ColumnType> {
        Self::ColumnType::iter().collect()
    }

    #[must_use]
    fn audit_columns() -> AuditColumns {
        AuditColumns::default()
    }
}

/// Find a column of `R` by its exact database name.
pub(crate) fn column_named<R: CrudResource>(name: &str) -> Option<R::ColumnType> {
    R::ColumnType::iter().find(|column| column.as_str() == name)
}
