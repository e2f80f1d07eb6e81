//! # Generic Repository
//!
//! [`Repository`] wraps the Sea-ORM operations for one [`CrudResource`]. Each
//! write is committed before the call returns: single-row writes run on the
//! connection directly, range writes share one transaction that is committed at
//! the end.
//!
//! The `*_as` variants act on behalf of a [`CurrentUser`] and fill in the
//! entity's audit columns (creator, last updater, user, owner) with that
//! user's id. Every update stamps the `last_update` column when the entity has
//! one.

use std::collections::HashMap;
use std::marker::PhantomData;

use chrono::{Local, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ColumnType, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IdenStatic, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, Value,
};

use crate::errors::ApiError;
use crate::logger::ActionLogger;
use crate::order::OrderDirection;
use crate::resource::{CrudResource, MergeIntoActiveModel, column_named};
use crate::session::CurrentUser;

pub struct Repository<R: CrudResource> {
    db: DatabaseConnection,
    logger: ActionLogger,
    _resource: PhantomData<fn() -> R>,
}

impl<R: CrudResource> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            logger: self.logger,
            _resource: PhantomData,
        }
    }
}

impl<R: CrudResource> Repository<R> {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            logger: ActionLogger::new(R::RESOURCE_NAME),
            _resource: PhantomData,
        }
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    #[must_use]
    pub fn logger(&self) -> &ActionLogger {
        &self.logger
    }

    /// `"{Entity} Service"`
    #[must_use]
    pub fn service(&self) -> String {
        self.logger.service()
    }

    /// `"{action} {Entity}"`
    #[must_use]
    pub fn event(&self, action: &str) -> String {
        self.logger.event(action)
    }

    /// `"{Entity} does not exist"`
    #[must_use]
    pub fn entity_error_message(&self) -> String {
        self.logger.entity_error_message()
    }

    /// The event as one PascalCase word, e.g. `"CreateNote"`.
    #[must_use]
    pub fn notification_action(&self, action: &str) -> String {
        self.logger.notification_action(action)
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    /// Insert a row.
    ///
    /// # Errors
    ///
    /// Database errors from the insert.
    pub async fn add(&self, active: R::ActiveModelType) -> Result<R::Row, ApiError> {
        let row = active.insert(&self.db).await?;
        self.log_write(None, "add", &row);
        Ok(row)
    }

    /// Map a payload onto a new row and insert it.
    ///
    /// # Errors
    ///
    /// Database errors from the insert.
    pub async fn add_mapped<T>(&self, model: T) -> Result<R::Row, ApiError>
    where
        T: Into<R::ActiveModelType> + Send,
    {
        self.add(model.into()).await
    }

    /// Insert a row on behalf of `user`, filling in its audit columns.
    ///
    /// # Errors
    ///
    /// An internal error when `user` does not exist in the user resource `U`,
    /// database errors from the insert.
    pub async fn add_as<U: CrudResource>(
        &self,
        user: &CurrentUser,
        mut active: R::ActiveModelType,
    ) -> Result<R::Row, ApiError> {
        user.load::<U>(&self.db).await?;
        stamp_creation::<R>(&mut active, user);
        let row = active.insert(&self.db).await?;
        self.log_write(Some(user), "add", &row);
        Ok(row)
    }

    /// # Errors
    ///
    /// See [`Repository::add_as`].
    pub async fn add_mapped_as<U, T>(&self, user: &CurrentUser, model: T) -> Result<R::Row, ApiError>
    where
        U: CrudResource,
        T: Into<R::ActiveModelType> + Send,
    {
        self.add_as::<U>(user, model.into()).await
    }

    /// Insert several rows in one transaction.
    ///
    /// # Errors
    ///
    /// Database errors; nothing is stored when any insert fails.
    pub async fn add_range<I>(&self, actives: I) -> Result<Vec<R::Row>, ApiError>
    where
        I: IntoIterator<Item = R::ActiveModelType> + Send,
        I::IntoIter: Send,
    {
        self.insert_all(None, actives).await
    }

    /// # Errors
    ///
    /// See [`Repository::add_range`].
    pub async fn add_range_mapped<T>(&self, models: Vec<T>) -> Result<Vec<R::Row>, ApiError>
    where
        T: Into<R::ActiveModelType> + Send,
    {
        self.insert_all(None, models.into_iter().map(Into::into)).await
    }

    /// Insert several rows on behalf of `user`, each with its audit columns set.
    ///
    /// # Errors
    ///
    /// See [`Repository::add_as`] and [`Repository::add_range`].
    pub async fn add_range_as<U, I>(&self, user: &CurrentUser, actives: I) -> Result<Vec<R::Row>, ApiError>
    where
        U: CrudResource,
        I: IntoIterator<Item = R::ActiveModelType> + Send,
        I::IntoIter: Send,
    {
        user.load::<U>(&self.db).await?;
        self.insert_all(Some(user), actives).await
    }

    /// # Errors
    ///
    /// See [`Repository::add_range_as`].
    pub async fn add_range_mapped_as<U, T>(
        &self,
        user: &CurrentUser,
        models: Vec<T>,
    ) -> Result<Vec<R::Row>, ApiError>
    where
        U: CrudResource,
        T: Into<R::ActiveModelType> + Send,
    {
        user.load::<U>(&self.db).await?;
        self.insert_all(Some(user), models.into_iter().map(Into::into))
            .await
    }

    async fn insert_all<I>(&self, user: Option<&CurrentUser>, actives: I) -> Result<Vec<R::Row>, ApiError>
    where
        I: IntoIterator<Item = R::ActiveModelType> + Send,
        I::IntoIter: Send,
    {
        let txn = self.db.begin().await?;
        let mut rows = Vec::new();
        for mut active in actives {
            if let Some(user) = user {
                stamp_creation::<R>(&mut active, user);
            }
            rows.push(active.insert(&txn).await?);
        }
        self.complete(txn).await?;
        self.log_range(user, "add", &rows);
        Ok(rows)
    }

    // ------------------------------------------------------------------
    // Get
    // ------------------------------------------------------------------

    /// # Errors
    ///
    /// Database errors from the lookup.
    pub async fn get(&self, id: i32) -> Result<Option<R::Row>, ApiError> {
        Ok(find_by_id::<R, _>(&self.db, id).await?)
    }

    /// # Errors
    ///
    /// Database errors from the lookup.
    pub async fn get_as<T: From<R::Row>>(&self, id: i32) -> Result<Option<T>, ApiError> {
        Ok(self.get(id).await?.map(T::from))
    }

    /// # Errors
    ///
    /// Database errors from the query.
    pub async fn get_all(&self) -> Result<Vec<R::Row>, ApiError> {
        Ok(R::EntityType::find().all(&self.db).await?)
    }

    /// # Errors
    ///
    /// Database errors from the query.
    pub async fn get_all_as<T: From<R::Row>>(&self) -> Result<Vec<T>, ApiError> {
        Ok(map_all(self.get_all().await?))
    }

    /// Rows matching `condition` in id order, skipping the first `skip` and
    /// returning at most `count` of the rest.
    ///
    /// Skip comes before count, so `count = 2, skip = 1` is the second and
    /// third row, not the second row of the first two.
    ///
    /// # Errors
    ///
    /// Database errors from the query.
    pub async fn get_list(
        &self,
        condition: Condition,
        count: Option<u64>,
        skip: Option<u64>,
    ) -> Result<Vec<R::Row>, ApiError> {
        Ok(R::EntityType::find()
            .filter(condition)
            .order_by_asc(R::ID_COLUMN)
            .offset(skip)
            .limit(page_limit(count, skip))
            .all(&self.db)
            .await?)
    }

    /// # Errors
    ///
    /// Database errors from the query.
    pub async fn get_list_as<T: From<R::Row>>(
        &self,
        condition: Condition,
        count: Option<u64>,
        skip: Option<u64>,
    ) -> Result<Vec<T>, ApiError> {
        Ok(map_all(self.get_list(condition, count, skip).await?))
    }

    /// All rows ordered by the column named `order_by`.
    ///
    /// `direction` is `"asc"`, `"desc"` or `"none"`. The column name is matched
    /// ignoring case and underscores, so `CreatorId` finds `creator_id`.
    ///
    /// # Errors
    ///
    /// Bad request when `order_by` is empty, names no sortable column, or when
    /// `direction` is not one of the three values.
    pub async fn get_ordered_all(&self, order_by: &str, direction: &str) -> Result<Vec<R::Row>, ApiError> {
        if order_by.trim().is_empty() {
            return Err(ApiError::bad_request("Order by value is empty or null"));
        }
        let column = resolve_sort_column::<R>(order_by)
            .ok_or_else(|| ApiError::bad_request("Property does not exist"))?;
        let direction: OrderDirection = direction
            .parse()
            .map_err(|_| ApiError::bad_request("Ordering direction does not exist"))?;

        match direction.to_order() {
            Some(order) => Ok(R::EntityType::find()
                .order_by(column, order)
                .all(&self.db)
                .await?),
            None => self.get_all().await,
        }
    }

    /// # Errors
    ///
    /// See [`Repository::get_ordered_all`].
    pub async fn get_ordered_all_as<T: From<R::Row>>(
        &self,
        order_by: &str,
        direction: &str,
    ) -> Result<Vec<T>, ApiError> {
        Ok(map_all(self.get_ordered_all(order_by, direction).await?))
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Write every column of `row` back and stamp `last_update`.
    ///
    /// # Errors
    ///
    /// Not found when the row no longer exists, database errors otherwise.
    pub async fn update(&self, row: R::Row) -> Result<R::Row, ApiError> {
        let updated = self.save_row(&self.db, row, None).await?;
        self.log_write(None, "update", &updated);
        Ok(updated)
    }

    /// [`Repository::update`] on behalf of `user`, also setting the last updater.
    ///
    /// # Errors
    ///
    /// See [`Repository::update`]; an internal error when `user` does not exist.
    pub async fn update_as<U: CrudResource>(&self, user: &CurrentUser, row: R::Row) -> Result<R::Row, ApiError> {
        user.load::<U>(&self.db).await?;
        let updated = self.save_row(&self.db, row, Some(user)).await?;
        self.log_write(Some(user), "update", &updated);
        Ok(updated)
    }

    /// Merge `model` into the stored row with `id` and save it.
    ///
    /// # Errors
    ///
    /// Not found ("{Entity} does not exist") when `id` is unknown.
    pub async fn update_by_id<T>(&self, id: i32, model: T) -> Result<R::Row, ApiError>
    where
        T: MergeIntoActiveModel<R::ActiveModelType> + Send,
    {
        let updated = self.merge_and_save(&self.db, None, id, model).await?;
        self.log_write(None, "update", &updated);
        Ok(updated)
    }

    /// # Errors
    ///
    /// See [`Repository::update_by_id`]; an internal error when `user` does not exist.
    pub async fn update_by_id_as<U, T>(&self, user: &CurrentUser, id: i32, model: T) -> Result<R::Row, ApiError>
    where
        U: CrudResource,
        T: MergeIntoActiveModel<R::ActiveModelType> + Send,
    {
        user.load::<U>(&self.db).await?;
        let updated = self.merge_and_save(&self.db, Some(user), id, model).await?;
        self.log_write(Some(user), "update", &updated);
        Ok(updated)
    }

    /// Save several rows in one transaction.
    ///
    /// # Errors
    ///
    /// Not found or database errors; nothing is stored when any update fails.
    pub async fn update_range(&self, rows: Vec<R::Row>) -> Result<Vec<R::Row>, ApiError> {
        let txn = self.db.begin().await?;
        let mut updated = Vec::with_capacity(rows.len());
        for row in rows {
            updated.push(self.save_row(&txn, row, None).await?);
        }
        self.complete(txn).await?;
        self.log_range(None, "update", &updated);
        Ok(updated)
    }

    /// Merge each payload into the row with its id, all in one transaction.
    ///
    /// # Errors
    ///
    /// Not found when any id is unknown; nothing is stored in that case.
    pub async fn update_range_by_id<T>(&self, models: HashMap<i32, T>) -> Result<Vec<R::Row>, ApiError>
    where
        T: MergeIntoActiveModel<R::ActiveModelType> + Send,
    {
        let txn = self.db.begin().await?;
        let mut updated = Vec::with_capacity(models.len());
        for (id, model) in models {
            updated.push(self.merge_and_save(&txn, None, id, model).await?);
        }
        self.complete(txn).await?;
        self.log_range(None, "update", &updated);
        Ok(updated)
    }

    async fn merge_and_save<C, T>(
        &self,
        conn: &C,
        user: Option<&CurrentUser>,
        id: i32,
        model: T,
    ) -> Result<R::Row, ApiError>
    where
        C: ConnectionTrait,
        T: MergeIntoActiveModel<R::ActiveModelType> + Send,
    {
        let Some(original) = find_by_id::<R, _>(conn, id).await? else {
            return Err(self
                .logger
                .log_invalid(user, "id", self.entity_error_message()));
        };
        let active = model.merge_into_activemodel(original.into_active_model())?;
        self.write_update(conn, active, user).await
    }

    /// Write back every column of `row`.
    async fn save_row<C: ConnectionTrait>(
        &self,
        conn: &C,
        row: R::Row,
        user: Option<&CurrentUser>,
    ) -> Result<R::Row, ApiError> {
        self.write_update(conn, row.into_active_model().reset_all(), user)
            .await
    }

    /// Stamp the update audit columns and run the update.
    async fn write_update<C: ConnectionTrait>(
        &self,
        conn: &C,
        mut active: R::ActiveModelType,
        user: Option<&CurrentUser>,
    ) -> Result<R::Row, ApiError> {
        stamp_update::<R>(&mut active, user);
        match active.update(conn).await {
            Ok(row) => Ok(row),
            Err(DbErr::RecordNotUpdated) => Err(self
                .logger
                .log_invalid(user, "id", self.entity_error_message())),
            Err(err) => Err(err.into()),
        }
    }

    // ------------------------------------------------------------------
    // Remove
    // ------------------------------------------------------------------

    /// # Errors
    ///
    /// Not found when the row no longer exists, database errors otherwise.
    pub async fn remove(&self, row: R::Row) -> Result<(), ApiError> {
        let id = row.get(R::ID_COLUMN);
        let result = R::EntityType::delete_many()
            .filter(R::ID_COLUMN.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(self
                .logger
                .log_invalid(None, "id", self.entity_error_message()));
        }
        self.log_write(None, "remove", &row);
        Ok(())
    }

    /// # Errors
    ///
    /// Not found ("{Entity} does not exist") when `id` is unknown.
    pub async fn remove_by_id(&self, id: i32) -> Result<(), ApiError> {
        match self.get(id).await? {
            Some(row) => self.remove(row).await,
            None => Err(self
                .logger
                .log_invalid(None, "id", self.entity_error_message())),
        }
    }

    /// Delete the given rows in one transaction.
    ///
    /// # Errors
    ///
    /// Database errors; nothing is deleted when any delete fails.
    pub async fn remove_range(&self, rows: Vec<R::Row>) -> Result<u64, ApiError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let ids: Vec<Value> = rows.iter().map(|row| row.get(R::ID_COLUMN)).collect();
        let txn = self.db.begin().await?;
        let result = R::EntityType::delete_many()
            .filter(R::ID_COLUMN.is_in(ids))
            .exec(&txn)
            .await?;
        self.complete(txn).await?;
        self.log_range(None, "remove", &rows);
        Ok(result.rows_affected)
    }

    /// Delete the rows with the given ids. An empty list does nothing.
    ///
    /// # Errors
    ///
    /// Database errors from the lookup or the delete.
    pub async fn remove_range_by_ids(&self, ids: &[i32]) -> Result<u64, ApiError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let rows = self
            .get_list(Condition::all().add(R::ID_COLUMN.is_in(ids.iter().copied())), None, None)
            .await?;
        self.remove_range(rows).await
    }

    // ------------------------------------------------------------------
    // Unit of work
    // ------------------------------------------------------------------

    /// Commit a unit of work.
    async fn complete(&self, txn: DatabaseTransaction) -> Result<(), ApiError> {
        txn.commit().await?;
        tracing::trace!(service = %self.service(), "changes committed");
        Ok(())
    }

    fn log_write(&self, user: Option<&CurrentUser>, action: &str, row: &R::Row) {
        let id = row.get(R::ID_COLUMN);
        self.logger
            .log_information(user, action, &[display_value(&id)], Some(row));
    }

    fn log_range(&self, user: Option<&CurrentUser>, action: &str, rows: &[R::Row]) {
        let ids: Vec<String> = rows
            .iter()
            .map(|row| display_value(&row.get(R::ID_COLUMN)))
            .collect();
        self.logger
            .log_information::<_, ()>(user, action, ids.as_slice(), None);
    }
}

async fn find_by_id<R, C>(conn: &C, id: i32) -> Result<Option<R::Row>, DbErr>
where
    R: CrudResource,
    C: ConnectionTrait,
{
    R::EntityType::find()
        .filter(R::ID_COLUMN.eq(id))
        .one(conn)
        .await
}

/// SQLite and MySQL reject `OFFSET` without `LIMIT`.
fn page_limit(count: Option<u64>, skip: Option<u64>) -> Option<u64> {
    match (count, skip) {
        (None, Some(_)) => Some(i64::MAX.unsigned_abs()),
        _ => count,
    }
}

fn map_all<Row, T: From<Row>>(rows: Vec<Row>) -> Vec<T> {
    rows.into_iter().map(T::from).collect()
}

/// Resolve a sort key to one of `R`'s sortable columns.
fn resolve_sort_column<R: CrudResource>(order_by: &str) -> Option<R::ColumnType> {
    let wanted = normalize_name(order_by);
    R::sortable_columns()
        .into_iter()
        .find(|column| normalize_name(column.as_str()) == wanted)
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn stamp_creation<R: CrudResource>(active: &mut R::ActiveModelType, user: &CurrentUser) {
    for name in R::audit_columns().on_insert() {
        set_user_column::<R>(active, name, user);
    }
}

fn stamp_update<R: CrudResource>(active: &mut R::ActiveModelType, user: Option<&CurrentUser>) {
    let audit = R::audit_columns();
    if let Some(name) = audit.last_update {
        set_timestamp_column::<R>(active, name);
    }
    if let (Some(user), Some(name)) = (user, audit.last_updater) {
        set_user_column::<R>(active, name, user);
    }
}

fn set_user_column<R: CrudResource>(active: &mut R::ActiveModelType, name: &str, user: &CurrentUser) {
    let Some(column) = column_named::<R>(name) else {
        return;
    };
    let candidates = match column.def().get_column_type() {
        ColumnType::Integer => vec![Value::from(user.id)],
        ColumnType::BigInteger => vec![Value::from(i64::from(user.id))],
        other => {
            tracing::warn!(
                entity = R::RESOURCE_NAME,
                column = name,
                column_type = ?other,
                "audit column is not an integer column, skipping"
            );
            return;
        }
    };
    set_first_accepted::<R>(active, column, name, candidates);
}

fn set_timestamp_column<R: CrudResource>(active: &mut R::ActiveModelType, name: &str) {
    let Some(column) = column_named::<R>(name) else {
        return;
    };
    let now = Utc::now();
    let candidates = match column.def().get_column_type() {
        ColumnType::TimestampWithTimeZone => vec![
            Value::from(now.fixed_offset()),
            Value::from(now),
            Value::from(now.with_timezone(&Local)),
        ],
        ColumnType::DateTime | ColumnType::Timestamp => vec![Value::from(now.naive_utc())],
        other => {
            tracing::warn!(
                entity = R::RESOURCE_NAME,
                column = name,
                column_type = ?other,
                "timestamp column has an unsupported type, skipping"
            );
            return;
        }
    };
    set_first_accepted::<R>(active, column, name, candidates);
}

/// Set `column` to the first candidate its field type accepts.
fn set_first_accepted<R: CrudResource>(
    active: &mut R::ActiveModelType,
    column: R::ColumnType,
    name: &str,
    candidates: Vec<Value>,
) {
    for value in candidates {
        if active.try_set(column, value).is_ok() {
            return;
        }
    }
    tracing::warn!(
        entity = R::RESOURCE_NAME,
        column = name,
        "audit column field rejects every candidate value, skipping"
    );
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Int(Some(id)) => id.to_string(),
        Value::BigInt(Some(id)) => id.to_string(),
        other => format!("{other:?}"),
    }
}
