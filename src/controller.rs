//! Generic HTTP handlers over a [`Repository`].
//!
//! [`router`] mounts five routes for one resource:
//!
//! | Method   | Path    | Action                                   |
//! |----------|---------|------------------------------------------|
//! | `POST`   | `/`     | validate and insert the payload          |
//! | `GET`    | `/`     | list, ordered when `orderBy` and `direction` are given |
//! | `GET`    | `/{id}` | fetch one                                |
//! | `PUT`    | `/{id}` | validate and merge the payload           |
//! | `DELETE` | `/{id}` | delete one                               |
//!
//! Writes answer `200 OK` with an empty body.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::repository::Repository;
use crate::resource::CrudResource;
use crate::validation::Validatable;

/// Ordering of a list request. Either parameter left empty lists unordered.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderingParams {
    /// Column to order by, e.g. `title` or `createdAt`
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub order_by: Option<String>,
    /// `asc`, `desc` or `none`
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub direction: Option<String>,
}

impl OrderingParams {
    /// Both values, when both are present and not blank.
    #[must_use]
    pub fn requested(&self) -> Option<(&str, &str)> {
        let order_by = self.order_by.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let direction = self.direction.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((order_by, direction))
    }
}

/// Build the routes for resource `R`, with the repository as router state.
pub fn router<R: CrudResource>(repository: Repository<R>) -> Router {
    Router::new()
        .route("/", get(get_all::<R>).post(create::<R>))
        .route(
            "/{id}",
            get(get_one::<R>).put(update::<R>).delete(delete::<R>),
        )
        .with_state(repository)
}

/// # Errors
///
/// Validation failures (422) and database errors (500).
pub async fn create<R: CrudResource>(
    State(repository): State<Repository<R>>,
    Json(payload): Json<R::Model>,
) -> Result<(), ApiError> {
    payload.validate()?;
    repository.add_mapped(payload).await?;
    Ok(())
}

/// # Errors
///
/// Not found (404) when no row has `id`.
pub async fn get_one<R: CrudResource>(
    State(repository): State<Repository<R>>,
    Path(id): Path<i32>,
) -> Result<Json<R::Element>, ApiError> {
    repository
        .get_as::<R::Element>(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(repository.entity_error_message()))
}

/// # Errors
///
/// Bad request (400) for an unknown column or direction.
pub async fn get_all<R: CrudResource>(
    State(repository): State<Repository<R>>,
    Query(params): Query<OrderingParams>,
) -> Result<Json<Vec<R::Element>>, ApiError> {
    let items = match params.requested() {
        Some((order_by, direction)) => {
            repository
                .get_ordered_all_as::<R::Element>(order_by, direction)
                .await?
        }
        None => repository.get_all_as::<R::Element>().await?,
    };
    Ok(Json(items))
}

/// # Errors
///
/// Validation failures (422), not found (404) when no row has `id`.
pub async fn update<R: CrudResource>(
    State(repository): State<Repository<R>>,
    Path(id): Path<i32>,
    Json(payload): Json<R::Model>,
) -> Result<(), ApiError> {
    payload.validate()?;
    repository.update_by_id(id, payload).await?;
    Ok(())
}

/// # Errors
///
/// Not found (404) when no row has `id`.
pub async fn delete<R: CrudResource>(
    State(repository): State<Repository<R>>,
    Path(id): Path<i32>,
) -> Result<(), ApiError> {
    repository.remove_by_id(id).await
}
