//! Who is making the request.
//!
//! Authentication happens upstream. Its middleware either inserts a
//! [`CurrentUser`] into the request extensions directly or leaves the token
//! claims behind as [`UserClaims`]; the user id is read from the `UserId` claim.

use std::collections::HashMap;
use std::fmt;

use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::ApiError;
use crate::resource::CrudResource;

/// Claim holding the signed-in user's id.
pub const USER_ID_CLAIM: &str = "UserId";

/// Token claims left in the request extensions by the authentication layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserClaims(pub HashMap<String, String>);

impl UserClaims {
    #[must_use]
    pub fn get(&self, claim: &str) -> Option<&str> {
        self.0.get(claim).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UserClaims {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The signed-in user acting on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurrentUser {
    pub id: i32,
}

impl CurrentUser {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self { id }
    }

    /// Read the user id from token claims.
    ///
    /// # Errors
    ///
    /// Unauthorized when the `UserId` claim is missing or not an integer.
    pub fn from_claims(claims: &UserClaims) -> Result<Self, ApiError> {
        let raw = claims
            .get(USER_ID_CLAIM)
            .ok_or_else(|| ApiError::unauthorized("Missing UserId claim"))?;
        raw.trim()
            .parse()
            .map(Self::new)
            .map_err(|_| ApiError::unauthorized("Invalid UserId claim"))
    }

    /// Fetch the user's row from the user resource `U`.
    ///
    /// # Errors
    ///
    /// An internal error when no such user exists, a database error when the
    /// lookup fails.
    pub async fn load<U: CrudResource>(&self, db: &DatabaseConnection) -> Result<U::Row, ApiError> {
        U::EntityType::find()
            .filter(U::ID_COLUMN.eq(self.id))
            .one(db)
            .await?
            .ok_or_else(|| ApiError::internal("Invalid user Id"))
    }
}

impl fmt::Display for CurrentUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(*user);
        }
        let claims = parts
            .extensions
            .get::<UserClaims>()
            .ok_or_else(|| ApiError::unauthorized("Missing UserId claim"))?;
        Self::from_claims(claims)
    }
}
