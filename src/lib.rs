//! Generic repository and controller scaffolding for CRUD APIs on Axum and Sea-ORM.
//!
//! Implement [`CrudResource`] for an entity, wrap a connection in a
//! [`Repository`], and mount [`controller::router`] behind
//! [`middleware::exception_handler`]:
//!
//! ```rust,ignore
//! let repository = Repository::<Note>::new(db);
//! let app = exception_handler(Router::new().nest("/api/notes", router(repository)));
//! ```

pub mod config;
pub mod controller;
pub mod date;
pub mod errors;
pub mod logger;
pub mod mail;
pub mod middleware;
pub mod order;
pub mod repository;
pub mod resource;
pub mod session;
pub mod telemetry;
pub mod utils;
pub mod validation;

pub use controller::{OrderingParams, router};
pub use errors::{ApiError, ErrorResponse};
pub use logger::ActionLogger;
pub use middleware::exception_handler;
pub use order::OrderDirection;
pub use repository::Repository;
pub use resource::{AuditColumns, CrudResource, MergeIntoActiveModel};
pub use serde_with;
pub use session::{CurrentUser, UserClaims};
pub use validation::{MaxNumber, MinNumber, Validatable, ValidationError, ValidationErrors};
