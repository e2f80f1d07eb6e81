use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use crudkit::{CurrentUser, Repository, exception_handler, router};
use sea_orm::{Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use sea_orm_migration::prelude::*;
use tower::ServiceExt;

pub mod event_entity;
pub mod memo_entity;
pub mod note_entity;
pub mod user_entity;

use note_entity::Note;
use user_entity::User;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Note routes under `/api/notes`, wrapped like a production app.
pub fn setup_test_app(db: DatabaseConnection) -> Router {
    let api = Router::new().nest("/api/notes", router(Repository::<Note>::new(db)));
    exception_handler(api)
}

/// Insert a user and return it as the acting user.
pub async fn create_user(db: &DatabaseConnection, name: &str) -> CurrentUser {
    let user = Repository::<User>::new(db.clone())
        .add_mapped(user_entity::UserInput {
            name: name.to_string(),
        })
        .await
        .unwrap();
    CurrentUser::new(user.id)
}

/// Send a request and decode the JSON body, `Null` for an empty body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateUserTable),
            Box::new(CreateNoteTable),
            Box::new(CreateAuditTables),
        ]
    }
}

async fn create_table_for<E: EntityTrait>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr> {
    let schema = Schema::new(manager.get_database_backend());
    manager
        .create_table(schema.create_table_from_entity(entity).if_not_exists().to_owned())
        .await
}

pub struct CreateUserTable;

#[async_trait::async_trait]
impl MigrationName for CreateUserTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_user_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUserTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_table_for(manager, user_entity::Entity).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(user_entity::Entity).to_owned())
            .await
    }
}

pub struct CreateNoteTable;

#[async_trait::async_trait]
impl MigrationName for CreateNoteTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_note_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateNoteTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_table_for(manager, note_entity::Entity).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(note_entity::Entity).to_owned())
            .await
    }
}

/// Entities that exercise the other audit column types.
pub struct CreateAuditTables;

#[async_trait::async_trait]
impl MigrationName for CreateAuditTables {
    fn name(&self) -> &'static str {
        "m20240101_000003_create_audit_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateAuditTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_table_for(manager, event_entity::Entity).await?;
        create_table_for(manager, memo_entity::Entity).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(memo_entity::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(event_entity::Entity).to_owned())
            .await
    }
}
