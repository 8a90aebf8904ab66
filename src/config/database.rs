//! Database configuration for the tuition ledger.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs, including the cascading foreign key from collections to students.

use crate::entities::{Collection, Student};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::debug;

/// Database used when neither `DATABASE_URL` nor `--database-url` is given.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://tuition_ledger.sqlite?mode=rwc";

/// Establishes a connection to the `SQLite` database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates the students and collections tables if they do not exist yet.
///
/// Students go first: collections references them.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut student_table = schema.create_table_from_entity(Student);
    let mut collection_table = schema.create_table_from_entity(Collection);

    db.execute(builder.build(student_table.if_not_exists()))
        .await?;
    db.execute(builder.build(collection_table.if_not_exists()))
        .await?;

    Ok(())
}
