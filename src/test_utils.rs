//! Shared test utilities for the tuition and collections ledgers.
//!
//! This module provides helpers for setting up an in-memory database and
//! building students and collections records with sensible defaults.

use crate::{
    core::{month::Month, status::DebtStatus, tuition},
    entities::{Collection, Student, collection, student},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

/// Installs a tracing subscriber that writes through the test harness.
/// Safe to call from every test; only the first call takes effect.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

fn amounts_from(months: &[(Month, f64)]) -> [f64; 12] {
    let mut amounts = [0.0; 12];
    for (month, amount) in months {
        amounts[month.index()] = *amount;
    }
    amounts
}

/// Builds a student form.
///
/// # Defaults
/// * `payment_day`: 10
/// * `course`: "TQI"
/// * `discount`: 0.0
/// * every month not listed in `months`: 0.0
pub fn student_form(id: i64, name: &str, months: &[(Month, f64)]) -> tuition::StudentForm {
    tuition::StudentForm {
        id,
        payment_day: 10,
        name: name.to_string(),
        course: "TQI".to_string(),
        discount: 0.0,
        amounts: amounts_from(months),
    }
}

/// Adds a student through the regular command path.
pub async fn create_student_with(
    db: &DatabaseConnection,
    id: i64,
    name: &str,
    months: &[(Month, f64)],
) -> Result<student::Model> {
    tuition::add_student(db, &student_form(id, name, months)).await
}

/// Inserts a collections record directly, bypassing the quick-toggle.
/// Name and course are copied from the student, which must already exist.
pub async fn insert_collection(
    db: &DatabaseConnection,
    id: i64,
    month: Month,
    amount: f64,
    status: DebtStatus,
    comment: &str,
) -> Result<collection::Model> {
    let student = tuition::get_student(db, id)
        .await?
        .ok_or(Error::StudentNotFound { id })?;
    let record = collection::ActiveModel {
        id: Set(id),
        month: Set(month.full_name().to_string()),
        name: Set(student.name),
        course: Set(student.course),
        amount: Set(amount),
        status: Set(status.label().to_string()),
        comment: Set(comment.to_string()),
        updated_at: Set(chrono::Utc::now().naive_utc()),
    };
    Ok(record.insert(db).await?)
}

/// In-memory student model, never stored.
pub fn student_model(id: i64, name: &str, amounts: [f64; 12]) -> student::Model {
    let now = chrono::Utc::now().naive_utc();
    let [jan, feb, mar, apr, may, jun, jul, aug, sep, oct, nov, dec] = amounts;
    student::Model {
        id,
        payment_day: 10,
        name: name.to_string(),
        course: "TQI".to_string(),
        discount: 0.0,
        jan,
        feb,
        mar,
        apr,
        may,
        jun,
        jul,
        aug,
        sep,
        oct,
        nov,
        dec,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory collections model with a raw month name and status label.
pub fn collection_model(id: i64, month: &str, amount: f64, status: &str) -> collection::Model {
    collection::Model {
        id,
        month: month.to_string(),
        name: format!("Student {id}"),
        course: "TQI".to_string(),
        amount,
        status: status.to_string(),
        comment: String::new(),
        updated_at: chrono::Utc::now().naive_utc(),
    }
}

/// Number of students currently stored.
pub async fn student_count(db: &DatabaseConnection) -> Result<u64> {
    Ok(Student::find().count(db).await?)
}

/// Every collections record of one student.
pub async fn collections_for_student(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Vec<collection::Model>> {
    Ok(Collection::find()
        .filter(collection::Column::Id.eq(id))
        .all(db)
        .await?)
}
