//! Tuition ledger business logic - adding, updating and removing students.
//!
//! All validation runs before the database is touched. Updates and removals run
//! in a single transaction together with their collections side effects (see
//! [`crate::core::reconcile`]).

use crate::{
    core::{month::Month, reconcile},
    entities::{Student, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Lowest account number the school hands out.
pub const MIN_STUDENT_ID: i64 = 1001;
/// Highest account number the school hands out.
pub const MAX_STUDENT_ID: i64 = 9999;

/// Every field of a student as submitted by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentForm {
    /// Account number
    pub id: i64,
    /// Day of the month tuition is due
    pub payment_day: i32,
    /// Student name
    pub name: String,
    /// Course code
    pub course: String,
    /// Discount amount
    pub discount: f64,
    /// Monthly amounts in calendar order
    pub amounts: [f64; 12],
}

impl StudentForm {
    /// Checks ranges and amounts without touching storage.
    ///
    /// # Errors
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_STUDENT_ID..=MAX_STUDENT_ID).contains(&self.id) {
            return Err(Error::validation(
                "id",
                format!(
                    "{} is outside {MIN_STUDENT_ID}-{MAX_STUDENT_ID}",
                    self.id
                ),
            ));
        }
        if !(1..=31).contains(&self.payment_day) {
            return Err(Error::validation(
                "payment_day",
                format!("{} is not a day between 1 and 31", self.payment_day),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "student name is required"));
        }
        check_amount("discount", self.discount)?;
        for month in Month::ALL {
            check_amount(month.code(), self.amounts[month.index()])?;
        }
        Ok(())
    }

    /// Copies the form onto an active model, trimming text fields.
    pub fn apply_to(&self, model: &mut student::ActiveModel) {
        model.payment_day = Set(self.payment_day);
        model.name = Set(self.name.trim().to_string());
        model.course = Set(self.course.trim().to_string());
        model.discount = Set(self.discount);
        for month in Month::ALL {
            model.set_amount(month, self.amounts[month.index()]);
        }
        model.updated_at = Set(chrono::Utc::now().naive_utc());
    }
}

fn check_amount(field: &str, amount: f64) -> Result<()> {
    if amount < 0.0 || !amount.is_finite() {
        return Err(Error::InvalidAmount {
            field: field.to_string(),
            amount,
        });
    }
    Ok(())
}

/// Parses an account number typed by the operator.
///
/// # Errors
/// Returns a validation error when the text is not numeric or out of range.
pub fn parse_id(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            "id",
            format!("'{text}' must be numeric"),
        ));
    }
    let id: i64 = trimmed
        .parse()
        .map_err(|_| Error::validation("id", format!("'{text}' is out of range")))?;
    if !(MIN_STUDENT_ID..=MAX_STUDENT_ID).contains(&id) {
        return Err(Error::validation(
            "id",
            format!("{id} is outside {MIN_STUDENT_ID}-{MAX_STUDENT_ID}"),
        ));
    }
    Ok(id)
}

/// Parses a payment day typed by the operator.
///
/// # Errors
/// Returns a validation error when the text is not a day between 1 and 31.
pub fn parse_payment_day(text: &str) -> Result<i32> {
    let trimmed = text.trim();
    trimmed
        .parse::<i32>()
        .ok()
        .filter(|day| trimmed.chars().all(|c| c.is_ascii_digit()) && (1..=31).contains(day))
        .ok_or_else(|| {
            Error::validation(
                "payment_day",
                format!("'{text}' is not a day between 1 and 31"),
            )
        })
}

/// Finds a student by account number.
pub async fn get_student(db: &DatabaseConnection, id: i64) -> Result<Option<student::Model>> {
    Student::find_by_id(id).one(db).await.map_err(Into::into)
}

/// Adds a new student. The id must not be in use.
///
/// # Errors
/// Returns a validation error for a malformed form, [`Error::DuplicateStudent`]
/// when the id exists, or a database error.
#[instrument(skip(db, form), fields(student_id = form.id))]
pub async fn add_student(db: &DatabaseConnection, form: &StudentForm) -> Result<student::Model> {
    form.validate()?;

    let txn = db.begin().await?;

    if Student::find_by_id(form.id).one(&txn).await?.is_some() {
        return Err(Error::DuplicateStudent { id: form.id });
    }

    let now = chrono::Utc::now().naive_utc();
    let mut model = student::ActiveModel {
        id: Set(form.id),
        created_at: Set(now),
        ..Default::default()
    };
    form.apply_to(&mut model);
    let created = model.insert(&txn).await?;

    txn.commit().await?;
    info!("Added student {} ({})", created.id, created.name);
    Ok(created)
}

/// Result of a student update.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentUpdate {
    /// The record as stored after the update
    pub student: student::Model,
    /// Effect on the collections ledger
    pub propagation: reconcile::Propagation,
}

/// Replaces every field of an existing student and reconciles the collections
/// ledger in the same transaction.
///
/// # Errors
/// Returns a validation error for a malformed form, [`Error::StudentNotFound`]
/// for an unknown id, or a database error (nothing is committed).
#[instrument(skip(db, form), fields(student_id = form.id))]
pub async fn update_student(db: &DatabaseConnection, form: &StudentForm) -> Result<StudentUpdate> {
    form.validate()?;

    let txn = db.begin().await?;

    let mut model: student::ActiveModel = Student::find_by_id(form.id)
        .one(&txn)
        .await?
        .ok_or(Error::StudentNotFound { id: form.id })?
        .into();
    form.apply_to(&mut model);
    let student = model.update(&txn).await?;

    let propagation = reconcile::propagate_tuition(&txn, &student).await?;

    txn.commit().await?;
    info!(
        refreshed = propagation.refreshed,
        removed = propagation.removed,
        "Updated student {} ({})",
        student.id,
        student.name
    );
    Ok(StudentUpdate {
        student,
        propagation,
    })
}

/// Result of a student removal.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRemoval {
    /// The record that was deleted
    pub student: student::Model,
    /// Number of collections records deleted with it
    pub removed_collections: u64,
}

/// Removes a student and all of its collections records atomically.
///
/// # Errors
/// Returns [`Error::StudentNotFound`] for an unknown id or a database error.
#[instrument(skip(db))]
pub async fn remove_student(db: &DatabaseConnection, id: i64) -> Result<StudentRemoval> {
    let txn = db.begin().await?;

    let student = Student::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::StudentNotFound { id })?;

    let removed_collections = reconcile::purge_student(&txn, id).await?;
    Student::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    info!(
        removed_collections,
        "Removed student {} ({})", student.id, student.name
    );
    Ok(StudentRemoval {
        student,
        removed_collections,
    })
}

/// Lowest free account number, or `None` when 1001-9999 is exhausted.
pub async fn next_available_id(db: &DatabaseConnection) -> Result<Option<i64>> {
    let taken: Vec<i64> = Student::find()
        .filter(student::Column::Id.gte(MIN_STUDENT_ID))
        .order_by_asc(student::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    let mut candidate = MIN_STUDENT_ID;
    for id in taken {
        if id == candidate {
            candidate += 1;
        } else if id > candidate {
            break;
        }
    }
    Ok((candidate <= MAX_STUDENT_ID).then_some(candidate))
}

/// Whether the tuition ledger holds no students at all.
pub async fn is_empty(db: &DatabaseConnection) -> Result<bool> {
    Ok(Student::find().one(db).await?.is_none())
}
