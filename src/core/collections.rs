//! Collections ledger commands: the quick-toggle, manual edits and removals.

use crate::{
    core::{
        currency,
        month::Month,
        reconcile,
        status::{DebtStatus, QuickChoice},
    },
    entities::{Student, collection},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// A manual edit of one collections record.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEdit {
    /// Student id
    pub id: i64,
    /// Month of the record
    pub month: Month,
    /// New status
    pub status: DebtStatus,
    /// New amount; may differ from the tuition ledger
    pub amount: f64,
    /// New comment
    pub comment: String,
}

/// Marks a student-month as paid or debtor.
///
/// The record is created with an empty comment when absent. When the month has
/// no tuition obligation, any leftover record is deleted and
/// [`Error::NotApplicable`] is returned after that deletion is committed.
#[instrument(skip(db))]
pub async fn quick_toggle(
    db: &DatabaseConnection,
    id: i64,
    month: Month,
    choice: QuickChoice,
) -> Result<collection::Model> {
    let txn = db.begin().await?;

    let student = Student::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(Error::StudentNotFound { id })?;

    let amount = student.amount(month);
    if amount <= 0.0 {
        let removed_stale = reconcile::remove_record(&txn, id, month).await?;
        txn.commit().await?;
        if removed_stale {
            warn!("Removed stale collections record for {id} in {month}");
        }
        return Err(Error::NotApplicable {
            id,
            month: month.full_name().to_string(),
            amount: currency::format(amount),
            removed_stale,
        });
    }

    let record = reconcile::upsert_status(&txn, &student, month, choice.status()).await?;

    txn.commit().await?;
    info!("Marked student {id} {} in {month}", record.status);
    Ok(record)
}

/// Overwrites status, amount and comment of an existing record.
#[instrument(skip(db, edit), fields(student_id = edit.id, month = %edit.month))]
pub async fn edit_collection(
    db: &DatabaseConnection,
    edit: &CollectionEdit,
) -> Result<collection::Model> {
    if edit.amount < 0.0 || !edit.amount.is_finite() {
        return Err(Error::InvalidAmount {
            field: format!("{}/{}.amount", edit.id, edit.month),
            amount: edit.amount,
        });
    }

    let txn = db.begin().await?;

    let record = reconcile::find_record(&txn, edit.id, edit.month)
        .await?
        .ok_or_else(|| Error::CollectionNotFound {
            id: edit.id,
            month: edit.month.full_name().to_string(),
        })?;

    let base = Student::find_by_id(edit.id)
        .one(&txn)
        .await?
        .map_or(0.0, |s| s.amount(edit.month));
    if base <= 0.0 {
        reconcile::remove_record(&txn, edit.id, edit.month).await?;
        txn.commit().await?;
        warn!(
            "Removed stale collections record for {} in {}",
            edit.id, edit.month
        );
        return Err(Error::NotApplicable {
            id: edit.id,
            month: edit.month.full_name().to_string(),
            amount: currency::format(base),
            removed_stale: true,
        });
    }

    let mut model: collection::ActiveModel = record.into();
    model.status = Set(edit.status.label().to_string());
    model.amount = Set(edit.amount);
    model.comment = Set(edit.comment.clone());
    model.updated_at = Set(chrono::Utc::now().naive_utc());
    let updated = model.update(&txn).await?;

    txn.commit().await?;
    info!(
        "Edited collections record for {} in {}: {}",
        edit.id, edit.month, updated.status
    );
    Ok(updated)
}

/// Deletes one collections record. The tuition ledger is left alone.
#[instrument(skip(db))]
pub async fn remove_collection(db: &DatabaseConnection, id: i64, month: Month) -> Result<()> {
    let txn = db.begin().await?;
    if !reconcile::remove_record(&txn, id, month).await? {
        return Err(Error::CollectionNotFound {
            id,
            month: month.full_name().to_string(),
        });
    }
    txn.commit().await?;
    info!("Removed collections record for {id} in {month}");
    Ok(())
}

/// Fetches one collections record.
pub async fn get_collection(
    db: &DatabaseConnection,
    id: i64,
    month: Month,
) -> Result<Option<collection::Model>> {
    reconcile::find_record(db, id, month).await
}
