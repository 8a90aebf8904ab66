//! Sample data seeding for an empty ledger.

use crate::{
    config::ledger::{CollectionSeed, LedgerConfig},
    core::{currency, month::Month, status::DebtStatus, tuition},
    entities::{Collection, collection, student},
    errors::{Error, Result},
};
use sea_orm::sea_query::OnConflict;
use sea_orm::{Set, TransactionTrait, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// What a seeding run inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Students inserted
    pub students: usize,
    /// Collections records written
    pub collections: usize,
    /// Collections seeds skipped because their month has no obligation
    pub skipped: usize,
}

/// Seeds the configured students and collections records when no student is
/// stored yet. Returns `None` when the ledger already has data.
///
/// Everything is written in one transaction; an invalid seed aborts the run.
#[instrument(skip(db, config))]
pub async fn seed_if_empty(
    db: &DatabaseConnection,
    config: &LedgerConfig,
) -> Result<Option<SeedSummary>> {
    if !tuition::is_empty(db).await? {
        debug!("Ledger already has students; skipping seed");
        return Ok(None);
    }

    let forms: Vec<_> = config.students.iter().map(|s| s.to_form()).collect();
    for form in &forms {
        form.validate()?;
    }

    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();
    let mut seeded: HashMap<i64, student::Model> = HashMap::new();
    let now = chrono::Utc::now().naive_utc();

    for form in &forms {
        if seeded.contains_key(&form.id) {
            return Err(Error::DuplicateStudent { id: form.id });
        }
        let mut model = student::ActiveModel {
            id: Set(form.id),
            created_at: Set(now),
            ..Default::default()
        };
        form.apply_to(&mut model);
        let created = model.insert(&txn).await?;
        seeded.insert(created.id, created);
        summary.students += 1;
    }

    for seed in &config.collections {
        let month = Month::parse(&seed.month)?;
        let status = seed
            .status
            .as_deref()
            .map_or(Ok(DebtStatus::Pending), str::parse)?;
        let Some(student) = seeded.get(&seed.id) else {
            return Err(Error::StudentNotFound { id: seed.id });
        };

        let base = student.amount(month);
        if base <= 0.0 {
            warn!(
                "Skipping seeded collections record for {} in {month}: amount is {}",
                seed.id,
                currency::format(base)
            );
            summary.skipped += 1;
            continue;
        }

        let amount = seed.amount.unwrap_or(base);
        if amount < 0.0 || !amount.is_finite() {
            return Err(Error::InvalidAmount {
                field: format!("collections[{}].{}", seed.id, month.code()),
                amount,
            });
        }
        write_record(&txn, student, month, amount, status, seed).await?;
        summary.collections += 1;
    }

    txn.commit().await?;
    info!(
        students = summary.students,
        collections = summary.collections,
        skipped = summary.skipped,
        "Seeded sample data"
    );
    Ok(Some(summary))
}

async fn write_record<C>(
    db: &C,
    student: &student::Model,
    month: Month,
    amount: f64,
    status: DebtStatus,
    seed: &CollectionSeed,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let record = collection::ActiveModel {
        id: Set(student.id),
        month: Set(month.full_name().to_string()),
        name: Set(student.name.clone()),
        course: Set(student.course.clone()),
        amount: Set(amount),
        status: Set(status.label().to_string()),
        comment: Set(seed.comment.clone()),
        updated_at: Set(chrono::Utc::now().naive_utc()),
    };
    Collection::insert(record)
        .on_conflict(
            OnConflict::columns([collection::Column::Id, collection::Column::Month])
                .update_columns([
                    collection::Column::Amount,
                    collection::Column::Status,
                    collection::Column::Comment,
                    collection::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}
