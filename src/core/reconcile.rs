//! Cross-ledger propagation.
//!
//! This is the only module that writes the collections ledger on behalf of the
//! tuition ledger. Every helper takes the caller's open transaction, so the
//! tuition write and all of its collections side effects commit or roll back
//! together.

use crate::{
    core::{month::Month, status::DebtStatus},
    entities::{Collection, collection, student},
    errors::Result,
};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// What a tuition update did to the collections ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Propagation {
    /// Records whose cached amount/name/course were refreshed
    pub refreshed: u64,
    /// Records deleted because their month no longer has an obligation
    pub removed: u64,
}

/// Inserts or updates the record for (`student`, `month`) with `status`.
///
/// Amount, name and course are copied from the tuition record. On conflict
/// only those columns and the status change: an existing comment survives, a
/// new record starts with an empty comment.
pub async fn upsert_status<C>(
    db: &C,
    student: &student::Model,
    month: Month,
    status: DebtStatus,
) -> Result<collection::Model>
where
    C: ConnectionTrait,
{
    let record = collection::ActiveModel {
        id: Set(student.id),
        month: Set(month.full_name().to_string()),
        name: Set(student.name.clone()),
        course: Set(student.course.clone()),
        amount: Set(student.amount(month)),
        status: Set(status.label().to_string()),
        comment: Set(String::new()),
        updated_at: Set(chrono::Utc::now().naive_utc()),
    };

    Collection::insert(record)
        .on_conflict(
            OnConflict::columns([collection::Column::Id, collection::Column::Month])
                .update_columns([
                    collection::Column::Status,
                    collection::Column::Amount,
                    collection::Column::Name,
                    collection::Column::Course,
                    collection::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    find_record(db, student.id, month)
        .await?
        .ok_or_else(|| {
            DbErr::RecordNotFound(format!(
                "collections record {}/{} missing after upsert",
                student.id,
                month.full_name()
            ))
            .into()
        })
}

/// Brings the collections ledger in line with an updated tuition record.
///
/// Months with an obligation get their existing record's cached amount, name
/// and course refreshed (no record is created, status and comment are left
/// alone). Months without an obligation lose their record.
pub async fn propagate_tuition<C>(db: &C, student: &student::Model) -> Result<Propagation>
where
    C: ConnectionTrait,
{
    let mut propagation = Propagation::default();
    let now = chrono::Utc::now().naive_utc();

    for month in Month::ALL {
        let amount = student.amount(month);
        if amount > 0.0 {
            let result = Collection::update_many()
                .col_expr(collection::Column::Amount, Expr::value(amount))
                .col_expr(collection::Column::Name, Expr::value(student.name.clone()))
                .col_expr(
                    collection::Column::Course,
                    Expr::value(student.course.clone()),
                )
                .col_expr(collection::Column::UpdatedAt, Expr::value(now))
                .filter(collection::Column::Id.eq(student.id))
                .filter(collection::Column::Month.eq(month.full_name()))
                .exec(db)
                .await?;
            propagation.refreshed += result.rows_affected;
        } else if remove_record(db, student.id, month).await? {
            propagation.removed += 1;
        }
    }

    debug!(
        student_id = student.id,
        refreshed = propagation.refreshed,
        removed = propagation.removed,
        "Propagated tuition update to collections ledger"
    );
    Ok(propagation)
}

/// Deletes every collections record of a student. Returns how many went away.
pub async fn purge_student<C>(db: &C, student_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Collection::delete_many()
        .filter(collection::Column::Id.eq(student_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Deletes the record for (`student_id`, `month`). Returns whether one existed.
pub async fn remove_record<C>(db: &C, student_id: i64, month: Month) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Collection::delete_many()
        .filter(collection::Column::Id.eq(student_id))
        .filter(collection::Column::Month.eq(month.full_name()))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Fetches the record for (`student_id`, `month`).
pub async fn find_record<C>(
    db: &C,
    student_id: i64,
    month: Month,
) -> Result<Option<collection::Model>>
where
    C: ConnectionTrait,
{
    Collection::find_by_id((student_id, month.full_name().to_string()))
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::tuition;
    use crate::test_utils::*;
    use sea_orm::TransactionTrait;

    #[tokio::test]
    async fn test_upsert_creates_with_empty_comment() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_student_with(&db, 1001, "Pedro", &[(Month::May, 390.1)]).await?;

        let record = upsert_status(&db, &student, Month::May, DebtStatus::Pending).await?;
        assert_eq!(record.month, "Maio");
        assert_eq!(record.amount, 390.1);
        assert_eq!(record.status, "Pendente");
        assert_eq!(record.comment, "");
        assert_eq!(record.name, "Pedro");
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_preserves_comment() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_student_with(&db, 1002, "Isis", &[(Month::January, 270.18)]).await?;
        insert_collection(
            &db,
            1002,
            Month::January,
            100.0,
            DebtStatus::InNegotiation,
            "Combinado pagar dia 30",
        )
        .await?;

        let record = upsert_status(&db, &student, Month::January, DebtStatus::Paid).await?;
        assert_eq!(record.status, "Pago");
        assert_eq!(record.amount, 270.18);
        assert_eq!(record.comment, "Combinado pagar dia 30");
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_refreshes_cached_name_and_course() -> Result<()> {
        let db = setup_test_db().await?;
        let stored = create_student_with(&db, 1002, "Isis", &[(Month::January, 270.18)]).await?;
        insert_collection(
            &db,
            1002,
            Month::January,
            270.18,
            DebtStatus::Pending,
            "ligar depois",
        )
        .await?;

        let mut renamed = stored.clone();
        renamed.name = "Isis Silva Pinheiro Aires".to_string();
        renamed.course = "TQ2".to_string();

        let record = upsert_status(&db, &renamed, Month::January, DebtStatus::Paid).await?;
        assert_eq!(record.name, "Isis Silva Pinheiro Aires");
        assert_eq!(record.course, "TQ2");
        assert_ne!(record.course, stored.course);
        assert_eq!(record.status, "Pago");
        assert_eq!(record.comment, "ligar depois");
        Ok(())
    }

    #[tokio::test]
    async fn test_propagation_touches_updated_at() -> Result<()> {
        let db = setup_test_db().await?;
        let student = create_student_with(&db, 1001, "Pedro", &[(Month::May, 390.1)]).await?;
        insert_collection(&db, 1001, Month::May, 390.1, DebtStatus::Pending, "").await?;

        let old = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Collection::update_many()
            .col_expr(collection::Column::UpdatedAt, Expr::value(old))
            .filter(collection::Column::Id.eq(1001))
            .exec(&db)
            .await?;
        assert_eq!(find_record(&db, 1001, Month::May).await?.unwrap().updated_at, old);

        let propagation = propagate_tuition(&db, &student).await?;
        assert_eq!(propagation.refreshed, 1);

        let may = find_record(&db, 1001, Month::May).await?.unwrap();
        assert!(may.updated_at > old);
        Ok(())
    }

    #[tokio::test]
    async fn test_propagation_refreshes_and_removes() -> Result<()> {
        let db = setup_test_db().await?;
        create_student_with(
            &db,
            1001,
            "Pedro",
            &[(Month::February, 11.0), (Month::March, 11.0)],
        )
        .await?;
        insert_collection(&db, 1001, Month::February, 11.0, DebtStatus::Pending, "ligar").await?;
        insert_collection(&db, 1001, Month::March, 11.0, DebtStatus::InNegotiation, "").await?;

        let mut form = student_form(1001, "Pedro Rocha", &[(Month::February, 12.5)]);
        form.course = "TQ2".to_string();
        let updated = tuition::get_student(&db, 1001).await?.unwrap();
        let mut active: student::ActiveModel = updated.into();
        form.apply_to(&mut active);

        let txn = db.begin().await?;
        let updated = active.update(&txn).await?;
        let propagation = propagate_tuition(&txn, &updated).await?;
        txn.commit().await?;

        assert_eq!(propagation, Propagation { refreshed: 1, removed: 1 });

        let february = find_record(&db, 1001, Month::February).await?.unwrap();
        assert_eq!(february.amount, 12.5);
        assert_eq!(february.name, "Pedro Rocha");
        assert_eq!(february.course, "TQ2");
        assert_eq!(february.status, "Pendente");
        assert_eq!(february.comment, "ligar");

        assert!(find_record(&db, 1001, Month::March).await?.is_none());
        // No record is invented for months that never had one
        assert!(find_record(&db, 1001, Month::April).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_purge_student() -> Result<()> {
        let db = setup_test_db().await?;
        create_student_with(&db, 1001, "Pedro", &[(Month::January, 10.0), (Month::May, 5.0)])
            .await?;
        create_student_with(&db, 1002, "Isis", &[(Month::January, 10.0)]).await?;
        insert_collection(&db, 1001, Month::January, 10.0, DebtStatus::Pending, "").await?;
        insert_collection(&db, 1001, Month::May, 5.0, DebtStatus::Paid, "").await?;
        insert_collection(&db, 1002, Month::January, 10.0, DebtStatus::Pending, "").await?;

        assert_eq!(purge_student(&db, 1001).await?, 2);
        assert!(find_record(&db, 1002, Month::January).await?.is_some());
        Ok(())
    }
}
