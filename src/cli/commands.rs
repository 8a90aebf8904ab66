//! Command handlers.
//!
//! Each handler turns parsed arguments into a core call and returns the line(s)
//! to show the operator. Failures come back as [`Error`] so the binary can
//! report them by kind.

use super::{Command, EditArgs, StudentArgs, render};
use crate::{
    config::ledger::LedgerConfig,
    core::{
        Month, collections, currency, query, seed,
        tuition::{self, MAX_STUDENT_ID, MIN_STUDENT_ID, StudentForm},
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;

/// Runs one operator command.
pub async fn run(db: &DatabaseConnection, config: &LedgerConfig, command: Command) -> Result<String> {
    match command {
        Command::Students { term } => {
            let view = query::tuition_view(db, term.as_deref()).await?;
            Ok(render::tuition_table(&view)?)
        }
        Command::Debtors { term } => {
            let listing = query::list_outstanding(db, term.as_deref()).await?;
            Ok(render::debtors_table(&listing)?)
        }
        Command::Add(args) => add(db, &args).await,
        Command::Update(args) => update(db, &args).await,
        Command::Remove { id } => {
            let removal = tuition::remove_student(db, tuition::parse_id(&id)?).await?;
            Ok(format!(
                "✅ Removed student {} ({}) and {} collections record(s)",
                removal.student.id, removal.student.name, removal.removed_collections
            ))
        }
        Command::Toggle { id, month, choice } => {
            let record =
                collections::quick_toggle(db, tuition::parse_id(&id)?, month, choice).await?;
            Ok(format!(
                "✅ Student {} marked {} for {} ({})",
                record.id,
                record.status,
                record.month,
                currency::format(record.amount)
            ))
        }
        Command::Edit(args) => edit(db, &args).await,
        Command::Forget { id, month } => {
            let id = tuition::parse_id(&id)?;
            collections::remove_collection(db, id, month).await?;
            Ok(format!("✅ Removed collections record for {id} in {month}"))
        }
        Command::NextId => Ok(match tuition::next_available_id(db).await? {
            Some(id) => format!("Next available id: {id}"),
            None => format!("No free id left between {MIN_STUDENT_ID} and {MAX_STUDENT_ID}"),
        }),
        Command::Seed => Ok(match seed::seed_if_empty(db, config).await? {
            Some(summary) => format!(
                "✅ Seeded {} student(s) and {} collections record(s), {} skipped",
                summary.students, summary.collections, summary.skipped
            ),
            None => "Ledger already has students; nothing seeded.".to_string(),
        }),
    }
}

/// Operator-facing description of a failure.
#[must_use]
pub fn describe_error(error: &Error) -> String {
    match error {
        Error::NotApplicable {
            removed_stale: true,
            ..
        } => format!("{error} (stale collections record removed)"),
        _ => error.to_string(),
    }
}

/// Overlays the given arguments on `form`.
fn apply_args(form: &mut StudentForm, args: &StudentArgs) -> Result<()> {
    if let Some(day) = &args.day {
        form.payment_day = tuition::parse_payment_day(day)?;
    }
    if let Some(name) = &args.name {
        form.name.clone_from(name);
    }
    if let Some(course) = &args.course {
        form.course.clone_from(course);
    }
    if let Some(discount) = &args.discount {
        form.discount = currency::parse(discount.as_str());
    }
    for month in Month::ALL {
        if let Some(text) = args.amount_text(month) {
            form.amounts[month.index()] = currency::parse(text);
        }
    }
    Ok(())
}

async fn add(db: &DatabaseConnection, args: &StudentArgs) -> Result<String> {
    let id = tuition::parse_id(&args.id)?;
    if args.day.is_none() {
        return Err(Error::validation("payment_day", "payment day is required"));
    }
    let mut form = StudentForm {
        id,
        payment_day: 0,
        name: String::new(),
        course: String::new(),
        discount: 0.0,
        amounts: [0.0; 12],
    };
    apply_args(&mut form, args)?;

    let student = tuition::add_student(db, &form).await?;
    Ok(format!("✅ Added student {} ({})", student.id, student.name))
}

async fn update(db: &DatabaseConnection, args: &StudentArgs) -> Result<String> {
    let id = tuition::parse_id(&args.id)?;
    let current = tuition::get_student(db, id)
        .await?
        .ok_or(Error::StudentNotFound { id })?;
    let mut form = StudentForm {
        id,
        payment_day: current.payment_day,
        name: current.name.clone(),
        course: current.course.clone(),
        discount: current.discount,
        amounts: current.amounts(),
    };
    apply_args(&mut form, args)?;

    let update = tuition::update_student(db, &form).await?;
    Ok(format!(
        "✅ Updated student {} ({}): {} collections record(s) refreshed, {} removed",
        update.student.id,
        update.student.name,
        update.propagation.refreshed,
        update.propagation.removed
    ))
}

async fn edit(db: &DatabaseConnection, args: &EditArgs) -> Result<String> {
    let id = tuition::parse_id(&args.id)?;
    let current = collections::get_collection(db, id, args.month)
        .await?
        .ok_or_else(|| Error::CollectionNotFound {
            id,
            month: args.month.full_name().to_string(),
        })?;

    let edit = collections::CollectionEdit {
        id,
        month: args.month,
        status: args
            .status
            .or_else(|| current.debt_status())
            .unwrap_or_default(),
        amount: args
            .amount
            .as_deref()
            .map_or(current.amount, currency::parse),
        comment: args.comment.clone().unwrap_or(current.comment),
    };

    let record = collections::edit_collection(db, &edit).await?;
    Ok(format!(
        "✅ Updated collections record for {} in {}: {}, {}",
        record.id,
        record.month,
        record.status,
        currency::format(record.amount)
    ))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{DebtStatus, QuickChoice};
    use crate::errors::ErrorKind;
    use crate::test_utils::*;

    fn student_args(id: &str) -> StudentArgs {
        StudentArgs {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_and_list() -> Result<()> {
        let db = setup_test_db().await?;
        let config = LedgerConfig::default();

        let mut args = student_args("1001");
        args.day = Some("10".to_string());
        args.name = Some("Pedro Faleiro Rocha".to_string());
        args.course = Some("TQI".to_string());
        args.may = Some("390,10".to_string());
        let message = run(&db, &config, Command::Add(args)).await?;
        assert_eq!(message, "✅ Added student 1001 (Pedro Faleiro Rocha)");

        let message = run(&db, &config, Command::Toggle {
            id: "1001".to_string(),
            month: Month::May,
            choice: QuickChoice::Debtor,
        })
        .await?;
        assert_eq!(message, "✅ Student 1001 marked Pendente for Maio (390,10)");

        let table = run(&db, &config, Command::Students { term: None }).await?;
        assert!(table.contains("390,10 ❌"));

        let debtors = run(&db, &config, Command::Debtors {
            term: Some("pedro".to_string()),
        })
        .await?;
        assert!(debtors.lines().nth(1).unwrap().starts_with("1001"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_requires_payment_day() -> Result<()> {
        let db = setup_test_db().await?;
        let mut args = student_args("1001");
        args.name = Some("Pedro".to_string());

        let err = run(&db, &LedgerConfig::default(), Command::Add(args))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("payment_day"));

        let err = run(&db, &LedgerConfig::default(), Command::Remove {
            id: "abc".to_string(),
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Validation { field, .. } if field == "id"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() -> Result<()> {
        let db = setup_test_db().await?;
        create_student_with(&db, 1001, "Pedro", &[(Month::May, 390.1), (Month::June, 390.55)])
            .await?;
        insert_collection(&db, 1001, Month::May, 390.1, DebtStatus::Pending, "ligar").await?;

        let mut args = student_args("1001");
        args.may = Some("0".to_string());
        let message = run(&db, &LedgerConfig::default(), Command::Update(args)).await?;
        assert!(message.ends_with("0 collections record(s) refreshed, 1 removed"));

        let student = tuition::get_student(&db, 1001).await?.unwrap();
        assert_eq!(student.name, "Pedro");
        assert!((student.jun - 390.55).abs() < f64::EPSILON);
        assert!(student.may.abs() < f64::EPSILON);
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_keeps_omitted_fields() -> Result<()> {
        let db = setup_test_db().await?;
        create_student_with(&db, 1002, "Isis", &[(Month::January, 270.18)]).await?;
        insert_collection(&db, 1002, Month::January, 270.18, DebtStatus::Pending, "").await?;

        let args = EditArgs {
            id: "1002".to_string(),
            month: Month::January,
            status: Some(DebtStatus::InNegotiation),
            amount: None,
            comment: Some("Combinado pagar dia 30".to_string()),
        };
        let message = run(&db, &LedgerConfig::default(), Command::Edit(args)).await?;
        assert_eq!(
            message,
            "✅ Updated collections record for 1002 in Janeiro: Em Negociação, 270,18"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_not_applicable_description() -> Result<()> {
        let db = setup_test_db().await?;
        create_student_with(&db, 1001, "Pedro", &[]).await?;
        insert_collection(&db, 1001, Month::April, 10.0, DebtStatus::Pending, "").await?;

        let err = run(&db, &LedgerConfig::default(), Command::Toggle {
            id: "1001".to_string(),
            month: Month::April,
            choice: QuickChoice::Paid,
        })
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotApplicable);
        assert!(describe_error(&err).ends_with("(stale collections record removed)"));
        Ok(())
    }

    #[tokio::test]
    async fn test_next_id_and_seed_messages() -> Result<()> {
        let db = setup_test_db().await?;
        let config = LedgerConfig::default();
        assert_eq!(
            run(&db, &config, Command::NextId).await?,
            "Next available id: 1001"
        );
        assert_eq!(
            run(&db, &config, Command::Seed).await?,
            "✅ Seeded 0 student(s) and 0 collections record(s), 0 skipped"
        );

        create_student_with(&db, 1001, "Pedro", &[]).await?;
        assert_eq!(
            run(&db, &config, Command::Seed).await?,
            "Ledger already has students; nothing seeded."
        );
        Ok(())
    }
}
