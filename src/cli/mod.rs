//! Operator command line: argument definitions, command handlers and text rendering.

/// Command handlers producing operator messages
pub mod commands;
/// Plain text tables for the two views
pub mod render;

use crate::core::{DebtStatus, Month, QuickChoice};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tuition and collections ledger for a language school.
#[derive(Parser, Debug)]
#[command(name = "tuition-ledger")]
#[command(about = "Tracks monthly tuition and follows up on unpaid months")]
pub struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = crate::config::database::DEFAULT_DATABASE_URL
    )]
    pub database_url: String,

    /// Ledger configuration file; a missing file means defaults.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Operator commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the tuition grid with paid/debtor marks
    Students {
        /// Student id or part of a name
        term: Option<String>,
    },
    /// Show pending and in-negotiation months
    Debtors {
        /// Student id or part of a name
        term: Option<String>,
    },
    /// Add a new student
    Add(StudentArgs),
    /// Change an existing student; omitted fields keep their value
    Update(StudentArgs),
    /// Delete a student and all of its collections records
    Remove {
        /// Student id
        id: String,
    },
    /// Mark a month as paid or debtor
    Toggle {
        /// Student id
        id: String,
        /// Month code (`may`) or name (`Maio`)
        month: Month,
        /// `paid`/`pago` or `debtor`/`devedor`
        choice: QuickChoice,
    },
    /// Edit a collections record; omitted fields keep their value
    Edit(EditArgs),
    /// Delete one collections record, leaving the tuition untouched
    Forget {
        /// Student id
        id: String,
        /// Month code or name
        month: Month,
    },
    /// Print the lowest free student id
    NextId,
    /// Load the sample data from the config file into an empty ledger
    Seed,
}

/// Student fields. Amounts use the `1.234,56` display format.
#[derive(Args, Debug, Default, Clone)]
pub struct StudentArgs {
    /// Student id (1001-9999)
    pub id: String,
    /// Payment day (1-31)
    #[arg(long)]
    pub day: Option<String>,
    /// Student name
    #[arg(long)]
    pub name: Option<String>,
    /// Course code
    #[arg(long)]
    pub course: Option<String>,
    /// Discount
    #[arg(long)]
    pub discount: Option<String>,
    /// January amount
    #[arg(long)]
    pub jan: Option<String>,
    /// February amount
    #[arg(long)]
    pub feb: Option<String>,
    /// March amount
    #[arg(long)]
    pub mar: Option<String>,
    /// April amount
    #[arg(long)]
    pub apr: Option<String>,
    /// May amount
    #[arg(long)]
    pub may: Option<String>,
    /// June amount
    #[arg(long)]
    pub jun: Option<String>,
    /// July amount
    #[arg(long)]
    pub jul: Option<String>,
    /// August amount
    #[arg(long)]
    pub aug: Option<String>,
    /// September amount
    #[arg(long)]
    pub sep: Option<String>,
    /// October amount
    #[arg(long)]
    pub oct: Option<String>,
    /// November amount
    #[arg(long)]
    pub nov: Option<String>,
    /// December amount
    #[arg(long)]
    pub dec: Option<String>,
}

impl StudentArgs {
    /// The amount given for `month`, if any.
    #[must_use]
    pub fn amount_text(&self, month: Month) -> Option<&str> {
        let text = match month {
            Month::January => &self.jan,
            Month::February => &self.feb,
            Month::March => &self.mar,
            Month::April => &self.apr,
            Month::May => &self.may,
            Month::June => &self.jun,
            Month::July => &self.jul,
            Month::August => &self.aug,
            Month::September => &self.sep,
            Month::October => &self.oct,
            Month::November => &self.nov,
            Month::December => &self.dec,
        };
        text.as_deref()
    }
}

/// Collections record fields.
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Student id
    pub id: String,
    /// Month code or name
    pub month: Month,
    /// `Pendente`, `Em Negociação` or `Pago` (English names accepted)
    #[arg(long)]
    pub status: Option<DebtStatus>,
    /// Amount owed, `1.234,56` format
    #[arg(long)]
    pub amount: Option<String>,
    /// Operator note
    #[arg(long)]
    pub comment: Option<String>,
}
