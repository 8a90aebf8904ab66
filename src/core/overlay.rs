//! Paid/debtor overlay for the tuition grid.
//!
//! The overlay is recomputed from two sources on every read: the numeric
//! monthly amounts of the tuition ledger and the status lookup built from the
//! collections ledger. Display strings are outputs only and are never parsed
//! back into amounts, so rendering the same ledger twice gives the same text.

use crate::{
    core::{currency, month::Month, status::DebtStatus},
    entities::{collection, student},
};
use std::collections::HashMap;
use std::fmt;

/// Mark appended to a tuition cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// The month is settled
    Paid,
    /// The month is pending or under negotiation
    Debtor,
}

impl Mark {
    /// Display suffix for the mark.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Paid => currency::PAID_MARK,
            Self::Debtor => currency::DEBTOR_MARK,
        }
    }
}

/// Status lookup keyed by (student id, month).
pub type StatusIndex = HashMap<(i64, Month), DebtStatus>;

/// One month of one student as shown in the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthCell {
    /// Month of the cell
    pub month: Month,
    /// Tuition amount from the ledger
    pub amount: f64,
    /// Derived mark, if any
    pub mark: Option<Mark>,
}

impl fmt::Display for MonthCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&currency::format(self.amount))?;
        if let Some(mark) = self.mark {
            f.write_str(mark.suffix())?;
        }
        Ok(())
    }
}

/// A student with its twelve overlaid cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TuitionRow {
    /// Underlying tuition record
    pub student: student::Model,
    /// Cells in calendar order
    pub cells: Vec<MonthCell>,
}

impl TuitionRow {
    /// Display strings for the twelve months.
    #[must_use]
    pub fn display_cells(&self) -> Vec<String> {
        self.cells.iter().map(ToString::to_string).collect()
    }
}

/// Mark for a cell with tuition `base` and collections status `status`.
///
/// No obligation means no mark, whatever the collections ledger says.
#[must_use]
pub fn mark_for(base: f64, status: Option<DebtStatus>) -> Option<Mark> {
    if base <= 0.0 {
        return None;
    }
    let status = status?;
    Some(if status.is_outstanding() {
        Mark::Debtor
    } else {
        Mark::Paid
    })
}

/// Builds the status lookup, skipping records with an unknown month or status.
#[must_use]
pub fn build_status_index(records: &[collection::Model]) -> StatusIndex {
    records
        .iter()
        .filter_map(|record| {
            let month = Month::from_full_name(&record.month)?;
            let status = record.debt_status()?;
            Some(((record.id, month), status))
        })
        .collect()
}

/// Overlays one student.
#[must_use]
pub fn overlay_student(student: student::Model, index: &StatusIndex) -> TuitionRow {
    let cells = Month::ALL
        .into_iter()
        .map(|month| {
            let amount = student.amount(month);
            MonthCell {
                month,
                amount,
                mark: mark_for(amount, index.get(&(student.id, month)).copied()),
            }
        })
        .collect();
    TuitionRow { student, cells }
}

/// Overlays every student, keeping their order.
#[must_use]
pub fn overlay_rows(students: Vec<student::Model>, index: &StatusIndex) -> Vec<TuitionRow> {
    students
        .into_iter()
        .map(|s| overlay_student(s, index))
        .collect()
}
