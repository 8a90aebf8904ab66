//! Plain text tables for the tuition grid and the debtors list.

use crate::{
    core::{currency, month::Month, overlay::TuitionRow, query::Listing},
    entities::collection,
};
use std::fmt::Write;

fn width(text: &str) -> usize {
    text.chars().count()
}

/// Lays out rows under a header, left-aligned, columns separated by two spaces.
fn table(header: &[String], rows: &[Vec<String>]) -> Result<String, std::fmt::Error> {
    let mut widths: Vec<usize> = header.iter().map(|h| width(h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(width(cell));
        }
    }

    let mut out = String::new();
    for line in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        let mut text = String::new();
        for (cell, &w) in line.iter().zip(&widths) {
            write!(text, "{cell:<w$}  ")?;
        }
        writeln!(out, "{}", text.trim_end())?;
    }
    Ok(out)
}

/// Renders the tuition grid. Empty listings become a one-line message.
///
/// # Errors
/// Only fails if writing to the output buffer fails.
pub fn tuition_table(listing: &Listing<TuitionRow>) -> Result<String, std::fmt::Error> {
    let rows = match listing {
        Listing::Rows(rows) => rows,
        Listing::NoMatches(term) => return Ok(format!("No students match '{term}'.\n")),
        Listing::Empty => return Ok("No students registered.\n".to_string()),
    };

    let mut header: Vec<String> = ["ID", "DIA", "NOME", "CURSO", "DESCONTO"]
        .iter()
        .map(ToString::to_string)
        .collect();
    header.extend(Month::ALL.iter().map(|m| m.heading().to_string()));

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let s = &row.student;
            let mut cells = vec![
                s.id.to_string(),
                s.payment_day.to_string(),
                s.name.clone(),
                s.course.clone(),
                currency::format(s.discount),
            ];
            cells.extend(row.display_cells());
            cells
        })
        .collect();

    table(&header, &body)
}

/// Renders the debtors list. Empty listings become a one-line message.
///
/// # Errors
/// Only fails if writing to the output buffer fails.
pub fn debtors_table(listing: &Listing<collection::Model>) -> Result<String, std::fmt::Error> {
    let records = match listing {
        Listing::Rows(records) => records,
        Listing::NoMatches(term) => return Ok(format!("No debtors match '{term}'.\n")),
        Listing::Empty => return Ok("No outstanding months.\n".to_string()),
    };

    let header: Vec<String> = ["ID", "NOME", "CURSO", "MÊS", "VALOR", "STATUS", "COMENTÁRIO"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let body: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.course.clone(),
                r.month.clone(),
                currency::format(r.amount),
                r.status.clone(),
                r.comment.clone(),
            ]
        })
        .collect();

    table(&header, &body)
}
