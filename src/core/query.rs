//! Read-side queries: filtering, the tuition view and the outstanding view.

use crate::{
    core::{
        month::Month,
        overlay::{self, TuitionRow},
        status::DebtStatus,
    },
    entities::{Collection, Student, collection, student},
    errors::Result,
};
use sea_orm::{QueryOrder, prelude::*};
use tracing::{debug, instrument};

/// A parsed filter term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTerm {
    /// No filtering
    All,
    /// Exact student id
    Id(i64),
    /// Case-insensitive substring of the name, already lowercased
    Name(String),
}

impl FilterTerm {
    /// Interprets raw operator text.
    ///
    /// Blank text means no filter. Text made only of ASCII digits that fits an
    /// id is an id match; anything else is a name substring.
    #[must_use]
    pub fn parse(term: Option<&str>) -> Self {
        let Some(trimmed) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::All;
        };
        let all_digits = trimmed.chars().all(|c| c.is_ascii_digit());
        if let (true, Ok(id)) = (all_digits, trimmed.parse::<i64>()) {
            return Self::Id(id);
        }
        Self::Name(trimmed.to_lowercase())
    }

    /// Whether a record with this id and name passes the filter.
    #[must_use]
    pub fn matches(&self, id: i64, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Id(wanted) => *wanted == id,
            Self::Name(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Outcome of a read.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    /// Matching rows
    Rows(Vec<T>),
    /// A filter was given and nothing matched it
    NoMatches(String),
    /// No filter was given and there is nothing stored
    Empty,
}

impl<T> Listing<T> {
    fn from_rows(rows: Vec<T>, term: Option<&str>) -> Self {
        if !rows.is_empty() {
            return Self::Rows(rows);
        }
        match term.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => Self::NoMatches(t.to_string()),
            None => Self::Empty,
        }
    }

    /// The rows, empty unless this is [`Listing::Rows`].
    #[must_use]
    pub fn rows(&self) -> &[T] {
        match self {
            Self::Rows(rows) => rows,
            Self::NoMatches(_) | Self::Empty => &[],
        }
    }
}

async fn filtered_students(
    db: &DatabaseConnection,
    filter: &FilterTerm,
) -> Result<Vec<student::Model>> {
    let mut query = Student::find().order_by_asc(student::Column::Id);
    if let FilterTerm::Id(id) = filter {
        query = query.filter(student::Column::Id.eq(*id));
    }
    let students = query.all(db).await?;
    Ok(students
        .into_iter()
        .filter(|s| filter.matches(s.id, &s.name))
        .collect())
}

/// Students matching `term`, ordered by id.
#[instrument(skip(db))]
pub async fn list_students(
    db: &DatabaseConnection,
    term: Option<&str>,
) -> Result<Listing<student::Model>> {
    let filter = FilterTerm::parse(term);
    let students = filtered_students(db, &filter).await?;
    debug!("Listed {} students", students.len());
    Ok(Listing::from_rows(students, term))
}

/// Students matching `term` with the paid/debtor overlay applied.
///
/// Only the collections records of the listed students are consulted.
#[instrument(skip(db))]
pub async fn tuition_view(
    db: &DatabaseConnection,
    term: Option<&str>,
) -> Result<Listing<TuitionRow>> {
    let filter = FilterTerm::parse(term);
    let students = filtered_students(db, &filter).await?;
    if students.is_empty() {
        return Ok(Listing::from_rows(Vec::new(), term));
    }

    let ids: Vec<i64> = students.iter().map(|s| s.id).collect();
    let records = Collection::find()
        .filter(collection::Column::Id.is_in(ids))
        .all(db)
        .await?;
    let index = overlay::build_status_index(&records);

    Ok(Listing::from_rows(
        overlay::overlay_rows(students, &index),
        term,
    ))
}

/// Pending and in-negotiation records matching `term`, ordered by id then
/// calendar month with unknown month names last.
#[instrument(skip(db))]
pub async fn list_outstanding(
    db: &DatabaseConnection,
    term: Option<&str>,
) -> Result<Listing<collection::Model>> {
    let filter = FilterTerm::parse(term);
    let labels = DebtStatus::OUTSTANDING.map(DebtStatus::label);

    let mut query = Collection::find().filter(collection::Column::Status.is_in(labels));
    if let FilterTerm::Id(id) = filter {
        query = query.filter(collection::Column::Id.eq(id));
    }
    let mut records: Vec<collection::Model> = query
        .all(db)
        .await?
        .into_iter()
        .filter(|r| filter.matches(r.id, &r.name))
        .collect();
    records.sort_by_key(|r| (r.id, Month::sort_key(&r.month)));

    debug!("Listed {} outstanding records", records.len());
    Ok(Listing::from_rows(records, term))
}
