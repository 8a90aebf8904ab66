//! Calendar months as used by both ledgers.
//!
//! The tuition ledger addresses months by short code (`jan`..`dec`, one column
//! each) while the collections ledger stores the full Portuguese month name.

use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A calendar month, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    /// Janeiro
    January,
    /// Fevereiro
    February,
    /// Março
    March,
    /// Abril
    April,
    /// Maio
    May,
    /// Junho
    June,
    /// Julho
    July,
    /// Agosto
    August,
    /// Setembro
    September,
    /// Outubro
    October,
    /// Novembro
    November,
    /// Dezembro
    December,
}

impl Month {
    /// All months, January first.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Short code used as the tuition column name.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::January => "jan",
            Self::February => "feb",
            Self::March => "mar",
            Self::April => "apr",
            Self::May => "may",
            Self::June => "jun",
            Self::July => "jul",
            Self::August => "aug",
            Self::September => "sep",
            Self::October => "oct",
            Self::November => "nov",
            Self::December => "dec",
        }
    }

    /// Full month name as stored in the collections ledger.
    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Self::January => "Janeiro",
            Self::February => "Fevereiro",
            Self::March => "Março",
            Self::April => "Abril",
            Self::May => "Maio",
            Self::June => "Junho",
            Self::July => "Julho",
            Self::August => "Agosto",
            Self::September => "Setembro",
            Self::October => "Outubro",
            Self::November => "Novembro",
            Self::December => "Dezembro",
        }
    }

    /// Three-letter column heading for the tuition grid.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::January => "JAN",
            Self::February => "FEV",
            Self::March => "MAR",
            Self::April => "ABR",
            Self::May => "MAI",
            Self::June => "JUN",
            Self::July => "JUL",
            Self::August => "AGO",
            Self::September => "SET",
            Self::October => "OUT",
            Self::November => "NOV",
            Self::December => "DEZ",
        }
    }

    /// Zero-based position in the calendar.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Looks up a month by its stored full name (exact match).
    #[must_use]
    pub fn from_full_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.full_name() == name)
    }

    /// Sort key for a stored month name: calendar position, unknown names last.
    #[must_use]
    pub fn sort_key(name: &str) -> usize {
        Self::from_full_name(name).map_or(usize::MAX, Self::index)
    }

    /// Parses operator input: a short code or a full name, case-insensitive.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMonth`] naming the input when nothing matches.
    pub fn parse(text: &str) -> Result<Self> {
        let wanted = text.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.code() == wanted || m.full_name().to_lowercase() == wanted)
            .ok_or_else(|| Error::InvalidMonth {
                value: text.to_string(),
            })
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}
