//! Debt status model.
//!
//! Three states, freely settable by explicit action. The quick-toggle only
//! offers a binary choice; telling Pending apart from In Negotiation is left to
//! the manual collections edit.

use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Collection state of a student-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DebtStatus {
    /// Still owed (`"Pendente"`)
    #[default]
    Pending,
    /// Owed, with a payment arrangement under discussion (`"Em Negociação"`)
    InNegotiation,
    /// Settled (`"Pago"`)
    Paid,
}

impl DebtStatus {
    /// Statuses shown in the outstanding (debtors) view.
    pub const OUTSTANDING: [Self; 2] = [Self::Pending, Self::InNegotiation];

    /// Label stored in the collections ledger.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::InNegotiation => "Em Negociação",
            Self::Paid => "Pago",
        }
    }

    /// Whether money is still owed in this state.
    #[must_use]
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending | Self::InNegotiation)
    }
}

impl FromStr for DebtStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "pendente" | "pending" => Ok(Self::Pending),
            "em negociação" | "em negociacao" | "in negotiation" | "negotiation" => {
                Ok(Self::InNegotiation)
            }
            "pago" | "paid" => Ok(Self::Paid),
            _ => Err(Error::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The binary choice offered by the quick-toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickChoice {
    /// "Pago"
    Paid,
    /// "Devedor"
    Debtor,
}

impl QuickChoice {
    /// Status written for this choice. A debtor is always recorded as Pending.
    #[must_use]
    pub const fn status(self) -> DebtStatus {
        match self {
            Self::Paid => DebtStatus::Paid,
            Self::Debtor => DebtStatus::Pending,
        }
    }
}

impl FromStr for QuickChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" | "pago" => Ok(Self::Paid),
            "debtor" | "devedor" => Ok(Self::Debtor),
            _ => Err(Error::validation(
                "choice",
                format!("'{s}' is not one of paid/pago or debtor/devedor"),
            )),
        }
    }
}
