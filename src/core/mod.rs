//! Core business logic for the tuition and collections ledgers.
//!
//! Everything here is independent of the operator surface: commands take a
//! database connection and typed input, and return models or typed errors.

/// Collections ledger commands
pub mod collections;
/// `1.234,56` currency display codec
pub mod currency;
/// Calendar months, codes and Portuguese names
pub mod month;
/// Paid/debtor overlay over the tuition grid
pub mod overlay;
/// Filtering and read views
pub mod query;
/// Transaction-scoped propagation between the two ledgers
pub mod reconcile;
/// Sample data for an empty ledger
pub mod seed;
/// Debt statuses and the quick-toggle choice
pub mod status;
/// Tuition ledger commands
pub mod tuition;

pub use month::Month;
pub use status::{DebtStatus, QuickChoice};
