//! Ledger configuration loading from config.toml
//!
//! The file is optional. When present it can ask for sample students and
//! collections records to be seeded into an empty database.

use crate::core::tuition::StudentForm;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Seed the ledgers at startup when no student is stored yet
    #[serde(default)]
    pub seed_when_empty: bool,
    /// Students to seed
    #[serde(default)]
    pub students: Vec<StudentSeed>,
    /// Collections records to seed
    #[serde(default)]
    pub collections: Vec<CollectionSeed>,
}

/// A student to seed
#[derive(Debug, Clone, Deserialize)]
pub struct StudentSeed {
    /// Account number
    pub id: i64,
    /// Day of the month tuition is due
    pub payment_day: i32,
    /// Student name
    pub name: String,
    /// Course code
    #[serde(default)]
    pub course: String,
    /// Discount amount
    #[serde(default)]
    pub discount: f64,
    /// Monthly amounts, January first
    #[serde(default)]
    pub amounts: [f64; 12],
}

impl StudentSeed {
    /// The seed as a regular student form.
    #[must_use]
    pub fn to_form(&self) -> StudentForm {
        StudentForm {
            id: self.id,
            payment_day: self.payment_day,
            name: self.name.clone(),
            course: self.course.clone(),
            discount: self.discount,
            amounts: self.amounts,
        }
    }
}

/// A collections record to seed
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSeed {
    /// Student id
    pub id: i64,
    /// Month code or full name
    pub month: String,
    /// Amount owed; defaults to the student's tuition for the month
    #[serde(default)]
    pub amount: Option<f64>,
    /// Status label, `Pendente` when omitted
    #[serde(default)]
    pub status: Option<String>,
    /// Operator note
    #[serde(default)]
    pub comment: String,
}

/// Loads ledger configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid configuration.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LedgerConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read config file {}: {e}",
            path.as_ref().display()
        ),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.as_ref().display()),
    })
}

/// Loads ledger configuration, falling back to defaults when the file is absent.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<LedgerConfig> {
    if !path.as_ref().exists() {
        info!(
            "No config file at {}; using defaults",
            path.as_ref().display()
        );
        return Ok(LedgerConfig::default());
    }
    load_config(path)
}
