//! Collection entity - one row of the collections ledger.
//!
//! A record exists per (student, month) only while that month is being followed
//! up: it stores the payment status and the operator's note. `amount`, `name` and
//! `course` are cached copies of the tuition ledger kept in sync by
//! [`crate::core::reconcile`].

use crate::core::status::DebtStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Collections record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    /// Student id, references `students.id`
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Full month name (e.g. `"Janeiro"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: String,
    /// Cached student name
    pub name: String,
    /// Cached course code
    pub course: String,
    /// Amount owed for the month
    pub amount: f64,
    /// Stored status label: `"Pendente"`, `"Em Negociação"` or `"Pago"`
    pub status: String,
    /// Free-text note from the collections workflow
    pub comment: String,
    /// When the record was last written
    pub updated_at: DateTime,
}

/// Defines relationships between Collection and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one student and goes away with it
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::Id",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parsed status, `None` when the stored label is not one of the three known states.
    #[must_use]
    pub fn debt_status(&self) -> Option<DebtStatus> {
        self.status.parse().ok()
    }
}
