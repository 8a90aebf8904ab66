//! Student entity - one row of the tuition ledger.
//!
//! Each student carries twelve monthly tuition amounts. An amount of exactly
//! zero means there is no obligation for that month.

use crate::core::month::Month;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student tuition record
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Account number assigned by the school (1001-9999)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    /// Day of the month tuition is due (1-31), informational only
    pub payment_day: i32,
    /// Student name
    pub name: String,
    /// Short course code (e.g. "TQI", "FLY1")
    pub course: String,
    /// Discount granted to the student
    pub discount: f64,
    /// Tuition owed in January
    pub jan: f64,
    /// Tuition owed in February
    pub feb: f64,
    /// Tuition owed in March
    pub mar: f64,
    /// Tuition owed in April
    pub apr: f64,
    /// Tuition owed in May
    pub may: f64,
    /// Tuition owed in June
    pub jun: f64,
    /// Tuition owed in July
    pub jul: f64,
    /// Tuition owed in August
    pub aug: f64,
    /// Tuition owed in September
    pub sep: f64,
    /// Tuition owed in October
    pub oct: f64,
    /// Tuition owed in November
    pub nov: f64,
    /// Tuition owed in December
    pub dec: f64,
    /// When the student was added
    pub created_at: DateTime,
    /// When the student was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Student and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One student has many collections records
    #[sea_orm(has_many = "super::collection::Entity")]
    Collections,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Tuition amount owed for `month`.
    #[must_use]
    pub const fn amount(&self, month: Month) -> f64 {
        match month {
            Month::January => self.jan,
            Month::February => self.feb,
            Month::March => self.mar,
            Month::April => self.apr,
            Month::May => self.may,
            Month::June => self.jun,
            Month::July => self.jul,
            Month::August => self.aug,
            Month::September => self.sep,
            Month::October => self.oct,
            Month::November => self.nov,
            Month::December => self.dec,
        }
    }

    /// All twelve amounts in calendar order.
    #[must_use]
    pub const fn amounts(&self) -> [f64; 12] {
        [
            self.jan, self.feb, self.mar, self.apr, self.may, self.jun, self.jul, self.aug,
            self.sep, self.oct, self.nov, self.dec,
        ]
    }
}

impl ActiveModel {
    /// Sets the tuition amount for `month`.
    pub fn set_amount(&mut self, month: Month, amount: f64) {
        let column = match month {
            Month::January => &mut self.jan,
            Month::February => &mut self.feb,
            Month::March => &mut self.mar,
            Month::April => &mut self.apr,
            Month::May => &mut self.may,
            Month::June => &mut self.jun,
            Month::July => &mut self.jul,
            Month::August => &mut self.aug,
            Month::September => &mut self.sep,
            Month::October => &mut self.oct,
            Month::November => &mut self.nov,
            Month::December => &mut self.dec,
        };
        *column = sea_orm::Set(amount);
    }
}
