//! Entity module - Contains the `SeaORM` entity definitions for both ledgers.
//! Each entity has a Model struct for data and an Entity struct for operations.

/// Collections ledger records
pub mod collection;
/// Tuition ledger records
pub mod student;

// Re-export specific types to avoid conflicts
pub use collection::{
    Column as CollectionColumn, Entity as Collection, Model as CollectionModel,
};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};
