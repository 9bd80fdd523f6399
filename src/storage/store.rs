use thiserror::Error;
use uuid::Uuid;

use crate::studio::{Appointment, Expense, Service};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to prepare database directory: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}

#[cfg_attr(test, mockall::automock)]
pub trait AppointmentStore {
    /// Every stored appointment, oldest first.
    fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError>;

    fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;

    fn upsert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError>;

    /// Returns whether a record with this id existed.
    fn delete_appointment(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ServiceStore {
    fn list_services(&self) -> Result<Vec<Service>, StoreError>;

    fn upsert_service(&self, service: &Service) -> Result<(), StoreError>;

    fn delete_service(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ExpenseStore {
    fn list_expenses(&self) -> Result<Vec<Expense>, StoreError>;

    fn upsert_expense(&self, expense: &Expense) -> Result<(), StoreError>;

    fn delete_expense(&self, id: Uuid) -> Result<bool, StoreError>;
}
