pub mod agenda;
pub mod storage;
pub mod studio;
pub mod sync;

pub use agenda::{filter, AppointmentBook, FilterMode, Notice, WeekStart};
pub use studio::{Appointment, Expense, Service};
pub use sync::{sync_to_calendar, SyncResult};
