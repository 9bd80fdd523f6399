pub mod balance;
pub mod book;
pub mod filter;

pub use balance::{balance, Balance};
pub use book::{AgendaError, AppointmentBook, Notice};
pub use filter::{filter, filter_with_week_start, DateWindow, FilterMode, WeekStart};
