pub mod calendar_export;
pub mod reconciler;

pub use calendar_export::{CalendarExporter, CreatedEvent, ExportError, GoogleCalendarExporter};
pub use reconciler::{sync_to_calendar, SyncResult};
