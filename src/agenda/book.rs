use chrono::{DateTime, TimeZone};
use thiserror::Error;

use crate::agenda::filter::{filter_with_week_start, FilterMode, WeekStart};
use crate::storage::{AppointmentStore, StoreError};
use crate::studio::Appointment;
use crate::sync::{sync_to_calendar, CalendarExporter, SyncResult};

#[derive(Debug, Error)]
pub enum AgendaError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("No appointment at position {0}")]
    NoSuchAppointment(usize),
}

/// A user-facing message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn for_sync(result: &SyncResult) -> Self {
        if result.has_failures() {
            Notice::Error(result.message())
        } else {
            Notice::Success(result.message())
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Notice::Error(text) | Notice::Success(text) => text,
        }
    }
}

impl From<&AgendaError> for Notice {
    fn from(error: &AgendaError) -> Self {
        match error {
            AgendaError::Storage(_) => {
                Notice::Error("Could not access saved appointments.".to_string())
            }
            AgendaError::NoSuchAppointment(index) => {
                Notice::Error(format!("There is no appointment number {}.", index + 1))
            }
        }
    }
}

/// Appointments loaded from a store together with the currently filtered view.
pub struct AppointmentBook<S> {
    store: S,
    all: Vec<Appointment>,
    visible: Vec<Appointment>,
    mode: FilterMode,
    week_start: WeekStart,
}

impl<S: AppointmentStore> AppointmentBook<S> {
    pub fn new(store: S, week_start: WeekStart) -> Self {
        Self {
            store,
            all: Vec::new(),
            visible: Vec::new(),
            mode: FilterMode::default(),
            week_start,
        }
    }

    pub fn with_filter(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.visible
    }

    pub fn all_appointments(&self) -> &[Appointment] {
        &self.all
    }

    pub fn refresh<Tz: TimeZone>(
        &mut self,
        now: &DateTime<Tz>,
    ) -> Result<&[Appointment], AgendaError> {
        self.all = self.store.list_appointments()?;
        tracing::debug!("Loaded {} appointments", self.all.len());
        Ok(self.apply_filter(self.mode, now))
    }

    pub fn apply_filter<Tz: TimeZone>(
        &mut self,
        mode: FilterMode,
        now: &DateTime<Tz>,
    ) -> &[Appointment] {
        self.mode = mode;
        self.visible = filter_with_week_start(mode, &self.all, now, self.week_start);
        &self.visible
    }

    /// Deletes the visible appointment at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Appointment, AgendaError> {
        let appointment = self
            .visible
            .get(index)
            .cloned()
            .ok_or(AgendaError::NoSuchAppointment(index))?;

        if !self.store.delete_appointment(appointment.id)? {
            tracing::warn!("Appointment {} was already missing from storage", appointment.id);
        }

        self.visible.remove(index);
        self.all.retain(|a| a.id != appointment.id);
        tracing::info!("Removed appointment {}", appointment.id);
        Ok(appointment)
    }

    pub async fn sync_to_calendar<E, Tz>(&mut self, exporter: &E, now: &DateTime<Tz>) -> SyncResult
    where
        E: CalendarExporter + ?Sized,
        Tz: TimeZone,
    {
        let result = sync_to_calendar(&mut self.all, exporter, &self.store).await;
        self.apply_filter(self.mode, now);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::store::MockAppointmentStore;
    use crate::storage::SqliteStore;
    use crate::sync::calendar_export::{CreatedEvent, ExportError, MockCalendarExporter};
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap()
    }

    fn seeded_book() -> AppointmentBook<SqliteStore> {
        let store = SqliteStore::in_memory().unwrap();
        let clients = [("Today", 0), ("Tomorrow", 1), ("Next month", 30)];
        for (client, days) in clients {
            let appointment =
                Appointment::new(now() + Duration::days(days), "Makeup", 4000, client);
            store.upsert_appointment(&appointment).unwrap();
        }
        AppointmentBook::new(store, WeekStart::Monday)
    }

    fn names(appointments: &[Appointment]) -> Vec<&str> {
        appointments.iter().map(|a| a.client_name.as_str()).collect()
    }

    #[test]
    fn refresh_applies_current_filter() {
        let mut book = seeded_book();

        let visible = book.refresh(&now()).unwrap();

        assert_eq!(names(visible), vec!["Today"]);
        assert_eq!(book.all_appointments().len(), 3);
    }

    #[test]
    fn changing_filter_recomputes_visible_appointments() {
        let mut book = seeded_book();
        book.refresh(&now()).unwrap();

        let week = names(book.apply_filter(FilterMode::ThisWeek, &now())).len();
        let all = names(book.apply_filter(FilterMode::All, &now())).len();

        assert_eq!(week, 2);
        assert_eq!(all, 3);
        assert_eq!(book.mode(), FilterMode::All);
    }

    #[test]
    fn remove_deletes_from_store_and_both_lists() {
        let mut book = seeded_book().with_filter(FilterMode::ThisWeek);
        book.refresh(&now()).unwrap();

        let removed = book.remove(1).unwrap();

        assert_eq!(removed.client_name, "Tomorrow");
        assert_eq!(names(book.appointments()), vec!["Today"]);
        assert_eq!(book.all_appointments().len(), 2);
        assert_eq!(book.store().list_appointments().unwrap().len(), 2);
    }

    #[test]
    fn remove_out_of_range_is_an_error() {
        let mut book = seeded_book();
        book.refresh(&now()).unwrap();

        let result = book.remove(5);

        assert!(matches!(result, Err(AgendaError::NoSuchAppointment(5))));
        assert_eq!(book.appointments().len(), 1);
    }

    #[test]
    fn storage_failure_surfaces_as_error_notice() {
        let mut store = MockAppointmentStore::new();
        store.expect_list_appointments().returning(|| {
            Err(StoreError::InvalidRecord {
                id: "x".to_string(),
                reason: "corrupt".to_string(),
            })
        });
        let mut book = AppointmentBook::new(store, WeekStart::Monday);

        let error = book.refresh(&now()).unwrap_err();

        assert_eq!(
            Notice::from(&error),
            Notice::Error("Could not access saved appointments.".to_string())
        );
    }

    #[test]
    fn failed_delete_keeps_appointment_visible() {
        let appointment = Appointment::new(now(), "Nails", 2000, "Keep");
        let listed = appointment.clone();
        let mut store = MockAppointmentStore::new();
        store
            .expect_list_appointments()
            .returning(move || Ok(vec![listed.clone()]));
        store.expect_delete_appointment().returning(|_| {
            Err(StoreError::InvalidRecord {
                id: "x".to_string(),
                reason: "locked".to_string(),
            })
        });
        let mut book = AppointmentBook::new(store, WeekStart::Monday);
        book.refresh(&now()).unwrap();

        assert!(matches!(book.remove(0), Err(AgendaError::Storage(_))));
        assert_eq!(book.appointments(), &[appointment][..]);
    }

    #[tokio::test]
    async fn sync_updates_records_and_view() {
        let mut book = seeded_book().with_filter(FilterMode::All);
        book.refresh(&now()).unwrap();
        let failing_id = book.appointments()[2].id;

        let mut exporter = MockCalendarExporter::new();
        exporter.expect_create_event().returning(move |a| {
            if a.id == failing_id {
                Err(ExportError::RateLimited)
            } else {
                Ok(CreatedEvent {
                    id: format!("evt_{}", a.id),
                    html_link: None,
                })
            }
        });

        let result = book.sync_to_calendar(&exporter, &now()).await;

        assert_eq!(result, SyncResult::Completed { succeeded: 2, failed: 1 });
        assert_eq!(
            Notice::for_sync(&result),
            Notice::Error("Added 2 appointment(s) to the calendar; 1 failed.".to_string())
        );
        let flags: Vec<bool> = book.appointments().iter().map(|a| a.added_to_calendar).collect();
        assert_eq!(flags, vec![true, true, false]);
        let stored: Vec<bool> = book
            .store()
            .list_appointments()
            .unwrap()
            .iter()
            .map(|a| a.added_to_calendar)
            .collect();
        assert_eq!(stored, vec![true, true, false]);
    }

    #[tokio::test]
    async fn second_sync_has_nothing_to_do() {
        let mut book = seeded_book();
        book.refresh(&now()).unwrap();
        let mut exporter = MockCalendarExporter::new();
        exporter.expect_create_event().times(3).returning(|_| {
            Ok(CreatedEvent {
                id: "evt".to_string(),
                html_link: None,
            })
        });

        book.sync_to_calendar(&exporter, &now()).await;
        let second = book.sync_to_calendar(&exporter, &now()).await;

        assert_eq!(second, SyncResult::NothingToSync);
        assert_eq!(
            Notice::for_sync(&second),
            Notice::Success("No appointments to add to the calendar.".to_string())
        );
    }
}
