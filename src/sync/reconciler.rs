use crate::storage::AppointmentStore;
use crate::studio::Appointment;
use crate::sync::calendar_export::CalendarExporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncResult {
    NothingToSync,
    Completed { succeeded: usize, failed: usize },
}

impl SyncResult {
    pub fn is_partial(&self) -> bool {
        matches!(self, SyncResult::Completed { succeeded, failed } if *succeeded > 0 && *failed > 0)
    }

    pub fn has_failures(&self) -> bool {
        matches!(self, SyncResult::Completed { failed, .. } if *failed > 0)
    }

    pub fn message(&self) -> String {
        match self {
            SyncResult::NothingToSync => "No appointments to add to the calendar.".to_string(),
            SyncResult::Completed { succeeded, failed: 0 } => {
                format!("All {} appointment(s) were added to the calendar.", succeeded)
            }
            SyncResult::Completed { succeeded: 0, failed } => {
                format!("Could not add {} appointment(s) to the calendar.", failed)
            }
            SyncResult::Completed { succeeded, failed } => format!(
                "Added {} appointment(s) to the calendar; {} failed.",
                succeeded, failed
            ),
        }
    }
}

/// Exports every appointment not yet in the calendar, one at a time and in
/// input order. Each successful export is persisted once and replaces the
/// record at its index in `appointments`. Failures are counted, never retried,
/// and do not stop the batch.
pub async fn sync_to_calendar<E, S>(
    appointments: &mut [Appointment],
    exporter: &E,
    store: &S,
) -> SyncResult
where
    E: CalendarExporter + ?Sized,
    S: AppointmentStore + ?Sized,
{
    let pending: Vec<usize> = appointments
        .iter()
        .enumerate()
        .filter(|(_, appointment)| !appointment.added_to_calendar)
        .map(|(index, _)| index)
        .collect();

    if pending.is_empty() {
        tracing::info!("Calendar sync: nothing to export");
        return SyncResult::NothingToSync;
    }

    tracing::info!("Calendar sync: exporting {} appointment(s)", pending.len());

    let mut succeeded = 0;
    let mut failed = 0;

    for index in pending {
        let appointment = &appointments[index];

        match exporter.create_event(appointment).await {
            Ok(created) => {
                tracing::debug!("Appointment {} exported as event {}", appointment.id, created.id);
                let updated = appointment.marked_added_to_calendar();

                // A write failure here leaves storage behind the calendar; the
                // store owns that inconsistency.
                if let Err(e) = store.upsert_appointment(&updated) {
                    tracing::error!(
                        "Appointment {} exported but could not be saved: {}",
                        updated.id,
                        e
                    );
                }

                appointments[index] = updated;
                succeeded += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to export appointment {}: {}", appointment.id, e);
                failed += 1;
            }
        }
    }

    tracing::info!("Calendar sync finished: {} exported, {} failed", succeeded, failed);
    SyncResult::Completed { succeeded, failed }
}
