use chrono::{Local, LocalResult, TimeZone, Utc};
use studio_manager::{
    storage::{AppointmentStore, ServiceStore, StoreError},
    studio::{Appointment, Service},
};

/// Fills an empty store with a few services and appointments around today.
pub fn add_sample_appointments<S>(store: &S) -> Result<usize, StoreError>
where
    S: AppointmentStore + ServiceStore,
{
    if !store.list_appointments()?.is_empty() {
        return Ok(0);
    }

    let services = [
        Service::new("Makeup", 4500, 60),
        Service::new("Hairstyle", 3500, 45),
        Service::new("Bridal makeup", 12000, 120),
    ];
    for service in &services {
        store.upsert_service(service)?;
    }

    let today = Local::now().date_naive();
    let samples = [
        ("Ana Silva", 0, 10, 0, &services[0], Some("912345678"), false),
        ("Marta Costa", 0, 15, 30, &services[1], None, false),
        ("Rita Sousa", 1, 9, 0, &services[2], Some("933333333"), true),
        ("Joana Lopes", 3, 17, 0, &services[0], None, false),
        ("Inês Ferreira", -1, 11, 0, &services[1], None, false),
    ];

    let mut added = 0;
    for (client, day_offset, hour, minute, service, phone, in_residence) in samples {
        let Some(date) = today.checked_add_signed(chrono::Duration::days(day_offset)) else {
            continue;
        };
        let Some(naive) = date.and_hms_opt(hour, minute, 0) else { continue };
        let start = match Local.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            _ => continue,
        };

        let mut appointment = Appointment::new(start, &service.name, service.price_cents, client)
            .with_duration_minutes(service.duration_minutes)
            .in_residence(in_residence);
        if let Some(phone) = phone {
            appointment = appointment.with_phone(phone);
        }

        store.upsert_appointment(&appointment)?;
        added += 1;
    }

    tracing::info!("Seeded {} sample appointments", added);
    Ok(added)
}
