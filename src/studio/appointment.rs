use std::hash::{Hash, Hasher};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNNAMED_CLIENT: &str = "No name";

/// A booked client service. Identity is the `id` alone: two records with the
/// same id are the same appointment even while an update is in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub price_cents: u64,
    pub service_type: String,
    pub in_residence: bool,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub duration_minutes: u32,
    pub added_to_calendar: bool,
}

impl Appointment {
    pub fn new(
        date: DateTime<Utc>,
        service_type: impl Into<String>,
        price_cents: u64,
        client_name: impl Into<String>,
    ) -> Self {
        let client_name = client_name.into();
        let client_name = if client_name.trim().is_empty() {
            UNNAMED_CLIENT.to_string()
        } else {
            client_name
        };

        Self {
            id: Uuid::new_v4(),
            date,
            price_cents,
            service_type: service_type.into(),
            in_residence: false,
            client_name,
            client_phone: None,
            duration_minutes: 0,
            added_to_calendar: false,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        let phone = phone.into();
        self.client_phone = (!phone.trim().is_empty()).then_some(phone);
        self
    }

    pub fn with_duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn in_residence(mut self, in_residence: bool) -> Self {
        self.in_residence = in_residence;
        self
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.date + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Copy of this record with only the calendar flag raised.
    pub fn marked_added_to_calendar(&self) -> Self {
        Self {
            added_to_calendar: true,
            ..self.clone()
        }
    }
}

impl PartialEq for Appointment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Appointment {}

impl Hash for Appointment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
