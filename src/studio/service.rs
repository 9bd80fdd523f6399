use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entry of the studio's service catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub price_cents: u64,
    pub duration_minutes: u32,
}

impl Service {
    pub fn new(name: impl Into<String>, price_cents: u64, duration_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price_cents,
            duration_minutes,
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        self.name.eq_ignore_ascii_case(label.trim())
    }
}

pub fn find_service<'a>(services: &'a [Service], label: &str) -> Option<&'a Service> {
    services.iter().find(|service| service.matches(label))
}
