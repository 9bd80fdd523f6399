use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub amount_cents: u64,
}

impl Expense {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>, amount_cents: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            amount_cents,
        }
    }
}
