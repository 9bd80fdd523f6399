use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Result as SqliteResult};
use uuid::Uuid;

use crate::storage::store::{AppointmentStore, ExpenseStore, ServiceStore, StoreError};
use crate::studio::{Appointment, Expense, Service};

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self::new(Connection::open(path)?);
        store.initialize()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Self::new(Connection::open_in_memory()?);
        store.initialize()?;
        Ok(store)
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS appointments (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                added_to_calendar INTEGER NOT NULL,
                data TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS services (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS expenses (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                data TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn table_exists(&self, table_name: &str) -> bool {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table_name],
            |row| row.get(0),
        );
        result.unwrap_or(0) > 0
    }

    fn load_all<T: serde::de::DeserializeOwned>(&self, sql: &str) -> Result<Vec<T>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for data in rows {
            records.push(serde_json::from_str(&data?)?);
        }
        Ok(records)
    }

    fn delete_by_id(&self, table: &str, id: Uuid) -> Result<bool, StoreError> {
        let affected = self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", table),
            [id.to_string()],
        )?;
        Ok(affected > 0)
    }
}

impl AppointmentStore for SqliteStore {
    fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        self.load_all("SELECT data FROM appointments ORDER BY date ASC")
    }

    fn find_appointment(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM appointments WHERE id = ?1",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    fn upsert_appointment(&self, appointment: &Appointment) -> Result<(), StoreError> {
        let data = serde_json::to_string(appointment)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO appointments (id, date, added_to_calendar, data)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                appointment.id.to_string(),
                appointment.date.to_rfc3339(),
                appointment.added_to_calendar,
                &data,
            ],
        )?;
        tracing::debug!("Stored appointment {}", appointment.id);
        Ok(())
    }

    fn delete_appointment(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_by_id("appointments", id)
    }
}

impl ServiceStore for SqliteStore {
    fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        self.load_all("SELECT data FROM services ORDER BY name COLLATE NOCASE ASC")
    }

    fn upsert_service(&self, service: &Service) -> Result<(), StoreError> {
        if service.name.trim().is_empty() {
            return Err(StoreError::InvalidRecord {
                id: service.id.to_string(),
                reason: "service name is empty".to_string(),
            });
        }

        let data = serde_json::to_string(service)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO services (id, name, data) VALUES (?1, ?2, ?3)",
            rusqlite::params![service.id.to_string(), &service.name, &data],
        )?;
        Ok(())
    }

    fn delete_service(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_by_id("services", id)
    }
}

impl ExpenseStore for SqliteStore {
    fn list_expenses(&self) -> Result<Vec<Expense>, StoreError> {
        self.load_all("SELECT data FROM expenses ORDER BY date ASC")
    }

    fn upsert_expense(&self, expense: &Expense) -> Result<(), StoreError> {
        let data = serde_json::to_string(expense)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO expenses (id, date, data) VALUES (?1, ?2, ?3)",
            rusqlite::params![expense.id.to_string(), expense.date.to_rfc3339(), &data],
        )?;
        Ok(())
    }

    fn delete_expense(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_by_id("expenses", id)
    }
}
