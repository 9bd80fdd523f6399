use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::config::CalendarConfig;
use crate::studio::{format_cents, Appointment};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Calendar not found: {0}")]
    NotFound(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Calendar export is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedEvent {
    pub id: String,
    pub html_link: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarExporter: Send + Sync {
    async fn create_event(&self, appointment: &Appointment) -> Result<CreatedEvent, ExportError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct GoogleEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    start: GoogleDateTime,
    end: GoogleDateTime,
    #[serde(rename = "htmlLink", skip_serializing_if = "Option::is_none")]
    html_link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GoogleDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
}

pub struct GoogleCalendarExporter {
    base_url: String,
    access_token: String,
    calendar_id: String,
    client: reqwest::Client,
}

impl GoogleCalendarExporter {
    pub fn new(access_token: String, calendar_id: String) -> Self {
        Self {
            base_url: crate::storage::config::GOOGLE_CALENDAR_BASE_URL.to_string(),
            access_token,
            calendar_id,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &CalendarConfig) -> Result<Self, ExportError> {
        if !config.is_configured() {
            return Err(ExportError::NotConfigured);
        }
        Ok(Self::new(config.access_token.clone(), config.calendar_id.clone())
            .with_base_url(config.base_url.clone()))
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    fn convert_to_google_event(&self, appointment: &Appointment) -> GoogleEvent {
        GoogleEvent {
            id: None,
            summary: Some(event_title(appointment)),
            description: Some(event_description(appointment)),
            start: GoogleDateTime {
                date_time: Some(appointment.date.to_rfc3339()),
            },
            end: GoogleDateTime {
                date_time: Some(appointment.end().to_rfc3339()),
            },
            html_link: None,
        }
    }
}

pub fn event_title(appointment: &Appointment) -> String {
    format!("{} - {}", appointment.service_type, appointment.client_name)
}

pub fn event_description(appointment: &Appointment) -> String {
    let mut lines = vec![format!("Price: {}", format_cents(appointment.price_cents))];
    if let Some(phone) = &appointment.client_phone {
        lines.push(format!("Phone: {}", phone));
    }
    if appointment.in_residence {
        lines.push("At the client's residence".to_string());
    }
    lines.join("\n")
}

#[async_trait]
impl CalendarExporter for GoogleCalendarExporter {
    async fn create_event(&self, appointment: &Appointment) -> Result<CreatedEvent, ExportError> {
        let url = self.events_url();
        let google_event = self.convert_to_google_event(appointment);

        tracing::info!("Exporting appointment {} on {}", appointment.id, appointment.date);
        tracing::debug!("POST {} with payload: {:?}", url, google_event);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&google_event)
            .send()
            .await?;

        let status = response.status();
        tracing::info!("Create event response status: {}", status);

        if status == 401 {
            tracing::error!("Authentication failed when creating event");
            return Err(ExportError::AuthenticationFailed);
        }

        if status == 404 {
            tracing::error!("Calendar not found: {}", self.calendar_id);
            return Err(ExportError::NotFound(self.calendar_id.clone()));
        }

        if status == 429 {
            tracing::warn!("Rate limit exceeded");
            return Err(ExportError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!("Failed to create event. Status: {}, Body: {}", status, body);
            return Err(ExportError::RequestError(format!("Status {}: {}", status, body)));
        }

        let created: GoogleEvent = response.json().await?;
        let id = created.id.unwrap_or_default();
        tracing::info!("Event created successfully with ID: {:?}", id);

        Ok(CreatedEvent {
            id,
            html_link: created.html_link,
        })
    }
}
