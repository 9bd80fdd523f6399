use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday,
};
use serde::{Deserialize, Serialize};

use crate::studio::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    Today,
    ThisWeek,
    ThisMonth,
    All,
}

impl FilterMode {
    pub const ALL_MODES: [FilterMode; 4] = [
        FilterMode::Today,
        FilterMode::ThisWeek,
        FilterMode::ThisMonth,
        FilterMode::All,
    ];

    /// The wall-clock window this mode selects around `today`, or `None` for `All`.
    pub fn window(self, today: NaiveDate, week_start: WeekStart) -> Option<DateWindow> {
        let (first, last_exclusive) = match self {
            FilterMode::All => return None,
            FilterMode::Today => (today, today.checked_add_days(Days::new(1))),
            FilterMode::ThisWeek => {
                let first = week_start.first_day_of_week(today);
                (first, first.checked_add_days(Days::new(7)))
            }
            FilterMode::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                (first, first.checked_add_months(Months::new(1)))
            }
        };

        Some(DateWindow {
            start: first.and_time(NaiveTime::MIN),
            end: last_exclusive
                .map(|day| day.and_time(NaiveTime::MIN))
                .unwrap_or(NaiveDateTime::MAX),
        })
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FilterMode::Today => "today",
            FilterMode::ThisWeek => "this week",
            FilterMode::ThisMonth => "this month",
            FilterMode::All => "all",
        };
        f.write_str(label)
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "day" => Ok(FilterMode::Today),
            "week" | "this_week" | "thisweek" => Ok(FilterMode::ThisWeek),
            "month" | "this_month" | "thismonth" => Ok(FilterMode::ThisMonth),
            "all" => Ok(FilterMode::All),
            other => Err(format!(
                "Unknown filter '{}'. Use today, week, month or all.",
                other
            )),
        }
    }
}

/// First day of the calendar week. Monday (ISO 8601) unless configured otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Mon,
            WeekStart::Sunday => Weekday::Sun,
        }
    }

    pub fn first_day_of_week(self, date: NaiveDate) -> NaiveDate {
        let offset = (7 + date.weekday().num_days_from_monday()
            - self.weekday().num_days_from_monday())
            % 7;
        date.checked_sub_days(Days::new(u64::from(offset)))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Half-open `[start, end)` range of local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn contains(&self, moment: NaiveDateTime) -> bool {
        self.start <= moment && moment < self.end
    }

    pub fn contains_instant<Tz: TimeZone, Other: TimeZone>(
        &self,
        instant: &DateTime<Other>,
        zone: &Tz,
    ) -> bool {
        self.contains(instant.with_timezone(zone).naive_local())
    }
}

/// Appointments dated inside the window of `mode` around `now`, in input order.
/// Weeks start on Monday.
pub fn filter<Tz: TimeZone>(
    mode: FilterMode,
    appointments: &[Appointment],
    now: &DateTime<Tz>,
) -> Vec<Appointment> {
    filter_with_week_start(mode, appointments, now, WeekStart::Monday)
}

pub fn filter_with_week_start<Tz: TimeZone>(
    mode: FilterMode,
    appointments: &[Appointment],
    now: &DateTime<Tz>,
    week_start: WeekStart,
) -> Vec<Appointment> {
    let Some(window) = mode.window(now.date_naive(), week_start) else {
        return appointments.to_vec();
    };

    let zone = now.timezone();
    appointments
        .iter()
        .filter(|appointment| window.contains_instant(&appointment.date, &zone))
        .cloned()
        .collect()
}
