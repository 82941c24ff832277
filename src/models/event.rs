//! Event model

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::recurrence::{DateWindow, Recurrence};
use crate::utils::errors::RecurrenceError;

/// Category of a political event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    PartyEvent,
    GoverningBodyEvent,
    Volunteer,
    Advocacy,
    Rally,
    Forum,
    Community,
    Uncategorized,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::PartyEvent => "party-event",
            EventType::GoverningBodyEvent => "governing-body-event",
            EventType::Volunteer => "volunteer",
            EventType::Advocacy => "advocacy",
            EventType::Rally => "rally",
            EventType::Forum => "forum",
            EventType::Community => "community",
            EventType::Uncategorized => "uncategorized",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "party-event" => EventType::PartyEvent,
            "governing-body-event" => EventType::GoverningBodyEvent,
            "volunteer" => EventType::Volunteer,
            "advocacy" => EventType::Advocacy,
            "rally" => EventType::Rally,
            "forum" => EventType::Forum,
            "community" => EventType::Community,
            _ => EventType::Uncategorized,
        }
    }
}

impl Default for EventType {
    fn default() -> Self {
        EventType::Uncategorized
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub url: String,
    pub description: String,
    pub venue_id: Option<i64>,
    pub host_id: Option<i64>,
    /// Time-of-day the event starts and ends on each occurrence date.
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Base instant of the recurrence (dtstart); for one-off events, the
    /// single occurrence itself.
    pub starts_at: DateTime<Utc>,
    /// RRULE text; absent for one-off events.
    pub recurrence: Option<String>,
    pub event_type: EventType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// The stored rule in validated form, or `None` for one-off events.
    pub fn recurrence_rule(&self) -> Result<Option<Recurrence>, RecurrenceError> {
        self.recurrence
            .as_deref()
            .map(|rule| Recurrence::parse(rule, self.starts_at))
            .transpose()
    }

    /// Does the event have at least one occurrence inside the window?
    pub fn occurs_within(&self, window: DateWindow) -> Result<bool, RecurrenceError> {
        match self.recurrence_rule()? {
            Some(rule) => Ok(rule.occurs_within(window)),
            None => Ok(window.contains(self.starts_at)),
        }
    }

    /// Concrete occurrence instants inside the window, ascending.
    pub fn occurrences(&self, window: DateWindow) -> Result<Vec<DateTime<Utc>>, RecurrenceError> {
        match self.recurrence_rule()? {
            Some(rule) => Ok(rule.between(window)),
            None if window.contains(self.starts_at) => Ok(vec![self.starts_at]),
            None => Ok(Vec::new()),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Default event start: the next full hour.
pub fn default_start_time() -> NaiveTime {
    on_the_hour(1)
}

/// Default event end: two hours out, on the hour.
pub fn default_end_time() -> NaiveTime {
    on_the_hour(2)
}

fn on_the_hour(hours_ahead: i64) -> NaiveTime {
    let t = (Utc::now() + Duration::hours(hours_ahead)).time();
    t.with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(t)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    /// Pre-assigned slug; derived from the title when absent.
    pub slug: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub venue_id: Option<i64>,
    pub host_id: Option<i64>,
    /// Defaults to the next full hour when absent.
    pub start_time: Option<NaiveTime>,
    /// Defaults to two hours out when absent.
    pub end_time: Option<NaiveTime>,
    pub starts_at: DateTime<Utc>,
    pub recurrence: Option<String>,
    pub event_type: Option<EventType>,
}

/// Partial update; the slug is immutable after creation.
///
/// `None` leaves a field unchanged, so the nullable columns carry explicit
/// clear flags: `clear_recurrence` turns a recurring event back into a
/// one-off, `clear_venue`/`clear_host` detach the event. A clear flag wins
/// over a value supplied in the same request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub venue_id: Option<i64>,
    pub host_id: Option<i64>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub starts_at: Option<DateTime<Utc>>,
    pub recurrence: Option<String>,
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub clear_venue: bool,
    #[serde(default)]
    pub clear_host: bool,
    #[serde(default)]
    pub clear_recurrence: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn event(starts_at: DateTime<Utc>, recurrence: Option<&str>) -> Event {
        Event {
            id: 1,
            title: "Weekly Forum".to_string(),
            slug: "weekly-forum".to_string(),
            url: String::new(),
            description: String::new(),
            venue_id: None,
            host_id: None,
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            starts_at,
            recurrence: recurrence.map(|s| s.to_string()),
            event_type: EventType::Forum,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_update_request_clears_nothing_by_default() {
        let request = UpdateEventRequest::default();
        assert!(!request.clear_venue);
        assert!(!request.clear_host);
        assert!(!request.clear_recurrence);

        // Requests serialized before the clear flags existed still parse
        let request: UpdateEventRequest =
            serde_json::from_str(r#"{"title": "Renamed Forum"}"#).unwrap();
        assert_eq!(request.title.as_deref(), Some("Renamed Forum"));
        assert!(!request.clear_recurrence);
    }

    #[test]
    fn test_one_off_event_membership() {
        let e = event(utc(2024, 5, 10), None);
        let window = DateWindow::new(utc(2024, 5, 1), utc(2024, 5, 31));
        assert!(e.occurs_within(window).unwrap());
        assert_eq!(e.occurrences(window).unwrap(), vec![utc(2024, 5, 10)]);

        let window = DateWindow::new(utc(2024, 6, 1), utc(2024, 6, 30));
        assert!(!e.occurs_within(window).unwrap());
        assert!(e.occurrences(window).unwrap().is_empty());
    }

    #[test]
    fn test_recurring_event_expansion() {
        let e = event(utc(2024, 1, 1), Some("FREQ=WEEKLY;BYDAY=MO"));
        let window = DateWindow::new(utc(2024, 1, 1), utc(2024, 1, 15));
        assert_eq!(
            e.occurrences(window).unwrap(),
            vec![utc(2024, 1, 1), utc(2024, 1, 8), utc(2024, 1, 15)]
        );
    }

    #[test]
    fn test_malformed_rule_is_an_error() {
        let e = event(utc(2024, 1, 1), Some("FREQ=SOMETIMES"));
        let window = DateWindow::new(utc(2024, 1, 1), utc(2024, 1, 15));
        assert!(e.occurs_within(window).is_err());
        assert!(e.occurrences(window).is_err());
    }

    #[test]
    fn test_default_times_are_on_the_hour() {
        let start = default_start_time();
        let end = default_end_time();
        assert_eq!(start.minute(), 0);
        assert_eq!(start.second(), 0);
        assert_eq!(end.minute(), 0);
        assert_eq!(end.second(), 0);
    }

    #[test]
    fn test_event_type_parse_unknown() {
        assert_eq!(EventType::parse("bake-sale"), EventType::Uncategorized);
        assert_eq!(EventType::parse("rally"), EventType::Rally);
    }
}
