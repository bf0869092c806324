use serde::{Deserialize, Serialize};

/// Start or end of an event. The provider sets exactly one of the two fields:
/// `dateTime` for timed events, `date` for all-day events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventDateTime {
    pub fn timed(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
        }
    }

    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date_time: None,
            date: Some(date.into()),
        }
    }

    /// The timestamp when present, else the date, else an empty string
    pub fn label(&self) -> &str {
        self.date_time
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.date.as_deref())
            .unwrap_or("")
    }
}

/// Simplified calendar event representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub start: EventDateTime,
    #[serde(default)]
    pub end: EventDateTime,
}

impl CalendarEvent {
    pub fn new(summary: impl Into<String>, start: EventDateTime) -> Self {
        Self {
            summary: Some(summary.into()),
            start,
            ..Default::default()
        }
    }
}

/// Body of an events list response
#[derive(Debug, Default, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}
