//! Fishing sessions: one outing at a location on a given day.
//!
//! Start and end are wall-clock times without a date of their own. An end
//! time earlier than the start time means the session ran past midnight, so
//! the derived duration wraps into the following day.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde_json::json;
use uuid::Uuid;

use super::text::{self, TextError};
use super::{Error, UserId};

/// Maximum length of the weather description.
pub const WEATHER_MAX: usize = 100;

const SECONDS_PER_DAY: i32 = 24 * 60 * 60;

/// Validation errors for fishing session attributes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FishingSessionValidationError {
    #[error("weatherConditions {0}")]
    Weather(TextError),
    #[error("temperatureCelsius must be a finite number")]
    Temperature,
}

impl FishingSessionValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Weather(_) => "weatherConditions",
            Self::Temperature => "temperatureCelsius",
        }
    }

    /// Stable machine-readable code reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Weather(err) => err.code(),
            Self::Temperature => "not_finite",
        }
    }
}

impl From<FishingSessionValidationError> for Error {
    fn from(err: FishingSessionValidationError) -> Self {
        Error::validation(err.to_string())
            .with_details(json!({ "field": err.field(), "code": err.code() }))
    }
}

/// Unvalidated session attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FishingSessionDraft {
    pub location_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub weather_conditions: Option<String>,
    pub temperature_celsius: Option<f64>,
    pub notes: Option<String>,
}

/// Merge-style update; see [`super::LocationPatch`] for the conventions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FishingSessionPatch {
    pub location_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub weather_conditions: Option<Option<String>>,
    pub temperature_celsius: Option<Option<f64>>,
    pub notes: Option<Option<String>>,
}

/// Validated session attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FishingSessionDetails {
    location_id: Uuid,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    weather_conditions: Option<String>,
    temperature_celsius: Option<f64>,
    notes: Option<String>,
}

/// Whole minutes between `start` and `end`, wrapping past midnight. An end
/// even one second before the start counts as the next day.
///
/// # Examples
/// ```
/// use chrono::NaiveTime;
/// use fishing_backend::domain::session_duration_minutes;
///
/// let start = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
/// let end = NaiveTime::from_hms_opt(2, 0, 0).unwrap();
/// assert_eq!(session_duration_minutes(start, end), 240);
/// ```
pub fn session_duration_minutes(start: NaiveTime, end: NaiveTime) -> i32 {
    let second_of_day = |time: NaiveTime| {
        // Bounded by the length of a day, so the cast cannot truncate.
        time.num_seconds_from_midnight() as i32
    };
    let delta = second_of_day(end) - second_of_day(start);
    let wrapped = if delta < 0 { delta + SECONDS_PER_DAY } else { delta };
    wrapped / 60
}

impl TryFrom<FishingSessionDraft> for FishingSessionDetails {
    type Error = FishingSessionValidationError;

    fn try_from(draft: FishingSessionDraft) -> Result<Self, Self::Error> {
        let FishingSessionDraft {
            location_id,
            date,
            start_time,
            end_time,
            weather_conditions,
            temperature_celsius,
            notes,
        } = draft;
        let weather_conditions = text::optional(weather_conditions.as_deref(), WEATHER_MAX)
            .map_err(FishingSessionValidationError::Weather)?;
        if temperature_celsius.is_some_and(|value| !value.is_finite()) {
            return Err(FishingSessionValidationError::Temperature);
        }
        let notes = notes
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(Self {
            location_id,
            date,
            start_time: truncate_to_minute(start_time),
            end_time: truncate_to_minute(end_time),
            weather_conditions,
            temperature_celsius,
            notes,
        })
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(time)
}

impl FishingSessionDetails {
    pub fn location_id(&self) -> Uuid {
        self.location_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn weather_conditions(&self) -> Option<&str> {
        self.weather_conditions.as_deref()
    }

    pub fn temperature_celsius(&self) -> Option<f64> {
        self.temperature_celsius
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Derived session length in minutes.
    pub fn duration_minutes(&self) -> i32 {
        session_duration_minutes(self.start_time, self.end_time)
    }

    /// Apply a patch and re-validate the merged attributes.
    pub fn patched(&self, patch: FishingSessionPatch) -> Result<Self, FishingSessionValidationError> {
        Self::try_from(FishingSessionDraft {
            location_id: patch.location_id.unwrap_or(self.location_id),
            date: patch.date.unwrap_or(self.date),
            start_time: patch.start_time.unwrap_or(self.start_time),
            end_time: patch.end_time.unwrap_or(self.end_time),
            weather_conditions: patch
                .weather_conditions
                .unwrap_or_else(|| self.weather_conditions.clone()),
            temperature_celsius: patch
                .temperature_celsius
                .unwrap_or(self.temperature_celsius),
            notes: patch.notes.unwrap_or_else(|| self.notes.clone()),
        })
    }
}

/// Persisted fishing session.
#[derive(Debug, Clone, PartialEq)]
pub struct FishingSession {
    pub id: Uuid,
    pub owner: UserId,
    pub details: FishingSessionDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session enriched with read-side projections for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct FishingSessionSummary {
    pub session: FishingSession,
    pub location_name: String,
    pub catches_count: u64,
}
