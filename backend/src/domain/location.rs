//! Fishing locations owned by an angler.
//!
//! A location is a named spot with coordinates. Names are unique per owner;
//! the store enforces that with a composite unique index and repositories
//! surface violations as a typed error.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use super::text::{self, TextError};
use super::{Error, UserId};

/// Maximum length of a location name.
pub const LOCATION_NAME_MAX: usize = 200;

/// Validation errors for location attributes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationValidationError {
    #[error("name {0}")]
    Name(TextError),
    #[error("latitude must be between -90 and 90, got {0}")]
    Latitude(f64),
    #[error("longitude must be between -180 and 180, got {0}")]
    Longitude(f64),
}

impl LocationValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Latitude(_) => "latitude",
            Self::Longitude(_) => "longitude",
        }
    }

    /// Stable machine-readable code reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Name(err) => err.code(),
            Self::Latitude(_) | Self::Longitude(_) => "out_of_range",
        }
    }
}

impl From<LocationValidationError> for Error {
    fn from(err: LocationValidationError) -> Self {
        Error::validation(err.to_string())
            .with_details(json!({ "field": err.field(), "code": err.code() }))
    }
}

/// Unvalidated location attributes as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
}

/// Merge-style update. `None` leaves an attribute untouched; for the
/// optional description `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationPatch {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<Option<String>>,
}

/// Validated location attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDetails {
    name: String,
    latitude: f64,
    longitude: f64,
    description: Option<String>,
}

impl TryFrom<LocationDraft> for LocationDetails {
    type Error = LocationValidationError;

    fn try_from(draft: LocationDraft) -> Result<Self, Self::Error> {
        let LocationDraft {
            name,
            latitude,
            longitude,
            description,
        } = draft;
        let name = text::required(&name, LOCATION_NAME_MAX).map_err(LocationValidationError::Name)?;
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(LocationValidationError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationValidationError::Longitude(longitude));
        }
        let description = description
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(Self {
            name,
            latitude,
            longitude,
            description,
        })
    }
}

impl LocationDetails {
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Apply a patch and re-validate the merged attributes.
    ///
    /// # Examples
    /// ```
    /// use fishing_backend::domain::{LocationDetails, LocationDraft, LocationPatch};
    ///
    /// let details = LocationDetails::try_from(LocationDraft {
    ///     name: "Old pier".into(),
    ///     latitude: 51.5,
    ///     longitude: -0.1,
    ///     description: Some("windy".into()),
    /// })
    /// .unwrap();
    /// let patched = details
    ///     .patched(LocationPatch {
    ///         description: Some(None),
    ///         ..LocationPatch::default()
    ///     })
    ///     .unwrap();
    /// assert_eq!(patched.name(), "Old pier");
    /// assert!(patched.description().is_none());
    /// ```
    pub fn patched(&self, patch: LocationPatch) -> Result<Self, LocationValidationError> {
        Self::try_from(LocationDraft {
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            latitude: patch.latitude.unwrap_or(self.latitude),
            longitude: patch.longitude.unwrap_or(self.longitude),
            description: patch
                .description
                .unwrap_or_else(|| self.description.clone()),
        })
    }
}

/// Persisted location.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: Uuid,
    pub owner: UserId,
    pub details: LocationDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft() -> LocationDraft {
        LocationDraft {
            name: "  Mill pond ".into(),
            latitude: 52.2,
            longitude: 0.12,
            description: None,
        }
    }

    #[rstest]
    fn trims_name(draft: LocationDraft) {
        let details = LocationDetails::try_from(draft).expect("valid draft");
        assert_eq!(details.name(), "Mill pond");
    }

    #[rstest]
    #[case(90.5, 0.0)]
    #[case(-91.0, 0.0)]
    #[case(0.0, 180.5)]
    #[case(f64::NAN, 0.0)]
    fn rejects_out_of_range_coordinates(
        mut draft: LocationDraft,
        #[case] latitude: f64,
        #[case] longitude: f64,
    ) {
        draft.latitude = latitude;
        draft.longitude = longitude;
        assert!(LocationDetails::try_from(draft).is_err());
    }

    #[rstest]
    fn rejects_blank_name(mut draft: LocationDraft) {
        draft.name = "   ".into();
        assert_eq!(
            LocationDetails::try_from(draft),
            Err(LocationValidationError::Name(TextError::Empty))
        );
    }

    #[rstest]
    fn patch_leaves_absent_fields_untouched(draft: LocationDraft) {
        let details = LocationDetails::try_from(draft).expect("valid draft");
        let patched = details
            .patched(LocationPatch {
                latitude: Some(10.0),
                ..LocationPatch::default()
            })
            .expect("valid patch");
        assert_eq!(patched.latitude(), 10.0);
        assert_eq!(patched.longitude(), details.longitude());
        assert_eq!(patched.name(), details.name());
    }

    #[rstest]
    fn patch_revalidates_merged_values(draft: LocationDraft) {
        let details = LocationDetails::try_from(draft).expect("valid draft");
        let result = details.patched(LocationPatch {
            longitude: Some(200.0),
            ..LocationPatch::default()
        });
        assert_eq!(result, Err(LocationValidationError::Longitude(200.0)));
    }
}
