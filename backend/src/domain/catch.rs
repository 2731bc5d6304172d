//! Catch records: a single fish logged by an angler.
//!
//! A catch always belongs to its owner and may additionally be attached to
//! one of the owner's fishing sessions.

use chrono::{DateTime, Utc};
use serde_json::json;
use url::Url;
use uuid::Uuid;

use super::text::{self, TextError};
use super::{Error, UserId};

/// Maximum length of a species name.
pub const SPECIES_MAX: usize = 100;
/// Maximum length of a bait description.
pub const BAIT_MAX: usize = 100;
/// Maximum length of a photo URL.
pub const PHOTO_URL_MAX: usize = 500;

/// Validation errors for catch attributes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatchValidationError {
    #[error("species {0}")]
    Species(TextError),
    #[error("weight must be a finite, non-negative number of kilograms")]
    Weight,
    #[error("length must be a finite, non-negative number of centimetres")]
    Length,
    #[error("bait {0}")]
    Bait(TextError),
    #[error("photoUrl {0}")]
    PhotoUrlLength(TextError),
    #[error("photoUrl must be an absolute http or https URL")]
    PhotoUrl,
}

impl CatchValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Species(_) => "species",
            Self::Weight => "weight",
            Self::Length => "length",
            Self::Bait(_) => "bait",
            Self::PhotoUrlLength(_) | Self::PhotoUrl => "photoUrl",
        }
    }

    /// Stable machine-readable code reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Species(err) | Self::Bait(err) | Self::PhotoUrlLength(err) => err.code(),
            Self::Weight | Self::Length => "invalid_measurement",
            Self::PhotoUrl => "invalid_url",
        }
    }
}

impl From<CatchValidationError> for Error {
    fn from(err: CatchValidationError) -> Self {
        Error::validation(err.to_string())
            .with_details(json!({ "field": err.field(), "code": err.code() }))
    }
}

/// Unvalidated catch attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatchDraft {
    pub session_id: Option<Uuid>,
    pub species: String,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub bait: Option<String>,
    pub released: bool,
    pub photo_url: Option<String>,
}

/// Merge-style update; see [`super::LocationPatch`] for the conventions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatchPatch {
    pub session_id: Option<Option<Uuid>>,
    pub species: Option<String>,
    pub weight: Option<Option<f64>>,
    pub length: Option<Option<f64>>,
    pub bait: Option<Option<String>>,
    pub released: Option<bool>,
    pub photo_url: Option<Option<String>>,
}

/// Validated catch attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchDetails {
    session_id: Option<Uuid>,
    species: String,
    weight: Option<f64>,
    length: Option<f64>,
    bait: Option<String>,
    released: bool,
    photo_url: Option<String>,
}

fn measurement(
    value: Option<f64>,
    error: CatchValidationError,
) -> Result<Option<f64>, CatchValidationError> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => Err(error),
        other => Ok(other),
    }
}

fn photo_url(value: Option<String>) -> Result<Option<String>, CatchValidationError> {
    let Some(raw) = text::optional(value.as_deref(), PHOTO_URL_MAX)
        .map_err(CatchValidationError::PhotoUrlLength)?
    else {
        return Ok(None);
    };
    let parsed = Url::parse(&raw).map_err(|_| CatchValidationError::PhotoUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
        return Err(CatchValidationError::PhotoUrl);
    }
    Ok(Some(raw))
}

impl TryFrom<CatchDraft> for CatchDetails {
    type Error = CatchValidationError;

    fn try_from(draft: CatchDraft) -> Result<Self, Self::Error> {
        let CatchDraft {
            session_id,
            species,
            weight,
            length,
            bait,
            released,
            photo_url: raw_photo_url,
        } = draft;
        Ok(Self {
            session_id,
            species: text::required(&species, SPECIES_MAX).map_err(CatchValidationError::Species)?,
            weight: measurement(weight, CatchValidationError::Weight)?,
            length: measurement(length, CatchValidationError::Length)?,
            bait: text::optional(bait.as_deref(), BAIT_MAX).map_err(CatchValidationError::Bait)?,
            released,
            photo_url: photo_url(raw_photo_url)?,
        })
    }
}

impl CatchDetails {
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn species(&self) -> &str {
        self.species.as_str()
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn length(&self) -> Option<f64> {
        self.length
    }

    pub fn bait(&self) -> Option<&str> {
        self.bait.as_deref()
    }

    pub fn released(&self) -> bool {
        self.released
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    /// Apply a patch and re-validate the merged attributes.
    pub fn patched(&self, patch: CatchPatch) -> Result<Self, CatchValidationError> {
        Self::try_from(CatchDraft {
            session_id: patch.session_id.unwrap_or(self.session_id),
            species: patch.species.unwrap_or_else(|| self.species.clone()),
            weight: patch.weight.unwrap_or(self.weight),
            length: patch.length.unwrap_or(self.length),
            bait: patch.bait.unwrap_or_else(|| self.bait.clone()),
            released: patch.released.unwrap_or(self.released),
            photo_url: patch.photo_url.unwrap_or_else(|| self.photo_url.clone()),
        })
    }
}

/// Persisted catch record.
#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub id: Uuid,
    pub owner: UserId,
    pub details: CatchDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters accepted by catch listings. Species matching is a
/// case-insensitive substring match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatchFilter {
    pub session_id: Option<Uuid>,
    pub species: Option<String>,
    pub released: Option<bool>,
}

impl CatchFilter {
    /// Whether `catch` satisfies every populated filter.
    pub fn matches(&self, catch: &Catch) -> bool {
        let session_ok = self
            .session_id
            .is_none_or(|id| catch.details.session_id == Some(id));
        let species_ok = self.species.as_deref().is_none_or(|needle| {
            catch
                .details
                .species
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let released_ok = self
            .released
            .is_none_or(|released| catch.details.released == released);
        session_ok && species_ok && released_ok
    }
}
