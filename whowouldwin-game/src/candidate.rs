//! Candidate records and the validation step that admits them.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned character id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub u32);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-assigned id of a source group (an anime title).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A character record as it comes off the wire. Every display field may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawCharacter {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl RawCharacter {
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            image_url: Some(image_url.into()),
        }
    }

    /// Check that the record carries everything a [`Candidate`] needs.
    ///
    /// # Errors
    ///
    /// Returns the first missing or unusable field.
    pub fn validate(&self) -> Result<(), CandidateRejection> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(CandidateRejection::MissingName);
        }
        let image = self.image_url.as_deref().map(str::trim).unwrap_or_default();
        if image.is_empty() {
            return Err(CandidateRejection::MissingImage);
        }
        if !(image.starts_with("https://") || image.starts_with("http://")) {
            return Err(CandidateRejection::InvalidImage);
        }
        if image.contains("questionmark") {
            return Err(CandidateRejection::PlaceholderImage);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Why a raw record was kept out of the domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CandidateRejection {
    #[error("record has no display name")]
    MissingName,
    #[error("record has no image")]
    MissingImage,
    #[error("image url is not an http(s) url")]
    InvalidImage,
    #[error("image url points at the provider's placeholder")]
    PlaceholderImage,
}

/// A selectable character. Only constructible from a validated record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    id: CandidateId,
    name: String,
    image_url: String,
    source_group: String,
}

impl Candidate {
    /// Admit a raw provider record, labelling it with the group it came from.
    ///
    /// # Errors
    ///
    /// Returns a [`CandidateRejection`] when the record is incomplete.
    pub fn from_raw(raw: &RawCharacter, source_group: &str) -> Result<Self, CandidateRejection> {
        raw.validate()?;
        Ok(Self {
            id: CandidateId(raw.id),
            name: raw.name.as_deref().unwrap_or_default().trim().to_string(),
            image_url: raw.image_url.as_deref().unwrap_or_default().trim().to_string(),
            source_group: source_group.trim().to_string(),
        })
    }

    /// Stand-in for a tallied id whose record was never seen.
    #[must_use]
    pub fn unknown(id: CandidateId) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
            image_url: String::new(),
            source_group: String::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> CandidateId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    #[must_use]
    pub fn source_group(&self) -> &str {
        &self.source_group
    }

    /// True for the [`Candidate::unknown`] stand-in.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.image_url.is_empty()
    }
}
