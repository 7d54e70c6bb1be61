//! Jikan v4 wire format.
//!
//! Only URL construction and body decoding live here so the browser and native
//! shells decode identically; the HTTP call itself belongs to the shell.

use crate::candidate::{GroupId, RawCharacter};
use crate::provider::ProviderError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct AnimeData {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    title_english: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CharacterEntry {
    #[serde(default)]
    character: Option<CharacterNode>,
}

#[derive(Debug, Deserialize)]
struct CharacterNode {
    #[serde(default)]
    mal_id: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    images: Option<ImageFormats>,
}

#[derive(Debug, Deserialize)]
struct ImageFormats {
    #[serde(default)]
    jpg: Option<ImageSet>,
    #[serde(default)]
    webp: Option<ImageSet>,
}

#[derive(Debug, Deserialize)]
struct ImageSet {
    #[serde(default)]
    image_url: Option<String>,
}

#[must_use]
pub fn anime_url(base: &str, group: GroupId) -> String {
    format!("{}/anime/{group}", base.trim_end_matches('/'))
}

#[must_use]
pub fn characters_url(base: &str, group: GroupId) -> String {
    format!("{}/anime/{group}/characters", base.trim_end_matches('/'))
}

/// Extract the display title from an `/anime/{id}` body.
///
/// # Errors
///
/// Returns [`ProviderError::Decode`] if the body is not the expected shape or
/// carries no title at all.
pub fn decode_title(body: &str) -> Result<String, ProviderError> {
    let envelope: Envelope<AnimeData> =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    envelope
        .data
        .title
        .or(envelope.data.title_english)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ProviderError::Decode("anime has no title".to_string()))
}

/// Extract raw roster records from an `/anime/{id}/characters` body.
///
/// Entries without a character id are dropped; missing names and images are
/// kept as `None` for the validation step to reject.
///
/// # Errors
///
/// Returns [`ProviderError::Decode`] if the body is not the expected shape.
pub fn decode_roster(body: &str) -> Result<Vec<RawCharacter>, ProviderError> {
    let envelope: Envelope<Vec<CharacterEntry>> =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    Ok(envelope
        .data
        .into_iter()
        .filter_map(|entry| entry.character)
        .filter_map(|node| {
            let id = node.mal_id?;
            let image_url = node.images.and_then(|images| {
                images
                    .jpg
                    .and_then(|set| set.image_url)
                    .or_else(|| images.webp.and_then(|set| set.image_url))
            });
            Some(RawCharacter {
                id,
                name: node.name,
                image_url,
            })
        })
        .collect())
}

/// Map a non-success HTTP status onto a provider error.
///
/// # Errors
///
/// Returns [`ProviderError::Status`] for anything outside 2xx.
pub const fn check_status(status: u16) -> Result<(), ProviderError> {
    if status >= 200 && status < 300 {
        Ok(())
    } else {
        Err(ProviderError::Status(status))
    }
}
