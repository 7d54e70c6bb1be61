//! Live Jikan provider for native runs.

use async_trait::async_trait;
use std::time::Duration;
use whowouldwin_game::jikan::{anime_url, characters_url, check_status, decode_roster, decode_title};
use whowouldwin_game::{
    CachedProvider, CharacterProvider, FETCH_TIMEOUT_MS, GroupId, JIKAN_BASE_URL, ProviderError,
    RawCharacter,
};

pub struct JikanClient {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u32,
}

impl JikanClient {
    /// Build a client against `base_url` with a per-request timeout.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(base_url: impl Into<String>, timeout_ms: u32) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(u64::from(timeout_ms)))
            .user_agent(concat!("whowouldwin-tester/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout_ms,
        })
    }

    /// Default endpoint and timeout, behind a roster cache.
    ///
    /// # Errors
    /// See [`JikanClient::new`].
    pub fn cached() -> Result<CachedProvider<Self>, ProviderError> {
        Ok(CachedProvider::new(Self::new(JIKAN_BASE_URL, FETCH_TIMEOUT_MS)?))
    }

    async fn get(&self, url: &str) -> Result<String, ProviderError> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await.map_err(|e| self.classify(&e))?;
        check_status(response.status().as_u16())?;
        response.text().await.map_err(|e| self.classify(&e))
    }

    fn classify(&self, err: &reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout_ms)
        } else if err.is_decode() || err.is_body() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

#[async_trait(?Send)]
impl CharacterProvider for JikanClient {
    async fn group_title(&self, group: GroupId) -> Result<String, ProviderError> {
        let body = self.get(&anime_url(&self.base_url, group)).await?;
        decode_title(&body)
    }

    async fn roster(&self, group: GroupId) -> Result<Vec<RawCharacter>, ProviderError> {
        let body = self.get(&characters_url(&self.base_url, group)).await?;
        decode_roster(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_a_provider_error() {
        let client = JikanClient::new("http://127.0.0.1:9", 500).unwrap();
        let err = client.roster(GroupId(5114)).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Network(_) | ProviderError::Timeout(500)
        ));
    }
}
