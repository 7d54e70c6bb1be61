//! Jikan over the browser `fetch` API.

use async_trait::async_trait;
use whowouldwin_game::jikan::{anime_url, characters_url, decode_roster, decode_title};
use whowouldwin_game::{
    CachedProvider, CharacterProvider, FETCH_TIMEOUT_MS, GroupId, JIKAN_BASE_URL, ProviderError,
    RawCharacter,
};

/// Live provider backed by `api.jikan.moe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JikanProvider {
    base_url: String,
    timeout_ms: u32,
}

impl Default for JikanProvider {
    fn default() -> Self {
        Self::new(JIKAN_BASE_URL, FETCH_TIMEOUT_MS)
    }
}

impl JikanProvider {
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout_ms: u32) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms,
        }
    }

    /// The provider the page uses: live Jikan behind a per-page roster cache.
    #[must_use]
    pub fn cached() -> CachedProvider<Self> {
        CachedProvider::new(Self::default())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    #[allow(clippy::future_not_send)]
    async fn get(&self, url: &str) -> Result<String, ProviderError> {
        log::debug!("GET {url}");
        get_with_timeout(url, self.timeout_ms).await
    }
}

#[async_trait(?Send)]
impl CharacterProvider for JikanProvider {
    async fn group_title(&self, group: GroupId) -> Result<String, ProviderError> {
        let body = self.get(&anime_url(&self.base_url, group)).await?;
        decode_title(&body)
    }

    async fn roster(&self, group: GroupId) -> Result<Vec<RawCharacter>, ProviderError> {
        let body = self.get(&characters_url(&self.base_url, group)).await?;
        decode_roster(&body)
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_text(url: &str) -> Result<String, ProviderError> {
    use crate::dom::{fetch_response, js_error_message, response_text};
    use whowouldwin_game::jikan::check_status;

    let response = fetch_response(url)
        .await
        .map_err(|e| ProviderError::Network(js_error_message(&e)))?;
    check_status(response.status())?;
    response_text(&response)
        .await
        .map_err(|e| ProviderError::Decode(js_error_message(&e)))
}

#[cfg(target_arch = "wasm32")]
async fn get_with_timeout(url: &str, timeout_ms: u32) -> Result<String, ProviderError> {
    use crate::dom::{js_error_message, sleep_ms};
    use futures::future::{Either, select};

    let request = fetch_text(url);
    let timer = sleep_ms(i32::try_from(timeout_ms).unwrap_or(i32::MAX));
    futures::pin_mut!(request);
    futures::pin_mut!(timer);

    match select(request, timer).await {
        Either::Left((outcome, _)) => outcome,
        Either::Right((Ok(()), _)) => {
            log::warn!("request to {url} timed out after {timeout_ms} ms");
            Err(ProviderError::Timeout(timeout_ms))
        }
        Either::Right((Err(err), _)) => Err(ProviderError::Network(js_error_message(&err))),
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn get_with_timeout(url: &str, _timeout_ms: u32) -> Result<String, ProviderError> {
    Err(ProviderError::Network(format!(
        "browser fetch is unavailable outside wasm32 ({url})"
    )))
}
