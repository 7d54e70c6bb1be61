//! The Character Provider seam.
//!
//! Platform shells implement [`CharacterProvider`] over whatever HTTP client they
//! have (the browser fetch API in the web crate, `reqwest` in the tester). The
//! game logic only ever sees group titles and raw rosters.

use crate::candidate::{GroupId, RawCharacter};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;

/// Transport-level failures reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("request timed out after {0} ms")]
    Timeout(u32),
}

/// Read-only access to the external character database.
#[async_trait(?Send)]
pub trait CharacterProvider {
    /// Display title for a source group.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the request fails or the body cannot be read.
    async fn group_title(&self, group: GroupId) -> Result<String, ProviderError>;

    /// Full character roster for a source group. Records may be incomplete.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the request fails or the body cannot be read.
    async fn roster(&self, group: GroupId) -> Result<Vec<RawCharacter>, ProviderError>;
}

/// Memoizes titles and rosters per group for the provider's lifetime.
///
/// Failures are passed through and never cached.
#[derive(Debug, Default)]
pub struct CachedProvider<P> {
    inner: P,
    titles: RefCell<HashMap<GroupId, String>>,
    rosters: RefCell<HashMap<GroupId, Vec<RawCharacter>>>,
}

impl<P> CachedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            titles: RefCell::new(HashMap::new()),
            rosters: RefCell::new(HashMap::new()),
        }
    }

    pub const fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of rosters currently held.
    #[must_use]
    pub fn cached_rosters(&self) -> usize {
        self.rosters.borrow().len()
    }
}

#[async_trait(?Send)]
impl<P: CharacterProvider> CharacterProvider for CachedProvider<P> {
    async fn group_title(&self, group: GroupId) -> Result<String, ProviderError> {
        if let Some(title) = self.titles.borrow().get(&group) {
            return Ok(title.clone());
        }
        let title = self.inner.group_title(group).await?;
        self.titles.borrow_mut().insert(group, title.clone());
        Ok(title)
    }

    async fn roster(&self, group: GroupId) -> Result<Vec<RawCharacter>, ProviderError> {
        if let Some(roster) = self.rosters.borrow().get(&group) {
            log::debug!("roster cache hit for group {group}");
            return Ok(roster.clone());
        }
        let roster = self.inner.roster(group).await?;
        self.rosters.borrow_mut().insert(group, roster.clone());
        Ok(roster)
    }
}
