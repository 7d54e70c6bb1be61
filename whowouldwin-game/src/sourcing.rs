//! Candidate sourcing: pick a group, pull its roster, choose someone unseen.

use crate::candidate::{Candidate, CandidateId, GroupId, RawCharacter};
use crate::constants::{MAX_SOURCING_ATTEMPTS, source_group_ids};
use crate::provider::{CharacterProvider, ProviderError};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

/// Why a sourcing call produced no candidate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourcingError {
    #[error("character provider unavailable: {0}")]
    ProviderUnavailable(#[from] ProviderError),
    #[error("source group {0} has no usable characters")]
    EmptyRoster(GroupId),
    #[error("every usable character in source group {0} has already been shown")]
    ExhaustedCandidates(GroupId),
    #[error("could not load the first two candidates: {0}")]
    InitialLoadFailed(Box<SourcingError>),
    #[error("provider offered character {0}, which was already shown this session")]
    RepeatedCandidate(CandidateId),
    #[error("no source groups configured")]
    NoSourceGroups,
}

impl SourcingError {
    /// Ordering used to keep the most actionable failure across attempts.
    const fn weight(&self) -> u8 {
        match self {
            Self::ProviderUnavailable(_) => 4,
            Self::InitialLoadFailed(_) => 3,
            Self::ExhaustedCandidates(_) | Self::RepeatedCandidate(_) => 2,
            Self::EmptyRoster(_) => 1,
            Self::NoSourceGroups => 0,
        }
    }

    /// The underlying cause, looking through [`SourcingError::InitialLoadFailed`].
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::InitialLoadFailed(inner) => inner.root(),
            other => other,
        }
    }

    /// Whether trying again could plausibly succeed without a restart.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self.root(), Self::ProviderUnavailable(_))
    }
}

/// Which groups to draw from and how many of them one call may try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcingConfig {
    pub groups: Vec<GroupId>,
    pub max_attempts: usize,
}

impl Default for SourcingConfig {
    fn default() -> Self {
        Self {
            groups: source_group_ids(),
            max_attempts: MAX_SOURCING_ATTEMPTS,
        }
    }
}

impl SourcingConfig {
    #[must_use]
    pub fn new(groups: Vec<GroupId>, max_attempts: usize) -> Self {
        Self {
            groups,
            max_attempts,
        }
    }

    /// Provider failures one call tolerates before giving up: at least one,
    /// never more than there are groups.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.max_attempts.max(1).min(self.groups.len())
    }
}

/// Source one candidate whose id is not in `exclude`.
///
/// Groups are walked in a fresh random order. A group whose roster is empty or
/// fully shown does not use up an attempt, so exhaustion is only reported once
/// every configured group has been checked. Provider failures do count, and
/// after [`SourcingConfig::attempts`] of them the call stops. When nothing
/// succeeds, the most actionable failure is returned.
///
/// # Errors
///
/// Returns a [`SourcingError`] when no checked group yields an unseen candidate.
pub async fn fetch_candidate<P, R>(
    provider: &P,
    config: &SourcingConfig,
    exclude: &HashSet<CandidateId>,
    rng: &mut R,
) -> Result<Candidate, SourcingError>
where
    P: CharacterProvider + ?Sized,
    R: Rng + ?Sized,
{
    let mut order = config.groups.clone();
    order.shuffle(rng);

    let budget = config.attempts();
    let mut provider_failures = 0;
    let mut worst: Option<SourcingError> = None;
    for group in order {
        if provider_failures >= budget {
            break;
        }
        log::debug!("sourcing from group {group}");
        match source_from_group(provider, group, exclude, rng).await {
            Ok(candidate) => return Ok(candidate),
            Err(err) => {
                log::warn!("sourcing from group {group} failed: {err}");
                if matches!(err, SourcingError::ProviderUnavailable(_)) {
                    provider_failures += 1;
                }
                worst = Some(match worst {
                    Some(prev) if prev.weight() >= err.weight() => prev,
                    _ => err,
                });
            }
        }
    }
    Err(worst.unwrap_or(SourcingError::NoSourceGroups))
}

/// Source two distinct candidates, neither in `exclude`.
///
/// # Errors
///
/// Fails if either candidate cannot be sourced.
pub async fn fetch_pair<P, R>(
    provider: &P,
    config: &SourcingConfig,
    exclude: &HashSet<CandidateId>,
    rng: &mut R,
) -> Result<(Candidate, Candidate), SourcingError>
where
    P: CharacterProvider + ?Sized,
    R: Rng + ?Sized,
{
    let first = fetch_candidate(provider, config, exclude, rng).await?;
    let mut widened = exclude.clone();
    widened.insert(first.id());
    let second = fetch_candidate(provider, config, &widened, rng).await?;
    Ok((first, second))
}

async fn source_from_group<P, R>(
    provider: &P,
    group: GroupId,
    exclude: &HashSet<CandidateId>,
    rng: &mut R,
) -> Result<Candidate, SourcingError>
where
    P: CharacterProvider + ?Sized,
    R: Rng + ?Sized,
{
    let roster = provider.roster(group).await?;
    let usable: Vec<&RawCharacter> = roster.iter().filter(|raw| raw.is_complete()).collect();
    if usable.is_empty() {
        return Err(SourcingError::EmptyRoster(group));
    }
    let fresh: Vec<&RawCharacter> = usable
        .into_iter()
        .filter(|raw| !exclude.contains(&CandidateId(raw.id)))
        .collect();
    let Some(chosen) = fresh.choose(rng) else {
        return Err(SourcingError::ExhaustedCandidates(group));
    };
    let title = provider.group_title(group).await?;
    Candidate::from_raw(chosen, &title).map_err(|_| SourcingError::EmptyRoster(group))
}
