//! Who Would Win? game core
//!
//! Platform-agnostic session logic: candidate sourcing from a character
//! provider, the pick/replace round state machine, and the final leaderboard.
//! This crate has no UI or browser dependencies.

pub mod candidate;
pub mod constants;
pub mod driver;
pub mod fixture;
pub mod jikan;
pub mod leaderboard;
pub mod provider;
pub mod session;
pub mod sourcing;

// Re-export commonly used types
pub use candidate::{Candidate, CandidateId, CandidateRejection, GroupId, RawCharacter};
pub use constants::{
    FETCH_TIMEOUT_MS, JIKAN_BASE_URL, MAX_SOURCING_ATTEMPTS, ROUND_LIMIT, SOURCE_GROUPS,
    SourceGroup,
};
pub use driver::resolve;
pub use fixture::FixtureProvider;
pub use leaderboard::{Leaderboard, Standing};
pub use provider::{CachedProvider, CharacterProvider, ProviderError};
pub use session::{
    Command, Event, Generation, PendingPick, Phase, ReplacementFailure, Session, Side,
};
pub use sourcing::{SourcingConfig, SourcingError, fetch_candidate, fetch_pair};
