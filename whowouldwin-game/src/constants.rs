//! Compiled-in game constants.

use crate::candidate::GroupId;

/// Number of picks in one session.
pub const ROUND_LIMIT: u32 = 50;

/// Provider failures a single sourcing call tolerates before giving up.
pub const MAX_SOURCING_ATTEMPTS: usize = 3;

/// Upper bound on a single provider request.
pub const FETCH_TIMEOUT_MS: u32 = 10_000;

/// Jikan v4 REST root (unofficial MyAnimeList API).
pub const JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";

/// Source group as configured at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceGroup {
    pub id: GroupId,
    /// Fallback label used only for logs and the tester's fixture data.
    pub label: &'static str,
}

pub const SOURCE_GROUPS: [SourceGroup; 4] = [
    SourceGroup {
        id: GroupId(31964),
        label: "My Hero Academia",
    },
    SourceGroup {
        id: GroupId(6033),
        label: "Dragon Ball Z Kai",
    },
    SourceGroup {
        id: GroupId(5114),
        label: "Fullmetal Alchemist: Brotherhood",
    },
    SourceGroup {
        id: GroupId(16498),
        label: "Attack on Titan",
    },
];

/// Ids of every configured source group, in declaration order.
#[must_use]
pub fn source_group_ids() -> Vec<GroupId> {
    SOURCE_GROUPS.iter().map(|g| g.id).collect()
}
