//! Ranked results for a session.
use crate::candidate::{Candidate, CandidateId};
use serde::Serialize;
use std::collections::HashMap;

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// Competition rank: equal counts share a rank.
    pub rank: usize,
    pub candidate: Candidate,
    pub count: u32,
    /// Percentage of all picks, 0.0..=100.0.
    pub share_pct: f64,
    /// Only the first row carries this.
    pub is_winner: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Leaderboard {
    entries: Vec<Standing>,
    total_picks: u32,
}

impl Leaderboard {
    /// Rank tallied candidates by count, ties broken by first-seen order.
    ///
    /// Ids missing from `history` are listed as [`Candidate::unknown`] after
    /// every known candidate with the same count.
    #[must_use]
    pub fn build(tally: &HashMap<CandidateId, u32>, history: &[Candidate]) -> Self {
        let first_seen: HashMap<CandidateId, usize> = history
            .iter()
            .enumerate()
            .rev()
            .map(|(index, c)| (c.id(), index))
            .collect();

        let mut rows: Vec<(usize, CandidateId, u32)> = tally
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&id, &count)| {
                let order = first_seen.get(&id).copied().unwrap_or(usize::MAX);
                (order, id, count)
            })
            .collect();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)).then(a.1.cmp(&b.1)));

        let total_picks: u32 = rows.iter().map(|row| row.2).sum();
        let mut entries = Vec::with_capacity(rows.len());
        let mut rank = 0;
        let mut prev_count = None;
        for (position, (order, id, count)) in rows.into_iter().enumerate() {
            if prev_count != Some(count) {
                rank = position + 1;
                prev_count = Some(count);
            }
            let candidate = if order == usize::MAX {
                log::warn!("tallied candidate {id} missing from history");
                Candidate::unknown(id)
            } else {
                history[order].clone()
            };
            entries.push(Standing {
                rank,
                candidate,
                count,
                share_pct: share(count, total_picks),
                is_winner: position == 0,
            });
        }

        Self {
            entries,
            total_picks,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Standing] {
        &self.entries
    }

    #[must_use]
    pub fn winner(&self) -> Option<&Standing> {
        self.entries.first()
    }

    #[must_use]
    pub const fn total_picks(&self) -> u32 {
        self.total_picks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn share(count: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(count) * 100.0 / f64::from(total)
    }
}
