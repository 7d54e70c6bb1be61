//! Session state machine.
//!
//! A [`Session`] is only ever mutated through [`Session::apply`]. Fetching is
//! left to the caller: `apply` hands back a [`Command`] describing the fetch,
//! and the caller feeds the outcome back as an [`Event`] tagged with the
//! command's [`Generation`]. Outcomes from an older generation are dropped.

use crate::candidate::{Candidate, CandidateId};
use crate::constants::ROUND_LIMIT;
use crate::leaderboard::Leaderboard;
use crate::sourcing::SourcingError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One of the two selectable regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// The opening pair has not arrived yet.
    Loading,
    /// Two candidates are on screen.
    Active,
    /// Round limit reached; the leaderboard is final.
    Finished,
}

/// Session token carried by every fetch so late results can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(u64);

impl Generation {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// A fetch the caller must perform on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Source the opening pair.
    FetchPair {
        generation: Generation,
        exclude: HashSet<CandidateId>,
    },
    /// Source a replacement for `side`.
    FetchReplacement {
        generation: Generation,
        side: Side,
        exclude: HashSet<CandidateId>,
    },
}

impl Command {
    #[must_use]
    pub const fn generation(&self) -> Generation {
        match self {
            Self::FetchPair { generation, .. } | Self::FetchReplacement { generation, .. } => {
                *generation
            }
        }
    }

    #[must_use]
    pub const fn exclude(&self) -> &HashSet<CandidateId> {
        match self {
            Self::FetchPair { exclude, .. } | Self::FetchReplacement { exclude, .. } => exclude,
        }
    }
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Begin loading the opening pair.
    Start,
    PairLoaded {
        generation: Generation,
        result: Result<(Candidate, Candidate), SourcingError>,
    },
    /// The user chose the candidate on this side.
    Pick(Side),
    ReplacementLoaded {
        generation: Generation,
        result: Result<Candidate, SourcingError>,
    },
    /// Retry whatever failed last.
    Retry,
    /// Throw the session away and start over.
    Restart,
}

/// A pick waiting on its replacement candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPick {
    pub winner_side: Side,
    pub winner: CandidateId,
}

impl PendingPick {
    /// The side whose candidate is being replaced.
    #[must_use]
    pub const fn replaced_side(&self) -> Side {
        self.winner_side.opposite()
    }
}

/// A pick whose replacement could not be sourced.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplacementFailure {
    pub pick: PendingPick,
    pub error: SourcingError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    generation: Generation,
    round_limit: u32,
    round: u32,
    left: Option<Candidate>,
    right: Option<Candidate>,
    seen: HashSet<CandidateId>,
    history: Vec<Candidate>,
    tally: HashMap<CandidateId, u32>,
    finished: bool,
    loading_pair: bool,
    pending: Option<PendingPick>,
    load_error: Option<SourcingError>,
    replacement_error: Option<ReplacementFailure>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ROUND_LIMIT)
    }
}

impl Session {
    /// Fresh session. A zero limit is raised to one.
    #[must_use]
    pub fn new(round_limit: u32) -> Self {
        Self {
            generation: Generation::default(),
            round_limit: round_limit.max(1),
            round: 0,
            left: None,
            right: None,
            seen: HashSet::new(),
            history: Vec::new(),
            tally: HashMap::new(),
            finished: false,
            loading_pair: false,
            pending: None,
            load_error: None,
            replacement_error: None,
        }
    }

    /// The single transition function.
    pub fn apply(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Start => self.request_pair(),
            Event::PairLoaded { generation, result } => {
                if self.is_stale(generation) {
                    return None;
                }
                self.on_pair_loaded(result);
                None
            }
            Event::Pick(side) => self.pick(side),
            Event::ReplacementLoaded { generation, result } => {
                if self.is_stale(generation) {
                    return None;
                }
                self.on_replacement_loaded(result);
                None
            }
            Event::Retry => self.retry(),
            Event::Restart => self.restart(),
        }
    }

    fn is_stale(&self, generation: Generation) -> bool {
        let stale = generation != self.generation;
        if stale {
            log::debug!(
                "discarding result from generation {} (current {})",
                generation.value(),
                self.generation.value()
            );
        }
        stale
    }

    fn request_pair(&mut self) -> Option<Command> {
        if self.phase() != Phase::Loading || self.loading_pair {
            return None;
        }
        self.loading_pair = true;
        self.load_error = None;
        Some(Command::FetchPair {
            generation: self.generation,
            exclude: self.seen.clone(),
        })
    }

    fn on_pair_loaded(&mut self, result: Result<(Candidate, Candidate), SourcingError>) {
        if !self.loading_pair {
            log::debug!("ignoring pair that was never requested");
            return;
        }
        self.loading_pair = false;
        let checked = result.and_then(|(left, right)| {
            if left.id() == right.id() || self.seen.contains(&left.id()) {
                Err(SourcingError::RepeatedCandidate(left.id()))
            } else if self.seen.contains(&right.id()) {
                Err(SourcingError::RepeatedCandidate(right.id()))
            } else {
                Ok((left, right))
            }
        });
        match checked {
            Ok((left, right)) => {
                self.record(&left);
                self.record(&right);
                self.left = Some(left);
                self.right = Some(right);
            }
            Err(err) => {
                log::warn!("initial load failed: {err}");
                self.load_error = Some(SourcingError::InitialLoadFailed(Box::new(err)));
            }
        }
    }

    fn pick(&mut self, side: Side) -> Option<Command> {
        if self.phase() != Phase::Active || self.pending.is_some() {
            log::debug!("ignoring pick on {side} in {:?}", self.phase());
            return None;
        }
        if self.stalled_side() == Some(side) {
            log::debug!("ignoring pick on {side} while its replacement is failed");
            return None;
        }
        let winner = self.candidate(side)?.id();
        let pick = PendingPick {
            winner_side: side,
            winner,
        };
        self.replacement_error = None;

        if self.round + 1 >= self.round_limit {
            self.commit(pick);
            self.finished = true;
            log::info!("session finished after {} rounds", self.round);
            return None;
        }

        self.pending = Some(pick);
        Some(Command::FetchReplacement {
            generation: self.generation,
            side: pick.replaced_side(),
            exclude: self.seen.clone(),
        })
    }

    fn on_replacement_loaded(&mut self, result: Result<Candidate, SourcingError>) {
        let Some(pick) = self.pending.take() else {
            log::debug!("ignoring replacement that was never requested");
            return;
        };
        let checked = result.and_then(|candidate| {
            if self.seen.contains(&candidate.id()) {
                Err(SourcingError::RepeatedCandidate(candidate.id()))
            } else {
                Ok(candidate)
            }
        });
        match checked {
            Ok(candidate) => {
                self.record(&candidate);
                *self.slot_mut(pick.replaced_side()) = Some(candidate);
                self.commit(pick);
            }
            Err(error) => {
                log::warn!("replacement for {} failed: {error}", pick.replaced_side());
                self.replacement_error = Some(ReplacementFailure { pick, error });
            }
        }
    }

    fn retry(&mut self) -> Option<Command> {
        match self.phase() {
            Phase::Loading if self.load_error.is_some() => self.request_pair(),
            Phase::Active => {
                let failure = self.replacement_error.take()?;
                self.pick(failure.pick.winner_side)
            }
            _ => None,
        }
    }

    fn restart(&mut self) -> Option<Command> {
        let generation = self.generation.next();
        *self = Self::new(self.round_limit);
        self.generation = generation;
        self.request_pair()
    }

    /// Tally the winner and advance the round in one step.
    fn commit(&mut self, pick: PendingPick) {
        *self.tally.entry(pick.winner).or_insert(0) += 1;
        self.round += 1;
    }

    fn record(&mut self, candidate: &Candidate) {
        if self.seen.insert(candidate.id()) {
            self.history.push(candidate.clone());
        }
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Candidate> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.left.is_some() && self.right.is_some() {
            Phase::Active
        } else {
            Phase::Loading
        }
    }

    #[must_use]
    pub const fn candidate(&self, side: Side) -> Option<&Candidate> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    #[must_use]
    pub const fn left(&self) -> Option<&Candidate> {
        self.left.as_ref()
    }

    #[must_use]
    pub const fn right(&self) -> Option<&Candidate> {
        self.right.as_ref()
    }

    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn round_limit(&self) -> u32 {
        self.round_limit
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub const fn tally(&self) -> &HashMap<CandidateId, u32> {
        &self.tally
    }

    #[must_use]
    pub fn tally_total(&self) -> u32 {
        self.tally.values().sum()
    }

    #[must_use]
    pub const fn seen_ids(&self) -> &HashSet<CandidateId> {
        &self.seen
    }

    /// Every candidate shown this session, in first-seen order.
    #[must_use]
    pub fn history(&self) -> &[Candidate] {
        &self.history
    }

    #[must_use]
    pub const fn pending(&self) -> Option<PendingPick> {
        self.pending
    }

    /// True while `side` is waiting for its replacement.
    #[must_use]
    pub fn is_awaiting(&self, side: Side) -> bool {
        self.pending.is_some_and(|p| p.replaced_side() == side)
    }

    #[must_use]
    pub const fn is_loading_pair(&self) -> bool {
        self.loading_pair
    }

    /// Whether a pick on `side` would do anything right now.
    #[must_use]
    pub fn accepts_pick(&self, side: Side) -> bool {
        self.phase() == Phase::Active
            && self.pending.is_none()
            && self.stalled_side() != Some(side)
            && self.candidate(side).is_some()
    }

    /// Side still showing the beaten candidate after its replacement failed.
    #[must_use]
    pub fn stalled_side(&self) -> Option<Side> {
        self.replacement_error
            .as_ref()
            .map(|failure| failure.pick.replaced_side())
    }

    #[must_use]
    pub const fn load_error(&self) -> Option<&SourcingError> {
        self.load_error.as_ref()
    }

    #[must_use]
    pub const fn replacement_error(&self) -> Option<&ReplacementFailure> {
        self.replacement_error.as_ref()
    }

    /// Current standings; final once the session is finished.
    #[must_use]
    pub fn leaderboard(&self) -> Leaderboard {
        Leaderboard::build(&self.tally, &self.history)
    }
}
