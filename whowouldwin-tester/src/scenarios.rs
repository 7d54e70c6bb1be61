use anyhow::{Result, ensure};

use crate::logic::faults::FaultPlan;
use crate::logic::policy::PickStrategy;
use crate::logic::runner::{RunOptions, RunSummary};
use whowouldwin_game::SourcingError;

pub type Expectation = fn(&RunSummary) -> Result<()>;

/// Which fixture roster a scenario plays against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    /// `n` complete characters in each configured group.
    Generated(u32),
    /// Five usable characters per group plus one without an image.
    Sample,
}

pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub pool: Pool,
    /// Only meaningful against fixture data.
    pub fixture_only: bool,
    pub faults: Option<FaultPlan>,
    pub options: RunOptions,
    pub expectations: Vec<Expectation>,
}

impl Scenario {
    fn new(key: &'static str, description: &'static str) -> Self {
        Self {
            key,
            description,
            pool: Pool::Generated(20),
            fixture_only: false,
            faults: None,
            options: RunOptions::default(),
            expectations: vec![no_violations],
        }
    }

    fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Apply a CLI strategy override.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Option<PickStrategy>) -> Self {
        if let Some(strategy) = strategy {
            self.options.strategy = strategy;
        }
        self
    }

    /// First failing expectation, if any.
    pub fn evaluate(&self, summary: &RunSummary) -> Option<String> {
        self.expectations
            .iter()
            .find_map(|expectation| expectation(summary).err().map(|e| e.to_string()))
    }
}

pub fn catalog() -> Vec<Scenario> {
    vec![
        Scenario::new("smoke", "Play a full session and check the final standings")
            .with_expectation(finished_at_limit)
            .with_expectation(full_history),
        Scenario {
            options: RunOptions {
                restart_at: Some(10),
                ..RunOptions::default()
            },
            ..Scenario::new("restart", "Restart mid-session and play the new session out")
        }
        .with_expectation(finished_at_limit)
        .with_expectation(restarted_once),
        Scenario {
            options: RunOptions {
                clicks_per_pick: 4,
                strategy: PickStrategy::Alternate,
                ..RunOptions::default()
            },
            ..Scenario::new("rapid-picks", "Click each side several times per round")
        }
        .with_expectation(finished_at_limit)
        .with_expectation(extra_clicks_ignored),
        Scenario {
            pool: Pool::Sample,
            fixture_only: true,
            options: RunOptions {
                strategy: PickStrategy::AlwaysLeft,
                max_retries: 1,
                ..RunOptions::default()
            },
            ..Scenario::new("exhausted-pool", "Run out of unseen characters before the last round")
        }
        .with_expectation(stalled_on_exhaustion),
        Scenario {
            faults: Some(FaultPlan {
                every: 15,
                burst: 3,
            }),
            ..Scenario::new("flaky-provider", "Recover from provider outages through retry")
        }
        .with_expectation(finished_at_limit)
        .with_expectation(needed_retries),
    ]
}

pub fn find(key: &str) -> Option<Scenario> {
    catalog().into_iter().find(|s| s.key == key)
}

pub fn list() -> Vec<(&'static str, &'static str)> {
    catalog().iter().map(|s| (s.key, s.description)).collect()
}

pub fn keys() -> Vec<&'static str> {
    catalog().iter().map(|s| s.key).collect()
}

fn no_violations(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.violations.is_empty(),
        "invariant violations: {}",
        summary.violations.join("; ")
    );
    Ok(())
}

fn finished_at_limit(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.finished,
        "session {} at round {}/{}",
        summary.status(),
        summary.rounds,
        summary.round_limit
    );
    ensure!(
        summary.leaderboard.total_picks() == summary.round_limit,
        "leaderboard counts {} picks, expected {}",
        summary.leaderboard.total_picks(),
        summary.round_limit
    );
    let winner = summary.leaderboard.winner();
    ensure!(
        winner.is_some_and(|w| w.is_winner && w.rank == 1),
        "leaderboard has no winner"
    );
    Ok(())
}

fn full_history(summary: &RunSummary) -> Result<()> {
    ensure!(summary.history_unique, "a candidate was shown twice");
    let expected = summary.round_limit as usize + 1;
    ensure!(
        summary.history_len == expected,
        "history has {} candidates, expected {expected}",
        summary.history_len
    );
    Ok(())
}

fn restarted_once(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.restarts == 1,
        "expected one restart, saw {}",
        summary.restarts
    );
    Ok(())
}

fn extra_clicks_ignored(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.clicks > summary.rounds,
        "scenario did not send repeat clicks"
    );
    ensure!(
        summary.leaderboard.total_picks() == summary.rounds,
        "repeat clicks were tallied"
    );
    Ok(())
}

fn stalled_on_exhaustion(summary: &RunSummary) -> Result<()> {
    ensure!(!summary.finished, "small pool should not reach the last round");
    ensure!(
        matches!(
            summary.stalled.as_ref().map(SourcingError::root),
            Some(SourcingError::ExhaustedCandidates(_))
        ),
        "expected exhaustion, got {:?}",
        summary.stalled
    );
    ensure!(
        summary.leaderboard.total_picks() == summary.rounds,
        "tally and round disagree after stall"
    );
    Ok(())
}

fn needed_retries(summary: &RunSummary) -> Result<()> {
    ensure!(summary.retries > 0, "no faults surfaced to the session");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_are_unique() {
        let keys = keys();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len());
        assert_eq!(
            keys,
            vec!["smoke", "restart", "rapid-picks", "exhausted-pool", "flaky-provider"]
        );
    }

    #[test]
    fn strategy_override_applies() {
        let scenario = find("smoke")
            .unwrap()
            .with_strategy(Some(PickStrategy::Champion));
        assert_eq!(scenario.options.strategy, PickStrategy::Champion);
        let untouched = find("rapid-picks").unwrap().with_strategy(None);
        assert_eq!(untouched.options.strategy, PickStrategy::Alternate);
    }

    #[test]
    fn every_scenario_checks_invariants() {
        assert!(catalog().iter().all(|s| !s.expectations.is_empty()));
    }
}
