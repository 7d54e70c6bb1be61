//! Headless session driver.
//!
//! Plays one session the way the browser shell does (apply, execute the
//! command, feed the result back) while checking the session invariants after
//! every step.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::collections::HashSet;
use whowouldwin_game::{
    CandidateId, CharacterProvider, Command, Event, Leaderboard, Phase, Session, SourcingConfig,
    SourcingError, resolve,
};

use super::policy::PickStrategy;

/// How a single run is played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub round_limit: u32,
    pub strategy: PickStrategy,
    /// Clicks delivered per pick before the replacement resolves.
    pub clicks_per_pick: u32,
    /// Restart once when this round is reached.
    pub restart_at: Option<u32>,
    /// Consecutive retries allowed before a failure is treated as a stall.
    pub max_retries: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            round_limit: whowouldwin_game::ROUND_LIMIT,
            strategy: PickStrategy::Random,
            clicks_per_pick: 1,
            restart_at: None,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub strategy: PickStrategy,
    pub rounds: u32,
    pub round_limit: u32,
    pub finished: bool,
    pub restarts: u32,
    pub retries: u32,
    pub clicks: u32,
    pub history_len: usize,
    pub history_unique: bool,
    /// The failure that ended the run early, if any.
    #[serde(serialize_with = "display_error")]
    pub stalled: Option<SourcingError>,
    pub violations: Vec<String>,
    pub leaderboard: Leaderboard,
}

fn display_error<S>(err: &Option<SourcingError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match err {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl RunSummary {
    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.finished {
            "finished"
        } else if self.stalled.is_some() {
            "stalled"
        } else {
            "halted"
        }
    }
}

struct Runner<'a> {
    provider: &'a dyn CharacterProvider,
    config: &'a SourcingConfig,
    rng: ChaCha20Rng,
    session: Session,
    violations: Vec<String>,
    last_round: u32,
}

impl Runner<'_> {
    async fn drive(&mut self, event: Event) {
        let command = self.session.apply(event);
        self.settle(command).await;
    }

    /// Execute `next` and everything it leads to, then check invariants.
    async fn settle(&mut self, mut next: Option<Command>) {
        while let Some(command) = next.take() {
            let event = resolve(command, self.provider, self.config, &mut self.rng).await;
            next = self.session.apply(event);
        }
        self.check();
    }

    fn check(&mut self) {
        let s = &self.session;
        let mut found = Vec::new();
        if s.tally_total() != s.round() {
            found.push(format!(
                "tally total {} differs from round {}",
                s.tally_total(),
                s.round()
            ));
        }
        if s.round() > s.round_limit() {
            found.push(format!("round {} past limit {}", s.round(), s.round_limit()));
        }
        if s.is_finished() != (s.round() == s.round_limit()) {
            found.push(format!(
                "finished={} at round {}/{}",
                s.is_finished(),
                s.round(),
                s.round_limit()
            ));
        }
        if s.round() < self.last_round {
            found.push(format!(
                "round went backwards from {} to {}",
                self.last_round,
                s.round()
            ));
        }
        if s.phase() == Phase::Active {
            if let (Some(l), Some(r)) = (s.left(), s.right()) {
                if l.id() == r.id() {
                    found.push(format!("both sides show candidate {}", l.id()));
                }
            }
        }
        self.last_round = s.round();
        self.violations.extend(found);
    }
}

/// Play a whole session against `provider`.
pub async fn play(
    provider: &dyn CharacterProvider,
    config: &SourcingConfig,
    options: &RunOptions,
    seed: u64,
) -> RunSummary {
    let mut runner = Runner {
        provider,
        config,
        rng: ChaCha20Rng::seed_from_u64(seed),
        session: Session::new(options.round_limit),
        violations: Vec::new(),
        last_round: 0,
    };
    let mut policy = options.strategy.create_policy(seed);
    let mut restarts = 0;
    let mut retries = 0;
    let mut consecutive_retries = 0;
    let mut clicks = 0;
    let mut stalled = None;

    runner.drive(Event::Start).await;

    loop {
        let pending_failure = runner
            .session
            .load_error()
            .cloned()
            .or_else(|| runner.session.replacement_error().map(|f| f.error.clone()));
        if let Some(error) = pending_failure {
            if consecutive_retries >= options.max_retries {
                log::info!("giving up after {consecutive_retries} retries: {error}");
                stalled = Some(error);
                break;
            }
            consecutive_retries += 1;
            retries += 1;
            runner.drive(Event::Retry).await;
            continue;
        }

        match runner.session.phase() {
            Phase::Finished => break,
            Phase::Loading => {
                runner
                    .violations
                    .push("session stuck loading with no failure recorded".to_string());
                break;
            }
            Phase::Active => {}
        }
        consecutive_retries = 0;

        if restarts == 0 && options.restart_at == Some(runner.session.round()) {
            restarts += 1;
            log::debug!("restarting at round {}", runner.session.round());
            runner.last_round = 0;
            runner.drive(Event::Restart).await;
            continue;
        }

        let side = policy.pick(&runner.session);
        log::trace!("{} picks {side} at round {}", policy.name(), runner.session.round());
        let before = runner.session.round();
        let command = runner.session.apply(Event::Pick(side));
        clicks += 1;
        for _ in 1..options.clicks_per_pick {
            clicks += 1;
            if runner.session.apply(Event::Pick(side)).is_some() {
                runner
                    .violations
                    .push(format!("repeat click on {side} issued a second fetch"));
            }
        }
        runner.settle(command).await;
        if runner.session.replacement_error().is_none() && runner.session.round() != before + 1 {
            runner.violations.push(format!(
                "pick at round {before} advanced to {}",
                runner.session.round()
            ));
        }
    }

    let history = runner.session.history();
    let unique: HashSet<CandidateId> = history.iter().map(|c| c.id()).collect();
    RunSummary {
        seed,
        strategy: options.strategy,
        rounds: runner.session.round(),
        round_limit: runner.session.round_limit(),
        finished: runner.session.is_finished(),
        restarts,
        retries,
        clicks,
        history_len: history.len(),
        history_unique: unique.len() == history.len(),
        stalled,
        violations: runner.violations,
        leaderboard: runner.session.leaderboard(),
    }
}
