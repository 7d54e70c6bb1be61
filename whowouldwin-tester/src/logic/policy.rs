use std::fmt;

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use whowouldwin_game::{Session, Side};

/// Policy interface for automated pickers.
pub trait PickPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose a side of an active session.
    fn pick(&mut self, session: &Session) -> Side;
}

/// Built-in pick strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickStrategy {
    AlwaysLeft,
    AlwaysRight,
    Alternate,
    Random,
    /// Back whichever candidate has won the most so far.
    Champion,
}

impl PickStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlwaysLeft => "Always Left",
            Self::AlwaysRight => "Always Right",
            Self::Alternate => "Alternate",
            Self::Random => "Random",
            Self::Champion => "Champion",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PickPolicy> {
        match self {
            Self::AlwaysLeft => Box::new(FixedPolicy(Side::Left)),
            Self::AlwaysRight => Box::new(FixedPolicy(Side::Right)),
            Self::Alternate => Box::new(AlternatePolicy { next: Side::Left }),
            Self::Random => Box::new(RandomPolicy {
                rng: ChaCha20Rng::seed_from_u64(seed),
            }),
            Self::Champion => Box::new(ChampionPolicy),
        }
    }
}

impl fmt::Display for PickStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct FixedPolicy(Side);

struct AlternatePolicy {
    next: Side,
}

struct RandomPolicy {
    rng: ChaCha20Rng,
}

struct ChampionPolicy;

impl PickPolicy for FixedPolicy {
    fn name(&self) -> &'static str {
        match self.0 {
            Side::Left => "Always Left",
            Side::Right => "Always Right",
        }
    }

    fn pick(&mut self, _session: &Session) -> Side {
        self.0
    }
}

impl PickPolicy for AlternatePolicy {
    fn name(&self) -> &'static str {
        "Alternate"
    }

    fn pick(&mut self, _session: &Session) -> Side {
        let side = self.next;
        self.next = side.opposite();
        side
    }
}

impl PickPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick(&mut self, _session: &Session) -> Side {
        if self.rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl PickPolicy for ChampionPolicy {
    fn name(&self) -> &'static str {
        "Champion"
    }

    fn pick(&mut self, session: &Session) -> Side {
        let wins = |side: Side| {
            session
                .candidate(side)
                .and_then(|c| session.tally().get(&c.id()).copied())
                .unwrap_or(0)
        };
        if wins(Side::Right) > wins(Side::Left) {
            Side::Right
        } else {
            Side::Left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whowouldwin_game::{Candidate, Event, RawCharacter};

    fn active_session() -> Session {
        let mut session = Session::new(10);
        let cmd = session.apply(Event::Start).unwrap();
        let make = |id: u32| {
            Candidate::from_raw(
                &RawCharacter::new(id, format!("C{id}"), format!("https://img.test/{id}.jpg")),
                "Test",
            )
            .unwrap()
        };
        session.apply(Event::PairLoaded {
            generation: cmd.generation(),
            result: Ok((make(1), make(2))),
        });
        session
    }

    #[test]
    fn alternate_flips_sides() {
        let session = active_session();
        let mut policy = PickStrategy::Alternate.create_policy(0);
        let picks: Vec<Side> = (0..4).map(|_| policy.pick(&session)).collect();
        assert_eq!(picks, vec![Side::Left, Side::Right, Side::Left, Side::Right]);
    }

    #[test]
    fn random_policy_is_reproducible() {
        let session = active_session();
        let mut a = PickStrategy::Random.create_policy(42);
        let mut b = PickStrategy::Random.create_policy(42);
        for _ in 0..16 {
            assert_eq!(a.pick(&session), b.pick(&session));
        }
    }

    #[test]
    fn champion_backs_previous_winner() {
        let mut session = active_session();
        let cmd = session.apply(Event::Pick(Side::Right)).unwrap();
        session.apply(Event::ReplacementLoaded {
            generation: cmd.generation(),
            result: Ok(Candidate::from_raw(
                &RawCharacter::new(3, "C3", "https://img.test/3.jpg"),
                "Test",
            )
            .unwrap()),
        });
        let mut policy = PickStrategy::Champion.create_policy(0);
        assert_eq!(policy.pick(&session), Side::Right);
    }

    #[test]
    fn labels_match_policy_names() {
        for strategy in PickStrategy::value_variants() {
            assert_eq!(strategy.create_policy(1).name(), strategy.label());
        }
    }
}
