use proptest::prelude::*;
use whowouldwin_game::{
    Candidate, Command, Event, Phase, ProviderError, RawCharacter, Session, Side, SourcingError,
};

#[derive(Debug, Clone)]
enum Step {
    Pick(Side),
    Deliver,
    Fail,
    Retry,
    Restart,
    DeliverStale,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => prop_oneof![Just(Side::Left), Just(Side::Right)].prop_map(Step::Pick),
        4 => Just(Step::Deliver),
        1 => Just(Step::Fail),
        1 => Just(Step::Retry),
        1 => Just(Step::Restart),
        1 => Just(Step::DeliverStale),
    ]
}

struct Harness {
    session: Session,
    outstanding: Option<Command>,
    stale: Option<Command>,
    next_id: u32,
}

impl Harness {
    fn new(limit: u32) -> Self {
        let mut session = Session::new(limit);
        let outstanding = session.apply(Event::Start);
        Self {
            session,
            outstanding,
            stale: None,
            next_id: 1,
        }
    }

    fn fresh(&mut self) -> Candidate {
        let id = self.next_id;
        self.next_id += 1;
        Candidate::from_raw(
            &RawCharacter::new(id, format!("Char {id}"), format!("https://img.test/{id}.jpg")),
            "Prop Show",
        )
        .unwrap()
    }

    fn issue(&mut self, command: Option<Command>) {
        if let Some(cmd) = command {
            if let Some(prev) = self.outstanding.replace(cmd) {
                self.stale = Some(prev);
            }
        }
    }

    fn success_for(&mut self, cmd: &Command) -> Event {
        match cmd {
            Command::FetchPair { generation, .. } => Event::PairLoaded {
                generation: *generation,
                result: Ok((self.fresh(), self.fresh())),
            },
            Command::FetchReplacement { generation, .. } => Event::ReplacementLoaded {
                generation: *generation,
                result: Ok(self.fresh()),
            },
        }
    }

    fn step(&mut self, step: &Step) {
        match step {
            Step::Pick(side) => {
                let cmd = self.session.apply(Event::Pick(*side));
                self.issue(cmd);
            }
            Step::Deliver => {
                if let Some(cmd) = self.outstanding.take() {
                    let event = self.success_for(&cmd);
                    let next = self.session.apply(event);
                    self.issue(next);
                }
            }
            Step::Fail => {
                if let Some(cmd) = self.outstanding.take() {
                    let error =
                        SourcingError::ProviderUnavailable(ProviderError::Status(503));
                    let event = match cmd {
                        Command::FetchPair { generation, .. } => Event::PairLoaded {
                            generation,
                            result: Err(error),
                        },
                        Command::FetchReplacement { generation, .. } => {
                            Event::ReplacementLoaded {
                                generation,
                                result: Err(error),
                            }
                        }
                    };
                    let next = self.session.apply(event);
                    self.issue(next);
                }
            }
            Step::Retry => {
                let cmd = self.session.apply(Event::Retry);
                self.issue(cmd);
            }
            Step::Restart => {
                let cmd = self.session.apply(Event::Restart);
                self.issue(cmd);
            }
            Step::DeliverStale => {
                if let Some(cmd) = self.stale.take() {
                    let event = self.success_for(&cmd);
                    let next = self.session.apply(event);
                    self.issue(next);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_for_any_event_sequence(
        limit in 1_u32..8,
        steps in prop::collection::vec(step(), 0..120),
    ) {
        let mut harness = Harness::new(limit);
        let mut last_round = 0;
        let mut last_generation = harness.session.generation();
        for step in &steps {
            let before = harness.session.clone();
            harness.step(step);
            let s = &harness.session;

            prop_assert_eq!(s.tally_total(), s.round());
            prop_assert!(s.round() <= s.round_limit());
            prop_assert_eq!(s.is_finished(), s.round() == s.round_limit());
            prop_assert!(s.tally().values().all(|&n| n > 0));
            prop_assert!(s.tally().keys().all(|id| s.seen_ids().contains(id)));

            if s.generation() == last_generation {
                prop_assert!(s.round() >= last_round);
            }
            last_round = s.round();
            last_generation = s.generation();

            if s.phase() == Phase::Active {
                let (l, r) = (s.left().unwrap(), s.right().unwrap());
                prop_assert_ne!(l.id(), r.id());
            }

            if let Step::Pick(side) = step {
                if before.candidate(*side).is_none() || before.stalled_side() == Some(*side) {
                    prop_assert_eq!(&before, s);
                }
            }

            if let Step::Restart = step {
                prop_assert_eq!(s.round(), 0);
                prop_assert!(s.tally().is_empty());
                prop_assert!(s.seen_ids().is_empty());
                prop_assert!(!s.is_finished());
            }
        }
    }

    #[test]
    fn repeated_picks_before_delivery_count_once(
        side in prop_oneof![Just(Side::Left), Just(Side::Right)],
        clicks in 2_usize..6,
    ) {
        let mut harness = Harness::new(10);
        harness.step(&Step::Deliver);
        for _ in 0..clicks {
            harness.step(&Step::Pick(side));
        }
        harness.step(&Step::Deliver);
        prop_assert_eq!(harness.session.round(), 1);
        prop_assert_eq!(harness.session.tally_total(), 1);
    }
}
