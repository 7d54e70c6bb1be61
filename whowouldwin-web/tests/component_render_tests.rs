use futures::executor::block_on;
use whowouldwin_game::{
    Candidate, Event, ProviderError, RawCharacter, Session, Side, SourcingError,
};
use whowouldwin_web::app::view::{GameView, Props};
use whowouldwin_web::components::footer::Footer;
use whowouldwin_web::components::header::Header;
use yew::{Callback, LocalServerRenderer};

fn candidate(id: u32, name: &str) -> Candidate {
    Candidate::from_raw(
        &RawCharacter::new(id, name, format!("https://img.test/{id}.jpg")),
        "Fullmetal Alchemist: Brotherhood",
    )
    .unwrap()
}

fn render(session: Session) -> String {
    let props = Props {
        session,
        on_pick: Callback::noop(),
        on_retry: Callback::noop(),
        on_restart: Callback::noop(),
    };
    block_on(LocalServerRenderer::<GameView>::with_props(props).render())
}

fn active(limit: u32) -> Session {
    let mut session = Session::new(limit);
    let cmd = session.apply(Event::Start).unwrap();
    session.apply(Event::PairLoaded {
        generation: cmd.generation(),
        result: Ok((candidate(11, "Edward Elric"), candidate(12, "Roy Mustang"))),
    });
    session
}

#[test]
fn header_shows_round_counter() {
    let props = whowouldwin_web::components::header::Props {
        round: 7,
        round_limit: 50,
    };
    let html = block_on(LocalServerRenderer::<Header>::with_props(props).render());
    assert!(html.contains("Who Would Win?"));
    assert!(html.contains("Round 7 / 50"));
}

#[test]
fn footer_credits_data_source() {
    let html = block_on(LocalServerRenderer::<Footer>::new().render());
    assert!(html.contains("<footer>"));
    assert!(html.contains("Jikan"));
}

#[test]
fn loading_session_shows_two_placeholders() {
    let mut session = Session::default();
    session.apply(Event::Start);
    let html = render(session);
    assert_eq!(html.matches("card--loading").count(), 2);
    assert!(html.contains("Round 0 / 50"));
}

#[test]
fn active_session_shows_both_candidates() {
    let html = render(active(50));
    assert!(html.contains("Edward Elric"));
    assert!(html.contains("Roy Mustang"));
    assert!(!html.contains("role=\"alert\""));
}

#[test]
fn pending_replacement_shows_loading_on_losing_side() {
    let mut session = active(50);
    session.apply(Event::Pick(Side::Left));
    let html = render(session);
    assert!(html.contains("Edward Elric"));
    assert!(!html.contains("Roy Mustang"));
    assert!(html.contains("card--loading"));
}

#[test]
fn failed_initial_load_shows_retry() {
    let mut session = Session::default();
    let cmd = session.apply(Event::Start).unwrap();
    session.apply(Event::PairLoaded {
        generation: cmd.generation(),
        result: Err(SourcingError::ProviderUnavailable(ProviderError::Timeout(
            10_000,
        ))),
    });
    let html = render(session);
    assert!(html.contains("role=\"alert\""));
    assert!(html.contains("load the first two characters."));
    assert!(html.contains("not responding"));
    assert!(html.contains("Try again"));
}

#[test]
fn failed_replacement_names_the_side() {
    let mut session = active(50);
    let cmd = session.apply(Event::Pick(Side::Right)).unwrap();
    session.apply(Event::ReplacementLoaded {
        generation: cmd.generation(),
        result: Err(SourcingError::ExhaustedCandidates(
            whowouldwin_game::GroupId(5114),
        )),
    });
    let html = render(session);
    assert!(html.contains("for the left side."));
    assert!(html.contains("Every available character has already been shown."));
}

#[test]
fn failed_replacement_disables_the_beaten_side() {
    let mut session = active(50);
    let cmd = session.apply(Event::Pick(Side::Left)).unwrap();
    session.apply(Event::ReplacementLoaded {
        generation: cmd.generation(),
        result: Err(SourcingError::ProviderUnavailable(ProviderError::Status(503))),
    });
    let html = render(session);
    let start = html.find("card--right").unwrap();
    let tag_end = start + html[start..].find('>').unwrap();
    assert!(html[start..tag_end].contains("disabled"));
    assert!(html.contains("Roy Mustang"));
    assert!(html.contains("for the right side."));
}

#[test]
fn finished_session_shows_leaderboard() {
    let mut session = active(1);
    session.apply(Event::Pick(Side::Right));
    let html = render(session);
    assert!(html.contains("Final standings"));
    assert!(html.contains("Roy Mustang"));
    assert!(html.contains("standing--winner"));
    assert!(!html.contains("Edward Elric"));
    assert!(html.contains("Play again"));
}
