use crate::components::candidate_card::CandidateCard;
use crate::components::footer::Footer;
use crate::components::header::Header;
use crate::components::leaderboard::LeaderboardView;
use crate::components::retry_banner::RetryBanner;
use crate::i18n::{t, tr};
use std::collections::BTreeMap;
use whowouldwin_game::{Phase, Session, Side, SourcingError};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub session: Session,
    pub on_pick: Callback<Side>,
    pub on_retry: Callback<()>,
    pub on_restart: Callback<()>,
}

/// User-facing explanation for a sourcing failure.
#[must_use]
pub fn error_message(error: &SourcingError) -> String {
    match error.root() {
        SourcingError::ProviderUnavailable(_) => t("errors.provider"),
        SourcingError::EmptyRoster(_) => t("errors.empty_roster"),
        SourcingError::ExhaustedCandidates(_) => t("errors.exhausted"),
        SourcingError::RepeatedCandidate(_) => t("errors.repeated"),
        SourcingError::NoSourceGroups => t("errors.no_groups"),
        SourcingError::InitialLoadFailed(_) => t("errors.initial_load"),
    }
}

fn render_cards(p: &Props) -> Html {
    let session = &p.session;
    let card = |side: Side| {
        html! {
            <CandidateCard
                {side}
                candidate={session.candidate(side).cloned()}
                awaiting={session.is_awaiting(side)}
                disabled={!session.accepts_pick(side)}
                on_pick={p.on_pick.clone()}
            />
        }
    };
    html! {
        <section class="arena">
            { card(Side::Left) }
            <span class="arena__vs" aria-hidden="true">{ t("card.vs") }</span>
            { card(Side::Right) }
        </section>
    }
}

fn render_failures(p: &Props) -> Html {
    let session = &p.session;
    if let Some(error) = session.load_error() {
        return html! {
            <RetryBanner
                title={t("errors.initial_load")}
                message={error_message(error)}
                on_retry={p.on_retry.clone()}
                on_restart={p.on_restart.clone()}
            />
        };
    }
    if let Some(failure) = session.replacement_error() {
        let side = t(&format!("side.{}", failure.pick.replaced_side()));
        let mut args = BTreeMap::new();
        args.insert("side", side.as_str());
        return html! {
            <RetryBanner
                title={tr("errors.replacement", Some(&args))}
                message={error_message(&failure.error)}
                on_retry={p.on_retry.clone()}
                on_restart={p.on_restart.clone()}
            />
        };
    }
    Html::default()
}

#[function_component(GameView)]
pub fn game_view(p: &Props) -> Html {
    let session = &p.session;
    let body = match session.phase() {
        Phase::Finished => html! {
            <LeaderboardView
                board={session.leaderboard()}
                rounds={session.round()}
                on_restart={p.on_restart.clone()}
            />
        },
        Phase::Loading | Phase::Active => html! {
            <>
                { render_failures(p) }
                { render_cards(p) }
            </>
        },
    };

    html! {
        <div class="app">
            <Header round={session.round()} round_limit={session.round_limit()} />
            <main id="main">{ body }</main>
            <Footer />
        </div>
    }
}
