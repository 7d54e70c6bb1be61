use crate::components::button::Button;
use crate::i18n::{fmt_share, t, tr};
use std::collections::BTreeMap;
use whowouldwin_game::{Leaderboard, Standing};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub board: Leaderboard,
    pub rounds: u32,
    pub on_restart: Callback<()>,
}

fn render_row(standing: &Standing) -> Html {
    let rank = standing.rank.to_string();
    let count = standing.count.to_string();
    let mut rank_args = BTreeMap::new();
    rank_args.insert("rank", rank.as_str());
    let mut pick_args = BTreeMap::new();
    pick_args.insert("count", count.as_str());

    let candidate = &standing.candidate;
    let thumb = if candidate.is_placeholder() {
        html! { <span class="standing__thumb standing__thumb--missing" aria-hidden="true"></span> }
    } else {
        html! {
            <img class="standing__thumb" src={candidate.image_url().to_string()} alt="" loading="lazy" />
        }
    };

    html! {
        <li
            key={candidate.id().0}
            class={classes!("standing", standing.is_winner.then_some("standing--winner"))}
        >
            <span class="standing__rank">{ tr("results.rank", Some(&rank_args)) }</span>
            { thumb }
            <span class="standing__name">{ candidate.name().to_string() }</span>
            if standing.is_winner {
                <span class="badge badge--winner">{ t("results.winner") }</span>
            }
            <span class="standing__group">{ candidate.source_group().to_string() }</span>
            <span class="standing__count">{ tr("results.picks", Some(&pick_args)) }</span>
            <span class="standing__share">{ fmt_share(standing.share_pct) }</span>
        </li>
    }
}

#[function_component(LeaderboardView)]
pub fn leaderboard_view(p: &Props) -> Html {
    let total = p.rounds.to_string();
    let mut args = BTreeMap::new();
    args.insert("total", total.as_str());

    let list = if p.board.is_empty() {
        html! { <p class="results__empty">{ t("results.empty") }</p> }
    } else {
        html! {
            <ol class="results__list">
                { for p.board.entries().iter().map(render_row) }
            </ol>
        }
    };

    html! {
        <section class="results" aria-labelledby="results-title">
            <h2 id="results-title">{ t("results.title") }</h2>
            <p class="results__total">{ tr("results.total", Some(&args)) }</p>
            { list }
            <Button label={t("results.restart")} class={classes!("btn--primary")} onclick={p.on_restart.clone()} />
        </section>
    }
}
