use crate::i18n::{t, tr};
use std::collections::BTreeMap;
use yew::prelude::*;

#[derive(Properties, PartialEq, Eq, Clone)]
pub struct Props {
    pub round: u32,
    pub round_limit: u32,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    let round = p.round.to_string();
    let limit = p.round_limit.to_string();
    let mut args = BTreeMap::new();
    args.insert("round", round.as_str());
    args.insert("limit", limit.as_str());

    html! {
        <header role="banner">
            <a href="#main" class="sr-only">{ t("app.tagline") }</a>
            <h1>{ t("app.title") }</h1>
            <p class="round-counter" aria-live="polite">{ tr("round.counter", Some(&args)) }</p>
        </header>
    }
}
