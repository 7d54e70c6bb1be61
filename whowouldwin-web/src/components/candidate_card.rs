use crate::i18n::{t, tr};
use std::collections::BTreeMap;
use whowouldwin_game::{Candidate, Side};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub side: Side,
    #[prop_or_default]
    pub candidate: Option<Candidate>,
    /// The side is waiting on a replacement.
    #[prop_or_default]
    pub awaiting: bool,
    #[prop_or_default]
    pub disabled: bool,
    pub on_pick: Callback<Side>,
}

fn loading_card(side: Side) -> Html {
    html! {
        <div class={classes!("card", "card--loading", format!("card--{side}"))} aria-busy="true">
            <div class="card__spinner" aria-hidden="true"></div>
            <p>{ t("card.loading") }</p>
        </div>
    }
}

#[function_component(CandidateCard)]
pub fn candidate_card(p: &Props) -> Html {
    let broken_image = use_state(|| false);
    let candidate_id = p.candidate.as_ref().map(Candidate::id);
    {
        let broken_image = broken_image.clone();
        use_effect_with(candidate_id, move |_| {
            broken_image.set(false);
            || ()
        });
    }

    let Some(candidate) = p.candidate.as_ref().filter(|_| !p.awaiting) else {
        return loading_card(p.side);
    };

    let onclick = {
        let cb = p.on_pick.clone();
        let side = p.side;
        let disabled = p.disabled;
        Callback::from(move |_: MouseEvent| {
            if !disabled {
                cb.emit(side);
            }
        })
    };
    let onerror = {
        let broken_image = broken_image.clone();
        Callback::from(move |_: Event| broken_image.set(true))
    };

    let mut args = BTreeMap::new();
    args.insert("name", candidate.name());
    let label = tr("card.pick", Some(&args));
    let mut group_args = BTreeMap::new();
    group_args.insert("group", candidate.source_group());

    let portrait = if *broken_image || candidate.is_placeholder() {
        html! { <div class="card__image card__image--missing">{ t("card.image_missing") }</div> }
    } else {
        html! {
            <img
                class="card__image"
                src={candidate.image_url().to_string()}
                alt={candidate.name().to_string()}
                loading="lazy"
                {onerror}
            />
        }
    };

    html! {
        <button
            type="button"
            class={classes!("card", format!("card--{}", p.side))}
            data-side={p.side.as_str()}
            aria-label={label}
            disabled={p.disabled}
            {onclick}
        >
            { portrait }
            <h2 class="card__name">{ candidate.name().to_string() }</h2>
            <p class="card__group">{ tr("card.from", Some(&group_args)) }</p>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use whowouldwin_game::RawCharacter;
    use yew::LocalServerRenderer;

    fn goku() -> Candidate {
        Candidate::from_raw(
            &RawCharacter::new(
                246,
                "Son Goku",
                "https://cdn.myanimelist.net/images/characters/15/72546.jpg",
            ),
            "Dragon Ball Z Kai",
        )
        .unwrap()
    }

    fn render(candidate: Option<Candidate>, awaiting: bool) -> String {
        let props = Props {
            side: Side::Left,
            candidate,
            awaiting,
            disabled: false,
            on_pick: Callback::noop(),
        };
        block_on(LocalServerRenderer::<CandidateCard>::with_props(props).render())
    }

    #[test]
    fn renders_name_image_and_group() {
        let html = render(Some(goku()), false);
        assert!(html.contains("Son Goku"));
        assert!(html.contains("72546.jpg"));
        assert!(html.contains("from Dragon Ball Z Kai"));
        assert!(html.contains("card--left"));
    }

    #[test]
    fn empty_side_shows_loading() {
        let html = render(None, false);
        assert!(html.contains("card--loading"));
        assert!(!html.contains("<button"));
    }

    #[test]
    fn awaiting_side_shows_loading_even_with_candidate() {
        let html = render(Some(goku()), true);
        assert!(html.contains("card--loading"));
        assert!(!html.contains("Son Goku"));
    }

    #[test]
    fn unknown_candidate_has_no_image_tag() {
        let html = render(Some(Candidate::unknown(whowouldwin_game::CandidateId(9))), false);
        assert!(html.contains("Unknown"));
        assert!(!html.contains("<img"));
    }
}
