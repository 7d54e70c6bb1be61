use crate::i18n::t;
use yew::prelude::*;

#[function_component(Footer)]
pub fn footer() -> Html {
    html! {
        <footer>
            <a href="https://jikan.moe" target="_blank" rel="noopener noreferrer">
                { t("footer.attribution") }
            </a>
        </footer>
    }
}
