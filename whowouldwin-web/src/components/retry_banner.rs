use crate::components::button::Button;
use crate::i18n::t;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub title: AttrValue,
    pub message: AttrValue,
    pub on_retry: Callback<()>,
    pub on_restart: Callback<()>,
}

#[function_component(RetryBanner)]
pub fn retry_banner(p: &Props) -> Html {
    html! {
        <div class="alert alert--error" role="alert">
            <strong class="alert__title">{ p.title.clone() }</strong>
            <p class="alert__message">{ p.message.clone() }</p>
            <div class="alert__actions">
                <Button label={t("errors.retry")} class={classes!("btn--primary")} onclick={p.on_retry.clone()} />
                <Button label={t("errors.restart")} onclick={p.on_restart.clone()} />
            </div>
        </div>
    }
}
