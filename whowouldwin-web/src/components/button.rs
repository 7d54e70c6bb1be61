use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub label: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or_default]
    pub onclick: Callback<()>,
}

#[function_component(Button)]
pub fn button(p: &Props) -> Html {
    let onclick = {
        let cb = p.onclick.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    html! {
        <button type="button" class={classes!("btn", p.class.clone())} disabled={p.disabled} {onclick}>
            { p.label.clone() }
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn button_renders_label() {
        let props = Props {
            label: AttrValue::from("Try again"),
            class: Classes::new(),
            disabled: false,
            onclick: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<Button>::with_props(props).render());
        assert!(html.contains("Try again"));
    }

    #[test]
    fn disabled_button_is_marked() {
        let props = Props {
            label: AttrValue::from("Play again"),
            class: classes!("btn--primary"),
            disabled: true,
            onclick: Callback::noop(),
        };
        let html = block_on(LocalServerRenderer::<Button>::with_props(props).render());
        assert!(html.contains("disabled"));
        assert!(html.contains("btn--primary"));
    }
}
