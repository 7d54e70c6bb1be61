use whowouldwin_game::Event;
use yew::prelude::*;

pub mod controller;
pub mod view;

pub use controller::Controller;
pub use view::GameView;

#[function_component(App)]
pub fn app() -> Html {
    let update = use_force_update();
    let controller = use_memo((), move |_| {
        Controller::browser(Callback::from(move |()| update.force_update()))
    });

    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            controller.dispatch(Event::Start);
            || ()
        });
    }

    html! {
        <GameView
            session={controller.snapshot()}
            on_pick={controller.on_pick()}
            on_retry={controller.on_retry()}
            on_restart={controller.on_restart()}
        />
    }
}
