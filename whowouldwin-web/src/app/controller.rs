//! Owner of the live session.
//!
//! Components never touch the [`Session`] directly: they hand events to the
//! [`Controller`], which applies them, asks Yew to re-render, and runs any
//! fetch the session requested in the background.

use crate::provider::JikanProvider;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;
use std::rc::Rc;
use whowouldwin_game::{
    CharacterProvider, Command, Event, Session, Side, SourcingConfig, resolve,
};
use yew::Callback;

#[derive(Clone)]
pub struct Controller {
    session: Rc<RefCell<Session>>,
    provider: Rc<dyn CharacterProvider>,
    config: Rc<SourcingConfig>,
    rng: Rc<RefCell<ChaCha20Rng>>,
    on_change: Callback<()>,
}

impl PartialEq for Controller {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session)
    }
}

impl Controller {
    #[must_use]
    pub fn new(
        provider: Rc<dyn CharacterProvider>,
        config: SourcingConfig,
        rng: ChaCha20Rng,
        on_change: Callback<()>,
    ) -> Self {
        Self {
            session: Rc::new(RefCell::new(Session::default())),
            provider,
            config: Rc::new(config),
            rng: Rc::new(RefCell::new(rng)),
            on_change,
        }
    }

    /// Live Jikan provider, default groups, entropy-seeded.
    #[must_use]
    pub fn browser(on_change: Callback<()>) -> Self {
        Self::new(
            Rc::new(JikanProvider::cached()),
            SourcingConfig::default(),
            ChaCha20Rng::from_entropy(),
            on_change,
        )
    }

    /// Copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.borrow().clone()
    }

    /// Apply `event` and notify the view. Returns the fetch the session wants.
    pub fn apply(&self, event: Event) -> Option<Command> {
        let command = self.session.borrow_mut().apply(event);
        self.on_change.emit(());
        command
    }

    /// Run `command` against the provider and wrap the outcome as an event.
    #[allow(clippy::future_not_send)]
    pub async fn execute(&self, command: Command) -> Event {
        let mut rng = self.command_rng();
        resolve(command, &*self.provider, &self.config, &mut rng).await
    }

    /// Apply `event`, then fetch in the background and feed the result back.
    pub fn dispatch(&self, event: Event) {
        if let Some(command) = self.apply(event) {
            let this = self.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = this.execute(command).await;
                this.dispatch(event);
            });
        }
    }

    #[must_use]
    pub fn on_pick(&self) -> Callback<Side> {
        let this = self.clone();
        Callback::from(move |side| this.dispatch(Event::Pick(side)))
    }

    #[must_use]
    pub fn on_retry(&self) -> Callback<()> {
        let this = self.clone();
        Callback::from(move |()| this.dispatch(Event::Retry))
    }

    #[must_use]
    pub fn on_restart(&self) -> Callback<()> {
        let this = self.clone();
        Callback::from(move |()| this.dispatch(Event::Restart))
    }

    fn command_rng(&self) -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(self.rng.borrow_mut().next_u64())
    }
}
