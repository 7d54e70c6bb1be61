//! Executes session commands against a provider.
//!
//! Both shells run commands the same way: source what was asked for and wrap
//! the outcome in the matching [`Event`], keeping the command's generation.

use crate::provider::CharacterProvider;
use crate::session::{Command, Event};
use crate::sourcing::{SourcingConfig, fetch_candidate, fetch_pair};
use rand::Rng;

/// Perform `command` and produce the event to feed back into the session.
pub async fn resolve<P, R>(
    command: Command,
    provider: &P,
    config: &SourcingConfig,
    rng: &mut R,
) -> Event
where
    P: CharacterProvider + ?Sized,
    R: Rng + ?Sized,
{
    match command {
        Command::FetchPair {
            generation,
            exclude,
        } => Event::PairLoaded {
            generation,
            result: fetch_pair(provider, config, &exclude, rng).await,
        },
        Command::FetchReplacement {
            generation,
            side,
            exclude,
        } => {
            log::debug!("sourcing replacement for {side}");
            Event::ReplacementLoaded {
                generation,
                result: fetch_candidate(provider, config, &exclude, rng).await,
            }
        }
    }
}
