//! Fault injection around any provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use whowouldwin_game::{CharacterProvider, GroupId, ProviderError, RawCharacter};

/// Fail `burst` consecutive roster calls out of every `every`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultPlan {
    pub every: u32,
    pub burst: u32,
}

impl FaultPlan {
    fn fails(self, call: u32) -> bool {
        self.every > 0 && call % self.every < self.burst
    }
}

pub struct FlakyProvider {
    inner: Rc<dyn CharacterProvider>,
    plan: FaultPlan,
    roster_calls: Cell<u32>,
}

impl FlakyProvider {
    pub fn new(inner: Rc<dyn CharacterProvider>, plan: FaultPlan) -> Self {
        Self {
            inner,
            plan,
            roster_calls: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl CharacterProvider for FlakyProvider {
    async fn group_title(&self, group: GroupId) -> Result<String, ProviderError> {
        self.inner.group_title(group).await
    }

    async fn roster(&self, group: GroupId) -> Result<Vec<RawCharacter>, ProviderError> {
        let call = self.roster_calls.get();
        self.roster_calls.set(call + 1);
        if self.plan.fails(call) {
            log::debug!("injecting fault on roster call {call} for group {group}");
            return Err(ProviderError::Status(503));
        }
        self.inner.roster(group).await
    }
}
