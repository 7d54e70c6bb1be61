//! In-memory provider for tests and offline play.

use crate::candidate::{GroupId, RawCharacter};
use crate::constants::SOURCE_GROUPS;
use crate::provider::{CharacterProvider, ProviderError};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone)]
struct FixtureGroup {
    title: String,
    roster: Vec<RawCharacter>,
}

/// Serves canned rosters, with optional scripted failures.
#[derive(Debug, Default)]
pub struct FixtureProvider {
    groups: HashMap<GroupId, FixtureGroup>,
    failures: RefCell<VecDeque<ProviderError>>,
    title_calls: Cell<usize>,
    roster_calls: Cell<usize>,
}

impl FixtureProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand-written rosters for the configured source groups, including one
    /// incomplete record per group.
    #[must_use]
    pub fn sample() -> Self {
        let rosters: [&[(&str, bool)]; 4] = [
            &[
                ("Izuku Midoriya", true),
                ("Katsuki Bakugo", true),
                ("Shouto Todoroki", true),
                ("Ochako Uraraka", true),
                ("All Might", true),
                ("Unnamed Student", false),
            ],
            &[
                ("Goku", true),
                ("Vegeta", true),
                ("Gohan", true),
                ("Piccolo", true),
                ("Frieza", true),
                ("Saibaman", false),
            ],
            &[
                ("Edward Elric", true),
                ("Alphonse Elric", true),
                ("Roy Mustang", true),
                ("Riza Hawkeye", true),
                ("Scar", true),
                ("Central Soldier", false),
            ],
            &[
                ("Eren Yeager", true),
                ("Mikasa Ackerman", true),
                ("Armin Arlert", true),
                ("Levi", true),
                ("Erwin Smith", true),
                ("Garrison Member", false),
            ],
        ];
        let mut provider = Self::new();
        for (group_index, (group, names)) in SOURCE_GROUPS.iter().zip(rosters).enumerate() {
            let base = 1_000 * (u32::try_from(group_index).unwrap_or(0) + 1);
            let roster = names
                .iter()
                .enumerate()
                .map(|(i, (name, has_image))| {
                    let id = base + u32::try_from(i).unwrap_or(0);
                    RawCharacter {
                        id,
                        name: Some((*name).to_string()),
                        image_url: has_image.then(|| fixture_image(id)),
                    }
                })
                .collect();
            provider = provider.with_group(group.id, group.label, roster);
        }
        provider
    }

    /// Synthetic rosters of `per_group` complete records for every configured group.
    #[must_use]
    pub fn generated(per_group: u32) -> Self {
        let mut provider = Self::new();
        for (group_index, group) in SOURCE_GROUPS.iter().enumerate() {
            let base = 10_000 * (u32::try_from(group_index).unwrap_or(0) + 1);
            let roster = (0..per_group)
                .map(|n| {
                    let id = base + n;
                    RawCharacter::new(id, format!("{} #{}", group.label, n + 1), fixture_image(id))
                })
                .collect();
            provider = provider.with_group(group.id, group.label, roster);
        }
        provider
    }

    #[must_use]
    pub fn with_group(
        mut self,
        group: GroupId,
        title: impl Into<String>,
        roster: Vec<RawCharacter>,
    ) -> Self {
        self.groups.insert(
            group,
            FixtureGroup {
                title: title.into(),
                roster,
            },
        );
        self
    }

    /// Fail the next `count` requests (titles and rosters alike) with `error`.
    #[must_use]
    pub fn fail_next(self, count: usize, error: ProviderError) -> Self {
        self.inject_failures(count, error);
        self
    }

    /// Queue failures on an already shared provider.
    pub fn inject_failures(&self, count: usize, error: ProviderError) {
        let mut failures = self.failures.borrow_mut();
        failures.extend(std::iter::repeat_n(error, count));
    }

    #[must_use]
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut ids: Vec<GroupId> = self.groups.keys().copied().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn title_calls(&self) -> usize {
        self.title_calls.get()
    }

    #[must_use]
    pub fn roster_calls(&self) -> usize {
        self.roster_calls.get()
    }

    fn take_failure(&self) -> Option<ProviderError> {
        self.failures.borrow_mut().pop_front()
    }

    fn group(&self, group: GroupId) -> Result<&FixtureGroup, ProviderError> {
        self.groups.get(&group).ok_or(ProviderError::Status(404))
    }
}

fn fixture_image(id: u32) -> String {
    format!("https://cdn.myanimelist.net/images/characters/fixture/{id}.jpg")
}

#[async_trait(?Send)]
impl CharacterProvider for FixtureProvider {
    async fn group_title(&self, group: GroupId) -> Result<String, ProviderError> {
        self.title_calls.set(self.title_calls.get() + 1);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.group(group).map(|g| g.title.clone())
    }

    async fn roster(&self, group: GroupId) -> Result<Vec<RawCharacter>, ProviderError> {
        self.roster_calls.set(self.roster_calls.get() + 1);
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.group(group).map(|g| g.roster.clone())
    }
}
