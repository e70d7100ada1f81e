//! Practice-session composition on top of the due set.
//!
//! This is the caller-side policy: the scheduler itself only answers "is it
//! due" and "has it been seen".

use std::collections::HashSet;

use itertools::Itertools;
use log::trace;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::progress::Progress;

pub const DEFAULT_SESSION_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SESSION_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
}

impl SessionBuilder {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Picks up to `size` distinct item ids: everything due first, then
    /// unseen catalog items in catalog order, then already-learned items that
    /// are not yet due, in random order.
    pub fn build<S, R>(
        &self,
        catalog: &[S],
        progress: &Progress,
        now: Timestamp,
        rng: &mut R,
    ) -> Vec<String>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let size = self.config.size;
        let due = progress.due(now);
        trace!("{} due of {} learned", due.len(), progress.len());

        let mut learned = progress
            .iter()
            .filter(|record| !record.is_due(now))
            .map(|record| record.item_id())
            .collect::<Vec<_>>();
        learned.shuffle(rng);

        let unseen = catalog
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| !progress.has_record(id));

        due.into_iter()
            .map(|record| record.item_id())
            .chain(unseen)
            .chain(learned)
            .unique()
            .take(size)
            .map(str::to_owned)
            .collect()
    }
}

/// `n` distinct catalog ids in random order, for drills that ignore the
/// schedule. Duplicate ids in the catalog are only drawn once.
pub fn random_sample<S, R>(catalog: &[S], n: usize, rng: &mut R) -> Vec<String>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let mut seen = HashSet::new();
    let distinct = catalog
        .iter()
        .map(|id| id.as_ref())
        .filter(|id| seen.insert(*id))
        .collect::<Vec<_>>();
    distinct
        .choose_multiple(rng, n)
        .map(|id| (*id).to_owned())
        .collect()
}
