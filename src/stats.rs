use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::progress::Progress;
use crate::record::{ReviewRecord, Status};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// An item is weak once it has missed more than this many times.
    pub weak_miss_threshold: u32,
    pub weak_limit: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            weak_miss_threshold: 2,
            weak_limit: 5,
        }
    }
}

/// Dashboard summary over a learner's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStats {
    pub learned: usize,
    pub graduated: usize,
    pub due: usize,
    pub unseen: usize,
    /// Lifetime share of passing reviews, rounded to a whole percent.
    pub accuracy_percent: u32,
    /// Most-missed items first.
    pub weak_items: Vec<String>,
}

impl ProgressStats {
    pub fn compute(
        progress: &Progress,
        catalog_len: usize,
        now: Timestamp,
        config: &StatsConfig,
    ) -> Self {
        let (correct, attempts) = progress.iter().fold((0u64, 0u64), |(c, a), record| {
            (
                c + u64::from(record.correct_count()),
                a + u64::from(record.attempts()),
            )
        });
        let accuracy_percent = if attempts > 0 {
            (correct as f64 / attempts as f64 * 100.0).round() as u32
        } else {
            0
        };

        Self {
            learned: progress.len(),
            graduated: progress
                .iter()
                .filter(|record| record.status() == Status::Graduated)
                .count(),
            due: progress.due(now).len(),
            unseen: catalog_len.saturating_sub(progress.len()),
            accuracy_percent,
            weak_items: weak_items(progress, config)
                .map(|record| record.item_id().to_owned())
                .collect(),
        }
    }
}

/// Items missed more than `weak_miss_threshold` times, most-missed first.
pub fn weak_items<'p>(
    progress: &'p Progress,
    config: &StatsConfig,
) -> impl Iterator<Item = &'p ReviewRecord> {
    progress
        .iter()
        .filter(|record| record.miss_count() > config.weak_miss_threshold)
        .sorted_by(|a, b| {
            b.miss_count()
                .cmp(&a.miss_count())
                .then_with(|| a.item_id().cmp(b.item_id()))
        })
        .take(config.weak_limit)
}
