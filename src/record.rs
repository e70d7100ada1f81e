use serde::{Deserialize, Serialize};
use snafu::ensure;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::clock::Timestamp;
use crate::error::{InvalidRecordSnafu, Result};
use crate::quality::{GRADUATING_QUALITY, PASSING_QUALITY};
use crate::scheduler::{MIN_EASINESS, due_at};

/// Mastery state of an item.
///
/// `New` describes items that have no record at all; the scheduler never
/// writes it. Every other state is derived from the latest review grade.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    #[default]
    New,
    Learning,
    Review,
    Graduated,
}

impl Status {
    pub(crate) fn from_quality(quality: i32) -> Self {
        if quality >= GRADUATING_QUALITY {
            Status::Graduated
        } else if quality >= PASSING_QUALITY {
            Status::Review
        } else {
            Status::Learning
        }
    }
}

/// Scheduling state of a single item, produced by the scheduler and
/// persisted by the caller.
///
/// Fields are read-only outside the crate: a record is only ever replaced
/// wholesale by a review, so `status`, `interval` and `next_review` cannot
/// drift apart. The two exceptions are the caller-side actions
/// [`ReviewRecord::clear_weak_status`] and
/// [`ReviewRecord::record_session_outcome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    #[serde(alias = "kanjiId")]
    pub(crate) item_id: String,
    pub(crate) next_review: Timestamp,
    /// Days
    pub(crate) interval: u32,
    pub(crate) repetition: u32,
    #[serde(alias = "ef")]
    pub(crate) easiness_factor: f64,
    pub(crate) status: Status,
    pub(crate) correct_count: u32,
    pub(crate) miss_count: u32,
    pub(crate) last_reviewed: Timestamp,
    #[serde(default, alias = "accCorrect")]
    pub(crate) session_correct: u32,
    #[serde(default, alias = "accMiss")]
    pub(crate) session_miss: u32,
}

impl ReviewRecord {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn next_review(&self) -> Timestamp {
        self.next_review
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn repetition(&self) -> u32 {
        self.repetition
    }

    pub fn easiness_factor(&self) -> f64 {
        self.easiness_factor
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn last_reviewed(&self) -> Timestamp {
        self.last_reviewed
    }

    pub fn session_correct(&self) -> u32 {
        self.session_correct
    }

    pub fn session_miss(&self) -> u32 {
        self.session_miss
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review <= now
    }

    /// Lifetime `correct + miss` count.
    pub fn attempts(&self) -> u32 {
        self.correct_count.saturating_add(self.miss_count)
    }

    /// Share of lifetime reviews that passed, `None` before any attempt.
    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.correct_count, self.miss_count)
    }

    /// Share of tallied session answers that were correct.
    pub fn session_accuracy(&self) -> Option<f64> {
        ratio(self.session_correct, self.session_miss)
    }

    /// Forgives past lapses: resets `miss_count` and nothing else.
    pub fn clear_weak_status(&mut self) {
        self.miss_count = 0;
    }

    /// Tallies one answer from an accuracy-tracked session (daily and timed
    /// runs). Independent of the lifetime counters the scheduler maintains.
    pub fn record_session_outcome(&mut self, correct: bool) {
        let counter = if correct {
            &mut self.session_correct
        } else {
            &mut self.session_miss
        };
        *counter = counter.saturating_add(1);
    }

    /// Checks a record that came from outside the scheduler, typically after
    /// deserialization.
    pub fn validate(&self) -> Result<()> {
        let item_id = self.item_id.as_str();
        ensure!(
            !item_id.is_empty(),
            InvalidRecordSnafu {
                item_id,
                reason: "empty item id",
            }
        );
        ensure!(
            self.easiness_factor.is_finite() && self.easiness_factor >= MIN_EASINESS,
            InvalidRecordSnafu {
                item_id,
                reason: format!(
                    "easiness factor {} is below {MIN_EASINESS}",
                    self.easiness_factor
                ),
            }
        );
        ensure!(
            self.interval >= 1,
            InvalidRecordSnafu {
                item_id,
                reason: "interval must be at least one day",
            }
        );
        ensure!(
            self.status != Status::New,
            InvalidRecordSnafu {
                item_id,
                reason: "reviewed items cannot be new",
            }
        );
        ensure!(
            (self.status == Status::Learning) == (self.repetition == 0),
            InvalidRecordSnafu {
                item_id,
                reason: format!(
                    "status {} does not match repetition {}",
                    self.status, self.repetition
                ),
            }
        );
        ensure!(
            self.next_review == due_at(self.last_reviewed, self.interval),
            InvalidRecordSnafu {
                item_id,
                reason: "next review is not last review plus interval",
            }
        );
        Ok(())
    }
}

fn ratio(hits: u32, misses: u32) -> Option<f64> {
    let total = u64::from(hits) + u64::from(misses);
    (total > 0).then(|| hits as f64 / total as f64)
}
