//! SM-2 review step.
//!
//! One review fully replaces an item's [`ReviewRecord`]. A missing record
//! stands for an item that was never reviewed; the defaults below apply to
//! it. Lapses reset the interval to a single day regardless of how long it
//! had grown, and the easiness factor is updated on every review.

use log::{debug, warn};

use crate::clock::{Clock, DAY_MS, SystemClock, Timestamp};
use crate::progress::Progress;
use crate::quality::PASSING_QUALITY;
use crate::record::{ReviewRecord, Status};

pub const INITIAL_EASINESS: f64 = 2.5;
pub const MIN_EASINESS: f64 = 1.3;
/// Days until the review after the first successful recall.
pub const FIRST_INTERVAL: u32 = 1;
/// Days until the review after the second successful recall in a row.
pub const SECOND_INTERVAL: u32 = 6;
/// Days until the review after a lapse.
pub const LAPSE_INTERVAL: u32 = 1;

/// The scheduling inputs carried from one review to the next.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PriorState {
    interval: u32,
    repetition: u32,
    easiness_factor: f64,
    correct_count: u32,
    miss_count: u32,
    session_correct: u32,
    session_miss: u32,
}

impl Default for PriorState {
    fn default() -> Self {
        Self {
            interval: 0,
            repetition: 0,
            easiness_factor: INITIAL_EASINESS,
            correct_count: 0,
            miss_count: 0,
            session_correct: 0,
            session_miss: 0,
        }
    }
}

impl From<&ReviewRecord> for PriorState {
    fn from(record: &ReviewRecord) -> Self {
        Self {
            interval: record.interval,
            repetition: record.repetition,
            easiness_factor: record.easiness_factor,
            correct_count: record.correct_count,
            miss_count: record.miss_count,
            session_correct: record.session_correct,
            session_miss: record.session_miss,
        }
    }
}

/// `EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`, floored at
/// [`MIN_EASINESS`].
pub fn next_easiness(easiness_factor: f64, quality: i32) -> f64 {
    let distance = 5.0 - f64::from(quality);
    let next = easiness_factor + (0.1 - distance * (0.08 + distance * 0.02));
    if next < MIN_EASINESS {
        MIN_EASINESS
    } else {
        next
    }
}

/// Returns the new `(interval, repetition)` pair. Growth past the second
/// recall uses the easiness factor from *before* this review.
pub fn next_interval(
    interval: u32,
    repetition: u32,
    easiness_factor: f64,
    quality: i32,
) -> (u32, u32) {
    if quality < PASSING_QUALITY {
        return (LAPSE_INTERVAL, 0);
    }
    let next = match repetition {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        _ => (f64::from(interval) * easiness_factor).round() as u32,
    };
    (next, repetition.saturating_add(1))
}

pub(crate) fn due_at(reviewed: Timestamp, interval: u32) -> Timestamp {
    reviewed.saturating_add(i64::from(interval).saturating_mul(DAY_MS))
}

/// Applies one review with grade `quality` at time `now`.
///
/// `prior` must be the item's current record, or `None` for an item that was
/// never reviewed. Grades outside 0..=5 are not rejected: they flow through
/// the easiness formula unchanged (see [`crate::Quality`] for validation).
pub fn next_record(
    item_id: impl Into<String>,
    prior: Option<&ReviewRecord>,
    quality: i32,
    now: Timestamp,
) -> ReviewRecord {
    let item_id = item_id.into();
    if !(0..=5).contains(&quality) {
        warn!("quality {quality} for {item_id:?} is outside 0..=5");
    }
    let prior = prior.map(PriorState::from).unwrap_or_default();

    let (correct_count, miss_count) = if quality >= PASSING_QUALITY {
        (prior.correct_count.saturating_add(1), prior.miss_count)
    } else {
        (prior.correct_count, prior.miss_count.saturating_add(1))
    };
    let (interval, repetition) = next_interval(
        prior.interval,
        prior.repetition,
        prior.easiness_factor,
        quality,
    );
    let easiness_factor = next_easiness(prior.easiness_factor, quality);

    debug!(
        "{item_id}: q={quality} interval {} -> {interval}, ef {:.2} -> {easiness_factor:.2}",
        prior.interval, prior.easiness_factor
    );

    ReviewRecord {
        item_id,
        next_review: due_at(now, interval),
        interval,
        repetition,
        easiness_factor,
        status: Status::from_quality(quality),
        correct_count,
        miss_count,
        last_reviewed: now,
        session_correct: prior.session_correct,
        session_miss: prior.session_miss,
    }
}

/// Review scheduler bound to a time source.
#[derive(Debug, Clone, Default)]
pub struct Scheduler<C: Clock = SystemClock> {
    clock: C,
}

impl Scheduler<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> Scheduler<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// See [`next_record`].
    pub fn review(
        &self,
        item_id: impl Into<String>,
        prior: Option<&ReviewRecord>,
        quality: i32,
    ) -> ReviewRecord {
        next_record(item_id, prior, quality, self.now())
    }

    /// Reviews `item_id` against its stored record and writes the result back.
    pub fn review_stored<'p>(
        &self,
        progress: &'p mut Progress,
        item_id: &str,
        quality: i32,
    ) -> &'p ReviewRecord {
        progress.review(item_id, quality, self.now())
    }

    pub fn due<'p>(&self, progress: &'p Progress) -> Vec<&'p ReviewRecord> {
        progress.due(self.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::test_helpers::{NOW, TestHelper, replay};

    #[test]
    fn first_success() {
        let record = next_record("k-1", None, 5, NOW);
        assert_eq!(record.interval(), 1);
        assert_eq!(record.repetition(), 1);
        assert_eq!(record.status(), Status::Graduated);
        assert_eq!(record.correct_count(), 1);
        assert_eq!(record.miss_count(), 0);
        assert_eq!(record.last_reviewed(), NOW);
        assert_eq!(record.next_review(), NOW + DAY_MS);
        record.easiness_factor().assert_approx_eq(2.6);
    }

    #[test]
    fn second_success() {
        let record = replay("k-1", &[5, 5]);
        assert_eq!(record.interval(), 6);
        assert_eq!(record.repetition(), 2);
    }

    #[test]
    fn third_success_grows_by_prior_easiness() {
        let second = replay("k-1", &[5, 5]);
        let third = next_record("k-1", Some(&second), 5, NOW);
        let expected = (6.0 * second.easiness_factor()).round() as u32;
        assert_eq!(third.interval(), expected);
        // 2.5 -> 2.6 -> 2.7, round(6 * 2.7)
        assert_eq!(third.interval(), 16);
        assert_eq!(third.repetition(), 3);
    }

    #[test]
    fn growth_uses_easiness_before_the_update() {
        let second = replay("k-1", &[3, 3]);
        // 2.5 -> 2.36 -> 2.22; quality 3 lowers it again to 2.08 on this review
        second.easiness_factor().assert_approx_eq(2.22);
        let third = next_record("k-1", Some(&second), 3, NOW);
        assert_eq!(third.interval(), 13);
        third.easiness_factor().assert_approx_eq(2.08);
    }

    #[test]
    fn lapse_resets_repetition() {
        for history in [
            &[2][..],
            &[5, 2][..],
            &[5, 5, 5, 5, 5, 2][..],
            &[4, 3, 5, 4, 2][..],
        ] {
            let record = replay("k-1", history);
            assert_eq!(record.repetition(), 0, "{history:?}");
            assert_eq!(record.interval(), 1, "{history:?}");
            assert_eq!(record.status(), Status::Learning);
        }
    }

    #[test]
    fn easiness_never_drops_below_floor() {
        let mut record = next_record("k-1", None, 0, NOW);
        for _ in 0..20 {
            record = next_record("k-1", Some(&record), 0, NOW);
            assert!(record.easiness_factor() >= MIN_EASINESS);
        }
        assert_eq!(record.easiness_factor(), MIN_EASINESS);
    }

    #[test]
    fn easiness_deltas() {
        let deltas = (0..=5)
            .map(|q| next_easiness(2.5, q) - 2.5)
            .collect::<Vec<_>>();
        for (delta, expected) in deltas.iter().zip([-0.8, -0.54, -0.32, -0.14, 0.0, 0.1]) {
            delta.assert_approx_eq(expected);
        }
        assert_eq!(next_easiness(1.3, 0), MIN_EASINESS);
        // no ceiling
        next_easiness(4.0, 5).assert_approx_eq(4.1);
    }

    #[test]
    fn status_mapping() {
        let statuses = (0..=5)
            .map(|q| next_record("k-1", None, q, NOW).status())
            .collect::<Vec<_>>();
        assert_eq!(
            statuses,
            [
                Status::Learning,
                Status::Learning,
                Status::Learning,
                Status::Review,
                Status::Graduated,
                Status::Graduated,
            ]
        );
    }

    #[test]
    fn deterministic_for_same_instant() {
        let prior = replay("k-1", &[5, 3]);
        let a = next_record("k-1", Some(&prior), 4, NOW);
        let b = next_record("k-1", Some(&prior), 4, NOW);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn counters_add_up_to_reviews() {
        let qualities = [5, 0, 3, 2, 4, 4, 1, 5, 5];
        for n in 1..=qualities.len() {
            let record = replay("k-1", &qualities[..n]);
            assert_eq!(record.attempts() as usize, n);
        }
    }

    #[test]
    fn end_to_end_lapse_after_three_passes() {
        let record = replay("k-1", &[5, 5, 5, 2]);
        assert_eq!(record.repetition(), 0);
        assert_eq!(record.interval(), 1);
        assert_eq!(record.status(), Status::Learning);
        assert_eq!(record.correct_count(), 3);
        assert_eq!(record.miss_count(), 1);
    }

    #[test]
    fn first_review_at_quality_three_is_review() {
        let record = next_record("k-1", None, 3, NOW);
        assert_eq!(record.status(), Status::Review);
        assert_eq!(record.interval(), 1);
    }

    #[test]
    fn session_counters_pass_through() {
        let mut prior = next_record("k-1", None, 5, NOW);
        prior.record_session_outcome(false);
        let next = next_record("k-1", Some(&prior), 0, NOW);
        assert_eq!(next.session_correct(), 0);
        assert_eq!(next.session_miss(), 1);
        assert_eq!(next.miss_count(), 1);
    }

    #[test]
    fn out_of_range_quality_is_tolerated() {
        // not validated: the arithmetic runs on whatever it is given
        let high = next_record("k-1", None, 7, NOW);
        assert_eq!(high.status(), Status::Graduated);
        assert_eq!(high.correct_count(), 1);
        high.easiness_factor().assert_approx_eq(2.5 + 0.1 + 2.0 * (0.08 - 2.0 * 0.02));

        let low = next_record("k-1", None, -3, NOW);
        assert_eq!(low.status(), Status::Learning);
        assert_eq!(low.miss_count(), 1);
        assert_eq!(low.easiness_factor(), MIN_EASINESS);
    }

    #[test]
    fn scheduler_reads_injected_clock() {
        let clock = FixedClock::new(NOW);
        let scheduler = Scheduler::with_clock(&clock);
        let first = scheduler.review("k-1", None, 4);
        assert_eq!(first.last_reviewed(), NOW);

        clock.advance_days(1);
        let second = scheduler.review("k-1", Some(&first), 4);
        assert_eq!(second.last_reviewed(), NOW + DAY_MS);
        assert_eq!(second.next_review(), NOW + 7 * DAY_MS);
    }

    #[test]
    fn scheduler_updates_progress_in_place() {
        let clock = FixedClock::new(NOW);
        let scheduler = Scheduler::with_clock(&clock);
        let mut progress = Progress::default();
        scheduler.review_stored(&mut progress, "k-1", 5);
        scheduler.review_stored(&mut progress, "k-2", 1);
        assert!(scheduler.due(&progress).is_empty());

        clock.advance_days(1);
        let due = scheduler.due(&progress);
        assert_eq!(due.len(), 2);

        let record = scheduler.review_stored(&mut progress, "k-1", 5);
        assert_eq!(record.interval(), 6);
        assert_eq!(progress.len(), 2);
    }
}
