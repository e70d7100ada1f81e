use crate::clock::Timestamp;
use crate::record::ReviewRecord;
use crate::scheduler::next_record;

/// 2023-11-14T22:13:20Z
pub(crate) const NOW: Timestamp = 1_700_000_000_000;

/// Reviews a fresh item once per grade, each time exactly when it falls due.
pub(crate) fn replay(item_id: &str, qualities: &[i32]) -> ReviewRecord {
    let (first, rest) = qualities
        .split_first()
        .expect("replay needs at least one grade");
    let mut record = next_record(item_id, None, *first, NOW);
    for &quality in rest {
        record = next_record(item_id, Some(&record), quality, record.next_review());
    }
    record
}

pub(crate) trait TestHelper {
    fn assert_approx_eq(self, expected: Self);
}

impl TestHelper for f64 {
    #[track_caller]
    fn assert_approx_eq(self, expected: Self) {
        assert!(
            (self - expected).abs() < 1e-9,
            "{self} is not approximately {expected}"
        );
    }
}
