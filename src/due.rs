use log::trace;

use crate::clock::Timestamp;
use crate::record::ReviewRecord;

/// Every record whose next review is at or before `now`, in input order.
///
/// Takes any collection of records, e.g. `map.values()`.
pub fn due_items<'a, I>(records: I, now: Timestamp) -> Vec<&'a ReviewRecord>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    let due = records
        .into_iter()
        .filter(|record| record.is_due(now))
        .collect::<Vec<_>>();
    trace!("{} items due at {now}", due.len());
    due
}
