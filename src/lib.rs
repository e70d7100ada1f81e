mod clock;
mod due;
mod error;
mod progress;
mod quality;
mod record;
mod scheduler;
mod session;
mod stats;
#[cfg(test)]
mod test_helpers;

pub use clock::{Clock, DAY_MS, FixedClock, SystemClock, Timestamp};
pub use due::due_items;
pub use error::{Result, SrsError};
pub use progress::Progress;
pub use quality::{GRADUATING_QUALITY, PASSING_QUALITY, Quality};
pub use record::{ReviewRecord, Status};
pub use scheduler::{
    FIRST_INTERVAL, INITIAL_EASINESS, LAPSE_INTERVAL, MIN_EASINESS, SECOND_INTERVAL, Scheduler,
    next_easiness, next_interval, next_record,
};
pub use session::{DEFAULT_SESSION_SIZE, SessionBuilder, SessionConfig, random_sample};
pub use stats::{ProgressStats, StatsConfig, weak_items};
