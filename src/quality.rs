use snafu::OptionExt;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::error::{InvalidQualitySnafu, Result, SrsError};

/// Lowest grade that counts as a successful recall.
pub const PASSING_QUALITY: i32 = 3;
/// Lowest grade that marks an item as graduated.
pub const GRADUATING_QUALITY: i32 = 4;

/// Self-assessed recall grade, 0-5.
///
/// The scheduler works on raw `i32` grades and does not reject values outside
/// this range; convert through `Quality` when input comes from an untrusted
/// source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Quality {
    /// Complete blackout.
    Blackout = 0,
    /// Wrong, but the answer was remembered once shown.
    Recognized = 1,
    /// Wrong, though the answer seemed easy once shown.
    NearMiss = 2,
    /// Right, recalled with serious difficulty.
    Difficult = 3,
    /// Right after a hesitation.
    Hesitant = 4,
    Perfect = 5,
}

impl Quality {
    pub const fn value(self) -> i32 {
        self as i32
    }

    pub const fn is_pass(self) -> bool {
        self.value() >= PASSING_QUALITY
    }

    /// Grade for a multiple-choice answer: a correct pick is perfect, a wrong
    /// one counts as a near miss.
    pub const fn from_answer(correct: bool) -> Self {
        if correct {
            Quality::Perfect
        } else {
            Quality::NearMiss
        }
    }
}

impl TryFrom<i32> for Quality {
    type Error = SrsError;

    fn try_from(value: i32) -> Result<Self> {
        Quality::iter()
            .find(|quality| quality.value() == value)
            .context(InvalidQualitySnafu { value })
    }
}

impl From<Quality> for i32 {
    fn from(quality: Quality) -> Self {
        quality.value()
    }
}
