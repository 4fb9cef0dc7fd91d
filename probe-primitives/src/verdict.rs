//! Verdicts assigned to test cases.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a test case outcome.
///
/// Verdicts are totally ordered from least to most successful:
/// `Skip < Fail < Partial < Pass`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Every expectation was met.
    Pass,
    /// Nothing useful was observed, or the endpoint failed.
    Fail,
    /// Some tool activity was observed but expectations were not fully met.
    Partial,
    /// The case was not run to completion.
    Skip,
}

impl Verdict {
    /// All verdicts in ascending order.
    pub const ALL: [Self; 4] = [Self::Skip, Self::Fail, Self::Partial, Self::Pass];

    /// Numeric rank backing the total order.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Skip => 0,
            Self::Fail => 1,
            Self::Partial => 2,
            Self::Pass => 3,
        }
    }

    /// Credit counted towards the suite pass rate. Only `Pass` earns credit.
    #[must_use]
    pub const fn credit(self) -> u32 {
        match self {
            Self::Pass => 1,
            Self::Fail | Self::Partial | Self::Skip => 0,
        }
    }

    /// Returns `true` for [`Verdict::Pass`].
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl PartialOrd for Verdict {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Verdict {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Partial => "PARTIAL",
            Self::Skip => "SKIP",
        })
    }
}
