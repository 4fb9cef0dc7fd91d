//! Sequential suite execution and aggregate reporting.

use std::collections::HashSet;
use std::fmt;
use std::future::{self, Future};

use indexmap::IndexMap;
use probe_primitives::{TestCase, TestResult, Verdict};
use thiserror::Error;
use tracing::{info, warn};

use crate::driver::ConversationDriver;

/// Results keyed by case name, in execution order.
pub type SuiteResults = IndexMap<String, TestResult>;

/// Errors raised while assembling a suite.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuiteError {
    /// Two cases share a name.
    #[error("duplicate test case `{name}`")]
    DuplicateCase {
        /// The repeated name.
        name: String,
    },

    /// The catalog has no cases.
    #[error("test catalog is empty")]
    EmptyCatalog,
}

/// Process exit status derived from a suite report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every case passed.
    AllPassed,
    /// At least 80% of cases passed.
    MostlyPassed,
    /// Fewer than 80% of cases passed.
    MostlyFailed,
    /// The run was interrupted.
    Interrupted,
    /// An unexpected fault stopped the harness.
    Fault,
}

impl ExitStatus {
    /// Pass-rate threshold, in percent, separating `MostlyPassed` from
    /// `MostlyFailed`.
    pub const THRESHOLD_PERCENT: u64 = 80;

    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::AllPassed => 0,
            Self::MostlyPassed => 1,
            Self::MostlyFailed => 2,
            Self::Interrupted => 3,
            Self::Fault => 4,
        }
    }

    /// Status for an uninterrupted run with the given counts.
    ///
    /// An empty run counts as all passed.
    #[must_use]
    pub fn from_counts(counts: VerdictCounts) -> Self {
        let passed = counts.pass as u64;
        let total = counts.total as u64;
        if passed == total {
            Self::AllPassed
        } else if passed * 100 >= total * Self::THRESHOLD_PERCENT {
            Self::MostlyPassed
        } else {
            Self::MostlyFailed
        }
    }
}

/// Per-verdict tallies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerdictCounts {
    /// Cases that passed.
    pub pass: usize,
    /// Cases that failed.
    pub fail: usize,
    /// Cases with partial success.
    pub partial: usize,
    /// Cases that were skipped.
    pub skip: usize,
    /// All cases.
    pub total: usize,
}

impl VerdictCounts {
    fn record(&mut self, verdict: Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Pass => self.pass += 1,
            Verdict::Fail => self.fail += 1,
            Verdict::Partial => self.partial += 1,
            Verdict::Skip => self.skip += 1,
        }
    }
}

/// Outcome of a whole suite run.
#[derive(Clone, Debug, Default)]
pub struct SuiteReport {
    results: SuiteResults,
    interrupted: bool,
}

impl SuiteReport {
    /// Builds a report from collected results.
    #[must_use]
    pub fn new(results: SuiteResults, interrupted: bool) -> Self {
        Self {
            results,
            interrupted,
        }
    }

    /// Results in execution order.
    #[must_use]
    pub fn results(&self) -> &SuiteResults {
        &self.results
    }

    /// Consumes the report, returning the results.
    #[must_use]
    pub fn into_results(self) -> SuiteResults {
        self.results
    }

    /// Whether the run was cut short by an interrupt.
    #[must_use]
    pub const fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// Tallies the verdicts.
    #[must_use]
    pub fn counts(&self) -> VerdictCounts {
        let mut counts = VerdictCounts::default();
        for result in self.results.values() {
            counts.record(result.verdict());
        }
        counts
    }

    /// Share of cases earning credit, in `0.0..=1.0`. Zero for an empty run.
    #[must_use]
    pub fn pass_rate(&self) -> f64 {
        let total = self.results.len();
        if total == 0 {
            return 0.0;
        }
        let credit: u32 = self.results.values().map(|r| r.verdict().credit()).sum();
        f64::from(credit) / f64::from(u32::try_from(total).unwrap_or(u32::MAX))
    }

    /// Exit status for the process.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        if self.interrupted {
            ExitStatus::Interrupted
        } else {
            ExitStatus::from_counts(self.counts())
        }
    }
}

/// Runs a catalog of cases one at a time.
pub struct SuiteRunner {
    driver: ConversationDriver,
    cases: Vec<TestCase>,
}

impl fmt::Debug for SuiteRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteRunner")
            .field("driver", &self.driver)
            .field("cases", &self.cases.len())
            .finish()
    }
}

impl SuiteRunner {
    /// Creates a runner over `cases`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::EmptyCatalog`] when there are no cases and
    /// [`SuiteError::DuplicateCase`] when two cases share a name.
    pub fn new(driver: ConversationDriver, cases: Vec<TestCase>) -> Result<Self, SuiteError> {
        if cases.is_empty() {
            return Err(SuiteError::EmptyCatalog);
        }

        let mut seen = HashSet::with_capacity(cases.len());
        for case in &cases {
            if !seen.insert(case.name()) {
                return Err(SuiteError::DuplicateCase {
                    name: case.name().to_owned(),
                });
            }
        }

        Ok(Self { driver, cases })
    }

    /// Returns the cases in execution order.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Runs every case to completion.
    pub async fn run(&self) -> SuiteReport {
        self.run_until(future::pending::<()>()).await
    }

    /// Runs cases until `interrupt` resolves.
    ///
    /// The case in flight when the interrupt fires, and every case after it,
    /// is recorded as [`Verdict::Skip`].
    pub async fn run_until<F>(&self, interrupt: F) -> SuiteReport
    where
        F: Future<Output = ()>,
    {
        let mut interrupt = std::pin::pin!(interrupt);
        let mut results = SuiteResults::with_capacity(self.cases.len());
        let mut interrupted = false;

        info!(
            cases = self.cases.len(),
            model = self.driver.metadata().model(),
            "suite started"
        );

        for case in &self.cases {
            let result = if interrupted {
                TestResult::skipped(case.name(), "not run: suite interrupted")
            } else {
                tokio::select! {
                    result = self.driver.run(case) => result,
                    () = &mut interrupt => {
                        warn!(case = case.name(), "suite interrupted");
                        interrupted = true;
                        TestResult::skipped(case.name(), "interrupted before completion")
                    }
                }
            };
            results.insert(case.name().to_owned(), result);
        }

        let report = SuiteReport::new(results, interrupted);
        let counts = report.counts();
        info!(
            pass = counts.pass,
            fail = counts.fail,
            partial = counts.partial,
            skip = counts.skip,
            interrupted,
            "suite finished"
        );
        report
    }
}
