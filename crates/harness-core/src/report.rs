//! Results of running cases and suites

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::expectation::Mismatch;
use crate::naming::RunId;
use crate::scenario::Phase;

/// Final verdict of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Every checked step matched
    Pass,
    /// The case stopped at its first failure
    Fail {
        /// Phase the failure happened in
        phase: Phase,
        /// What went wrong
        reason: String,
    },
}

impl Verdict {
    /// True for [`Verdict::Pass`]
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Result matched the expectation
    Passed,
    /// Result did not match
    Failed {
        /// How it diverged
        mismatch: Mismatch,
    },
    /// Result did not match, but the step is a known platform gap
    Tolerated {
        /// The documented gap
        known_issue: String,
        /// How it diverged
        mismatch: Mismatch,
    },
    /// The command could not be run to completion
    Fault {
        /// The invocation error
        error: String,
    },
}

/// One executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Setup or act
    pub phase: Phase,
    /// Step description
    pub description: String,
    /// Command that ran
    pub command: String,
    /// Exit code, when the command finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    /// Outcome
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// A cleanup command that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupFault {
    /// Command that ran
    pub command: String,
    /// Why it is considered a fault
    pub reason: String,
}

/// Result of one case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Case id
    pub case: String,
    /// Case description
    pub description: String,
    /// Verdict
    #[serde(flatten)]
    pub verdict: Verdict,
    /// Steps in execution order; steps after a failure are absent
    pub steps: Vec<StepReport>,
    /// Cleanup commands that failed; never part of the verdict
    pub cleanup_faults: Vec<CleanupFault>,
    /// When the case started
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration including cleanup
    pub duration_ms: u64,
}

impl CaseReport {
    /// True if the verdict is pass
    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }

    /// Steps whose mismatch was tolerated as a known issue
    pub fn known_issues(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Tolerated { .. }))
    }
}

/// Result of a suite run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// The run the cases belonged to
    pub run_id: RunId,
    /// When the first case started
    pub started_at: DateTime<Utc>,
    /// Cases in execution order
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Number of passing cases
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|case| case.passed()).count()
    }

    /// Number of failing cases
    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    /// True when no case failed
    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// Look up a case by id
    pub fn case(&self, id: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.case == id)
    }
}
