//! Test cases and the orchestrator that runs them
//!
//! A case moves through `Init -> Setup -> Act -> Assert -> Cleanup -> Done`.
//! Setup and act steps run in order; the first mismatch or invocation fault
//! ends the case. Cleanup always runs afterwards, whatever happened before,
//! including a panic inside an invoker.
//!
//! Resources are released through a [`CleanupGuard`]. A step that may
//! create something registers its release command *before* it runs, so a
//! create that times out half way is still cleaned up. Releases run last-in
//! first-out and each distinct command runs once; a release that a step
//! already ran successfully is dropped. A case's own cleanup commands are
//! not settled by steps: they run after the guard's releases, in declared
//! order, unless the guard just ran the same command. Cleanup faults are
//! recorded and logged but never change the verdict.

use chrono::Utc;
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{info, warn};

use crate::expectation::Expectation;
use crate::invoker::{CommandInvoker, CommandLine};
use crate::naming::{CaseId, RunId};
use crate::report::{CaseReport, CleanupFault, StepOutcome, StepReport, SuiteReport, Verdict};
use crate::{Error, Result};

/// Stdout recorded by earlier steps, by capture name
pub type Captures = HashMap<String, String>;

/// Where a case is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Not started
    Init,
    /// Preparing preconditions
    Setup,
    /// Running the command under test
    Act,
    /// Matching its result
    Assert,
    /// Releasing resources
    Cleanup,
    /// Finished
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Setup => "setup",
            Phase::Act => "act",
            Phase::Assert => "assert",
            Phase::Cleanup => "cleanup",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a step's result is checked against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// A fixed expectation
    Literal(Expectation),
    /// Stdout must equal what an earlier step captured
    Captured {
        /// Capture name
        capture: String,
        /// Required exit code
        exit_code: i32,
    },
}

impl Check {
    /// Turn this check into a concrete expectation
    pub fn resolve(&self, captures: &Captures) -> Result<Expectation> {
        match self {
            Check::Literal(expectation) => Ok(expectation.clone()),
            Check::Captured { capture, exit_code } => {
                let snapshot = captures
                    .get(capture)
                    .ok_or_else(|| Error::UnknownCapture(capture.clone()))?;
                Ok(Expectation::exit_code(*exit_code).stdout_exact(snapshot.clone()))
            }
        }
    }
}

/// One command and what it must produce
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    /// What the step verifies
    pub description: String,
    /// Command to run
    pub command: CommandLine,
    /// Expected result
    pub check: Check,
    /// Record stdout under this name when the step passes
    pub capture: Option<String>,
    /// Command releasing whatever this step may create
    pub release: Option<CommandLine>,
    /// Known platform gap; a mismatch is logged instead of failing the case
    pub known_issue: Option<String>,
}

impl Step {
    /// Step with a fixed expectation
    pub fn new(description: impl Into<String>, command: CommandLine, expectation: Expectation) -> Self {
        Self {
            description: description.into(),
            command,
            check: Check::Literal(expectation),
            capture: None,
            release: None,
            known_issue: None,
        }
    }

    /// Step whose stdout must equal an earlier capture
    pub fn matching_capture(
        description: impl Into<String>,
        command: CommandLine,
        capture: impl Into<String>,
        exit_code: i32,
    ) -> Self {
        Self {
            check: Check::Captured {
                capture: capture.into(),
                exit_code,
            },
            ..Self::new(description, command, Expectation::default())
        }
    }

    /// Record stdout under `name`
    pub fn capture_as(mut self, name: impl Into<String>) -> Self {
        self.capture = Some(name.into());
        self
    }

    /// Register `command` for cleanup before this step runs
    pub fn releases(mut self, command: CommandLine) -> Self {
        self.release = Some(command);
        self
    }

    /// Tolerate a mismatch on this step
    pub fn known_issue(mut self, reason: impl Into<String>) -> Self {
        self.known_issue = Some(reason.into());
        self
    }
}

/// An ordered list of steps plus unconditional cleanup
#[derive(Debug, Clone, Serialize)]
pub struct TestCase {
    /// Identity, also the source of resource names
    pub id: CaseId,
    /// What the case verifies
    pub description: String,
    /// Preconditions
    pub setup: Vec<Step>,
    /// Commands under test
    pub steps: Vec<Step>,
    /// Always run after every step-registered release, even when a step ran
    /// the same command earlier
    pub cleanup: Vec<CommandLine>,
}

impl TestCase {
    /// Start building a case
    pub fn builder(id: CaseId) -> TestCaseBuilder {
        TestCaseBuilder {
            case: TestCase {
                id,
                description: String::new(),
                setup: Vec::new(),
                steps: Vec::new(),
                cleanup: Vec::new(),
            },
        }
    }
}

/// Builder for [`TestCase`]
#[derive(Debug)]
pub struct TestCaseBuilder {
    case: TestCase,
}

impl TestCaseBuilder {
    /// Describe the case
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.case.description = description.into();
        self
    }

    /// Add a setup step
    pub fn setup(mut self, step: Step) -> Self {
        self.case.setup.push(step);
        self
    }

    /// Add a step under test
    pub fn step(mut self, step: Step) -> Self {
        self.case.steps.push(step);
        self
    }

    /// Add an unconditional cleanup command
    pub fn cleanup(mut self, command: CommandLine) -> Self {
        self.case.cleanup.push(command);
        self
    }

    /// Validate and build the case.
    ///
    /// Rejects cases with no steps, steps that check nothing, and captures
    /// referenced before they are recorded.
    pub fn build(self) -> Result<TestCase> {
        let case = self.case;
        if case.steps.is_empty() {
            return Err(Error::invalid_expectation(format!(
                "case '{}' has no steps",
                case.id
            )));
        }

        let mut recorded = HashSet::new();
        for step in case.setup.iter().chain(&case.steps) {
            match &step.check {
                Check::Literal(expectation) => expectation.validate().map_err(|e| {
                    Error::invalid_expectation(format!(
                        "case '{}', step '{}': {}",
                        case.id, step.description, e
                    ))
                })?,
                Check::Captured { capture, .. } => {
                    if !recorded.contains(capture.as_str()) {
                        return Err(Error::UnknownCapture(capture.clone()));
                    }
                }
            }
            if let Some(name) = &step.capture {
                recorded.insert(name.as_str());
            }
        }

        Ok(case)
    }
}

/// Release commands for the resources a case has acquired
#[derive(Debug, Default)]
pub struct CleanupGuard {
    releases: Vec<CommandLine>,
}

impl CleanupGuard {
    /// Register a release; a command already registered is kept at its
    /// first position
    pub fn acquire(&mut self, release: CommandLine) {
        if !self.releases.contains(&release) {
            self.releases.push(release);
        }
    }

    /// Forget `release` because a step already ran it successfully
    pub fn settle(&mut self, release: &CommandLine) {
        self.releases.retain(|pending| pending != release);
    }

    /// Registered releases, most recent first
    pub fn drain(&mut self) -> Vec<CommandLine> {
        let mut releases = std::mem::take(&mut self.releases);
        releases.reverse();
        releases
    }

    /// Number of pending releases
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    /// True if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

/// Mutable state of one running case
struct CaseRun {
    phase: Phase,
    captures: Captures,
    guard: CleanupGuard,
    steps: Vec<StepReport>,
}

struct Failure {
    phase: Phase,
    reason: String,
}

/// Runs test cases against a [`CommandInvoker`]
#[derive(Debug)]
pub struct Orchestrator<I> {
    invoker: I,
}

impl<I: CommandInvoker> Orchestrator<I> {
    /// Orchestrator issuing commands through `invoker`
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    /// The invoker in use
    pub fn invoker(&self) -> &I {
        &self.invoker
    }

    /// Give the invoker back
    pub fn into_invoker(self) -> I {
        self.invoker
    }

    /// Run `cases` sequentially, each exactly once
    pub async fn run_suite(&self, run_id: &RunId, cases: &[TestCase]) -> SuiteReport {
        let started_at = Utc::now();
        let mut reports = Vec::with_capacity(cases.len());
        for case in cases {
            reports.push(self.run_case(case).await);
        }

        let report = SuiteReport {
            run_id: run_id.clone(),
            started_at,
            cases: reports,
        };
        info!(
            run = %run_id,
            passed = report.passed(),
            failed = report.failed(),
            "suite finished"
        );
        report
    }

    /// Run one case, always finishing with cleanup
    pub async fn run_case(&self, case: &TestCase) -> CaseReport {
        let started_at = Utc::now();
        let clock = Instant::now();
        info!(case = %case.id, "starting case");

        let mut run = CaseRun {
            phase: Phase::Init,
            captures: Captures::new(),
            guard: CleanupGuard::default(),
            steps: Vec::new(),
        };

        let body = AssertUnwindSafe(self.execute_body(case, &mut run))
            .catch_unwind()
            .await;
        let verdict = match body {
            Ok(Ok(())) => Verdict::Pass,
            Ok(Err(failure)) => Verdict::Fail {
                phase: failure.phase,
                reason: failure.reason,
            },
            Err(panic) => Verdict::Fail {
                phase: run.phase,
                reason: format!("panicked: {}", panic_message(&*panic)),
            },
        };

        run.phase = Phase::Cleanup;
        let mut releases = run.guard.drain();
        for command in &case.cleanup {
            if !releases.contains(command) {
                releases.push(command.clone());
            }
        }
        let cleanup_faults = self.cleanup(&case.id, releases).await;
        run.phase = Phase::Done;

        match &verdict {
            Verdict::Pass => info!(case = %case.id, "case passed"),
            Verdict::Fail { phase, reason } => {
                warn!(case = %case.id, %phase, %reason, "case failed")
            }
        }

        CaseReport {
            case: case.id.to_string(),
            description: case.description.clone(),
            verdict,
            steps: run.steps,
            cleanup_faults,
            started_at,
            duration_ms: u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    async fn execute_body(&self, case: &TestCase, run: &mut CaseRun) -> std::result::Result<(), Failure> {
        for step in &case.setup {
            self.execute_step(step, Phase::Setup, run).await?;
        }
        for step in &case.steps {
            self.execute_step(step, Phase::Act, run).await?;
        }
        Ok(())
    }

    async fn execute_step(
        &self,
        step: &Step,
        phase: Phase,
        run: &mut CaseRun,
    ) -> std::result::Result<(), Failure> {
        run.phase = phase;
        if let Some(release) = &step.release {
            run.guard.acquire(release.clone());
        }

        let expectation = step.check.resolve(&run.captures).map_err(|e| Failure {
            phase,
            reason: format!("{}: {}", step.description, e),
        })?;

        let invocation = match self.invoker.invoke(&step.command).await {
            Ok(invocation) => invocation,
            Err(err) => {
                run.steps.push(StepReport {
                    phase,
                    description: step.description.clone(),
                    command: step.command.to_string(),
                    exit_code: None,
                    outcome: StepOutcome::Fault {
                        error: err.to_string(),
                    },
                });
                return Err(Failure {
                    phase,
                    reason: format!("{}: {}", step.description, err),
                });
            }
        };

        let assert_phase = if phase == Phase::Setup {
            Phase::Setup
        } else {
            Phase::Assert
        };
        run.phase = assert_phase;

        if invocation.exit_code == 0 {
            run.guard.settle(&step.command);
        }

        let mut report = StepReport {
            phase,
            description: step.description.clone(),
            command: step.command.to_string(),
            exit_code: Some(invocation.exit_code),
            outcome: StepOutcome::Passed,
        };

        let result = match expectation.check(&invocation) {
            Ok(()) => {
                if let Some(name) = &step.capture {
                    run.captures.insert(name.clone(), invocation.stdout);
                }
                Ok(())
            }
            Err(mismatch) => match &step.known_issue {
                Some(known_issue) => {
                    warn!(
                        step = %step.description,
                        %known_issue,
                        %mismatch,
                        "tolerating mismatch on step with known issue"
                    );
                    report.outcome = StepOutcome::Tolerated {
                        known_issue: known_issue.clone(),
                        mismatch,
                    };
                    Ok(())
                }
                None => {
                    let reason = format!("{}: {}", step.description, mismatch);
                    report.outcome = StepOutcome::Failed { mismatch };
                    Err(Failure {
                        phase: assert_phase,
                        reason,
                    })
                }
            },
        };

        run.steps.push(report);
        result
    }

    async fn cleanup(&self, case: &CaseId, releases: Vec<CommandLine>) -> Vec<CleanupFault> {
        let mut faults = Vec::new();
        for command in releases {
            let attempt = AssertUnwindSafe(self.invoker.invoke(&command))
                .catch_unwind()
                .await;
            let reason = match attempt {
                Ok(Ok(invocation)) if invocation.exit_code == 0 => continue,
                Ok(Ok(invocation)) => format!(
                    "exit code {}: {}",
                    invocation.exit_code,
                    invocation.stderr.trim()
                ),
                Ok(Err(err)) => err.to_string(),
                Err(panic) => format!("panicked: {}", panic_message(&*panic)),
            };
            warn!(%case, command = %command, %reason, "cleanup command failed");
            faults.push(CleanupFault {
                command: command.to_string(),
                reason,
            });
        }
        faults
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::Invocation;
    use crate::testing::ScriptedInvoker;

    fn case_id(id: &str) -> CaseId {
        CaseId::new(id).unwrap()
    }

    fn create() -> CommandLine {
        CommandLine::platform(["network", "create", "--name", "n"])
    }

    fn remove() -> CommandLine {
        CommandLine::platform(["network", "remove", "n"])
    }

    #[test]
    fn test_guard_is_lifo_and_deduplicated() {
        let mut guard = CleanupGuard::default();
        guard.acquire(remove());
        guard.acquire(CommandLine::platform(["rm", "-f", "c"]));
        guard.acquire(remove());

        assert_eq!(guard.len(), 2);
        assert_eq!(
            guard.drain(),
            vec![CommandLine::platform(["rm", "-f", "c"]), remove()]
        );
        assert!(guard.is_empty());
    }

    #[test]
    fn test_guard_forgets_settled_release() {
        let mut guard = CleanupGuard::default();
        guard.acquire(remove());
        guard.acquire(CommandLine::platform(["rm", "-f", "c"]));
        guard.settle(&CommandLine::platform(["rm", "-f", "c"]));

        assert_eq!(guard.drain(), vec![remove()]);
    }

    #[smol_potat::test]
    async fn test_step_that_releases_settles_the_guard() {
        let invoker = ScriptedInvoker::new();
        let orchestrator = Orchestrator::new(invoker);
        let case = TestCase::builder(case_id("settle"))
            .step(Step::new("create", create(), Expectation::success()).releases(remove()))
            .step(Step::new("remove", remove(), Expectation::success()))
            .build()
            .unwrap();

        let report = orchestrator.run_case(&case).await;

        assert!(report.passed());
        assert_eq!(orchestrator.invoker().calls(), vec![create(), remove()]);
    }

    #[test]
    fn test_build_rejects_empty_expectation() {
        let result = TestCase::builder(case_id("empty"))
            .step(Step::new("checks nothing", create(), Expectation::default()))
            .build();

        assert!(matches!(result, Err(Error::InvalidExpectation { .. })));
    }

    #[test]
    fn test_build_rejects_case_without_steps() {
        assert!(TestCase::builder(case_id("nothing")).build().is_err());
    }

    #[test]
    fn test_build_rejects_capture_used_before_recorded() {
        let host = CommandLine::host("ip", ["route"]);
        let result = TestCase::builder(case_id("capture"))
            .step(Step::matching_capture("compare", create(), "routes", 0))
            .step(Step::new("capture", host, Expectation::success()).capture_as("routes"))
            .build();

        assert!(matches!(result, Err(Error::UnknownCapture(name)) if name == "routes"));
    }

    #[smol_potat::test]
    async fn test_passing_case_releases_resources() {
        let invoker = ScriptedInvoker::new();
        let case = TestCase::builder(case_id("pass"))
            .step(Step::new("create", create(), Expectation::success()).releases(remove()))
            .build()
            .unwrap();

        let report = Orchestrator::new(invoker).run_case(&case).await;

        assert!(report.passed());
        assert_eq!(report.steps.len(), 1);
        assert!(report.cleanup_faults.is_empty());
    }

    #[smol_potat::test]
    async fn test_mismatch_stops_case_and_still_cleans_up() {
        let invoker = ScriptedInvoker::new()
            .respond(create(), Invocation::failed("boom"));
        let orchestrator = Orchestrator::new(invoker);
        let later = CommandLine::platform(["network", "inspect", "n"]);
        let case = TestCase::builder(case_id("mismatch"))
            .step(Step::new("create", create(), Expectation::success()).releases(remove()))
            .step(Step::new("inspect", later.clone(), Expectation::success()))
            .build()
            .unwrap();

        let report = orchestrator.run_case(&case).await;

        assert!(matches!(
            &report.verdict,
            Verdict::Fail { phase: Phase::Assert, reason } if reason.contains("expected exit code 0, got 1")
        ));
        assert_eq!(report.steps.len(), 1);
        assert_eq!(orchestrator.invoker().calls(), vec![create(), remove()]);
    }

    #[smol_potat::test]
    async fn test_invocation_fault_fails_act_phase() {
        let invoker = ScriptedInvoker::new().fail(create());
        let orchestrator = Orchestrator::new(invoker);
        let case = TestCase::builder(case_id("fault"))
            .step(Step::new("create", create(), Expectation::success()).releases(remove()))
            .build()
            .unwrap();

        let report = orchestrator.run_case(&case).await;

        assert!(matches!(report.verdict, Verdict::Fail { phase: Phase::Act, .. }));
        assert!(matches!(report.steps[0].outcome, StepOutcome::Fault { .. }));
        // Release was registered before the create ran.
        assert_eq!(orchestrator.invoker().calls(), vec![create(), remove()]);
    }

    #[smol_potat::test]
    async fn test_setup_failure_skips_act_steps() {
        let invoker = ScriptedInvoker::new()
            .respond(create(), Invocation::failed("no"));
        let orchestrator = Orchestrator::new(invoker);
        let act = CommandLine::platform(["network", "inspect", "n"]);
        let case = TestCase::builder(case_id("setup"))
            .setup(Step::new("create", create(), Expectation::success()).releases(remove()))
            .step(Step::new("inspect", act, Expectation::success()))
            .build()
            .unwrap();

        let report = orchestrator.run_case(&case).await;

        assert!(matches!(report.verdict, Verdict::Fail { phase: Phase::Setup, .. }));
        assert_eq!(orchestrator.invoker().calls(), vec![create(), remove()]);
    }

    #[smol_potat::test]
    async fn test_panic_in_invoker_is_contained() {
        let invoker = ScriptedInvoker::new().panic_on(create());
        let orchestrator = Orchestrator::new(invoker);
        let case = TestCase::builder(case_id("panic"))
            .step(Step::new("create", create(), Expectation::success()).releases(remove()))
            .build()
            .unwrap();

        let report = orchestrator.run_case(&case).await;

        assert!(matches!(
            &report.verdict,
            Verdict::Fail { phase: Phase::Act, reason } if reason.contains("panicked")
        ));
        assert_eq!(orchestrator.invoker().calls(), vec![create(), remove()]);
    }

    #[smol_potat::test]
    async fn test_cleanup_fault_does_not_change_verdict() {
        let invoker = ScriptedInvoker::new()
            .respond(remove(), Invocation::failed("network n not found"));
        let case = TestCase::builder(case_id("cleanup"))
            .step(Step::new("create", create(), Expectation::success()).releases(remove()))
            .build()
            .unwrap();

        let report = Orchestrator::new(invoker).run_case(&case).await;

        assert!(report.passed());
        assert_eq!(report.cleanup_faults.len(), 1);
        assert!(report.cleanup_faults[0].reason.contains("not found"));
    }

    #[smol_potat::test]
    async fn test_known_issue_is_tolerated() {
        let invoker = ScriptedInvoker::new()
            .respond(remove(), Invocation::failed("has active endpoints"));
        let case = TestCase::builder(case_id("known"))
            .step(
                Step::new("remove", remove(), Expectation::success())
                    .known_issue("endpoint removal incomplete"),
            )
            .build()
            .unwrap();

        let report = Orchestrator::new(invoker).run_case(&case).await;

        assert!(report.passed());
        assert_eq!(report.known_issues().count(), 1);
    }

    #[smol_potat::test]
    async fn test_captured_stdout_feeds_later_step() {
        let host = CommandLine::host("ip", ["route"]);
        let probe = CommandLine::platform(["run", "--net", "host", "busybox", "ip", "r"]);
        let invoker = ScriptedInvoker::new()
            .respond(host.clone(), Invocation::ok("default via 10.0.0.1 dev eth0\n"))
            .respond(probe.clone(), Invocation::ok("default via 10.0.0.9 dev eth0\n"));
        let case = TestCase::builder(case_id("capture"))
            .step(Step::new("host routes", host, Expectation::success()).capture_as("routes"))
            .step(Step::matching_capture("container routes", probe, "routes", 0))
            .build()
            .unwrap();

        let report = Orchestrator::new(invoker).run_case(&case).await;

        assert!(matches!(
            &report.verdict,
            Verdict::Fail { reason, .. } if reason.contains("10.0.0.9")
        ));
    }

    #[smol_potat::test]
    async fn test_explicit_cleanup_runs_after_step_releases() {
        let rm = CommandLine::platform(["rm", "-f", "c"]);
        let invoker = ScriptedInvoker::new();
        let orchestrator = Orchestrator::new(invoker);
        let case = TestCase::builder(case_id("order"))
            .cleanup(remove())
            .step(Step::new("run", CommandLine::platform(["run", "c"]), Expectation::success()).releases(rm.clone()))
            .build()
            .unwrap();

        orchestrator.run_case(&case).await;

        assert_eq!(
            orchestrator.invoker().calls(),
            vec![CommandLine::platform(["run", "c"]), rm, remove()]
        );
    }

    #[smol_potat::test]
    async fn test_explicit_cleanup_survives_remove_then_recreate() {
        let orchestrator = Orchestrator::new(ScriptedInvoker::new());
        let case = TestCase::builder(case_id("recreate"))
            .cleanup(remove())
            .step(Step::new("create", create(), Expectation::success()))
            .step(Step::new("remove", remove(), Expectation::success()))
            .step(Step::new("create again", create(), Expectation::success()))
            .build()
            .unwrap();

        let report = orchestrator.run_case(&case).await;

        assert!(report.passed());
        assert_eq!(
            orchestrator.invoker().calls(),
            vec![create(), remove(), create(), remove()]
        );
    }

    #[smol_potat::test]
    async fn test_explicit_cleanup_shared_with_a_release_runs_once() {
        let orchestrator = Orchestrator::new(ScriptedInvoker::new());
        let case = TestCase::builder(case_id("shared"))
            .cleanup(remove())
            .step(Step::new("create", create(), Expectation::success()).releases(remove()))
            .build()
            .unwrap();

        orchestrator.run_case(&case).await;

        assert_eq!(orchestrator.invoker().calls(), vec![create(), remove()]);
    }

    #[smol_potat::test]
    async fn test_failed_case_does_not_stop_suite() {
        let invoker = ScriptedInvoker::new()
            .respond(create(), Invocation::failed("boom"));
        let orchestrator = Orchestrator::new(invoker);
        let failing = TestCase::builder(case_id("first"))
            .step(Step::new("create", create(), Expectation::success()))
            .build()
            .unwrap();
        let passing = TestCase::builder(case_id("second"))
            .step(Step::new("inspect", CommandLine::platform(["network", "inspect", "bridge"]), Expectation::success()))
            .build()
            .unwrap();

        let report = orchestrator
            .run_suite(&RunId::new("r1").unwrap(), &[failing, passing])
            .await;

        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(report.case("second").unwrap().passed());
    }
}
