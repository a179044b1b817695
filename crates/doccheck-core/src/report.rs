// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run results and the streaming reporter interface.

use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Which assertion a check line makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Must evaluate to a truthy value.
    Test,
    /// Must raise.
    Error,
}

impl CheckKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckKind::Test => "test",
            CheckKind::Error => "error",
        }
    }
}

/// Outcome of one test or error line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub declaration: String,
    pub kind: CheckKind,
    pub expression: String,
    pub passed: bool,
    /// Captured error text, or why a non-raising line failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Stage of a run. Runs move forward only; `Aborted` and `Done` are terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    DeclarationsLoaded,
    LinesExtracted,
    ExamplesBuilt,
    TestsRun,
    Done,
    Aborted,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Aborted)
    }
}

/// Aggregate result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Modules that contributed declarations.
    pub modules: usize,
    pub declarations: usize,
    /// Evaluated test and error lines.
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub examples_built: usize,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abort: Option<String>,
    /// True iff the run reached `Done` with no failure and enough checks.
    pub verdict: bool,
    pub outcomes: Vec<CheckOutcome>,
}

impl RunReport {
    pub(crate) fn new() -> Self {
        Self {
            modules: 0,
            declarations: 0,
            total: 0,
            passed: 0,
            failed: 0,
            examples_built: 0,
            phase: Phase::Idle,
            abort: None,
            verdict: false,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, outcome: CheckOutcome) {
        self.total += 1;
        if outcome.passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    pub fn all_passed(&self) -> bool {
        self.verdict
    }
}

/// Receives run events as they happen.
pub trait Reporter {
    fn phase_changed(&mut self, _phase: Phase) {}

    fn example_built(&mut self, _declaration: &str, _id: u64, _expression: &str) {}

    fn check_finished(&mut self, outcome: &CheckOutcome);

    fn aborted(&mut self, _error: &CheckError) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn check_finished(&mut self, _outcome: &CheckOutcome) {}
}
