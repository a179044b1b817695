// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The run state machine.
//!
//! `Idle -> DeclarationsLoaded -> LinesExtracted -> ExamplesBuilt -> TestsRun -> Done`,
//! or `Aborted` from any step before `TestsRun`. Every run starts from a
//! fresh registry, so nothing leaks between runs.

use std::collections::HashSet;

use tracing::{error, info};

use crate::assertions::run_checks;
use crate::builder::build_examples;
use crate::config::CheckConfig;
use crate::declaration::Discover;
use crate::error::CheckError;
use crate::registry::Registry;
use crate::report::{Phase, Reporter, RunReport};
use crate::tag::TagParser;

/// Drives one check run at a time.
#[derive(Debug, Clone, Default)]
pub struct Checker {
    config: CheckConfig,
    phase: Phase,
}

impl Checker {
    pub fn new(config: CheckConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Phase reached by the last run.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Discover, extract, build and check. Never panics on user input; fatal
    /// problems end the run in `Aborted` with the reason in the report.
    pub fn run(&mut self, discover: &dyn Discover, reporter: &mut dyn Reporter) -> RunReport {
        self.phase = Phase::Idle;
        let mut report = RunReport::new();

        if let Err(err) = self.drive(discover, reporter, &mut report) {
            error!("check run aborted: {}", err);
            self.advance(Phase::Aborted, reporter);
            reporter.aborted(&err);
            report.abort = Some(err.to_string());
        }

        report.phase = self.phase;
        report.verdict = self.phase == Phase::Done
            && report.failed == 0
            && (report.total > 0 || !self.config.require_checks);
        info!(
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            verdict = report.verdict,
            "check run finished"
        );
        report
    }

    fn drive(
        &mut self,
        discover: &dyn Discover,
        reporter: &mut dyn Reporter,
        report: &mut RunReport,
    ) -> Result<(), CheckError> {
        let declarations = discover.discover()?;
        report.declarations = declarations.len();
        report.modules = declarations
            .iter()
            .map(|d| d.module())
            .collect::<HashSet<_>>()
            .len();
        info!(
            modules = report.modules,
            declarations = report.declarations,
            "loaded declarations"
        );
        let mut registry = Registry::new(declarations);
        self.advance(Phase::DeclarationsLoaded, reporter);

        registry.extract_lines();
        self.advance(Phase::LinesExtracted, reporter);

        registry.parse_tags(&TagParser::new(&self.config.tag_prefix))?;
        report.examples_built = build_examples(&registry, &self.config, reporter)?;
        self.advance(Phase::ExamplesBuilt, reporter);

        run_checks(&registry, &self.config, report, reporter);
        self.advance(Phase::TestsRun, reporter);

        self.advance(Phase::Done, reporter);
        Ok(())
    }

    fn advance(&mut self, phase: Phase, reporter: &mut dyn Reporter) {
        debug_assert!(
            !self.phase.is_terminal() && phase > self.phase,
            "phase cannot move from {:?} to {:?}",
            self.phase,
            phase
        );
        self.phase = phase;
        reporter.phase_changed(phase);
    }
}

/// Run once with `config`.
pub fn run(config: CheckConfig, discover: &dyn Discover, reporter: &mut dyn Reporter) -> RunReport {
    Checker::new(config).run(discover, reporter)
}
