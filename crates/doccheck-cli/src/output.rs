// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal rendering: the streaming trace, the summary and `--list`.
//!
//! Respects NO_COLOR and FORCE_COLOR unless the config forces a choice.
//! Colors are automatically disabled when output is piped.

use colored::{ColoredString, Colorize};

use doccheck_core::{CheckError, CheckOutcome, DeclarationKind, Module, Phase, Reporter, RunReport};

use crate::config::ColorChoice;

/// Initialize color support. Call once at startup.
pub fn init(choice: ColorChoice) {
    match choice {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {
            if std::env::var("NO_COLOR").is_ok() {
                colored::control::set_override(false);
            } else if std::env::var("FORCE_COLOR").is_ok() {
                colored::control::set_override(true);
            }
        }
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn warning_label() -> ColoredString {
    "warning".yellow().bold()
}

pub fn status_pass() -> ColoredString {
    "✓".green()
}

pub fn status_fail() -> ColoredString {
    "✗".red()
}

pub fn banner_ok() -> String {
    format!("{} {} {}", "===".dimmed(), "DOCCHECK OK".green().bold(), "===".dimmed())
}

pub fn banner_fail(reason: &str) -> String {
    format!(
        "{} {} {}",
        "===".dimmed(),
        format!("DOCCHECK FAILED: {}", reason).red().bold(),
        "===".dimmed()
    )
}

pub fn separator(width: usize) -> ColoredString {
    "─".repeat(width).dimmed()
}

pub fn declaration_name(name: &str) -> ColoredString {
    name.bold()
}

pub fn passed_count(n: usize) -> ColoredString {
    format!("{} passed", n).green()
}

pub fn failed_count(n: usize) -> ColoredString {
    if n > 0 {
        format!("{} failed", n).red()
    } else {
        format!("{} failed", n).normal()
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Prints each event as it happens, grouped under a declaration header.
#[derive(Debug, Default)]
pub struct TextReporter {
    current: Option<String>,
}

impl TextReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(&mut self, declaration: &str) {
        if self.current.as_deref() != Some(declaration) {
            println!("{}", declaration_name(declaration));
            self.current = Some(declaration.to_string());
        }
    }
}

impl Reporter for TextReporter {
    fn phase_changed(&mut self, phase: Phase) {
        // Examples and checks are walked separately; re-print headers.
        if phase == Phase::ExamplesBuilt {
            self.current = None;
        }
    }

    fn example_built(&mut self, declaration: &str, id: u64, expression: &str) {
        self.enter(declaration);
        println!("  {} example{} = {}", "•".dimmed(), id, expression.dimmed());
    }

    fn check_finished(&mut self, outcome: &CheckOutcome) {
        self.enter(&outcome.declaration);
        let status = if outcome.passed { status_pass() } else { status_fail() };
        match (&outcome.detail, outcome.passed) {
            (Some(detail), false) => println!(
                "  {} {}: {} - {}",
                status,
                outcome.kind.as_str(),
                outcome.expression,
                detail.red()
            ),
            (Some(detail), true) => println!(
                "  {} {}: {} {}",
                status,
                outcome.kind.as_str(),
                outcome.expression,
                format!("({})", detail).dimmed()
            ),
            (None, _) => println!("  {} {}: {}", status, outcome.kind.as_str(), outcome.expression),
        }
    }

    fn aborted(&mut self, error: &CheckError) {
        println!();
        println!("{}: {}", error_label(), error);
    }
}

/// Totals, the failed checks again, and the verdict banner.
pub fn print_summary(report: &RunReport) {
    println!();
    println!("{}", separator(50));
    println!(
        "scanned {}, {}, {}, {}",
        plural(report.modules, "module"),
        plural(report.total, "check"),
        passed_count(report.passed),
        failed_count(report.failed)
    );

    if report.failed > 0 {
        println!("\n{}", "Failed checks:".red().bold());
        for outcome in report.failures() {
            println!(
                "  {} {} {}: {}",
                status_fail(),
                declaration_name(&outcome.declaration),
                outcome.kind.as_str(),
                outcome.expression
            );
            if let Some(detail) = &outcome.detail {
                println!("      {}", detail.dimmed());
            }
        }
    }

    println!();
    if report.all_passed() {
        println!("{}", banner_ok());
    } else if let Some(reason) = &report.abort {
        println!("{}", banner_fail(reason));
    } else if report.failed > 0 {
        println!("{}", banner_fail(&plural(report.failed, "failed check")));
    } else {
        println!("{}: no test or error lines found", warning_label());
        println!("{}", banner_fail("no checks"));
    }
}

/// `--list`: modules and the declarations each one contributes.
pub fn print_modules(modules: &[&Module]) {
    for module in modules {
        let declarations = module.declarations();
        println!("{} ({})", module.name().bold(), plural(declarations.len(), "declaration"));
        for decl in &declarations {
            let kind = match decl.kind() {
                DeclarationKind::Type => "type",
                DeclarationKind::Function => "fn",
            };
            let blocks = decl.documentation().len();
            println!(
                "  {} {} {}",
                format!("{:<4}", kind).dimmed(),
                decl.name(),
                format!("({})", plural(blocks, "doc block")).dimmed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "module"), "1 module");
        assert_eq!(plural(0, "check"), "0 checks");
        assert_eq!(plural(3, "check"), "3 checks");
    }
}
