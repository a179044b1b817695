// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Run phase: evaluate every `test` and `error` line.

use doccheck_interp::{Interpreter, Scope};

use crate::config::CheckConfig;
use crate::registry::Registry;
use crate::report::{CheckKind, CheckOutcome, Reporter, RunReport};
use crate::tag::Tag;

/// Evaluate all check lines, recording and streaming each outcome.
pub fn run_checks(
    registry: &Registry,
    config: &CheckConfig,
    report: &mut RunReport,
    reporter: &mut dyn Reporter,
) {
    let interp = Interpreter::with_examples(registry);

    for (_, entry) in registry.iter() {
        let declaration = &entry.declaration;
        for tagged in &entry.tags {
            let (kind, expr) = match &tagged.tag {
                Tag::Test { expr } => (CheckKind::Test, expr),
                Tag::Error { expr } => (CheckKind::Error, expr),
                Tag::Example { .. } | Tag::Plain => continue,
            };
            let scope = declaration.scope(&config.self_alias);
            let outcome = evaluate(&interp, &scope, declaration.name(), kind, expr);
            reporter.check_finished(&outcome);
            report.record(outcome);
        }
    }
}

/// Evaluate one check line.
///
/// A test passes iff its value is truthy; an error line passes iff it raises.
/// Payloads that do not parse raise like any other failing expression.
pub fn evaluate(
    interp: &Interpreter<'_>,
    scope: &Scope<'_>,
    declaration: &str,
    kind: CheckKind,
    expr: &str,
) -> CheckOutcome {
    let result = interp.eval_source(expr, scope);
    let (passed, detail) = match (kind, result) {
        (CheckKind::Test, Ok(value)) if value.truthy() => (true, None),
        (CheckKind::Test, Ok(value)) => (false, Some(format!("evaluated to {}", value.repr()))),
        (CheckKind::Test, Err(e)) => (false, Some(e.detail())),
        (CheckKind::Error, Ok(value)) => (false, Some(format!("no error raised (got {})", value.repr()))),
        (CheckKind::Error, Err(e)) => (true, Some(e.detail())),
    };
    CheckOutcome {
        declaration: declaration.to_string(),
        kind,
        expression: expr.to_string(),
        passed,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(kind: CheckKind, expr: &str) -> CheckOutcome {
        evaluate(&Interpreter::new(), &Scope::new(), "D", kind, expr)
    }

    #[test]
    fn truthy_test_passes() {
        let outcome = check(CheckKind::Test, "len([1]) == 1");
        assert!(outcome.passed);
        assert_eq!(outcome.detail, None);
    }

    #[test]
    fn falsy_test_fails_with_value() {
        let outcome = check(CheckKind::Test, "[]");
        assert!(!outcome.passed);
        assert_eq!(outcome.detail.as_deref(), Some("evaluated to []"));
    }

    #[test]
    fn raising_test_fails_with_error() {
        let outcome = check(CheckKind::Test, "10/0");
        assert!(!outcome.passed);
        assert_eq!(outcome.detail.as_deref(), Some("ZeroDivisionError: division by zero"));
    }

    #[test]
    fn error_line_passes_when_raising() {
        assert!(check(CheckKind::Error, "10/0").passed);
        assert!(check(CheckKind::Error, "1 +").passed);
        let outcome = check(CheckKind::Error, "1 + 1");
        assert!(!outcome.passed);
        assert_eq!(outcome.detail.as_deref(), Some("no error raised (got 2)"));
    }

    #[test]
    fn unparsable_test_fails() {
        let outcome = check(CheckKind::Test, "1}[\"k\"] == 1");
        assert!(!outcome.passed);
        assert!(outcome.detail.unwrap().starts_with("SyntaxError"));
    }

    #[test]
    fn unparsable_test_detail_has_hint() {
        let outcome = check(CheckKind::Test, "x = 1");
        assert!(!outcome.passed);
        assert!(outcome.detail.unwrap().contains("(hint: use '==' to compare values)"));
    }

    #[test]
    fn oversized_payloads_raise_instead_of_crashing() {
        let nested = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
        assert!(check(CheckKind::Error, &nested).passed);
        assert!(check(CheckKind::Error, "[1, 2, 3] * 9000000000000000000").passed);
        let outcome = check(CheckKind::Error, "'abc' * 9000000000000000000");
        assert!(outcome.passed);
        assert!(outcome.detail.unwrap().starts_with("OverflowError"));
    }
}
