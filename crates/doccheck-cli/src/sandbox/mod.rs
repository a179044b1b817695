// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in modules checked by the `doccheck` binary.
//!
//! Each module registers host types and functions in a namespace, documented
//! the way a user of the tool would document their own code.

mod draft;
mod draft_static;
mod geometry;

use doccheck_core::{Module, Package};

/// Every sandbox module, in discovery order.
pub fn package() -> Package {
    let draft_class = draft::draft_class();
    Package::new(vec![
        Module::new(draft::namespace(draft_class.clone())),
        Module::new(draft_static::namespace()),
        Module::new(geometry::namespace(draft_class)),
    ])
}

#[cfg(test)]
mod tests {
    use doccheck_core::{CheckConfig, Checker, Discover, NullReporter, Phase};

    use super::*;

    #[test]
    fn every_sandbox_check_passes() {
        let report = Checker::new(CheckConfig::default()).run(&package(), &mut NullReporter);
        let failures: Vec<_> = report.failures().collect();
        assert!(failures.is_empty(), "{:#?}", failures);
        assert_eq!(report.abort, None);
        assert_eq!(report.phase, Phase::Done);
        assert_eq!(report.modules, 3);
        assert!(report.total > 10);
        assert!(report.verdict);
    }

    #[test]
    fn re_exported_draft_class_is_checked_once() {
        let declarations = package().discover().unwrap();
        let drafts = declarations.iter().filter(|d| d.name() == "DraftClass").count();
        assert_eq!(drafts, 1);
    }

    #[test]
    fn body_strings_are_not_documentation() {
        let report = Checker::new(CheckConfig::default()).run(&package(), &mut NullReporter);
        assert!(report
            .outcomes
            .iter()
            .all(|o| !o.expression.contains("OUTSIDE FUNCTIONS") && !o.expression.contains("this_dict")));
        let statics: Vec<_> = report
            .outcomes
            .iter()
            .filter(|o| o.declaration == "DraftStaticClass")
            .collect();
        assert_eq!(statics.len(), 6);
    }
}
