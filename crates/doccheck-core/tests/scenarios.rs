// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! End-to-end runs over small in-test host modules.

use std::rc::Rc;

use doccheck_core::{
    CheckConfig, CheckError, CheckKind, CheckOutcome, Checker, Declaration, DeclarationKind, Module,
    NullReporter, Package, Phase, Reporter,
};
use doccheck_interp::{Args, ClassRef, NativeClass, NativeFunction, Namespace, Object, RuntimeError, Value};

struct Draft {
    a: i64,
    b: i64,
    c: String,
}

impl Object for Draft {
    fn type_name(&self) -> &str {
        "D"
    }

    fn get_attr(&self, name: &str) -> Option<Value> {
        match name {
            "a" => Some(Value::Int(self.a)),
            "value" => Some(Value::Int(self.a + self.b)),
            _ => None,
        }
    }

    fn has_method(&self, name: &str) -> bool {
        name == "format"
    }

    fn call_method(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        match name {
            "format" => {
                args.expect_at_most(&["additional_text"], name)?;
                let extra = args
                    .string_or_none(0, "additional_text", name)?
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                Ok(Value::str(format!("{}.{}.{}.{}", self.a, self.b, self.c, extra)))
            }
            _ => Err(RuntimeError::AttributeError {
                ty: "D".to_string(),
                attr: name.to_string(),
            }),
        }
    }
}

fn draft_class(name: &str, module: &str, doc: &str, format_doc: &str) -> ClassRef {
    let type_name = name.to_string();
    let class = NativeClass::new(name).in_module(module).doc(doc).constructor(move |args| {
        let a = args.int(0, "a", &type_name)?;
        let b = args.int(1, "b", &type_name)?;
        let c = args.string(2, "c", &type_name)?;
        Ok(Value::object(Draft { a, b, c: c.to_string() }))
    });
    class.method("format", Some(format_doc)).build()
}

fn module(name: &str, classes: Vec<ClassRef>) -> Module {
    let mut ns = Namespace::new(name);
    for class in classes {
        ns.bind_class(class);
    }
    Module::new(ns)
}

#[derive(Default)]
struct Recorder {
    phases: Vec<Phase>,
    examples: Vec<(String, u64)>,
    outcomes: Vec<CheckOutcome>,
    aborted: Option<String>,
}

impl Reporter for Recorder {
    fn phase_changed(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    fn example_built(&mut self, declaration: &str, id: u64, _expression: &str) {
        self.examples.push((declaration.to_string(), id));
    }

    fn check_finished(&mut self, outcome: &CheckOutcome) {
        self.outcomes.push(outcome.clone());
    }

    fn aborted(&mut self, error: &CheckError) {
        self.aborted = Some(error.to_string());
    }
}

const FORMAT_DOC: &str = "Join the parts.\n>>test: cls.example1.format() == \"2.6.hello.\"\n>>test: cls.example1.format(\"ADD\") ==\n    \"2.6.hello.ADD\"";

#[test]
fn example_builds_and_method_test_passes() {
    let class = draft_class("D", "drafts", ">>example1: D(2, 6, \"hello\")", FORMAT_DOC);
    let package = Package::new(vec![module("drafts", vec![class])]);
    let mut recorder = Recorder::default();
    let report = Checker::new(CheckConfig::default()).run(&package, &mut recorder);

    assert_eq!(report.phase, Phase::Done);
    assert_eq!((report.total, report.passed, report.failed), (2, 2, 0));
    assert_eq!(report.examples_built, 1);
    assert!(report.verdict);
    assert_eq!(recorder.examples, vec![("D".to_string(), 1)]);
    assert_eq!(
        recorder.phases,
        vec![
            Phase::DeclarationsLoaded,
            Phase::LinesExtracted,
            Phase::ExamplesBuilt,
            Phase::TestsRun,
            Phase::Done
        ]
    );
}

#[test]
fn raising_error_line_passes() {
    let class = draft_class(
        "D",
        "drafts",
        ">>example1: cls(2, 6, \"hello\")\n>>error: 10/0",
        FORMAT_DOC,
    );
    let package = Package::new(vec![module("drafts", vec![class])]);
    let report = Checker::new(CheckConfig::default()).run(&package, &mut NullReporter);

    assert!(report.verdict);
    let error = report.outcomes.iter().find(|o| o.kind == CheckKind::Error).unwrap();
    assert!(error.passed);
    assert_eq!(error.expression, "10/0");
    assert_eq!(error.detail.as_deref(), Some("ZeroDivisionError: division by zero"));
}

#[test]
fn unowned_documentation_is_never_evaluated() {
    let mut ns = Namespace::new("loose");
    ns.bind("__doc__", Value::str(">>test: False\n>>error: 1"));
    ns.bind_class(
        NativeClass::new("Imported")
            .in_module("elsewhere")
            .doc(">>test: False")
            .build(),
    );
    ns.bind_class(NativeClass::new("Home").in_module("loose").doc(">>test: True").build());
    let package = Package::new(vec![Module::new(ns)]);
    let report = Checker::new(CheckConfig::default()).run(&package, &mut NullReporter);

    assert_eq!(report.declarations, 1);
    assert_eq!(report.total, 1);
    assert!(report.verdict);
}

#[test]
fn examples_are_built_before_any_test_runs() {
    let b = NativeClass::new("B")
        .in_module("pair")
        .doc(">>test: A.example1.value == 8\n>>test: A.example1.a == 2")
        .build();
    let a = draft_class("A", "pair", ">>example1: cls(2, 6, \"x\")", "");
    // B is discovered first and still sees A's example.
    let package = Package::new(vec![module("pair", vec![b, a])]);
    let report = Checker::new(CheckConfig::default()).run(&package, &mut NullReporter);

    assert_eq!(report.outcomes[0].declaration, "B");
    assert_eq!((report.total, report.passed), (2, 2));
    assert!(report.verdict);
}

#[test]
fn zero_checks_fail_unless_allowed() {
    let class = NativeClass::new("Quiet").in_module("q").doc("Nothing to see.").build();
    let package = Package::new(vec![module("q", vec![class])]);

    let report = Checker::new(CheckConfig::default()).run(&package, &mut NullReporter);
    assert_eq!(report.phase, Phase::Done);
    assert_eq!(report.total, 0);
    assert!(!report.verdict);

    let relaxed = CheckConfig {
        require_checks: false,
        ..CheckConfig::default()
    };
    assert!(Checker::new(relaxed).run(&package, &mut NullReporter).verdict);
}

#[test]
fn failing_example_aborts_before_checks() {
    let class = draft_class(
        "D",
        "drafts",
        ">>example1: cls(2, 6, \"hello\")\n>>example2: cls(1)",
        FORMAT_DOC,
    );
    let package = Package::new(vec![module("drafts", vec![class])]);
    let mut recorder = Recorder::default();
    let mut checker = Checker::new(CheckConfig::default());
    let report = checker.run(&package, &mut recorder);

    assert_eq!(checker.phase(), Phase::Aborted);
    assert_eq!(report.phase, Phase::Aborted);
    assert_eq!(report.total, 0);
    assert!(recorder.outcomes.is_empty());
    assert_eq!(recorder.examples.len(), 1);
    let reason = report.abort.unwrap();
    assert!(reason.contains("example2 of `D`"), "{}", reason);
    assert!(recorder.aborted.is_some());
    assert!(!report.verdict);
}

#[test]
fn malformed_example_marker_aborts() {
    let class = NativeClass::new("Bad")
        .in_module("m")
        .doc(">>exampleone: 1\n>>test: True")
        .build();
    let package = Package::new(vec![module("m", vec![class])]);
    let mut recorder = Recorder::default();
    let report = Checker::new(CheckConfig::default()).run(&package, &mut recorder);

    assert_eq!(report.phase, Phase::Aborted);
    assert_eq!(recorder.phases.last(), Some(&Phase::Aborted));
    assert!(!recorder.phases.contains(&Phase::ExamplesBuilt));
    assert!(report.abort.unwrap().contains("malformed tag"));
}

#[test]
fn falsy_and_raising_tests_fail() {
    let class = NativeClass::new("T")
        .in_module("m")
        .doc(">>test: 1 == 2\n>>test: undefined_name\n>>test: 1 < 2\n>>error: 3")
        .build();
    let package = Package::new(vec![module("m", vec![class])]);
    let report = Checker::new(CheckConfig::default()).run(&package, &mut NullReporter);

    assert_eq!(report.phase, Phase::Done);
    assert_eq!((report.total, report.passed, report.failed), (4, 1, 3));
    assert!(!report.verdict);
    let details: Vec<&str> = report.failures().filter_map(|o| o.detail.as_deref()).collect();
    assert_eq!(details[0], "evaluated to False");
    assert!(details[1].starts_with("NameError"));
    assert_eq!(details[2], "no error raised (got 3)");
}

#[test]
fn custom_alias_and_prefix() {
    let class = draft_class(
        "D",
        "drafts",
        "@@example1: this(1, 2, \"z\")\n>>test: False",
        "@@test: this.example1.format() == '1.2.z.'",
    );
    let package = Package::new(vec![module("drafts", vec![class])]);
    let config = CheckConfig {
        tag_prefix: "@@".to_string(),
        self_alias: "this".to_string(),
        ..CheckConfig::default()
    };
    let report = Checker::new(config).run(&package, &mut NullReporter);

    assert_eq!(report.total, 1);
    assert!(report.verdict);
}

#[test]
fn free_function_declaration() {
    let mut ns = Namespace::new("funcs");
    ns.bind_function(
        NativeFunction::new("double", |args| Ok(Value::Int(args.int(0, "n", "double")? * 2)))
            .in_module("funcs")
            .doc(">>test: cls(4) == 8\n>>test: double(1) == 2\n>>error: double('x')"),
    );
    let module = Module::new(ns);
    let decls = module.declarations();
    assert_eq!(decls[0].kind(), DeclarationKind::Function);

    let report = Checker::new(CheckConfig::default()).run(&decls, &mut NullReporter);
    assert_eq!((report.total, report.passed), (3, 3));
    assert_eq!(report.modules, 1);
}

#[test]
fn duplicate_example_id_keeps_the_later_value() {
    let ns = Rc::new(Namespace::new("m"));
    let class = Value::Class(NativeClass::new("Dup").in_module("m").build());
    let decl = Declaration::new("Dup", DeclarationKind::Type, class, ns)
        .with_doc(">>example1: 1\n>>example1: 2\n>>test: cls.example1 == 2");
    let report = Checker::new(CheckConfig::default()).run(&vec![decl], &mut NullReporter);

    assert!(report.verdict);
    assert_eq!(report.examples_built, 2);
}

#[test]
fn unknown_module_aborts() {
    let package = Package::new(vec![module("a", vec![])]).select(["b"]);
    let report = Checker::new(CheckConfig::default()).run(&package, &mut NullReporter);
    assert_eq!(report.phase, Phase::Aborted);
    assert!(report.abort.unwrap().contains("unknown module `b`"));
}

#[test]
fn runs_do_not_share_examples() {
    let class = draft_class("D", "drafts", ">>example1: cls(2, 6, \"hello\")", FORMAT_DOC);
    let package = Package::new(vec![module("drafts", vec![class.clone()])]);
    let mut checker = Checker::new(CheckConfig::default());
    assert!(checker.run(&package, &mut NullReporter).verdict);

    // Same class, no example line: the earlier example must not be visible.
    let ns = Rc::new(Namespace::new("drafts"));
    let decl = Declaration::new("D", DeclarationKind::Type, Value::Class(class), ns)
        .with_doc(">>error: cls.example1");
    let report = checker.run(&vec![decl], &mut NullReporter);
    assert!(report.verdict);
}
