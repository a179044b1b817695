// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `draft_static`: a type used only through static and class methods.

use doccheck_interp::{NativeClass, Namespace, Value};

const MODULE: &str = "draft_static";

const BANNER: &str = "DOCCHECK WORKS WITH DECORATORS";

/// String statements from the type's body. They document nothing, so none of
/// their tags run; the dict literal would not survive the last-colon split.
const BODY_STRINGS: [&str; 2] = [
    ">>test: \"DOCCHECK WORKS OUTSIDE FUNCTIONS 1\" == \"DOCCHECK WORKS OUTSIDE FUNCTIONS 1\"",
    ">>test: \"DOCCHECK WORKS OUTSIDE FUNCTIONS 2\" == \"DOCCHECK WORKS OUTSIDE FUNCTIONS 2\"\n\n\
     >>test: {\"this_dict\":234}[\"this_dict\"] == 234",
];

pub(super) fn namespace() -> Namespace {
    let class = NativeClass::new("DraftStaticClass")
        .in_module(MODULE)
        .doc("Never instantiated.\n>>error: cls()")
        .class_method(
            "lets_hope_this_test_works",
            Some("CHECK IF YOU SEE THIS TEST RUNNING\n>>test: \"DOCCHECK WORKS WITH DECORATORS\" == cls.lets_hope_this_test_works()"),
            |args| {
                args.expect_at_most(&[], "lets_hope_this_test_works")?;
                Ok(Value::str(BANNER))
            },
        )
        .static_method(
            "nothing",
            Some(">>test: cls.nothing() is None\n>>test: DraftStaticClass.nothing() == None"),
            |args| {
                args.expect_at_most(&[], "nothing")?;
                Ok(Value::None)
            },
        )
        .attr("VERSION", Value::tuple(vec![Value::Int(1), Value::Int(0)]))
        .static_method(
            "version_string",
            Some(">>test: cls.version_string() == \"1.0\"\n>>test: cls.VERSION[-1] == 0"),
            |args| {
                args.expect_at_most(&[], "version_string")?;
                Ok(Value::str("1.0"))
            },
        )
        .build();

    let mut ns = Namespace::new(MODULE);
    ns.bind_class(class);
    ns.bind(
        "BODY_STRINGS",
        Value::tuple(BODY_STRINGS.iter().map(|&s| Value::str(s)).collect()),
    );
    ns
}
