// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Builtin function and method name constants.
//!
//! Every name handled by the builtin dispatch code is listed here. The drift
//! test in tests/drift_test.rs checks each one reaches a real implementation.

/// Builtin functions visible in every scope (builtins/mod.rs)
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "len", "str", "repr", "int", "float", "bool", "abs",
    "min", "max", "sum", "sorted", "list", "tuple", "dict",
    "range", "round", "isinstance", "any", "all",
];

/// Methods on string values (builtins/strings.rs)
pub const STRING_METHODS: &[&str] = &[
    "upper", "lower", "strip", "lstrip", "rstrip", "split", "join",
    "startswith", "endswith", "replace", "find", "count", "format",
];

/// Methods on list values (builtins/collections.rs)
pub const LIST_METHODS: &[&str] = &["count", "index", "copy", "append"];

/// Methods on tuple values (builtins/collections.rs)
pub const TUPLE_METHODS: &[&str] = &["count", "index"];

/// Methods on dict values (builtins/collections.rs)
pub const DICT_METHODS: &[&str] = &["get", "keys", "values", "items"];

/// Method table for a builtin type name.
pub fn methods_for(type_name: &str) -> &'static [&'static str] {
    match type_name {
        "str" => STRING_METHODS,
        "list" => LIST_METHODS,
        "tuple" => TUPLE_METHODS,
        "dict" => DICT_METHODS,
        _ => &[],
    }
}
