// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Tree-walk evaluator for doccheck tag payloads.
//!
//! Payloads run against a host program exposed through [`Class`] and
//! [`Object`] implementations and bound into a [`Namespace`]. Each evaluation
//! gets its own read-only [`Scope`] layered over that namespace.

mod value;
mod host;
mod namespace;
mod env;
mod interp;
mod builtins;
pub mod method_names;

pub use env::Scope;
pub use host::{AsAny, Class, ClassRef, Member, MemberKind, NativeClass, NativeFn, NativeFunction, Object, ObjectRef};
pub use interp::{parse_example_attr, ExampleSource, Interpreter, RuntimeError};
pub use namespace::Namespace;
pub use value::{Args, DictKey, Value};
