// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Documentation checks.
//!
//! Declarations carry tagged lines in their documentation. A run reflows the
//! documentation into logical lines, builds every `example<N>` value, then
//! evaluates every `test` line (must be truthy) and `error` line (must raise),
//! and reports a single verdict.

pub mod assertions;
pub mod builder;
pub mod config;
pub mod declaration;
pub mod error;
pub mod reflow;
pub mod registry;
pub mod report;
pub mod runner;
pub mod tag;

pub use config::CheckConfig;
pub use declaration::{Declaration, DeclarationKind, Discover, Module, Package};
pub use error::{CheckError, DiscoveryError};
pub use reflow::reflow;
pub use registry::{DeclId, Registry};
pub use report::{CheckKind, CheckOutcome, NullReporter, Phase, Reporter, RunReport};
pub use runner::{run, Checker};
pub use tag::{Tag, TagError, TagParser};
