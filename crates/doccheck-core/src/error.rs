// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Fatal errors of a check run.

use doccheck_interp::RuntimeError;

/// The discovery collaborator could not produce declarations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("unknown module `{0}`")]
    UnknownModule(String),

    #[error("failed to load module `{module}`: {reason}")]
    Load { module: String, reason: String },
}

/// An error that aborts the whole run.
///
/// Failed checks are not errors; they are recorded in the report.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("malformed tag in `{declaration}`: {reason} (line: `{line}`)")]
    TagFormat {
        declaration: String,
        line: String,
        reason: String,
    },

    #[error(
        "example{id} of `{declaration}` failed to build: {detail} (expression: `{expression}`)",
        detail = .error.detail()
    )]
    ExampleBuild {
        declaration: String,
        id: u64,
        expression: String,
        error: RuntimeError,
    },
}
