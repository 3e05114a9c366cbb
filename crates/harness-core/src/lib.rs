//! Harness Core Library
//!
//! Building blocks for integration tests that drive a container platform's
//! network lifecycle through its command-line interface: invoking platform
//! and host commands, matching their output, deriving per-case resource
//! names, describing networks and attachments, and running cases with
//! guaranteed cleanup.

#![warn(missing_docs)]

pub mod error;
pub mod expectation;
pub mod fixture;
pub mod invoker;
pub mod naming;
pub mod report;
pub mod scenario;
pub mod suite;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{Error, Result};

/// Convenience prelude for harness-core users
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::expectation::{Expectation, Mismatch, OutputPattern};
    pub use crate::fixture::{ContainerAttachment, Driver, NetworkSpec, Probe};
    pub use crate::invoker::{CliInvoker, CommandInvoker, CommandLine, Invocation};
    pub use crate::naming::{CaseId, ResourceNamer, RunId};
    pub use crate::report::{CaseReport, StepOutcome, SuiteReport, Verdict};
    pub use crate::scenario::{Orchestrator, Phase, Step, TestCase};
    pub use crate::suite::{network_lifecycle_suite, select, SuiteContext};

    // Re-export commonly used types from dependencies
    pub use async_trait::async_trait;
}

// Re-export key types from existing crates for convenience
pub use harness_config::Config;
