//! Shared test utilities for logtide integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file. The fakes are driven explicitly by the test, so no
//! harness depends on timing beyond short bounded waits.

#![allow(dead_code)]

pub mod assertions;
pub mod builders;
pub mod fake_directory;
pub mod fake_log_server;
pub mod fake_transport;
pub mod fixtures;

pub use assertions::*;
pub use builders::*;
pub use fake_directory::*;
pub use fake_transport::*;
pub use fixtures::*;
