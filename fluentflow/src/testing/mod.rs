//! Testing utilities for fluentflow pipelines.
//!
//! This module provides:
//! - Recording and failing steps
//! - Assertions for pipeline errors

mod assertions;
mod mocks;

pub use assertions::{
    assert_step_failed_with, assert_type_compatibility, assert_type_mismatch,
};
pub use mocks::{failing_step, panicking_step, CallLog, TestStepError};
