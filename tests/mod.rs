//! Test module organization.
//!
//! This module organizes all integration tests for the DDR4 all-banks model.

/// State update action and row predicate tests.
mod actions_tests;




/// Request trace loader tests.
mod loader_tests;


/// Timing table and timing tracker tests.
mod timing_tests;
