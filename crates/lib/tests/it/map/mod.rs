//! PathMap integration tests
//!
//! This module tests the nested-mapping engine through its public API.
//! Tests are organized by concern for better maintainability.

mod comparison_tests;
mod scenario_tests;
