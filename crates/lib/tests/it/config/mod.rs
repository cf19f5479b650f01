//! Config integration tests
//!
//! Leaf validation, the override table and the command-line round trip.

mod cli_tests;
