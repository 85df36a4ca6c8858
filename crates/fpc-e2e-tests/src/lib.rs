//! End-to-end tests for the fragment-processor compiler.
//!
//! All tests live under `tests/`; this crate has no library code.
