//! reqlint benchmarking suite
//!
//! Benchmarks for manifest parsing, formatting and linting throughput.

pub mod common;

pub use common::*;
