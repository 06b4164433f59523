//! ap-bench: Criterion micro-benchmarks for the search engine.

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
