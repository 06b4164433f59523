//! ap-aot: anytime AND/OR search for stochastic shortest-path problems.
//!
//! The engine grows a shared AND/OR graph (equal `(state, depth)` pairs are
//! interned) from the queried state, estimates leaf values by rollouts of a
//! base policy, and spends its expansion budget on the tips most able to
//! change the greedy action at the root.

pub mod aot;
pub mod arena;
pub mod node;
pub mod queue;

pub use aot::{AotConfig, AotError, AotPolicy, AotStats};
pub use node::{ActionId, NodeRef, StateId};
pub use queue::{bench_queue_churn, BoundedDeltaQueue};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
pub(crate) mod test_util;
