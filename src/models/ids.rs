//! Client-side identifier generation
//!
//! Entities live only in editor state until saved, so ids just need to be
//! unique within the process. Counter-based keeps them deterministic enough
//! to read in logs and test output.

use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Next unique id with the given prefix, e.g. `cond-17`.
pub fn next_id(prefix: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}", prefix, n)
}
