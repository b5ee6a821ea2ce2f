//! Process-wide monotonic id generator for `QueuedCast::queued_id`. Never
//! reset between rounds, only on process restart — a plain atomic counter
//! is the natural Rust analog of a module-level mutable counter.

use std::sync::atomic::{AtomicU64, Ordering};

static QUEUED_CAST_COUNTER: AtomicU64 = AtomicU64::new(1);

pub fn next_queued_id() -> u64 {
    QUEUED_CAST_COUNTER.fetch_add(1, Ordering::Relaxed)
}
