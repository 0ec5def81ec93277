//! Entity id generation.
//!
//! Every world entity (structure, room, zone, device, plant, ledger entry, …)
//! carries a string id of the form `"{prefix}-{serial:08x}"`.  The prefix
//! makes ids self-describing in event payloads and logs; the serial comes
//! from a single process-wide counter, so ids are unique for the lifetime of
//! the process and are never reused after deletion.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic id source shared by every service that creates entities.
///
/// Cheap to share by reference; the counter is atomic so the generator can be
/// handed to subscribers or writers on other threads without ceremony, even
/// though world mutation itself is single-owner.
#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    /// Start counting from 1 — serial 0 is reserved as "never issued".
    pub fn new() -> Self {
        Self { counter: AtomicU64::new(1) }
    }

    /// Resume counting from `next_serial` (used when restoring a session so
    /// fresh ids never collide with persisted ones).
    pub fn starting_at(next_serial: u64) -> Self {
        Self { counter: AtomicU64::new(next_serial.max(1)) }
    }

    /// Mint a fresh id with the given prefix, e.g. `next("zone")` →
    /// `"zone-0000002a"`.
    pub fn next(&self, prefix: &str) -> String {
        let serial = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{prefix}-{serial:08x}")
    }

    /// The serial the next call to [`next`][Self::next] will use.
    pub fn peek(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// `true` if `value` is a well-formed entity identifier: non-empty, ASCII
/// alphanumerics plus `-` and `_`, no surrounding whitespace.
///
/// Used by payload validation for every `*Id` field.
pub fn is_identifier(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
