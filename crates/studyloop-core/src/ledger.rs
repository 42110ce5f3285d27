//! Persistent experience-point ledger.
//!
//! The ledger is an owned service object: whoever drives the study modes holds
//! it and submits awards through [`RewardLedger::add_xp`]. Every call
//! accumulates and persists in one step, so the stored total is always the
//! in-memory total.

use crate::error::Result;
use crate::storage::KvStore;

/// Key of the durable slot holding the XP total.
pub const TOTAL_XP_KEY: &str = "totalXP";

/// Accumulating XP counter backed by a [`KvStore`].
#[derive(Debug)]
pub struct RewardLedger<S: KvStore> {
    store: S,
    total_xp: u64,
}

impl<S: KvStore> RewardLedger<S> {
    /// Open the ledger, reading the stored total.
    ///
    /// A missing, unreadable or unparsable slot starts the ledger at zero.
    pub fn open(store: S) -> Self {
        let total_xp = match store.kv_get(TOTAL_XP_KEY) {
            Ok(Some(raw)) => parse_total(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "stored XP total is not a number, starting from 0");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!(error = %e, "cannot read stored XP total, starting from 0");
                0
            }
        };
        Self { store, total_xp }
    }

    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    /// Add `amount` to the total and persist it. Returns the new total.
    ///
    /// # Errors
    /// Returns an error if the store rejects the write. The in-memory total
    /// is still updated so the running session keeps counting.
    pub fn add_xp(&mut self, amount: u32) -> Result<u64> {
        self.total_xp = self.total_xp.saturating_add(u64::from(amount));
        tracing::info!(amount, total = self.total_xp, "xp awarded");
        self.store.kv_set(TOTAL_XP_KEY, &self.total_xp.to_string())?;
        Ok(self.total_xp)
    }

    /// Set the total back to zero.
    pub fn reset(&mut self) -> Result<()> {
        self.total_xp = 0;
        self.store.kv_set(TOTAL_XP_KEY, "0")
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Parse a stored total. Accepts a leading integer the way lenient number
/// parsing does ("42", " 42 ", "42.9" and "42xp" all read as 42); negative or
/// non-numeric values are rejected.
fn parse_total(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    let digits: &str = {
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    digits.parse().ok()
}
