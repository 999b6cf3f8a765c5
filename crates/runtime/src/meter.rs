// Computation metering for one top-level invocation
//
// Every frame, storage access and log is charged against a fixed budget. Once
// the budget is spent the invocation is halted: the host refuses further work
// and discards every effect of the invocation, no matter which frame was
// running or whether a caller asked for soft-failure semantics.

use std::collections::BTreeMap;

use crate::error::HostError;

// ================================
// Cost Constants
// ================================

/// Computation costs for host operations
pub mod costs {
    /// Fixed overhead of entering any call frame
    pub const FRAME_BASE: u64 = 700;
    /// Per byte of call input
    pub const INPUT_BYTE: u64 = 4;
    /// Reading a storage slot
    pub const STORAGE_READ: u64 = 200;
    /// Writing or clearing a storage slot
    pub const STORAGE_WRITE: u64 = 2_000;
    /// Reading a transient slot
    pub const TRANSIENT_READ: u64 = 50;
    /// Writing a transient slot
    pub const TRANSIENT_WRITE: u64 = 100;
    /// Emitting a log
    pub const LOG_BASE: u64 = 375;
    /// Per byte of log data
    pub const LOG_BYTE: u64 = 8;
    /// Moving value between addresses
    pub const VALUE_TRANSFER: u64 = 900;
}

// ================================
// Compute Meter
// ================================

/// Tracks computation used against the budget, broken down by category
#[derive(Debug, Clone)]
pub struct ComputeMeter {
    budget: u64,
    used: u64,
    categories: BTreeMap<&'static str, u64>,
}

impl ComputeMeter {
    /// Default budget for one top-level invocation
    pub const DEFAULT_BUDGET: u64 = 30_000_000;

    #[must_use]
    pub fn new(budget: u64) -> Self {
        Self {
            budget,
            used: 0,
            categories: BTreeMap::new(),
        }
    }

    /// Record `units` under `category`
    ///
    /// # Errors
    /// Returns `ComputeBudgetExceeded` once usage passes the budget. The
    /// units are still recorded so the receipt shows what was attempted.
    pub fn track(&mut self, category: &'static str, units: u64) -> Result<(), HostError> {
        self.used = self.used.saturating_add(units);
        *self.categories.entry(category).or_insert(0) += units;

        if self.used > self.budget {
            return Err(HostError::ComputeBudgetExceeded {
                used: self.used,
                budget: self.budget,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn budget(&self) -> u64 {
        self.budget
    }

    #[must_use]
    pub const fn used(&self) -> u64 {
        self.used
    }

    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.budget.saturating_sub(self.used)
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.used >= self.budget
    }

    /// Units used per category, largest first
    pub fn breakdown(&self) -> Vec<(&'static str, u64)> {
        let mut cats: Vec<_> = self.categories.iter().map(|(k, v)| (*k, *v)).collect();
        cats.sort_by(|a, b| b.1.cmp(&a.1));
        cats
    }
}

impl Default for ComputeMeter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUDGET)
    }
}
