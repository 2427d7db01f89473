//! Rolling battery charge history persisted between runs.
//!
//! The program runs from cron, so the "did the battery just reach full
//! charge" question needs state that survives the process. The history is
//! a fixed-length, newest-first sequence of charge fractions stored as a
//! JSON array; its length is whatever the file on disk contains and never
//! changes across runs. Concurrent invocations race on the file and are
//! not supported.

use std::fs;
use std::path::Path;

use crate::error::Error;

/// Charge fraction above which the battery counts as full.
pub const FULL_CHARGE: f64 = 0.98;

/// Fixed-length log of past battery charge fractions, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeHistory {
    samples: Vec<f64>,
}

impl ChargeHistory {
    /// Wrap an existing sequence of samples, newest first.
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// Load the history from `path`.
    ///
    /// A missing or corrupt file is an error; the file is seeded at
    /// deployment time and its length fixes the history length.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path).map_err(|err| Error::History {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let samples: Vec<f64> = serde_json::from_str(&raw).map_err(|err| Error::History {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { samples })
    }

    /// Persist the history back to `path`, overwriting it.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let raw = serde_json::to_string(&self.samples).map_err(|err| Error::History {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        fs::write(path, raw).map_err(|err| Error::History {
            path: path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// True when the strip should celebrate: every stored sample is below
    /// [`FULL_CHARGE`] and the new one is above it.
    ///
    /// Must be evaluated before [`push`](Self::push) inserts the new
    /// sample, otherwise the trigger can never fire.
    pub fn reached_full_charge(&self, current: f64) -> bool {
        self.samples.iter().all(|&s| s < FULL_CHARGE) && current > FULL_CHARGE
    }

    /// Push the newest sample to the front, dropping the oldest.
    ///
    /// The length never changes: for a history `h` of length N the result
    /// is `[value] + h[0..N-1]`.
    pub fn push(&mut self, value: f64) {
        self.samples.insert(0, value);
        self.samples.pop();
    }

    /// Stored samples, newest first.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}
