// src/progress.rs

//! Progress reporting for transfers
//!
//! Downloads report through the [`ProgressTracker`] trait so the library
//! stays independent of how progress is shown. Implementations here:
//! - `SilentProgress`: counts bytes, prints nothing (quiet mode, tests)
//! - `LogProgress`: emits tracing events roughly every tenth of the transfer
//!
//! The terminal progress bar lives in the binary.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::info;

/// Thread-safe progress sink
pub trait ProgressTracker: Send + Sync {
    fn set_message(&self, message: &str);

    /// Total size, 0 when unknown
    fn set_length(&self, length: u64);

    fn increment(&self, amount: u64);

    fn position(&self) -> u64;

    fn length(&self) -> u64;

    fn finish_with_message(&self, message: &str);

    /// Abandon the transfer, leaving the error visible
    fn finish_with_error(&self, message: &str);

    fn is_finished(&self) -> bool;
}

/// No-op tracker that still records position
#[derive(Debug, Default)]
pub struct SilentProgress {
    position: AtomicU64,
    length: AtomicU64,
    finished: AtomicBool,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressTracker for SilentProgress {
    fn set_message(&self, _message: &str) {}

    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
    }

    fn increment(&self, amount: u64) {
        self.position.fetch_add(amount, Ordering::Relaxed);
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> u64 {
        self.length.load(Ordering::Relaxed)
    }

    fn finish_with_message(&self, _message: &str) {
        self.finished.store(true, Ordering::Relaxed);
    }

    fn finish_with_error(&self, _message: &str) {
        self.finished.store(true, Ordering::Relaxed);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}

/// Tracker for non-interactive output
///
/// Logs at info level each time the transfer crosses another tenth of its
/// length. Transfers of unknown length only log start and finish.
#[derive(Debug)]
pub struct LogProgress {
    name: String,
    position: AtomicU64,
    length: AtomicU64,
    finished: AtomicBool,
}

impl LogProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: AtomicU64::new(0),
            length: AtomicU64::new(0),
            finished: AtomicBool::new(false),
        }
    }

    fn interval(&self) -> u64 {
        std::cmp::max(1, self.length.load(Ordering::Relaxed) / 10)
    }
}

impl ProgressTracker for LogProgress {
    fn set_message(&self, message: &str) {
        info!("{}: {}", self.name, message);
    }

    fn set_length(&self, length: u64) {
        self.length.store(length, Ordering::Relaxed);
    }

    fn increment(&self, amount: u64) {
        let old = self.position.fetch_add(amount, Ordering::Relaxed);
        let new = old + amount;
        let length = self.length.load(Ordering::Relaxed);
        if length == 0 {
            return;
        }
        let interval = self.interval();
        if new / interval > old / interval {
            info!("{}: {}% ({}/{})", self.name, (new * 100) / length, new, length);
        }
    }

    fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn length(&self) -> u64 {
        self.length.load(Ordering::Relaxed)
    }

    fn finish_with_message(&self, message: &str) {
        self.finished.store(true, Ordering::Relaxed);
        info!("{}: {}", self.name, message);
    }

    fn finish_with_error(&self, message: &str) {
        self.finished.store(true, Ordering::Relaxed);
        info!("{}: ERROR - {}", self.name, message);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Relaxed)
    }
}
