//! Measurement hooks for the cryptographic sections of the protocol.
//!
//! Roles receive an [`Observer`] explicitly and report how long each
//! functional encryption section took; nothing is accumulated globally.
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Scheme setup, master key generation and key derivation
    ClientEnrolment,
    /// Probe encryption
    ClientAuthentication,
    /// Decryption of the distance
    ServerAuthentication,
}

pub trait Observer: Send + Sync {
    fn observe(&self, phase: Phase, elapsed: Duration);
}

/// Ignore every observation.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Observer for Silent {
    fn observe(&self, _phase: Phase, _elapsed: Duration) {}
}

/// Log every observation at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTimings;

impl Observer for LogTimings {
    fn observe(&self, phase: Phase, elapsed: Duration) {
        debug!("{:?} took {} µs", phase, elapsed.as_micros());
    }
}

/// Accumulate observations per phase.
#[derive(Debug, Default)]
pub struct Timings {
    totals: Mutex<HashMap<Phase, (u32, Duration)>>,
}

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, phase: Phase) -> (u32, Duration) {
        let totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        totals.get(&phase).copied().unwrap_or_default()
    }

    pub fn count(&self, phase: Phase) -> u32 {
        self.get(phase).0
    }

    pub fn total(&self, phase: Phase) -> Duration {
        self.get(phase).1
    }

    /// `None` until the phase was observed once
    pub fn mean(&self, phase: Phase) -> Option<Duration> {
        let (count, total) = self.get(phase);
        total.checked_div(count)
    }
}

impl Observer for Timings {
    fn observe(&self, phase: Phase, elapsed: Duration) {
        let mut totals = self.totals.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = totals.entry(phase).or_default();
        entry.0 += 1;
        entry.1 += elapsed;
    }
}

/// Run `f` and report its duration under `phase`
pub fn measure<T>(observer: &dyn Observer, phase: Phase, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    observer.observe(phase, start.elapsed());
    result
}
