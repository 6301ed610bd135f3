//! Calibratable busy-loop delay for targets without a timer.
//!
//! The wait length depends on core clock and code placement, so durations are
//! approximate. Calibrate `loops_per_ms` against a scope or a hardware timer.

use embedded_hal::delay::DelayNs;

/// Iterations per millisecond used by [`SpinDelay::default`].
pub const DEFAULT_LOOPS_PER_MS: u32 = 1_000;

/// Approximate delay that spins a fixed number of iterations per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinDelay {
    loops_per_ms: u32,
}

impl SpinDelay {
    /// Creates a delay spinning `loops_per_ms` iterations per millisecond.
    pub const fn new(loops_per_ms: u32) -> Self {
        Self { loops_per_ms }
    }

    /// Returns the calibration constant.
    pub const fn loops_per_ms(&self) -> u32 {
        self.loops_per_ms
    }

    /// Number of loop iterations spent for `ns` nanoseconds.
    pub fn iterations_for(&self, ns: u32) -> u64 {
        u64::from(ns) * u64::from(self.loops_per_ms) / 1_000_000
    }
}

impl Default for SpinDelay {
    fn default() -> Self {
        Self::new(DEFAULT_LOOPS_PER_MS)
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        for _ in 0..self.iterations_for(ns) {
            core::hint::spin_loop();
        }
    }
}
