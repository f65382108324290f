//! The shared down-counter that is the controller's only time source.

use core::sync::atomic::{AtomicU32, Ordering};

/// A down-counter decremented once per hardware tick from interrupt context
/// and armed/read from the control loop.
///
/// The counter is a single `AtomicU32` using only loads and stores, which is
/// all a Cortex-M0 offers. That is sufficient here: the tick interrupt is the
/// only decrementer, so its load/store pair cannot race with itself, and
/// [`arm`](Self::arm) runs inside a critical section so the interrupt cannot
/// interleave a stale decrement with the new load value.
///
/// Once armed the value is non-increasing and floors at zero; zero is sticky
/// until the next arm. There is no detection of missed ticks — a lost
/// decrement simply shows up as a late spark.
pub struct TickCounter {
    remaining: AtomicU32,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            remaining: AtomicU32::new(0),
        }
    }

    /// Loads the countdown with `ticks` and (re)starts it. Always honored,
    /// including mid-count.
    pub fn arm(&self, ticks: u32) {
        critical_section::with(|_| self.remaining.store(ticks, Ordering::Release));
    }

    /// Current countdown value. Safe to call from the control loop at any
    /// time; staleness is bounded by one tick period.
    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Advances the countdown by one tick. Called from the tick interrupt,
    /// once per hardware period; decrements if nonzero, otherwise does
    /// nothing. Bounded time, no blocking.
    pub fn on_tick(&self) {
        let remaining = self.remaining.load(Ordering::Acquire);
        if remaining > 0 {
            self.remaining.store(remaining - 1, Ordering::Release);
        }
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}
