//! Pickup pulse detection: turning raw edges into a validated inter-pole
//! interval.

use crate::config::EngineConfig;
use crate::io::IgnitionIo;
use crate::tick_counter::TickCounter;

/// Watches the pickup line for a falling edge followed by a rising edge and
/// measures the ticks elapsed across the pair.
pub struct PulseDetector<'a> {
    counter: &'a TickCounter,
    arm_load_value: u32,
}

impl<'a> PulseDetector<'a> {
    pub fn new(counter: &'a TickCounter, config: &EngineConfig) -> Self {
        Self {
            counter,
            arm_load_value: config.arm_load_value,
        }
    }

    /// Blocks until a validated two-edge interval has been timed and returns
    /// its length in ticks.
    ///
    /// Each attempt arms the counter to its full load, busy-waits for the
    /// line to go low and then high again, and inspects what is left of the
    /// countdown. Two sentinel readings cause the attempt to be discarded and
    /// restarted:
    ///
    /// - `arm_load_value`: the counter never decremented, so there is no
    ///   usable timing reference yet (the very first pulse after power-up).
    /// - `0`: the countdown ran out before the second edge — either the
    ///   engine is cranking slower than the measurement window or, again,
    ///   this is the first pulse since start. The two cases are not
    ///   distinguishable from the reading alone and both are treated as
    ///   "no reference, try again".
    ///
    /// This is an unbounded wait: if the pickup never produces edges, the
    /// caller stays here forever. On a dedicated controller with nothing else
    /// to do that is the intended behavior.
    pub fn await_validated_interval(&self, io: &mut impl IgnitionIo) -> u32 {
        loop {
            self.counter.arm(self.arm_load_value);

            // One full edge pair: high -> low, then low -> high.
            while io.pickup_is_high() {}
            while !io.pickup_is_high() {}

            let remaining = self.counter.remaining();
            if remaining == self.arm_load_value || remaining == 0 {
                continue;
            }
            return self.arm_load_value - remaining;
        }
    }
}
