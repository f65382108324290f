//! Compile-time engine constants.
//!
//! Nothing here is read at runtime from anywhere; retuning for a different
//! engine means editing [`ENGINE`] and rebuilding.

use fugit::MicrosDurationU32;

/// Period of the hardware tick driving [`TickCounter::on_tick`]: one tick is
/// 1/100 ms, so all interval arithmetic in the crate is in 10 µs units.
///
/// [`TickCounter::on_tick`]: crate::tick_counter::TickCounter::on_tick
pub const TICK_PERIOD: MicrosDurationU32 = MicrosDurationU32::from_ticks(10);

/// Fixed parameters of the target engine and its pickup.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Angular distance between the two pickup poles, in crankshaft degrees.
    pub pickup_pole_separation_degrees: u32,
    /// Advance applied below [`advance_rpm_floor`](Self::advance_rpm_floor).
    pub min_advance_degrees: u32,
    /// Advance applied above [`advance_rpm_ceiling`](Self::advance_rpm_ceiling).
    pub max_advance_degrees: u32,
    /// Engine speed at which advance starts ramping up from the minimum.
    pub advance_rpm_floor: u32,
    /// Engine speed at which advance stops ramping and holds the maximum.
    pub advance_rpm_ceiling: u32,
    /// Crankshaft degrees from the second pickup pole to top dead center.
    pub tdc_offset_degrees: u32,
    /// Value loaded into the down-counter while waiting for pulses. If the
    /// counter runs all the way out before the second edge, the measurement
    /// is discarded as having no usable timing reference.
    pub arm_load_value: u32,
}

/// The engine this firmware is built for: a small single-cylinder four-stroke
/// with a 10° pole separation and TDC 180° after the second pole.
pub const ENGINE: EngineConfig = EngineConfig {
    pickup_pole_separation_degrees: 10,
    min_advance_degrees: 0,
    max_advance_degrees: 20,
    advance_rpm_floor: 1000,
    advance_rpm_ceiling: 5000,
    tdc_offset_degrees: 180,
    arm_load_value: 0x639C,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_constants_are_consistent() {
        assert!(ENGINE.pickup_pole_separation_degrees > 0);
        assert!(ENGINE.min_advance_degrees <= ENGINE.max_advance_degrees);
        assert!(ENGINE.advance_rpm_floor < ENGINE.advance_rpm_ceiling);
        // The fire delay is tdc_offset - advance (in degrees); keeping the
        // maximum advance inside the TDC budget is what keeps it from
        // underflowing.
        assert!(ENGINE.max_advance_degrees < ENGINE.tdc_offset_degrees);
    }

    #[test]
    fn arm_load_covers_the_slowest_crank_we_time() {
        // 0x639C ticks at 10 µs/tick is roughly a quarter of a second between
        // poles; anything slower reads as a cold start.
        assert_eq!(ENGINE.arm_load_value, 25500);
        let window = TICK_PERIOD * ENGINE.arm_load_value;
        assert_eq!(window.to_millis(), 255);
    }
}
