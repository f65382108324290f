//! Per-cycle timing arithmetic.
//!
//! Everything here is a pure function of the measured inter-pole interval and
//! [`EngineConfig`], in integer arithmetic throughout. The truncation
//! behavior is part of the controller's contract — see the notes on
//! [`rpm_from_degree_time`] and [`advance_degrees`] — so the individual steps
//! are kept as named operations rather than inlined, and a stricter variant
//! (saturating or asserting) could replace any of them without touching the
//! scheduler.

use crate::config::EngineConfig;

/// Everything derived from one revolution's pulse interval. Recomputed every
/// cycle; nothing carries over to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleTiming {
    /// Ticks the crankshaft needs for one degree of rotation.
    pub ticks_per_degree: u32,
    /// Engine speed. Heavily truncated at realistic tick counts; only used
    /// to pick the advance breakpoint.
    pub rpm: u32,
    /// Spark advance for this cycle, in degrees before TDC.
    pub advance_degrees: u32,
    /// Ticks from the second pole crossing to TDC.
    pub ticks_to_tdc: u32,
    /// Ticks from the second pole crossing to the firing instant.
    pub fire_delay_ticks: u32,
}

impl CycleTiming {
    pub fn compute(pulse_interval_ticks: u32, config: &EngineConfig) -> Self {
        let ticks_per_degree = ticks_per_degree(pulse_interval_ticks, config);
        let rpm = rpm_from_degree_time(ticks_per_degree);
        let advance_degrees = advance_degrees(rpm, config);
        let ticks_to_tdc = config.tdc_offset_degrees * ticks_per_degree;
        let fire_delay_ticks = fire_delay_ticks(ticks_to_tdc, advance_degrees, ticks_per_degree);
        Self {
            ticks_per_degree,
            rpm,
            advance_degrees,
            ticks_to_tdc,
            fire_delay_ticks,
        }
    }
}

/// Ticks per degree of crankshaft rotation, truncating toward zero.
pub fn ticks_per_degree(pulse_interval_ticks: u32, config: &EngineConfig) -> u32 {
    pulse_interval_ticks / config.pickup_pole_separation_degrees
}

/// Engine speed derived from the per-degree tick time.
///
/// Integer division in this order loses most of the precision at small tick
/// counts (a 2000-tick interval comes out as 1 RPM), which is tolerated
/// because the value only selects between the advance breakpoints.
pub fn rpm_from_degree_time(ticks_per_degree: u32) -> u32 {
    ticks_per_degree * 360 / 1000 / 60
}

/// Piecewise advance curve: minimum below the floor, maximum above the
/// ceiling, and an integer-ratio ramp in between.
///
/// The ramp computes `max / (ceiling / rpm)` with truncating division at
/// both steps. That is only approximately the linear interpolation it stands
/// in for — it is not exactly monotone and steps coarsely near the
/// boundaries — but the exact division order is kept for compatibility with
/// the curve the engine was tuned against.
pub fn advance_degrees(rpm: u32, config: &EngineConfig) -> u32 {
    if rpm < config.advance_rpm_floor {
        config.min_advance_degrees
    } else if rpm > config.advance_rpm_ceiling {
        config.max_advance_degrees
    } else {
        let factor = config.advance_rpm_ceiling / rpm;
        config.max_advance_degrees / factor
    }
}

/// Ticks from the second pole crossing until the coil must fire: the TDC
/// budget minus the advance converted to ticks.
///
/// The subtraction is deliberately unchecked (wrapping). A configuration
/// whose advance exceeds the TDC budget produces a wrapped, absurdly large
/// delay; that is a defect of the configuration, not a runtime condition this
/// controller defends against.
pub fn fire_delay_ticks(ticks_to_tdc: u32, advance_degrees: u32, ticks_per_degree: u32) -> u32 {
    ticks_to_tdc.wrapping_sub(advance_degrees * ticks_per_degree)
}
