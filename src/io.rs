//! The boundary between the timing core and board bring-up.

/// Everything the control loop needs from the hardware: the pickup line, the
/// coil drive line, and a hook into its polling wait.
///
/// The firmware binary implements this over the real pins; tests implement it
/// with scripted signals.
pub trait IgnitionIo {
    /// Level of the pickup input line.
    fn pickup_is_high(&mut self) -> bool;

    /// Drive the coil output active: current starts charging the coil.
    fn coil_charge(&mut self);

    /// Drive the coil output inactive: the collapsing field fires the spark.
    fn coil_fire(&mut self);

    /// Called once per poll iteration while the scheduler waits for the armed
    /// countdown to expire. No-op on hardware, where the tick interrupt
    /// advances the counter on its own; test harnesses use it to step
    /// simulated time.
    fn idle(&mut self) {}
}
