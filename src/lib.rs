#![cfg_attr(not(test), no_std)]

//! Transistor-controlled ignition timing for a single-cylinder four-stroke
//! engine.
//!
//! A two-pole magnetic pickup on the flywheel produces one pulse pair per
//! revolution; the poles are a fixed number of crankshaft degrees apart. A
//! hardware timer decrements a shared down-counter every 10 µs, and the tick
//! count between the two pole crossings gives the rotational speed. From that
//! the controller derives an advance angle, computes the delay from the second
//! crossing to the firing instant, arms the counter with it, and cuts coil
//! current when it expires.
//!
//! The library is hardware-independent: everything board-specific reaches it
//! through [`io::IgnitionIo`], and the binary wires that trait to the pins and
//! the tick interrupt.

pub mod config;
pub mod history;
pub mod io;
pub mod pulse;
pub mod scheduler;
pub mod tick_counter;
pub mod timing;

/// Debug logging that compiles away unless the `defmt` feature is enabled.
#[cfg(feature = "defmt")]
#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {
        ::defmt::debug!($($args)*)
    };
}

/// Debug logging that compiles away unless the `defmt` feature is enabled.
#[cfg(not(feature = "defmt"))]
#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {{}};
}
