//! The ignition control loop.
//!
//! One revolution is one pass through a four-state cycle:
//!
//! ```text
//! AwaitPulse -> Charging -> ArmedWaiting -> Fire -> AwaitPulse -> ...
//! ```
//!
//! There is no terminal state and no cancellation: once the countdown is
//! armed it always runs to completion, and a new pulse cannot preempt a
//! scheduled firing. The states are an explicit enum rather than straight-line
//! loop code so that property is visible in the control flow.

use crate::config::EngineConfig;
use crate::history::CycleHistory;
use crate::io::IgnitionIo;
use crate::pulse::PulseDetector;
use crate::tick_counter::TickCounter;
use crate::timing::CycleTiming;

/// Where the control loop currently is in the engine cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Blocked in the pulse detector until a validated interval arrives.
    AwaitPulse,
    /// Coil drive goes active and the cycle's timing is computed.
    Charging { interval_ticks: u32 },
    /// Countdown armed with the fire delay; blocked until it expires.
    ArmedWaiting { fire_delay_ticks: u32 },
    /// Coil drive goes inactive: spark.
    Fire,
}

pub struct IgnitionScheduler<'a> {
    config: &'a EngineConfig,
    counter: &'a TickCounter,
    detector: PulseDetector<'a>,
    history: CycleHistory,
    state: State,
}

impl<'a> IgnitionScheduler<'a> {
    pub fn new(config: &'a EngineConfig, counter: &'a TickCounter) -> Self {
        Self {
            config,
            counter,
            detector: PulseDetector::new(counter, config),
            history: CycleHistory::new(),
            state: State::AwaitPulse,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn history(&self) -> &CycleHistory {
        &self.history
    }

    /// Executes the transition out of the current state. `AwaitPulse` and
    /// `ArmedWaiting` block for as long as their hardware condition takes.
    pub fn step(&mut self, io: &mut impl IgnitionIo) {
        self.state = match self.state {
            State::AwaitPulse => {
                let interval_ticks = self.detector.await_validated_interval(io);
                State::Charging { interval_ticks }
            }
            State::Charging { interval_ticks } => {
                // Charge first: every tick spent computing is charge time the
                // coil would otherwise lose.
                io.coil_charge();
                let timing = CycleTiming::compute(interval_ticks, self.config);
                self.history.record(interval_ticks);
                crate::debug!(
                    "cycle: interval={} rpm={} advance={} fire_delay={}",
                    interval_ticks,
                    timing.rpm,
                    timing.advance_degrees,
                    timing.fire_delay_ticks
                );
                State::ArmedWaiting {
                    fire_delay_ticks: timing.fire_delay_ticks,
                }
            }
            State::ArmedWaiting { fire_delay_ticks } => {
                self.counter.arm(fire_delay_ticks);
                while self.counter.remaining() > 0 {
                    io.idle();
                }
                State::Fire
            }
            State::Fire => {
                io.coil_fire();
                State::AwaitPulse
            }
        };
    }

    /// Runs exactly one engine revolution: pulse, charge, wait, fire.
    pub fn run_cycle(&mut self, io: &mut impl IgnitionIo) {
        loop {
            self.step(io);
            if self.state == State::AwaitPulse {
                break;
            }
        }
    }

    /// The forever loop. Never returns; every wait inside is unbounded.
    pub fn run(&mut self, io: &mut impl IgnitionIo) -> ! {
        loop {
            self.run_cycle(io);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENGINE;
    use std::collections::VecDeque;

    #[derive(Debug, PartialEq, Eq)]
    enum CoilEvent {
        /// Charge began; payload is the armed-wait tick count at that moment.
        Charge(u32),
        /// Spark; payload is the armed-wait tick count at that moment.
        Fire(u32),
    }

    /// Test bench: scripted pickup samples plus a coil event log. Ticks
    /// elapse two ways, matching how the loop consumes time — pickup samples
    /// carry the time between edges, and every armed-wait poll iteration
    /// advances the counter by exactly one tick via `idle`.
    struct Bench<'a> {
        counter: &'a TickCounter,
        samples: VecDeque<(u32, bool)>,
        armed_wait_ticks: u32,
        events: Vec<CoilEvent>,
    }

    impl<'a> Bench<'a> {
        fn new(counter: &'a TickCounter, script: &[(u32, bool)]) -> Self {
            Self {
                counter,
                samples: script.iter().copied().collect(),
                armed_wait_ticks: 0,
                events: Vec::new(),
            }
        }
    }

    impl IgnitionIo for Bench<'_> {
        fn pickup_is_high(&mut self) -> bool {
            let (ticks, level) = self.samples.pop_front().expect("script exhausted");
            for _ in 0..ticks {
                self.counter.on_tick();
            }
            level
        }

        fn coil_charge(&mut self) {
            self.events.push(CoilEvent::Charge(self.armed_wait_ticks));
        }

        fn coil_fire(&mut self) {
            self.events.push(CoilEvent::Fire(self.armed_wait_ticks));
        }

        fn idle(&mut self) {
            self.counter.on_tick();
            self.armed_wait_ticks += 1;
        }
    }

    #[test]
    fn one_revolution_at_2000_ticks_fires_at_tdc() {
        let counter = TickCounter::new();
        let mut scheduler = IgnitionScheduler::new(&ENGINE, &counter);
        // 2000 ticks between poles: 200 ticks/degree, 1 "RPM" after
        // truncation, so minimum advance and a fire delay of the full
        // 180-degree TDC budget: 36000 ticks.
        let mut bench = Bench::new(&counter, &[(0, false), (2000, true)]);

        scheduler.run_cycle(&mut bench);

        assert_eq!(
            bench.events,
            vec![CoilEvent::Charge(0), CoilEvent::Fire(36_000)]
        );
        assert_eq!(counter.remaining(), 0);
        assert_eq!(scheduler.state(), State::AwaitPulse);
        assert_eq!(scheduler.history().most_recent(), Some(2000));
    }

    #[test]
    fn states_advance_in_order() {
        let counter = TickCounter::new();
        let mut scheduler = IgnitionScheduler::new(&ENGINE, &counter);
        let mut bench = Bench::new(&counter, &[(0, false), (2000, true)]);

        assert_eq!(scheduler.state(), State::AwaitPulse);
        scheduler.step(&mut bench);
        assert_eq!(
            scheduler.state(),
            State::Charging {
                interval_ticks: 2000
            }
        );
        scheduler.step(&mut bench);
        assert_eq!(
            scheduler.state(),
            State::ArmedWaiting {
                fire_delay_ticks: 36_000
            }
        );
        scheduler.step(&mut bench);
        assert_eq!(scheduler.state(), State::Fire);
        assert_eq!(bench.armed_wait_ticks, 36_000);
        // The spark happens on the transition out of Fire, not before.
        assert_eq!(bench.events, vec![CoilEvent::Charge(0)]);
        scheduler.step(&mut bench);
        assert_eq!(scheduler.state(), State::AwaitPulse);
        assert_eq!(bench.events.len(), 2);
    }

    #[test]
    fn consecutive_cycles_rearm_independently() {
        let counter = TickCounter::new();
        let mut scheduler = IgnitionScheduler::new(&ENGINE, &counter);
        let mut bench = Bench::new(
            &counter,
            &[
                (0, false),
                (2000, true),
                // Engine speeding up: next interval is shorter. The line is
                // high when AwaitPulse resumes, drops, then rises again.
                (0, false),
                (1000, true),
            ],
        );

        scheduler.run_cycle(&mut bench);
        scheduler.run_cycle(&mut bench);

        // Second cycle: 100 ticks/degree, fire delay 18000.
        assert_eq!(
            bench.events,
            vec![
                CoilEvent::Charge(0),
                CoilEvent::Fire(36_000),
                CoilEvent::Charge(36_000),
                CoilEvent::Fire(36_000 + 18_000),
            ]
        );
        assert_eq!(scheduler.history().len(), 2);
        assert_eq!(scheduler.history().most_recent(), Some(1000));
    }
}
