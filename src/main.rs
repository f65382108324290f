#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

//! Ignition controller firmware for the STM32F091RC Nucleo-64.
//!
//! Board wiring:
//! - PA0: pickup input (pulled up, the sensor pulls it low)
//! - PA1: coil drive output (high = charging, low = fired)
//! - PA5: onboard LED, toggled on every spark
//! - TIM7: 100 kHz update interrupt driving the 10 µs tick counter
//!
//! Everything below is one-time bring-up; after it the scheduler owns the
//! core and never returns.

#[cfg(target_os = "none")]
mod app {
    #[cfg(not(feature = "defmt"))]
    use panic_halt as _;
    #[cfg(feature = "defmt")]
    use {defmt_rtt as _, panic_probe as _};

    use embassy_executor::Spawner;
    use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
    use embassy_stm32::pac;
    use embassy_stm32::pac::interrupt;
    use embassy_stm32::time::hz;
    use embassy_stm32::timer::low_level::Timer as TickTimer;
    use embassy_stm32::Config;
    use embassy_time::Timer;

    use ignition::config::{ENGINE, TICK_PERIOD};
    use ignition::debug;
    use ignition::io::IgnitionIo;
    use ignition::scheduler::IgnitionScheduler;
    use ignition::tick_counter::TickCounter;

    /// The down-counter shared with the tick interrupt. Atomics only; both
    /// contexts go through the `TickCounter` API.
    static TICK_COUNTER: TickCounter = TickCounter::new();

    /// 10 µs tick interrupt. Keep this short: acknowledge, decrement, leave.
    #[interrupt]
    fn TIM7() {
        pac::TIM7.sr().modify(|r| r.set_uif(false));
        TICK_COUNTER.on_tick();
    }

    /// The real pins behind the control loop's I/O boundary.
    struct BoardIo {
        pickup: Input<'static>,
        coil: Output<'static>,
        led: Output<'static>,
    }

    impl IgnitionIo for BoardIo {
        fn pickup_is_high(&mut self) -> bool {
            self.pickup.is_high()
        }

        fn coil_charge(&mut self) {
            self.coil.set_high();
        }

        fn coil_fire(&mut self) {
            self.coil.set_low();
            // Spark indicator; at cranking speed this is visible.
            self.led.toggle();
        }
    }

    #[embassy_executor::main]
    async fn main(_spawner: Spawner) {
        // Nucleo-64 clocking: the ST-LINK MCU feeds its 8 MHz MCO into the
        // HSE input (no crystal, hence bypass mode), and the PLL multiplies
        // it by 6 to the F091's 48 MHz maximum. AHB/APB1 run undivided, so
        // the timers also see 48 MHz.
        let mut config = Config::default();
        {
            use embassy_stm32::rcc::*;

            config.rcc.hse = Some(Hse {
                freq: hz(8_000_000),
                mode: HseMode::Bypass,
            });
            config.rcc.pll = Some(Pll {
                src: PllSource::HSE,
                prediv: PllPreDiv::DIV1,
                mul: PllMul::MUL6,
            });
            config.rcc.sys = Sysclk::PLL1_P;
            config.rcc.ahb_pre = AHBPrescaler::DIV1;
            config.rcc.apb1_pre = APBPrescaler::DIV1;
        }
        let p = embassy_stm32::init(config);

        // Pickup is open-collector and idles high; the passing pole pulls it
        // low. Coil drive starts inactive so a reset cannot leave the coil
        // cooking.
        let pickup = Input::new(p.PA0, Pull::Up);
        let coil = Output::new(p.PA1, Level::Low, Speed::Low);
        let led = Output::new(p.PA5, Level::Low, Speed::Low);

        // TIM7 update events generate the fixed 10 µs tick. The counter
        // itself lives in TICK_COUNTER; the hardware timer only paces the
        // interrupt.
        let tick_rate = hz(1_000_000 / TICK_PERIOD.to_micros());
        let tick_timer = TickTimer::new(p.TIM7);
        tick_timer.set_frequency(tick_rate);
        tick_timer.enable_update_interrupt(true);
        tick_timer.start();
        unsafe { cortex_m::peripheral::NVIC::unmask(pac::Interrupt::TIM7) };

        debug!(
            "ignition: bring-up complete, tick={}us, pole separation={}deg, tdc offset={}deg",
            TICK_PERIOD.to_micros(),
            ENGINE.pickup_pole_separation_degrees,
            ENGINE.tdc_offset_degrees
        );

        // Let the pickup line settle on its pull-up before trusting edges.
        Timer::after_millis(100).await;

        let mut io = BoardIo { pickup, coil, led };
        let mut scheduler = IgnitionScheduler::new(&ENGINE, &TICK_COUNTER);

        // From here on the control loop busy-waits on the pickup and the
        // tick counter; it never yields back to the executor.
        scheduler.run(&mut io)
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    // The firmware only makes sense on the target; building the binary on
    // the host is supported solely so `cargo test` can link the crate.
}
