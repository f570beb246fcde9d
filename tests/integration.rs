#![no_std]
#![no_main]

use ledfade as _; // memory layout + panic handler

// See https://crates.io/crates/defmt-test/0.3.0 for more documentation (e.g. about the 'state'
// feature)
#[defmt_test::tests]
mod tests {
    use defmt::{assert, assert_eq};
    use ledfade::{
        board::{LedPins, BOARD},
        leds::FadeDriver,
        logic::{Fader, LedTargets},
        peripherals::{PwmLeds, TickTimer},
    };
    use nrf52840_hal::{
        gpio::p0::Parts as P0Parts,
        pac::{self, PWM0, TIMER1},
    };

    struct State {
        fade_driver: FadeDriver<PWM0, TIMER1>,
        targets: LedTargets,
    }

    #[init]
    fn init() -> State {
        let board = pac::Peripherals::take().unwrap();
        let pins = P0Parts::new(board.P0);

        let pwm = PwmLeds::new(board.PWM0, LedPins::new(pins, &BOARD), &BOARD);
        let tick_timer = TickTimer::configure(board.TIMER1, BOARD.fade_tick_us);
        State {
            fade_driver: FadeDriver::new(tick_timer, Fader::new(BOARD.fader_config()), pwm),
            targets: LedTargets::new(),
        }
    }

    #[test]
    fn pwm_starts_dark(state: &mut State) {
        let leds = state.fade_driver.leds();
        assert_eq!(leds.top(), BOARD.pwm_top);
        for channel in 0..3 {
            assert_eq!(leds.duty(channel), 0);
        }
    }

    #[test]
    fn on_interrupt_waits_for_overflow(state: &mut State) {
        state.targets.set_state(0b010);
        // timer not started yet, so there is nothing to handle
        assert!(!state.fade_driver.tick_pending());
        state.fade_driver.on_interrupt(&state.targets);

        assert_eq!(state.fade_driver.fader().duty(1), 0);
        assert_eq!(state.fade_driver.leds().duty(1), 0);
    }

    #[test]
    fn one_step_per_overflow(state: &mut State) {
        let driver = &mut state.fade_driver;
        state.targets.set_state(0b010);

        // TIMER1 stays masked in the NVIC, the test stands in for the handler
        driver.start_interrupt_driven();

        while !driver.tick_pending() {}
        driver.on_interrupt(&state.targets);
        assert_eq!(driver.fader().duty(1), 1);
        assert_eq!(driver.leds().duty(1), 1);
        assert!(!driver.tick_pending());

        // same overflow, already handled
        driver.on_interrupt(&state.targets);
        assert_eq!(driver.fader().duty(1), 1);

        while !driver.tick_pending() {}
        driver.on_interrupt(&state.targets);
        assert_eq!(driver.fader().duty(1), 2);
        assert_eq!(driver.leds().duty(1), 2);
        assert!(!driver.tick_pending());

        // the other colours were never asked to fade in
        for channel in [0, 2] {
            assert_eq!(driver.leds().duty(channel), 0);
        }
    }
}
