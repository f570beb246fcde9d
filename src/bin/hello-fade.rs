#![no_main]
#![no_std]

use core::cell::RefCell;

use critical_section::Mutex;
use nrf52840_hal::{
    self as hal,
    gpio::p0::Parts as P0Parts,
    pac::{interrupt, Interrupt, NVIC, TIMER2},
};

use ledfade::{
    self as _,
    board::{LedPins, BOARD},
    leds::{get_leds_pwm, set_leds_pwm, FadeDriver, LED_TARGETS},
    logic::{Fader, LED_MASK},
    peripherals::{PwmLeds, TickTimer},
}; // global logger + panicking-behavior + memory layout

const STATE_PERIOD_US: u32 = 1_000_000;

/// Changes the LED state once a second while the main loop fades.
static STATE_TIMER: Mutex<RefCell<Option<TickTimer<TIMER2>>>> = Mutex::new(RefCell::new(None));

#[cortex_m_rt::entry]
fn main() -> ! {
    defmt::println!("Hello, fade!");

    let board = hal::pac::Peripherals::take().unwrap();
    let pins = P0Parts::new(board.P0);

    let pwm = PwmLeds::new(board.PWM0, LedPins::new(pins, &BOARD), &BOARD);
    let tick_timer = TickTimer::configure(board.TIMER1, BOARD.fade_tick_us);
    let fade_driver = FadeDriver::new(tick_timer, Fader::new(BOARD.fader_config()), pwm);

    let mut state_timer = TickTimer::configure(board.TIMER2, STATE_PERIOD_US);
    state_timer.start_interrupt_driven();
    critical_section::with(|cs| {
        STATE_TIMER.replace(cs, Some(state_timer));
    });
    unsafe {
        NVIC::unmask(Interrupt::TIMER2);
    }

    fade_driver.run(&LED_TARGETS)
}

#[interrupt]
fn TIMER2() {
    critical_section::with(|cs| {
        if let Some(timer) = STATE_TIMER.borrow_ref_mut(cs).as_mut() {
            if timer.overflowed() {
                let led_states = (get_leds_pwm() + 1) & LED_MASK;
                set_leds_pwm(led_states);
                defmt::info!("LEDs {=u8:03b}", led_states);
                timer.clear_overflow();
            }
        } else {
            defmt::error!("STATE_TIMER not set up");
        }
    });
}
