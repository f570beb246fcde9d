#![no_main]
#![no_std]

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::blocking::delay::DelayMs;
use nrf52840_hal::{
    self as hal,
    gpio::{p0::Parts as P0Parts, p1::Parts as P1Parts},
    pac::{interrupt, Interrupt, NVIC, PWM0, TIMER1},
    Timer,
};

use ledfade::{
    self as _,
    board::{I2cPins, LedPins, BOARD},
    leds::{get_leds_pwm, set_leds_pwm, FadeDriver, LED_TARGETS},
    logic::{Fader, LED_MASK},
    peripherals::{I2cHandler, PwmLeds, TickTimer, MMA8653},
}; // global logger + panicking-behavior + memory layout

static FADE_DRIVER: Mutex<RefCell<Option<FadeDriver<PWM0, TIMER1>>>> =
    Mutex::new(RefCell::new(None));

#[cortex_m_rt::entry]
fn main() -> ! {
    defmt::info!(
        "I2C demo {=str} {=str}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let board = hal::pac::Peripherals::take().unwrap();
    let pins_0 = P0Parts::new(board.P0);
    let pins_1 = P1Parts::new(board.P1);

    for (channel, led) in BOARD.leds.iter().enumerate() {
        defmt::debug!(
            "LED {=usize} ({=str}): max duty {=u16}, slowdown {=u16}",
            channel,
            led.name,
            BOARD.max_duty(channel),
            led.power_div
        );
    }
    let pwm = PwmLeds::new(board.PWM0, LedPins::new(pins_0, &BOARD), &BOARD);
    defmt::debug!("PWM top {=u16}", pwm.top());
    let tick_timer = TickTimer::configure(board.TIMER1, BOARD.fade_tick_us);
    let mut fade_driver = FadeDriver::new(tick_timer, Fader::new(BOARD.fader_config()), pwm);
    fade_driver.start_interrupt_driven();

    critical_section::with(|cs| {
        FADE_DRIVER.replace(cs, Some(fade_driver));
    });
    unsafe {
        NVIC::unmask(Interrupt::TIMER1);
    }

    let i2c = I2cHandler::init(board.TWIM0, I2cPins::new(pins_1), BOARD.i2c_frequency);
    let mut accelerometer = MMA8653::new(i2c);
    match accelerometer.is_present() {
        Ok(true) => defmt::info!("MMA8653 found"),
        Ok(false) => defmt::warn!("unexpected WHO_AM_I, is this an MMA8653?"),
        Err(e) => defmt::warn!("accelerometer not responding: {}", defmt::Debug2Format(&e)),
    }

    let mut periodic_timer = Timer::periodic(board.TIMER0);
    let mut since_heartbeat_ms = 0;
    let mut led_states = 0u8;

    loop {
        match accelerometer.poll() {
            Ok(readings) => {
                for reading in readings {
                    defmt::info!("Reg 0x{=u8:02x}, val 0x{=u8:02x}", reading.register, reading.value);
                }
            }
            Err(e) => {
                defmt::warn!("accelerometer poll failed: {}", defmt::Debug2Format(&e));
                accelerometer.reset_bus();
            }
        }

        let duties = critical_section::with(|cs| {
            FADE_DRIVER
                .borrow_ref(cs)
                .as_ref()
                .map(|fade_driver| {
                    let fader = fade_driver.fader();
                    [fader.duty(0), fader.duty(1), fader.duty(2)]
                })
                .unwrap_or_default()
        });
        defmt::debug!("duty {}", duties);

        led_states = (led_states + 1) & LED_MASK;
        set_leds_pwm(led_states);
        defmt::info!("LEDs {=u8:03b}", get_leds_pwm());

        periodic_timer.delay_ms(BOARD.accelerometer_poll_ms);
        since_heartbeat_ms += BOARD.accelerometer_poll_ms;
        if since_heartbeat_ms >= BOARD.heartbeat_ms {
            since_heartbeat_ms = 0;
            defmt::info!("Heartbeat");
        }
    }
}

#[interrupt]
fn TIMER1() {
    critical_section::with(|cs| {
        if let Some(fade_driver) = FADE_DRIVER.borrow_ref_mut(cs).as_mut() {
            fade_driver.on_interrupt(&LED_TARGETS);
        } else {
            defmt::error!("FADE_DRIVER not set up");
        }
    });
}
