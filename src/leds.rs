//! The LED control surface and the tick side that drives the fade.

use nrf52840_hal::{pwm, timer};

use crate::{
    logic::{Fader, LedTargets},
    peripherals::{PwmLeds, TickTimer},
};

pub static LED_TARGETS: LedTargets = LedTargets::new();

/// Bit 0 red, bit 1 green, bit 2 blue. Set bits fade in, clear bits fade
/// out.
pub fn set_leds_pwm(mask: u8) {
    LED_TARGETS.set_state(mask);
}

/// The mask last passed to [`set_leds_pwm`], whether or not the fade has
/// finished.
pub fn get_leds_pwm() -> u8 {
    LED_TARGETS.get_state()
}

/// Owns everything the fade tick touches: the tick timer, the fader state
/// and the PWM compare values.
pub struct FadeDriver<P: pwm::Instance, T: timer::Instance> {
    timer: TickTimer<T>,
    fader: Fader,
    pwm: PwmLeds<P>,
}

impl<P, T> FadeDriver<P, T>
where
    P: pwm::Instance,
    T: timer::Instance,
{
    pub fn new(timer: TickTimer<T>, fader: Fader, pwm: PwmLeds<P>) -> Self {
        FadeDriver { timer, fader, pwm }
    }

    pub fn fader(&self) -> &Fader {
        &self.fader
    }

    pub fn leds(&self) -> &PwmLeds<P> {
        &self.pwm
    }

    /// An overflow has fired and not been handled yet.
    pub fn tick_pending(&self) -> bool {
        self.timer.overflowed()
    }

    pub fn start_interrupt_driven(&mut self) {
        self.timer.start_interrupt_driven();
    }

    /// Call from the tick timer's interrupt handler. Steps the fade once per
    /// overflow and clears the event after the step.
    pub fn on_interrupt(&mut self, targets: &LedTargets) {
        if self.timer.overflowed() {
            self.fader.tick(targets.directions(), &mut self.pwm);
            self.timer.clear_overflow();
        }
    }

    /// Drives the fade from a busy loop instead of the interrupt.
    pub fn run(self, targets: &LedTargets) -> ! {
        let FadeDriver {
            timer,
            mut fader,
            mut pwm,
        } = self;
        timer.run(move || fader.tick(targets.directions(), &mut pwm))
    }
}
