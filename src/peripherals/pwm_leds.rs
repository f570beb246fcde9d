use hal::pwm::{Channel, CounterMode, Instance, LoadMode, Pwm};
use nrf52840_hal as hal;

use crate::board::{BoardConfig, LedPins};
use crate::logic::{DutyOutput, LED_COUNT};

const CHANNELS: [Channel; LED_COUNT] = [Channel::C0, Channel::C1, Channel::C2];

/// Three LEDs on the compare channels of one PWM instance, sharing a single
/// top value.
pub struct PwmLeds<T: Instance> {
    pwm: Pwm<T>,
    active_low: bool,
}

impl<T> PwmLeds<T>
where
    T: Instance,
{
    pub fn new(instance: T, pins: LedPins, config: &BoardConfig) -> Self {
        let pwm = Pwm::new(instance);
        pwm.set_output_pin(CHANNELS[0], pins.red);
        pwm.set_output_pin(CHANNELS[1], pins.green);
        pwm.set_output_pin(CHANNELS[2], pins.blue);
        pwm.set_prescaler(config.pwm_prescaler);
        pwm.set_counter_mode(CounterMode::Up);
        pwm.set_load_mode(LoadMode::Individual);
        pwm.set_max_duty(config.pwm_top);

        let leds = PwmLeds {
            pwm,
            active_low: config.leds_active_low,
        };
        for channel in 0..LED_COUNT {
            leds.set_duty(channel, 0);
        }
        leds.pwm.enable();
        leds
    }

    /// The new value is picked up when the running period ends, the current
    /// period is never cut short.
    pub fn set_duty(&self, channel: usize, duty: u16) {
        debug_assert!(duty <= self.pwm.max_duty());
        // duty counts the ticks the LED is lit
        if self.active_low {
            self.pwm.set_duty_off(CHANNELS[channel], duty);
        } else {
            self.pwm.set_duty_on(CHANNELS[channel], duty);
        }
    }

    pub fn duty(&self, channel: usize) -> u16 {
        if self.active_low {
            self.pwm.duty_off(CHANNELS[channel])
        } else {
            self.pwm.duty_on(CHANNELS[channel])
        }
    }

    pub fn top(&self) -> u16 {
        self.pwm.max_duty()
    }
}

impl<T> DutyOutput for PwmLeds<T>
where
    T: Instance,
{
    fn set_duty(&mut self, channel: usize, duty: u16) {
        Self::set_duty(self, channel, duty);
    }
}
