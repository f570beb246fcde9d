//! Everything tied to one board revision: pin routing, timer setup and the
//! per-colour brightness compensation.

use hal::{
    gpio::{p0, p1, Floating, Input, Level, Output, Pin, PushPull},
    pwm::Prescaler,
    twim::Frequency,
};
use nrf52840_hal as hal;

use crate::logic::{ChannelConfig, FaderConfig, LED_COUNT};

#[derive(Clone, Copy)]
pub struct LedChannel {
    pub name: &'static str,
    /// Fed the same current, red and blue look brighter than green. Their
    /// duty range is cut by this factor and they fade this many times
    /// slower, so all three take equally long to fade.
    pub power_div: u16,
}

pub struct BoardConfig {
    /// PWM runs at 16 MHz divided by this.
    pub pwm_prescaler: Prescaler,
    /// PWM period in PWM clock ticks, the full duty range.
    pub pwm_top: u16,
    pub leds_active_low: bool,
    /// Indexed by PWM channel.
    pub leds: [LedChannel; LED_COUNT],
    /// Fade tick period on the 1 MHz HAL timer. Independent of the PWM
    /// clock above.
    pub fade_tick_us: u32,
    pub i2c_frequency: Frequency,
    pub accelerometer_poll_ms: u32,
    pub heartbeat_ms: u32,
}

// 1 kHz PWM, 1 ms fade ticks: every colour takes about a second to fade.
pub const BOARD: BoardConfig = BoardConfig {
    pwm_prescaler: Prescaler::Div16,
    pwm_top: 1000,
    leds_active_low: true,
    leds: [
        LedChannel {
            name: "red",
            power_div: 3,
        },
        LedChannel {
            name: "green",
            power_div: 1,
        },
        LedChannel {
            name: "blue",
            power_div: 2,
        },
    ],
    fade_tick_us: 1000,
    i2c_frequency: Frequency::K400,
    accelerometer_poll_ms: 2000,
    heartbeat_ms: 10_000,
};

impl BoardConfig {
    pub fn max_duty(&self, channel: usize) -> u16 {
        self.pwm_top / self.leds[channel].power_div.max(1)
    }

    pub fn fader_config(&self) -> FaderConfig {
        let mut channels = [ChannelConfig {
            max_duty: 0,
            slowdown: 1,
        }; LED_COUNT];
        for (channel, config) in channels.iter_mut().enumerate() {
            *config = ChannelConfig {
                max_duty: self.max_duty(channel),
                slowdown: self.leds[channel].power_div.max(1),
            };
        }
        FaderConfig { channels }
    }
}

/// RGB LED outputs, in PWM channel order.
pub struct LedPins {
    pub red: Pin<Output<PushPull>>,
    pub green: Pin<Output<PushPull>>,
    pub blue: Pin<Output<PushPull>>,
}

impl LedPins {
    /// Common anode RGB LED on P0.03, P0.04 and P0.28, all starting dark.
    pub fn new(pins: p0::Parts, config: &BoardConfig) -> Self {
        let off = if config.leds_active_low {
            Level::High
        } else {
            Level::Low
        };
        LedPins {
            red: pins.p0_03.into_push_pull_output(off).degrade(),
            green: pins.p0_04.into_push_pull_output(off).degrade(),
            blue: pins.p0_28.into_push_pull_output(off).degrade(),
        }
    }
}

pub struct I2cPins {
    pub scl: Pin<Input<Floating>>,
    pub sda: Pin<Input<Floating>>,
}

impl I2cPins {
    /// Accelerometer bus on P1.04 (SCL) and P1.05 (SDA).
    pub fn new(pins: p1::Parts) -> Self {
        I2cPins {
            scl: pins.p1_04.into_floating_input().degrade(),
            sda: pins.p1_05.into_floating_input().degrade(),
        }
    }
}
