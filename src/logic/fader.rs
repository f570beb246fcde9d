use super::led_state::{Direction, LED_COUNT};

/// Anything that accepts a new compare value for one PWM channel.
pub trait DutyOutput {
    fn set_duty(&mut self, channel: usize, duty: u16);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub struct ChannelConfig {
    pub max_duty: u16,
    /// Step once every `slowdown` ticks. 1 steps on every tick.
    pub slowdown: u16,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub struct FaderConfig {
    pub channels: [ChannelConfig; LED_COUNT],
}

#[derive(Clone, Copy)]
struct ChannelState {
    duty: u16,
    slowdown_counter: u16,
}

/// Moves each LED's duty cycle one step per tick towards fully on or fully
/// off.
pub struct Fader {
    config: FaderConfig,
    channels: [ChannelState; LED_COUNT],
}

impl Fader {
    pub fn new(config: FaderConfig) -> Self {
        Fader {
            config,
            channels: [ChannelState {
                duty: 0,
                slowdown_counter: 1,
            }; LED_COUNT],
        }
    }

    pub fn duty(&self, channel: usize) -> u16 {
        self.channels[channel].duty
    }

    pub fn max_duty(&self, channel: usize) -> u16 {
        self.config.channels[channel].max_duty
    }

    pub fn tick(&mut self, directions: [Direction; LED_COUNT], out: &mut impl DutyOutput) {
        for (channel, (state, config)) in self
            .channels
            .iter_mut()
            .zip(self.config.channels.iter())
            .enumerate()
        {
            let slowdown = config.slowdown.max(1);
            // Counter runs 1..=slowdown and advances on every tick, stepped
            // or not. Starting at 1, the first step lands on tick
            // `slowdown - 1` (tick 1 when undivided), then every `slowdown`
            // ticks after that.
            state.slowdown_counter = state.slowdown_counter % slowdown + 1;
            if state.slowdown_counter != slowdown {
                continue;
            }

            match directions[channel] {
                Direction::Rising if state.duty < config.max_duty => {
                    state.duty += 1;
                    out.set_duty(channel, state.duty);
                }
                Direction::Falling if state.duty > 0 => {
                    state.duty -= 1;
                    out.set_duty(channel, state.duty);
                }
                _ => {}
            }
        }
    }
}
