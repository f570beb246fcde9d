pub mod fader;
pub mod led_state;

pub use fader::{ChannelConfig, DutyOutput, Fader, FaderConfig};
pub use led_state::{Direction, LedTargets, LED_COUNT, LED_MASK};
