pub mod i2c_handler;
pub mod mma8653;
pub mod pwm_leds;
pub mod tick_timer;

pub use i2c_handler::{I2cHandler, TransferFlags, TransferSeq};
pub use mma8653::MMA8653;
pub use pwm_leds::PwmLeds;
pub use tick_timer::TickTimer;
