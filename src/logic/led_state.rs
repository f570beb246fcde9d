use core::sync::atomic::{AtomicU8, Ordering};

pub const LED_COUNT: usize = 3;
pub const LED_MASK: u8 = 0b111;

#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum Direction {
    Rising,
    Falling,
}

impl Direction {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Direction::Rising
        } else {
            Direction::Falling
        }
    }
}

/// Desired on/off state of the three LEDs, one bit per LED.
///
/// The whole mask lives in a single atomic byte, so a reader always gets the
/// three directions from the same `set_state` call.
pub struct LedTargets {
    mask: AtomicU8,
}

impl LedTargets {
    pub const fn new() -> Self {
        LedTargets {
            mask: AtomicU8::new(0),
        }
    }

    pub fn set_state(&self, mask: u8) {
        self.mask.store(mask & LED_MASK, Ordering::Release);
    }

    /// Reports the target state, not the duty cycles. An LED that is still
    /// fading out already reads as off.
    pub fn get_state(&self) -> u8 {
        self.mask.load(Ordering::Acquire)
    }

    pub fn directions(&self) -> [Direction; LED_COUNT] {
        let mask = self.get_state();
        let mut directions = [Direction::Falling; LED_COUNT];
        for (led, direction) in directions.iter_mut().enumerate() {
            *direction = Direction::from_bit(mask & (1 << led) > 0);
        }
        directions
    }
}

impl Default for LedTargets {
    fn default() -> Self {
        Self::new()
    }
}
