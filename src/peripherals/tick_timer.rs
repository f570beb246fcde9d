use embedded_hal::timer::CountDown;
use hal::{
    timer::{Instance, Periodic},
    Timer,
};
use nrf52840_hal as hal;

/// A periodic HAL timer used as a plain tick source.
///
/// The timer runs at 1 MHz and `EVENTS_COMPARE[0]` fires once per period.
/// The event stays set until [`TickTimer::clear_overflow`], so callers see
/// each overflow exactly once.
pub struct TickTimer<T: Instance> {
    timer: Timer<T, Periodic>,
    period_us: u32,
}

impl<T> TickTimer<T>
where
    T: Instance,
{
    /// Leaves the timer stopped.
    pub fn configure(instance: T, period_us: u32) -> Self {
        debug_assert!(period_us > 0);
        let mut timer = Timer::periodic(instance);
        timer.disable_interrupt();
        TickTimer { timer, period_us }
    }

    /// Starts counting with the compare interrupt enabled. The NVIC line
    /// still has to be unmasked by the caller.
    pub fn start_interrupt_driven(&mut self) {
        self.timer.enable_interrupt();
        self.timer.start(self.period_us);
    }

    pub fn start_polled(&mut self) {
        self.timer.disable_interrupt();
        self.timer.start(self.period_us);
    }

    pub fn overflowed(&self) -> bool {
        self.timer.event_compare_cc0().read().bits() != 0
    }

    pub fn clear_overflow(&mut self) {
        self.timer.reset_event();
        // Read back so the write has landed before an ISR returns, otherwise
        // the interrupt fires again for the same event.
        let _ = self.timer.event_compare_cc0().read().bits();
    }

    /// Busy-polls the overflow event and calls `on_tick` once per event.
    /// Each event is handled before it is cleared.
    pub fn run(mut self, mut on_tick: impl FnMut()) -> ! {
        self.start_polled();
        loop {
            if self.overflowed() {
                on_tick();
                self.clear_overflow();
            }
        }
    }
}
