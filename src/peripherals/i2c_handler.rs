use embedded_hal::blocking::i2c;
use hal::twim::{self, Frequency, Twim};
use nrf52840_hal as hal;

use crate::board::I2cPins;

/// Switching the bus peripheral on and off between transactions.
pub trait BusPower {
    fn power_up(&mut self);
    fn power_down(&mut self);
}

impl<T> BusPower for Twim<T>
where
    T: twim::Instance,
{
    fn power_up(&mut self) {
        self.enable();
    }

    fn power_down(&mut self) {
        self.disable();
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub enum TransferFlags {
    Write,
    Read,
    /// Write `tx`, then read into `rx` after a repeated start.
    WriteRead,
}

/// One bus transaction. `rx` holds the response once the transaction
/// returns successfully.
pub struct TransferSeq<'a> {
    /// 7-bit device address
    pub address: u8,
    pub flags: TransferFlags,
    pub tx: &'a [u8],
    pub rx: &'a mut [u8],
}

#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    Bus(E),
    /// A transaction was attempted while the bus was switched off.
    Disabled,
}

pub struct I2cHandler<B> {
    bus: B,
    enabled: bool,
}

impl<T> I2cHandler<Twim<T>>
where
    T: twim::Instance,
{
    /// Sets up the TWIM on the board's I2C pins and leaves it switched off.
    pub fn init(instance: T, pins: I2cPins, frequency: Frequency) -> Self {
        let twim_pins = twim::Pins {
            scl: pins.scl,
            sda: pins.sda,
        };
        I2cHandler::new(Twim::new(instance, twim_pins, frequency))
    }
}

impl<B> I2cHandler<B>
where
    B: i2c::Write + BusPower,
    B: i2c::Read<Error = <B as i2c::Write>::Error>,
    B: i2c::WriteRead<Error = <B as i2c::Write>::Error>,
{
    pub fn new(mut bus: B) -> Self {
        bus.power_down();
        I2cHandler {
            bus,
            enabled: false,
        }
    }

    pub fn enable(&mut self) {
        self.bus.power_up();
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.bus.power_down();
        self.enabled = false;
    }

    /// Power-cycles the peripheral, then restores its enabled state.
    /// A bus left switched off by a failed transaction is still cycled.
    pub fn reset(&mut self) {
        self.bus.power_down();
        self.bus.power_up();
        if !self.enabled {
            self.bus.power_down();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn free(self) -> B {
        self.bus
    }

    /// Blocks until the bus transaction has completed or failed.
    ///
    /// NOTE: the TWIM transfers through EasyDMA, so `tx` and `rx` must live in
    /// RAM. A `static` or const-promoted buffer ends up in flash and the
    /// transfer fails.
    pub fn transaction(
        &mut self,
        seq: &mut TransferSeq<'_>,
    ) -> Result<(), Error<<B as i2c::Write>::Error>> {
        if !self.enabled {
            return Err(Error::Disabled);
        }
        match seq.flags {
            TransferFlags::Write => self.bus.write(seq.address, seq.tx),
            TransferFlags::Read => self.bus.read(seq.address, seq.rx),
            TransferFlags::WriteRead => self.bus.write_read(seq.address, seq.tx, seq.rx),
        }
        .map_err(Error::Bus)
    }
}

#[cfg(test)]
pub mod tests {
    use embedded_hal::blocking::i2c;

    use super::{BusPower, Error, I2cHandler, TransferFlags, TransferSeq};

    #[derive(Debug, PartialEq, Eq)]
    pub struct Nack;

    /// Register-file backed device on a fake bus. A one-byte write selects
    /// the register, reads return consecutive registers from there.
    pub struct MockBus {
        pub address: u8,
        pub registers: [u8; 16],
        pub pointer: usize,
        pub powered: bool,
        pub power_ups: u32,
        pub fail: bool,
    }

    impl MockBus {
        pub fn new(address: u8) -> Self {
            MockBus {
                address,
                registers: [0; 16],
                pointer: 0,
                powered: true,
                power_ups: 0,
                fail: false,
            }
        }

        fn check(&self, address: u8) -> Result<(), Nack> {
            assert!(self.powered);
            if self.fail || address != self.address {
                return Err(Nack);
            }
            Ok(())
        }
    }

    impl BusPower for MockBus {
        fn power_up(&mut self) {
            self.powered = true;
            self.power_ups += 1;
        }

        fn power_down(&mut self) {
            self.powered = false;
        }
    }

    impl i2c::Write for MockBus {
        type Error = Nack;

        fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Nack> {
            self.check(address)?;
            if let Some((register, values)) = bytes.split_first() {
                self.pointer = *register as usize;
                for (offset, value) in values.iter().enumerate() {
                    self.registers[self.pointer + offset] = *value;
                }
            }
            Ok(())
        }
    }

    impl i2c::Read for MockBus {
        type Error = Nack;

        fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Nack> {
            self.check(address)?;
            for (offset, byte) in buffer.iter_mut().enumerate() {
                *byte = self.registers[self.pointer + offset];
            }
            Ok(())
        }
    }

    impl i2c::WriteRead for MockBus {
        type Error = Nack;

        fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Nack> {
            i2c::Write::write(self, address, bytes)?;
            i2c::Read::read(self, address, buffer)
        }
    }

    pub fn starts_disabled() {
        let mut handler = I2cHandler::new(MockBus::new(0x1d));
        assert!(!handler.is_enabled());

        let tx = [0x0d];
        let mut rx = [0; 1];
        let mut seq = TransferSeq {
            address: 0x1d,
            flags: TransferFlags::WriteRead,
            tx: &tx,
            rx: &mut rx,
        };
        assert_eq!(handler.transaction(&mut seq), Err(Error::Disabled));
    }

    pub fn write_read_fills_rx() {
        let mut bus = MockBus::new(0x1d);
        bus.registers[0x0d] = 0x5a;
        let mut handler = I2cHandler::new(bus);
        handler.enable();

        let tx = [0x0d];
        let mut rx = [0; 1];
        let mut seq = TransferSeq {
            address: 0x1d,
            flags: TransferFlags::WriteRead,
            tx: &tx,
            rx: &mut rx,
        };
        assert_eq!(handler.transaction(&mut seq), Ok(()));
        assert_eq!(rx[0], 0x5a);
    }

    pub fn nack_is_reported() {
        let mut handler = I2cHandler::new(MockBus::new(0x1d));
        handler.enable();

        let tx = [0x00, 0x01];
        let mut rx = [0; 0];
        let mut seq = TransferSeq {
            address: 0x1c,
            flags: TransferFlags::Write,
            tx: &tx,
            rx: &mut rx,
        };
        assert_eq!(handler.transaction(&mut seq), Err(Error::Bus(Nack)));
    }

    pub fn reset_keeps_enabled_state() {
        let mut handler = I2cHandler::new(MockBus::new(0x1d));
        handler.enable();
        handler.reset();
        assert!(handler.is_enabled());
        assert!(handler.bus.powered);
        assert_eq!(handler.bus.power_ups, 2);

        handler.disable();
        handler.reset();
        assert!(!handler.is_enabled());
        assert!(!handler.bus.powered);
        assert_eq!(handler.bus.power_ups, 3);
    }
}
