use embedded_hal::blocking::i2c;

use super::i2c_handler::{BusPower, Error, I2cHandler, TransferFlags, TransferSeq};

// 0x3a / 0x3b on the wire
pub const DEFAULT_ADDRESS: u8 = 0x1d;

pub const REG_STATUS: u8 = 0x00;
pub const REG_SYSMOD: u8 = 0x0b;
pub const REG_WHO_AM_I: u8 = 0x0d;

pub const DEVICE_ID: u8 = 0x5a;

/// Registers read on every poll, in bus order.
pub const POLLED_REGISTERS: [u8; 3] = [REG_WHO_AM_I, REG_SYSMOD, REG_STATUS];

#[derive(Clone, Copy, PartialEq, Eq, Debug, defmt::Format)]
pub struct RegisterReading {
    pub register: u8,
    pub value: u8,
}

/// MMA8653FC accelerometer. The sensor is always powered on the lab kit, so
/// there is no power-up sequence.
pub struct MMA8653<B> {
    i2c: I2cHandler<B>,
    address: u8,
}

impl<B> MMA8653<B>
where
    B: i2c::Write + BusPower,
    B: i2c::Read<Error = <B as i2c::Write>::Error>,
    B: i2c::WriteRead<Error = <B as i2c::Write>::Error>,
{
    pub fn new(i2c: I2cHandler<B>) -> Self {
        MMA8653 {
            i2c,
            address: DEFAULT_ADDRESS,
        }
    }

    /// The bus has to be enabled.
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error<<B as i2c::Write>::Error>> {
        let tx = [register];
        let mut rx = [0; 1];
        let mut seq = TransferSeq {
            address: self.address,
            flags: TransferFlags::WriteRead,
            tx: &tx,
            rx: &mut rx,
        };
        self.i2c.transaction(&mut seq)?;
        Ok(rx[0])
    }

    /// Switches the bus on, reads [`POLLED_REGISTERS`] and switches it off
    /// again, also when a read fails.
    pub fn poll(&mut self) -> Result<[RegisterReading; 3], Error<<B as i2c::Write>::Error>> {
        self.i2c.enable();
        let readings = self.read_polled_registers();
        self.i2c.disable();
        readings
    }

    pub fn is_present(&mut self) -> Result<bool, Error<<B as i2c::Write>::Error>> {
        self.i2c.enable();
        let id = self.read_register(REG_WHO_AM_I);
        self.i2c.disable();
        Ok(id? == DEVICE_ID)
    }

    pub fn reset_bus(&mut self) {
        self.i2c.reset();
    }

    pub fn free(self) -> I2cHandler<B> {
        self.i2c
    }

    fn read_polled_registers(
        &mut self,
    ) -> Result<[RegisterReading; 3], Error<<B as i2c::Write>::Error>> {
        let mut readings = [RegisterReading {
            register: 0,
            value: 0,
        }; 3];
        for (reading, register) in readings.iter_mut().zip(POLLED_REGISTERS) {
            *reading = RegisterReading {
                register,
                value: self.read_register(register)?,
            };
        }
        Ok(readings)
    }
}
