//! I2C transport built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::I2c;

use crate::error::{Error, Result};

/// I2C transport owning the bus device for one 7-bit device address.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cTransport<I2C> {
    /// Creates a new transport for the device at `address`.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit device address this transport talks to.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped I2C device.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the transport and returns the owned I2C device.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> I2cTransport<I2C>
where
    I2C: I2c,
{
    /// Reads exactly `buf.len()` bytes from the device.
    ///
    /// The `embedded-hal` contract fills the whole buffer or reports an
    /// error, so a short read can never be mistaken for a complete one;
    /// failures surface as [`Error::Transfer`].
    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.read(self.address, buf).map_err(Error::Transfer)
    }

    /// Writes all of `bytes` to the device.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, bytes).map_err(Error::Transfer)
    }

    /// Writes `cmd` and reads the response in one bus transaction.
    pub fn write_read(&mut self, cmd: &[u8], buf: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c
            .write_read(self.address, cmd, buf)
            .map_err(Error::Transfer)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::I2cTransport;

    #[test]
    fn read_targets_the_configured_address() {
        let expectations = [I2cTransaction::read(0x40, vec![0x19, 0x08])];
        let mut transport = I2cTransport::new(I2cMock::new(&expectations), 0x40);

        let mut buf = [0u8; 2];
        transport.read(&mut buf).unwrap();
        assert_eq!(buf, [0x19, 0x08]);

        transport.release().done();
    }

    #[test]
    fn write_read_is_a_single_transaction() {
        let expectations = [I2cTransaction::write_read(
            0x4F,
            vec![0x01],
            vec![0x60, 0x00],
        )];
        let mut transport = I2cTransport::new(I2cMock::new(&expectations), 0x4F);

        let mut buf = [0u8; 2];
        transport.write_read(&[0x01], &mut buf).unwrap();
        assert_eq!(buf, [0x60, 0x00]);

        transport.release().done();
    }
}
