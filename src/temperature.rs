//! MAX6633 temperature sensor driver.

use embedded_hal::i2c::I2c;

use crate::error::{Error, Result};
use crate::interface::i2c::I2cTransport;

/// Size of one temperature reading on the wire.
const READING_BYTES: usize = 2;

/// Reserved low bits of the 16-bit reading, discarded before scaling.
const RESERVED_LOW_BITS: u32 = 3;

/// Sign bit of the 13-bit two's-complement reading.
///
/// The masks below are specific to this sensor's 13-bit data format; a
/// different sensor model needs different values, so they are named
/// rather than inlined into the decode.
const SIGN_BIT: u16 = 0x1000;

/// High-order bits filled in when sign-extending to 16 bits.
const SIGN_EXTENSION: u16 = 0xF000;

/// Temperature per count after the reserved bits are discarded.
const CELSIUS_PER_LSB: f32 = 0.0625;

/// Time the sensor needs between two conversions (milliseconds).
///
/// Callers issuing back-to-back reads should sleep this long between
/// them; the driver itself never sleeps or retries.
pub const CONVERSION_INTERVAL_MS: u32 = 500;

/// Driver for the MAX6633 12-bit-plus-sign I2C temperature sensor.
pub struct Max6633<I2C> {
    transport: I2cTransport<I2C>,
}

impl<I2C> Max6633<I2C> {
    /// Creates a new driver for the sensor at `address`.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self {
            transport: I2cTransport::new(i2c, address),
        }
    }

    /// The 7-bit device address this driver talks to.
    pub const fn address(&self) -> u8 {
        self.transport.address()
    }

    /// Consumes the driver and returns the owned I2C device.
    pub fn release(self) -> I2C {
        self.transport.release()
    }
}

impl<I2C> Max6633<I2C>
where
    I2C: I2c,
{
    /// Checks that the sensor answers at its address.
    ///
    /// Performs one temperature read and discards the value. A failure
    /// here means the sensor could not be reached at all and is
    /// reported as [`Error::BusUnavailable`], letting callers abort
    /// before any measurement logic runs.
    pub fn probe(&mut self) -> Result<(), I2C::Error> {
        let mut raw = [0u8; READING_BYTES];
        match self.transport.read(&mut raw) {
            Ok(()) => {
                debug!("max6633: sensor present at {:#x}", self.address());
                Ok(())
            }
            Err(_) => Err(Error::BusUnavailable),
        }
    }

    /// Reads the current temperature in degrees Celsius.
    ///
    /// The two bytes are combined big-endian, shifted right to discard
    /// the reserved low bits, and interpreted as a 13-bit
    /// two's-complement value at 0.0625 °C per count.
    pub fn read_temperature_c(&mut self) -> Result<f32, I2C::Error> {
        let mut raw = [0u8; READING_BYTES];
        self.transport.read(&mut raw)?;
        Ok(decode_celsius(raw))
    }
}

/// Decodes one 2-byte reading into degrees Celsius.
fn decode_celsius(raw: [u8; READING_BYTES]) -> f32 {
    let mut counts = u16::from_be_bytes(raw) >> RESERVED_LOW_BITS;
    if counts & SIGN_BIT != 0 {
        counts |= SIGN_EXTENSION;
    }
    f32::from(counts as i16) * CELSIUS_PER_LSB
}

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec;

    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;
    use crate::I2C_ADDRESS_RIGHT;

    #[test]
    fn decodes_a_positive_reading() {
        // 0x1908 >> 3 = 0x0321 = 801 counts; sign bit clear.
        assert_eq!(decode_celsius([0x19, 0x08]), 50.0625);
    }

    #[test]
    fn decodes_zero() {
        assert_eq!(decode_celsius([0x00, 0x00]), 0.0);
    }

    #[test]
    fn sign_extends_negative_readings() {
        // 0xFF38 >> 3 = 0x1FE7; sign bit set, extends to -25 counts.
        assert_eq!(decode_celsius([0xFF, 0x38]), -1.5625);
        assert!(decode_celsius([0x80, 0x00]) < 0.0);
    }

    #[test]
    fn read_temperature_issues_one_two_byte_read() {
        let expectations = [I2cTransaction::read(
            I2C_ADDRESS_RIGHT,
            vec![0x19, 0x08],
        )];
        let mut sensor = Max6633::new(I2cMock::new(&expectations), I2C_ADDRESS_RIGHT);

        assert_eq!(sensor.read_temperature_c().unwrap(), 50.0625);

        sensor.release().done();
    }

    #[test]
    fn probe_failure_reports_the_sensor_unavailable() {
        let expectations = [I2cTransaction::read(I2C_ADDRESS_RIGHT, vec![0x00, 0x00])
            .with_error(embedded_hal::i2c::ErrorKind::Other)];
        let mut sensor = Max6633::new(I2cMock::new(&expectations), I2C_ADDRESS_RIGHT);

        assert_eq!(sensor.probe(), Err(Error::BusUnavailable));

        // No measurement traffic may follow a failed probe; `done`
        // verifies nothing beyond the failed transaction ran.
        sensor.release().done();
    }
}
