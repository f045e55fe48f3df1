//! SPI transport built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::SpiDevice;

use crate::error::{Error, Result};

/// SPI transport owning the bus device for one chip select.
pub struct SpiTransport<SPI> {
    spi: SPI,
}

impl<SPI> SpiTransport<SPI> {
    /// Creates a new transport from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the transport and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> SpiTransport<SPI>
where
    SPI: SpiDevice,
{
    /// Performs one full-duplex exchange: every byte of `tx` is clocked
    /// out while the same number of response bytes fills `rx`.
    ///
    /// Mismatched buffer lengths are a framing bug and fail with
    /// [`Error::ProtocolViolation`] before any bus traffic, so a frame
    /// is either exchanged whole or not at all. Bus failures surface as
    /// [`Error::Transfer`].
    pub fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), SPI::Error> {
        if tx.len() != rx.len() {
            return Err(Error::ProtocolViolation);
        }

        self.spi.transfer(rx, tx).map_err(Error::Transfer)
    }
}
