//! Board-level configuration for driver construction.
//!
//! Bus numbers, pin assignments, and device addresses used to live as
//! compiled-in constants in the application entry point; they are
//! gathered here so the application layer opens its platform devices
//! from one validated structure instead.

use crate::I2C_ADDRESS_RIGHT;

// 7-bit I2C addresses outside the reserved ranges.
const I2C_ADDRESS_MIN: u8 = 0x08;
const I2C_ADDRESS_MAX: u8 = 0x77;
// Highest BCM GPIO number on the target SoC.
const GPIO_PIN_MAX: u8 = 53;
// SPI clock limits accepted by the underlying GPIO library.
const SPI_BAUD_MIN: u32 = 32_000;
const SPI_BAUD_MAX: u32 = 125_000_000;

/// Bus and pin assignments for one ADC/temperature-sensor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// I2C bus number the temperature sensor hangs off.
    pub i2c_bus: u8,
    /// 7-bit I2C address of the temperature sensor.
    pub sensor_address: u8,
    /// BCM pin wired to the ADC's active-low reset input.
    pub adc_reset_pin: u8,
    /// BCM pin enabling the digital isolator that feeds the ADC module.
    pub module_enable_pin: u8,
    /// SPI chip-select channel the ADC is wired to.
    pub spi_channel: u8,
    /// SPI clock rate in hertz.
    pub spi_baud_rate: u32,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration can be opened on the target
    /// board.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.sensor_address < I2C_ADDRESS_MIN || self.sensor_address > I2C_ADDRESS_MAX {
            return Err(ConfigError::InvalidSensorAddress);
        }
        if self.spi_channel > 1 {
            return Err(ConfigError::InvalidSpiChannel);
        }
        if self.spi_baud_rate < SPI_BAUD_MIN || self.spi_baud_rate > SPI_BAUD_MAX {
            return Err(ConfigError::InvalidSpiBaudRate);
        }
        if self.adc_reset_pin > GPIO_PIN_MAX
            || self.module_enable_pin > GPIO_PIN_MAX
            || self.adc_reset_pin == self.module_enable_pin
        {
            return Err(ConfigError::InvalidPinAssignment);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            i2c_bus: 1,
            sensor_address: I2C_ADDRESS_RIGHT,
            adc_reset_pin: 4,
            module_enable_pin: 17,
            spi_channel: 0,
            spi_baud_rate: 500_000,
        }
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the I2C bus number.
    pub fn i2c_bus(mut self, bus: u8) -> Self {
        self.config.i2c_bus = bus;
        self
    }

    /// Overrides the temperature sensor address.
    pub fn sensor_address(mut self, address: u8) -> Self {
        self.config.sensor_address = address;
        self
    }

    /// Overrides the ADC reset pin.
    pub fn adc_reset_pin(mut self, pin: u8) -> Self {
        self.config.adc_reset_pin = pin;
        self
    }

    /// Overrides the module-enable pin.
    pub fn module_enable_pin(mut self, pin: u8) -> Self {
        self.config.module_enable_pin = pin;
        self
    }

    /// Overrides the SPI chip-select channel.
    pub fn spi_channel(mut self, channel: u8) -> Self {
        self.config.spi_channel = channel;
        self
    }

    /// Overrides the SPI clock rate.
    pub fn spi_baud_rate(mut self, baud_rate: u32) -> Self {
        self.config.spi_baud_rate = baud_rate;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The sensor address falls in a reserved I2C address range.
    InvalidSensorAddress,
    /// The SPI channel does not exist on the target board.
    InvalidSpiChannel,
    /// The SPI clock rate is outside the supported window.
    InvalidSpiBaudRate,
    /// A pin number is out of range or doubly assigned.
    InvalidPinAssignment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_reference_board() {
        let config = Config::default();
        assert_eq!(config.i2c_bus, 1);
        assert_eq!(config.sensor_address, I2C_ADDRESS_RIGHT);
        assert_eq!(config.spi_channel, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides_compose() {
        let config = Config::new()
            .sensor_address(crate::I2C_ADDRESS_LEFT)
            .spi_baud_rate(1_000_000)
            .build();

        assert_eq!(config.sensor_address, 0x4F);
        assert_eq!(config.spi_baud_rate, 1_000_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_reserved_addresses_and_bad_pins() {
        let reserved = Config::new().sensor_address(0x03).build();
        assert_eq!(
            reserved.validate(),
            Err(ConfigError::InvalidSensorAddress)
        );

        let clash = Config::new().adc_reset_pin(17).build();
        assert_eq!(clash.validate(), Err(ConfigError::InvalidPinAssignment));

        let channel = Config::new().spi_channel(2).build();
        assert_eq!(channel.validate(), Err(ConfigError::InvalidSpiChannel));

        let baud = Config::new().spi_baud_rate(1_000).build();
        assert_eq!(baud.validate(), Err(ConfigError::InvalidSpiBaudRate));
    }
}
