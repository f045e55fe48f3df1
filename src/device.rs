//! High-level ADS8699 device driver implementation.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::error::{Error, MapError, Result};
use crate::interface::spi::SpiTransport;
use crate::params::{InputRange, OutputData};
use crate::registers::{
    Ads8699Map,
    Ads8699Register,
    AlarmFlags,
    DataOutControl,
    RangeSelect,
    ResetPowerControl,
    CONVERSION_BITS,
    CONVERSION_FRAME_BYTES,
    FRAME_BYTES,
    OP_NOP,
    OP_READ,
    OP_WRITE,
    POWER_WRITE_KEY,
    REG_ALARM,
    REG_ALARM_H_TH,
    REG_ALARM_L_TH,
    REG_DATAOUT_CTL,
    REG_DEVICE_ID,
    REG_RANGE_SEL,
    REG_RST_PWRCTL,
    RESERVED_RESPONSE_BYTES,
    register_map,
};

// Settle time after the digital isolator feeding the module is enabled
// (milliseconds).
const MODULE_ENABLE_SETTLE_MS: u32 = 100;
// Width of the active-low reset pulse (milliseconds).
const RESET_PULSE_MS: u32 = 10;
// Power-up to first-command delay (milliseconds).
const POWER_UP_DELAY_MS: u32 = 5;

/// High-level synchronous driver for the ADS8699 SAR ADC.
///
/// Binds the device's nine-register map to an owned SPI transport and
/// translates logical register accesses into wire frames. Every method
/// blocks until the bus exchange completes or fails; the driver never
/// retries on its own.
pub struct Ads8699<SPI> {
    transport: SpiTransport<SPI>,
    map: Ads8699Map,
}

/// Builds one register-access frame: command byte (opcode plus address
/// bit 8), address byte, then the payload MSB first.
fn command_frame(opcode: u8, address: u32, value: u32) -> [u8; FRAME_BYTES] {
    let mut frame = [0u8; FRAME_BYTES];
    frame[0] = opcode | ((address >> 8) as u8 & 0x01);
    frame[1] = (address & 0xFF) as u8;
    frame[2..].copy_from_slice(&value.to_be_bytes());
    frame
}

/// Decodes a register-read response frame.
///
/// The leading reserved bytes must read back as zero and the value must
/// fit the register width; either mismatch signals that the host and
/// device disagree about framing and is reported as
/// [`Error::ProtocolViolation`], never coerced into a value.
fn decode_read_response<E>(rx: &[u8; FRAME_BYTES]) -> Result<u32, E> {
    if rx[..RESERVED_RESPONSE_BYTES].iter().any(|&byte| byte != 0) {
        warn!("ads8699: non-zero reserved bytes in read response");
        return Err(Error::ProtocolViolation);
    }

    let value = u32::from_be_bytes([rx[2], rx[3], rx[4], rx[5]]);
    if value > Ads8699Register::DATA_MASK {
        return Err(Error::ProtocolViolation);
    }

    Ok(value)
}

impl<SPI> Ads8699<SPI> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided SPI device.
    ///
    /// Populates the register map from the documented register table; a
    /// duplicate or out-of-width table entry is a configuration error
    /// and fails construction.
    pub fn new(spi: SPI) -> core::result::Result<Self, MapError> {
        Ok(Self {
            transport: SpiTransport::new(spi),
            map: register_map()?,
        })
    }

    /// Consumes the driver and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.transport.release()
    }

    /// Provides mutable access to the underlying transport.
    pub fn transport_mut(&mut self) -> &mut SpiTransport<SPI> {
        &mut self.transport
    }

    // ==================================================================
    // == Register-Map Diagnostics ======================================
    // ==================================================================
    /// Looks up the cached state of one register.
    pub fn register(&self, address: u32) -> core::result::Result<&Ads8699Register, MapError> {
        self.map.lookup(address)
    }

    /// Registers in datasheet enumeration order.
    pub fn registers(&self) -> impl Iterator<Item = &Ads8699Register> {
        self.map.iter()
    }

    /// Writes the diagnostic record of every register to the sink.
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        self.map.dump(out)
    }
}

impl<SPI> Ads8699<SPI>
where
    SPI: SpiDevice,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Establishes first contact with the device.
    ///
    /// Waits out the power-up delay, then reads `DEVICE_ID` and returns
    /// the raw identification word. A bus failure here means the device
    /// could not be reached at all and is reported as
    /// [`Error::BusUnavailable`]; a malformed response is a
    /// [`Error::ProtocolViolation`] as usual.
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<u32, SPI::Error> {
        delay.delay_ms(POWER_UP_DELAY_MS);

        let tx = command_frame(OP_READ, REG_DEVICE_ID, 0);
        let mut rx = [0u8; FRAME_BYTES];
        match self.transport.transfer(&tx, &mut rx) {
            Ok(()) => {}
            Err(Error::Transfer(_)) => return Err(Error::BusUnavailable),
            Err(err) => return Err(err),
        }

        let id = decode_read_response(&rx)?;
        self.map.lookup_mut(REG_DEVICE_ID)?.update(id)?;
        debug!("ads8699: device id word {:#x}", id);
        Ok(id)
    }

    // ==================================================================
    // == Register Access ===============================================
    // ==================================================================
    /// Reads one register over the bus and refreshes its cached value.
    pub fn read_register(&mut self, address: u32) -> Result<u32, SPI::Error> {
        self.map.lookup(address)?;

        let tx = command_frame(OP_READ, address, 0);
        let mut rx = [0u8; FRAME_BYTES];
        self.transport.transfer(&tx, &mut rx)?;

        let value = decode_read_response(&rx)?;
        self.map.lookup_mut(address)?.update(value)?;
        Ok(value)
    }

    /// Writes one register over the bus and, on success, caches the
    /// written value.
    ///
    /// Fails with [`Error::NotWritable`] for registers outside the
    /// writable set and [`Error::OutOfRange`] for values wider than the
    /// register, in both cases before any bus traffic.
    pub fn write_register(&mut self, address: u32, value: u32) -> Result<(), SPI::Error> {
        let register = self.map.lookup(address)?;
        if !register.is_writable() {
            return Err(Error::NotWritable(address));
        }
        if value > Ads8699Register::DATA_MASK {
            return Err(Error::OutOfRange);
        }

        let tx = command_frame(OP_WRITE, address, value);
        let mut rx = [0u8; FRAME_BYTES];
        self.transport.transfer(&tx, &mut rx)?;

        self.map.lookup_mut(address)?.update(value)?;
        Ok(())
    }

    // ==================================================================
    // == Conversion Data ===============================================
    // ==================================================================
    /// Clocks out the pending conversion result with a NOP frame and
    /// returns the raw conversion code.
    pub fn read_conversion(&mut self) -> Result<u32, SPI::Error> {
        let tx = [OP_NOP; CONVERSION_FRAME_BYTES];
        let mut rx = [0u8; CONVERSION_FRAME_BYTES];
        self.transport.transfer(&tx, &mut rx)?;

        let word = u32::from_be_bytes(rx);
        Ok(word >> (u32::BITS - CONVERSION_BITS))
    }

    /// Scales a raw conversion code to volts for the given input range.
    pub fn code_to_volts(code: u32, range: InputRange) -> f32 {
        let lsb = range.span_volts() / (1u32 << CONVERSION_BITS) as f32;
        range.min_volts() + code as f32 * lsb
    }

    // ==================================================================
    // == Device Configuration ==========================================
    // ==================================================================
    /// Selects the analog input range.
    pub fn set_range(&mut self, range: InputRange) -> Result<(), SPI::Error> {
        self.update_range_select(|ctl| ctl.set_range(range))
    }

    /// Enables or disables the internal voltage reference.
    pub fn set_internal_reference(&mut self, enabled: bool) -> Result<(), SPI::Error> {
        self.update_range_select(|ctl| ctl.set_internal_ref_disable(!enabled))
    }

    /// Selects what the device clocks out in conversion frames; test
    /// patterns replace the conversion result for host-side framing
    /// checks.
    pub fn set_output_data(&mut self, data: OutputData) -> Result<(), SPI::Error> {
        let current = self.read_register(REG_DATAOUT_CTL)?;
        let mut ctl = DataOutControl::from(current);
        ctl.set_data(data);

        let updated = u32::from(ctl);
        if updated != current {
            self.write_register(REG_DATAOUT_CTL, updated)?;
        }
        Ok(())
    }

    /// Programs the power-saving bits, supplying the mandatory write
    /// key in the same frame.
    pub fn set_power_mode(
        &mut self,
        power_down: bool,
        nap_enable: bool,
    ) -> Result<(), SPI::Error> {
        let value = ResetPowerControl::new()
            .with_power_down(power_down)
            .with_nap_enable(nap_enable)
            .with_write_key(POWER_WRITE_KEY);
        self.write_register(REG_RST_PWRCTL, u32::from(value))
    }

    /// Programs both alarm comparator thresholds.
    pub fn set_alarm_thresholds(&mut self, high: u16, low: u16) -> Result<(), SPI::Error> {
        self.write_register(REG_ALARM_H_TH, u32::from(high))?;
        self.write_register(REG_ALARM_L_TH, u32::from(low))
    }

    /// Reads the latched alarm flag outputs.
    pub fn read_alarm_flags(&mut self) -> Result<AlarmFlags, SPI::Error> {
        let value = self.read_register(REG_ALARM)?;
        Ok(AlarmFlags::from(value))
    }

    // ==================================================================
    // == Internal Configuration Helpers ================================
    // ==================================================================
    fn update_range_select<F>(&mut self, mut mutate: F) -> Result<(), SPI::Error>
    where
        F: FnMut(&mut RangeSelect),
    {
        let current = self.read_register(REG_RANGE_SEL)?;

        let mut ctl = RangeSelect::from(current);
        mutate(&mut ctl);

        let updated = u32::from(ctl);
        if updated != current {
            self.write_register(REG_RANGE_SEL, updated)?;
        }
        Ok(())
    }
}

// ==================================================================
// == Hardware Bring-Up =============================================
// ==================================================================

/// Enables the digital isolator feeding the ADC module and waits out
/// its settle time.
pub fn enable_module<P: OutputPin>(
    pin: &mut P,
    delay: &mut impl DelayNs,
) -> core::result::Result<(), P::Error> {
    pin.set_high()?;
    delay.delay_ms(MODULE_ENABLE_SETTLE_MS);
    Ok(())
}

/// Pulses the active-low reset pin and leaves the device running.
pub fn hardware_reset<P: OutputPin>(
    pin: &mut P,
    delay: &mut impl DelayNs,
) -> core::result::Result<(), P::Error> {
    pin.set_high()?;
    pin.set_low()?;
    delay.delay_ms(RESET_PULSE_MS);
    pin.set_high()
}
