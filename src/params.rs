//! Strongly typed parameter enumerations for the ADS8699 driver.
//!
//! These enums map directly to datasheet field encodings and are used
//! across the register bitfields and the high-level driver APIs. Prefer
//! these types over raw integers to keep configuration values valid and
//! explicit.
//!
//! # Examples
//!
//! ```rust
//! use ads8699::params::InputRange;
//!
//! let range = InputRange::Bipolar10V24;
//! assert!(range.is_bipolar());
//! ```

use modular_bitfield::prelude::Specifier;

/// Analog input range selections (`RANGE_SEL.RANGE_SEL`, bits 3:0).
///
/// Spans are derived from the internal 4.096 V reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 4]
pub enum InputRange {
    /// ±3 × Vref (±12.288 V).
    Bipolar12V288 = 0b0000,
    /// ±2.5 × Vref (±10.24 V).
    Bipolar10V24 = 0b0001,
    /// ±1.5 × Vref (±6.144 V).
    Bipolar6V144 = 0b0010,
    /// ±1.25 × Vref (±5.12 V).
    Bipolar5V12 = 0b0011,
    /// ±0.625 × Vref (±2.56 V).
    Bipolar2V56 = 0b0100,
    /// 0 V to 3 × Vref (12.288 V).
    Unipolar12V288 = 0b1000,
    /// 0 V to 2.5 × Vref (10.24 V).
    Unipolar10V24 = 0b1001,
    /// 0 V to 1.5 × Vref (6.144 V).
    Unipolar6V144 = 0b1010,
    /// 0 V to 1.25 × Vref (5.12 V).
    Unipolar5V12 = 0b1011,
}

impl InputRange {
    /// Whether the range spans negative input voltages.
    pub const fn is_bipolar(self) -> bool {
        matches!(
            self,
            Self::Bipolar12V288
                | Self::Bipolar10V24
                | Self::Bipolar6V144
                | Self::Bipolar5V12
                | Self::Bipolar2V56
        )
    }

    /// Most negative representable input voltage.
    pub const fn min_volts(self) -> f32 {
        match self {
            Self::Bipolar12V288 => -12.288,
            Self::Bipolar10V24 => -10.24,
            Self::Bipolar6V144 => -6.144,
            Self::Bipolar5V12 => -5.12,
            Self::Bipolar2V56 => -2.56,
            Self::Unipolar12V288 | Self::Unipolar10V24 | Self::Unipolar6V144 | Self::Unipolar5V12 => {
                0.0
            }
        }
    }

    /// Full-scale span of the range in volts.
    pub const fn span_volts(self) -> f32 {
        match self {
            Self::Bipolar12V288 => 24.576,
            Self::Bipolar10V24 => 20.48,
            Self::Bipolar6V144 => 12.288,
            Self::Bipolar5V12 => 10.24,
            Self::Bipolar2V56 => 5.12,
            Self::Unipolar12V288 => 12.288,
            Self::Unipolar10V24 => 10.24,
            Self::Unipolar6V144 => 6.144,
            Self::Unipolar5V12 => 5.12,
        }
    }
}

/// Output data selection (`DATAOUT_CTL.DATA_VAL`, bits 2:0).
///
/// Test patterns replace the conversion result on the wire and are used
/// to verify host-side framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum OutputData {
    /// Conversion result (normal operation).
    Conversion = 0b000,
    /// Constant all-zeros test pattern.
    AllZeros = 0b100,
    /// Constant all-ones test pattern.
    AllOnes = 0b101,
    /// Alternating 0101... test pattern.
    Alternate01 = 0b110,
    /// Alternating 0011... test pattern.
    Alternate0011 = 0b111,
}
