//! Register map and wire-protocol definitions for the ADS8699 ADC.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{InputRange, OutputData};
use crate::register::{Access, RegisterDef, RegisterMap};

/// Width of the ADS8699 register address space in bits.
pub const ADDRESS_BITS: u32 = 9;
/// Width of every ADS8699 register payload in bits.
pub const DATA_BITS: u32 = 32;
/// Number of documented registers.
pub const REGISTER_COUNT: usize = 9;

/// Register type instantiated for this device's widths.
pub type Ads8699Register = crate::register::Register<ADDRESS_BITS, DATA_BITS>;
/// Register map instantiated for this device's widths.
pub type Ads8699Map = RegisterMap<ADDRESS_BITS, DATA_BITS, REGISTER_COUNT>;

/// Register address of `DEVICE_ID`.
pub const REG_DEVICE_ID: u32 = 0x000;
/// Register address of `RST_PWRCTL`.
pub const REG_RST_PWRCTL: u32 = 0x004;
/// Register address of `SDI_CTL`.
pub const REG_SDI_CTL: u32 = 0x008;
/// Register address of `SDO_CTL`.
pub const REG_SDO_CTL: u32 = 0x00C;
/// Register address of `DATAOUT_CTL`.
pub const REG_DATAOUT_CTL: u32 = 0x010;
/// Register address of `RANGE_SEL`.
pub const REG_RANGE_SEL: u32 = 0x014;
/// Register address of `ALARM`.
pub const REG_ALARM: u32 = 0x020;
/// Register address of `ALARM_H_TH`.
pub const REG_ALARM_H_TH: u32 = 0x024;
/// Register address of `ALARM_L_TH`.
pub const REG_ALARM_L_TH: u32 = 0x028;

/// The device's documented register set, in datasheet enumeration order.
pub const REGISTER_TABLE: [RegisterDef; REGISTER_COUNT] = [
    RegisterDef {
        address: REG_DEVICE_ID,
        reset_value: 0x0000_0000,
        access: Access::ReadOnly,
        name: "DEVICE_ID",
        description: "Device identification word",
    },
    RegisterDef {
        address: REG_RST_PWRCTL,
        reset_value: 0x0000_0000,
        access: Access::ReadWrite,
        name: "RST_PWRCTL",
        description: "Reset and power control",
    },
    RegisterDef {
        address: REG_SDI_CTL,
        reset_value: 0x0000_0000,
        access: Access::ReadWrite,
        name: "SDI_CTL",
        description: "Serial data input protocol control",
    },
    RegisterDef {
        address: REG_SDO_CTL,
        reset_value: 0x0000_0000,
        access: Access::ReadWrite,
        name: "SDO_CTL",
        description: "Serial data output protocol control",
    },
    RegisterDef {
        address: REG_DATAOUT_CTL,
        reset_value: 0x0000_0000,
        access: Access::ReadWrite,
        name: "DATAOUT_CTL",
        description: "Output data word formatting",
    },
    RegisterDef {
        address: REG_RANGE_SEL,
        reset_value: 0x0000_0000,
        access: Access::ReadWrite,
        name: "RANGE_SEL",
        description: "Analog input range selection",
    },
    RegisterDef {
        address: REG_ALARM,
        reset_value: 0x0000_0000,
        access: Access::ReadOnly,
        name: "ALARM",
        description: "Latched alarm flag outputs",
    },
    RegisterDef {
        address: REG_ALARM_H_TH,
        reset_value: 0x0000_FFFF,
        access: Access::ReadWrite,
        name: "ALARM_H_TH",
        description: "Alarm high threshold and hysteresis",
    },
    RegisterDef {
        address: REG_ALARM_L_TH,
        reset_value: 0x0000_0000,
        access: Access::ReadWrite,
        name: "ALARM_L_TH",
        description: "Alarm low threshold",
    },
];

// ==================================================================
// == Wire protocol =================================================
// ==================================================================

/// Length of one register-access frame on the wire.
///
/// Command byte, address byte, then four payload bytes MSB first. The
/// 9-bit register address is split across the two leading bytes: bit 8
/// lives in bit 0 of the command byte, bits 7:0 in the address byte.
pub const FRAME_BYTES: usize = 6;

/// Response bytes that must read back as zero in a register-read frame.
pub const RESERVED_RESPONSE_BYTES: usize = 2;

/// Length of a conversion-result frame (a NOP command word).
pub const CONVERSION_FRAME_BYTES: usize = 4;

/// Width of the conversion result carried in a NOP frame.
pub const CONVERSION_BITS: u32 = 18;

/// `NOP` opcode: clocks out the pending conversion result.
pub const OP_NOP: u8 = 0b0000_0000;
/// `READ` opcode: replies with the addressed register value.
pub const OP_READ: u8 = 0b0100_1000;
/// `WRITE` opcode: replaces the addressed register value.
pub const OP_WRITE: u8 = 0b1101_0000;
/// `SET_HWORD` opcode: sets the bits given in the payload.
pub const OP_SET_HWORD: u8 = 0b1101_1000;
/// `CLEAR_HWORD` opcode: clears the bits given in the payload.
pub const OP_CLEAR_HWORD: u8 = 0b1100_0000;

/// Key that must be present in `RST_PWRCTL.WKEY` for the power-control
/// bits of the same write to take effect.
pub const POWER_WRITE_KEY: u8 = 0x69;

// ==================================================================
// == Bitfield views ================================================
// ==================================================================

/// Bitfield representation of the `RANGE_SEL` register (address `0x014`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelect {
    // Analog input range selection (bits 3:0).
    pub range: InputRange,
    #[skip]
    __: B2,
    // Internal reference disable flag (bit 6).
    pub internal_ref_disable: bool,
    #[skip]
    __: B25,
}

impl From<u32> for RangeSelect {
    fn from(value: u32) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<RangeSelect> for u32 {
    fn from(value: RangeSelect) -> Self {
        u32::from_le_bytes(value.into_bytes())
    }
}

/// Bitfield representation of the `RST_PWRCTL` register (address `0x004`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetPowerControl {
    // Deep power-down enable (bit 0).
    pub power_down: bool,
    // NAP power-saving mode enable (bit 1).
    pub nap_enable: bool,
    #[skip]
    __: B6,
    // Write key (bits 15:8); must hold `POWER_WRITE_KEY`.
    pub write_key: B8,
    #[skip]
    __: B16,
}

impl From<u32> for ResetPowerControl {
    fn from(value: u32) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<ResetPowerControl> for u32 {
    fn from(value: ResetPowerControl) -> Self {
        u32::from_le_bytes(value.into_bytes())
    }
}

/// Bitfield representation of the `ALARM` register (address `0x020`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmFlags {
    // Input crossed the low threshold (bit 0, latched).
    pub low_tripped: bool,
    // Input crossed the high threshold (bit 1, latched).
    pub high_tripped: bool,
    #[skip]
    __: B30,
}

impl From<u32> for AlarmFlags {
    fn from(value: u32) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<AlarmFlags> for u32 {
    fn from(value: AlarmFlags) -> Self {
        u32::from_le_bytes(value.into_bytes())
    }
}

/// Bitfield representation of the `DATAOUT_CTL` register (address `0x010`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataOutControl {
    // Output data selection (bits 2:0).
    pub data: OutputData,
    // Parity bit enable (bit 3).
    pub parity_enable: bool,
    #[skip]
    __: B4,
    // Include the active range in the output word (bit 8).
    pub range_include: bool,
    #[skip]
    __: B23,
}

impl From<u32> for DataOutControl {
    fn from(value: u32) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<DataOutControl> for u32 {
    fn from(value: DataOutControl) -> Self {
        u32::from_le_bytes(value.into_bytes())
    }
}

/// Builds the register map for one ADS8699.
pub fn register_map() -> Result<Ads8699Map, crate::error::MapError> {
    Ads8699Map::from_table(&REGISTER_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that RangeSelect bitfields match the datasheet layout.
    #[test]
    fn range_select_layout_matches_datasheet() {
        let range_sel = RangeSelect::new()
            .with_range(InputRange::Bipolar5V12)
            .with_internal_ref_disable(true);

        assert_eq!(u32::from(range_sel), 0b0100_0011);

        let decoded = RangeSelect::from(0b0100_0011u32);
        assert_eq!(decoded.range(), InputRange::Bipolar5V12);
        assert!(decoded.internal_ref_disable());
    }

    #[test]
    fn reset_power_control_places_write_key() {
        let power = ResetPowerControl::new()
            .with_nap_enable(true)
            .with_write_key(POWER_WRITE_KEY);

        assert_eq!(u32::from(power), 0x0000_6902);
    }

    #[test]
    fn alarm_flags_decode_low_bits() {
        let flags = AlarmFlags::from(0b10u32);
        assert!(!flags.low_tripped());
        assert!(flags.high_tripped());
    }

    #[test]
    fn register_table_builds_a_complete_map() {
        let map = register_map().unwrap();
        assert_eq!(map.len(), REGISTER_COUNT);
        assert_eq!(map.lookup(REG_DEVICE_ID).unwrap().name(), "DEVICE_ID");
        assert!(!map.lookup(REG_DEVICE_ID).unwrap().is_writable());
        assert!(!map.lookup(REG_ALARM).unwrap().is_writable());
        assert_eq!(
            map.lookup(REG_ALARM_H_TH).unwrap().reset_value(),
            0x0000_FFFF
        );
    }
}
