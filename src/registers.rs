//! Register map definitions for the LIS3DH accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{FullScale, OutputDataRate, SelfTestMode};

/// Marker OR'ed into the address byte of a register read.
pub const READ_FLAG: u8 = 0x80;
/// Marker for a register write (bit 7 clear).
pub const WRITE_FLAG: u8 = 0x00;
/// Filler byte clocked out while the device shifts a register value back.
pub const DUMMY_BYTE: u8 = 0x25;

/// A 7-bit register address. Bit 7 belongs to the SPI read/write marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterAddress(u8);

/// Rejected address value carrying the offending byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressOutOfRange(pub u8);

impl RegisterAddress {
    /// Largest addressable register.
    pub const MAX: u8 = 0x7F;

    /// Validates `address`, returning `None` if bit 7 is set.
    pub const fn new(address: u8) -> Option<Self> {
        if address > Self::MAX {
            None
        } else {
            Some(Self(address))
        }
    }

    const fn fixed(address: u8) -> Self {
        assert!(address <= Self::MAX, "register address uses the R/W bit");
        Self(address)
    }

    /// Returns the raw 7-bit address.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// First byte of a read frame: address with the read marker set.
    pub const fn read_command(self) -> u8 {
        READ_FLAG | self.0
    }

    /// First byte of a write frame: address with the read marker clear.
    pub const fn write_command(self) -> u8 {
        WRITE_FLAG | self.0
    }
}

impl TryFrom<u8> for RegisterAddress {
    type Error = AddressOutOfRange;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        Self::new(value).ok_or(AddressOutOfRange(value))
    }
}

impl From<RegisterAddress> for u8 {
    fn from(value: RegisterAddress) -> Self {
        value.0
    }
}

/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: RegisterAddress = RegisterAddress::fixed(0x0F);
/// Register address of `CTRL_REG1`.
pub const REG_CTRL1: RegisterAddress = RegisterAddress::fixed(0x20);
/// Register address of `CTRL_REG4`.
pub const REG_CTRL4: RegisterAddress = RegisterAddress::fixed(0x23);
/// Register address of `STATUS_REG`.
pub const REG_STATUS: RegisterAddress = RegisterAddress::fixed(0x27);
/// Register address of `OUT_X_L`.
pub const REG_OUT_X_L: RegisterAddress = RegisterAddress::fixed(0x28);
/// Register address of `OUT_X_H`.
pub const REG_OUT_X_H: RegisterAddress = RegisterAddress::fixed(0x29);
/// Register address of `OUT_Y_L`.
pub const REG_OUT_Y_L: RegisterAddress = RegisterAddress::fixed(0x2A);
/// Register address of `OUT_Y_H`.
pub const REG_OUT_Y_H: RegisterAddress = RegisterAddress::fixed(0x2B);
/// Register address of `OUT_Z_L`.
pub const REG_OUT_Z_L: RegisterAddress = RegisterAddress::fixed(0x2C);
/// Register address of `OUT_Z_H`.
pub const REG_OUT_Z_H: RegisterAddress = RegisterAddress::fixed(0x2D);

/// Expected contents of `WHO_AM_I` on every LIS3DH.
pub const EXPECTED_WHO_AM_I: u8 = 0x33;

/// Binds a register value type to its address.
pub trait Register {
    /// Register address as documented in the datasheet.
    const ADDRESS: RegisterAddress;
}

/// Bitfield representation of `CTRL_REG1` (address `0x20`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg1 {
    // X-axis enable (bit 0).
    pub x_enable: bool,
    // Y-axis enable (bit 1).
    pub y_enable: bool,
    // Z-axis enable (bit 2).
    pub z_enable: bool,
    // Low-power mode enable (bit 3).
    pub low_power: bool,
    // Output data rate selection (bits 7:4).
    pub odr: OutputDataRate,
}

/// Reserved `ODR` patterns (`0b1010..=0b1111`) make [`CtrlReg1::odr`] panic;
/// use [`CtrlReg1::odr_or_err`] on values read back from the device.
impl From<u8> for CtrlReg1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg1> for u8 {
    fn from(value: CtrlReg1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `CTRL_REG4` (address `0x23`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg4 {
    // SPI 3-wire mode (bit 0).
    pub spi_3wire: bool,
    // Self-test selection (bits 2:1).
    pub self_test: SelfTestMode,
    // High-resolution output mode (bit 3).
    pub high_resolution: bool,
    // Full-scale selection (bits 5:4).
    pub full_scale: FullScale,
    // Big-endian data selection (bit 6).
    pub big_endian: bool,
    // Block data update (bit 7).
    pub block_data_update: bool,
}

/// The reserved `ST` pattern `0b11` makes [`CtrlReg4::self_test`] panic;
/// use [`CtrlReg4::self_test_or_err`] on values read back from the device.
impl From<u8> for CtrlReg4 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg4> for u8 {
    fn from(value: CtrlReg4) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `STATUS_REG` (address `0x27`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReg {
    // New X-axis data available (bit 0).
    pub x_data_available: bool,
    // New Y-axis data available (bit 1).
    pub y_data_available: bool,
    // New Z-axis data available (bit 2).
    pub z_data_available: bool,
    // New data on all axes (bit 3).
    pub xyz_data_available: bool,
    // X-axis overrun (bit 4).
    pub x_overrun: bool,
    // Y-axis overrun (bit 5).
    pub y_overrun: bool,
    // Z-axis overrun (bit 6).
    pub z_overrun: bool,
    // Overrun on any axis (bit 7).
    pub xyz_overrun: bool,
}

impl From<u8> for StatusReg {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<StatusReg> for u8 {
    fn from(value: StatusReg) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for CtrlReg1 {
    const ADDRESS: RegisterAddress = REG_CTRL1;
}

impl Register for CtrlReg4 {
    const ADDRESS: RegisterAddress = REG_CTRL4;
}

impl Register for StatusReg {
    const ADDRESS: RegisterAddress = REG_STATUS;
}

/// Ordered register writes that bring the sensor into its measurement profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceProfile {
    writes: [(RegisterAddress, u8); 2],
}

impl DeviceProfile {
    /// 50 Hz, all axes enabled, high resolution, block data update, ±2 g.
    pub fn high_resolution_2g() -> Self {
        let ctrl1 = CtrlReg1::new()
            .with_x_enable(true)
            .with_y_enable(true)
            .with_z_enable(true)
            .with_low_power(false)
            .with_odr(OutputDataRate::Hz50);

        let ctrl4 = CtrlReg4::new()
            .with_self_test(SelfTestMode::Normal)
            .with_high_resolution(true)
            .with_full_scale(FullScale::G2)
            .with_block_data_update(true);

        Self {
            writes: [
                (CtrlReg1::ADDRESS, u8::from(ctrl1)),
                (CtrlReg4::ADDRESS, u8::from(ctrl4)),
            ],
        }
    }

    /// Register writes in the order they must be issued.
    pub fn writes(&self) -> &[(RegisterAddress, u8)] {
        &self.writes
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::high_resolution_2g()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_rejects_read_marker() {
        assert_eq!(RegisterAddress::new(0x7F).map(RegisterAddress::value), Some(0x7F));
        assert_eq!(RegisterAddress::new(0x80), None);
        assert_eq!(RegisterAddress::try_from(0xA8), Err(AddressOutOfRange(0xA8)));
    }

    #[test]
    fn command_bytes_for_every_address() {
        for raw in 0..=RegisterAddress::MAX {
            let address = RegisterAddress::new(raw).unwrap();
            assert_eq!(address.read_command(), 0x80 | raw);
            assert_eq!(address.write_command(), raw);
            assert_eq!(address.write_command() & 0x80, 0);
        }
    }

    #[test]
    fn default_profile_matches_datasheet_encoding() {
        let profile = DeviceProfile::default();
        assert_eq!(profile.writes(), &[(REG_CTRL1, 0x47), (REG_CTRL4, 0x88)]);
    }

    #[test]
    fn ctrl_reg4_layout_matches_datasheet() {
        let ctrl4 = CtrlReg4::from(0x88);
        assert!(ctrl4.block_data_update());
        assert!(ctrl4.high_resolution());
        assert!(!ctrl4.big_endian());
        assert!(!ctrl4.spi_3wire());
        assert_eq!(ctrl4.full_scale(), FullScale::G2);
        assert_eq!(ctrl4.self_test(), SelfTestMode::Normal);
    }

    #[test]
    fn reserved_field_patterns_are_reported_by_checked_getters() {
        let ctrl1 = CtrlReg1::from(0xF7);
        assert!(ctrl1.odr_or_err().is_err());
        assert!(ctrl1.x_enable() && ctrl1.y_enable() && ctrl1.z_enable());

        let ctrl4 = CtrlReg4::from(0b0000_0110);
        assert!(ctrl4.self_test_or_err().is_err());
        assert_eq!(ctrl4.full_scale(), FullScale::G2);

        assert_eq!(CtrlReg1::from(0x47).odr_or_err().ok(), Some(OutputDataRate::Hz50));
    }

    #[test]
    fn status_layout_matches_datasheet() {
        let status = StatusReg::from(0b1000_1000);
        assert!(status.xyz_data_available());
        assert!(status.xyz_overrun());
        assert!(!status.x_data_available());
        assert!(!status.z_overrun());
    }
}
