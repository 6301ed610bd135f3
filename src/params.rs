//! Strongly typed parameter enumerations for the LIS3DH driver.
//!
//! Register field encodings map directly to the LIS3DH datasheet and are used by
//! the bitfields in [`registers`](crate::registers). Bus selections describe the
//! synchronous USART the sensor is wired to and are consumed by
//! [`BusConfig`](crate::config::BusConfig).
//!
//! # Examples
//!
//! ```rust
//! use lis3dh_spi::params::{Axis, FullScale, OutputDataRate};
//!
//! let odr = OutputDataRate::Hz50;
//! let fs = FullScale::G2;
//! assert_eq!(fs.g(), 2);
//! let _ = (odr, Axis::X);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::registers::{
    RegisterAddress,
    REG_OUT_X_H,
    REG_OUT_X_L,
    REG_OUT_Y_H,
    REG_OUT_Y_L,
    REG_OUT_Z_H,
    REG_OUT_Z_L,
};

/// Output data rate selections encoded in `CTRL_REG1[7:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum OutputDataRate {
    /// Power-down mode.
    PowerDown = 0b0000,
    /// 1 Hz.
    Hz1 = 0b0001,
    /// 10 Hz.
    Hz10 = 0b0010,
    /// 25 Hz.
    Hz25 = 0b0011,
    /// 50 Hz.
    Hz50 = 0b0100,
    /// 100 Hz.
    Hz100 = 0b0101,
    /// 200 Hz.
    Hz200 = 0b0110,
    /// 400 Hz.
    Hz400 = 0b0111,
    /// 1.6 kHz, low-power mode only.
    LowPower1600Hz = 0b1000,
    /// 1.344 kHz normal mode, 5.376 kHz low-power mode.
    Hz1344 = 0b1001,
}

/// Full-scale selections encoded in `CTRL_REG4[5:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FullScale {
    /// ±2 g.
    G2 = 0b00,
    /// ±4 g.
    G4 = 0b01,
    /// ±8 g.
    G8 = 0b10,
    /// ±16 g.
    G16 = 0b11,
}

impl FullScale {
    /// Returns the full-scale magnitude in g.
    pub const fn g(self) -> u8 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }
}

/// Self-test selections encoded in `CTRL_REG4[2:1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum SelfTestMode {
    /// Normal operation.
    Normal = 0b00,
    /// Self-test 0.
    Test0 = 0b01,
    /// Self-test 1.
    Test1 = 0b10,
}

/// Accelerometer output axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis (`OUT_X_L` / `OUT_X_H`).
    X,
    /// Y axis (`OUT_Y_L` / `OUT_Y_H`).
    Y,
    /// Z axis (`OUT_Z_L` / `OUT_Z_H`).
    Z,
}

impl Axis {
    /// All axes in register order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Returns the `(low, high)` output register pair for this axis.
    pub const fn output_registers(self) -> (RegisterAddress, RegisterAddress) {
        match self {
            Self::X => (REG_OUT_X_L, REG_OUT_X_H),
            Self::Y => (REG_OUT_Y_L, REG_OUT_Y_H),
            Self::Z => (REG_OUT_Z_L, REG_OUT_Z_H),
        }
    }
}

/// USART peripheral instance driving the synchronous serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusInstance {
    /// `USART0`.
    Usart0,
    /// `USART1`.
    Usart1,
    /// `USART2`.
    Usart2,
}

impl BusInstance {
    /// Returns the peripheral base address on EFM32 Giant Gecko parts.
    pub const fn base_address(self) -> usize {
        match self {
            Self::Usart0 => 0x4000_C000,
            Self::Usart1 => 0x4000_C400,
            Self::Usart2 => 0x4000_C800,
        }
    }
}

/// Pin routing location for the USART signals (`ROUTE.LOCATION`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PinLocation {
    /// Location #0.
    Loc0 = 0,
    /// Location #1.
    Loc1 = 1,
    /// Location #2.
    Loc2 = 2,
    /// Location #3.
    Loc3 = 3,
    /// Location #4.
    Loc4 = 4,
    /// Location #5.
    Loc5 = 5,
}

impl PinLocation {
    /// Returns the raw location index.
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// How long a transport spins on a hardware status flag before giving up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPolicy {
    /// Poll until the flag is raised, however long that takes.
    #[default]
    Unbounded,
    /// Poll at most `max_polls` times, then report a timeout.
    Bounded {
        /// Number of status reads allowed per wait.
        max_polls: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_registers_are_low_then_high() {
        for axis in Axis::ALL {
            let (low, high) = axis.output_registers();
            assert_eq!(high.value(), low.value() + 1);
        }
        assert_eq!(Axis::X.output_registers().0, REG_OUT_X_L);
        assert_eq!(Axis::Z.output_registers().1.value(), 0x2D);
    }

    #[test]
    fn usart_base_addresses_are_spaced_by_one_kib() {
        assert_eq!(BusInstance::Usart1.base_address(), 0x4000_C400);
        assert_eq!(
            BusInstance::Usart2.base_address() - BusInstance::Usart1.base_address(),
            0x400
        );
    }
}
