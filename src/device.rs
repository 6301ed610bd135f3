//! High-level LIS3DH device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::spi::SpiTransport;
use crate::interface::{RegisterProtocol, Transport};
use crate::params::Axis;
use crate::platform::Platform;
use crate::registers::{
    DeviceProfile,
    RegisterAddress,
    StatusReg,
    EXPECTED_WHO_AM_I,
    REG_STATUS,
    REG_WHO_AM_I,
};
use crate::self_test::{run_self_test, SelfTestReport};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

// LIS3DH datasheet boot time before the control registers accept writes (milliseconds).
const POWER_ON_DELAY_MS: u32 = 5;
// Raw samples are normalized by the positive half-range for both signs.
const RAW_POSITIVE_FULL_SCALE: f32 = 32767.0;
// High-resolution output is 12-bit, left-justified in the 16-bit word.
const HIGH_RESOLUTION_SHIFT: u32 = 4;

/// Converts a raw sample to g for the given full-scale range.
///
/// Both signs are divided by 32767, so `i16::MIN` lands slightly beyond
/// `-full_scale_g`.
pub fn convert_raw(raw: i16, full_scale_g: f32) -> f32 {
    f32::from(raw) / RAW_POSITIVE_FULL_SCALE * full_scale_g
}

/// High-level synchronous driver for the LIS3DH accelerometer.
pub struct Lis3dh<T> {
    protocol: RegisterProtocol<T>,
    config: Config,
    profile: DeviceProfile,
}

/// Decoded view of `STATUS_REG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// STATUS_REG[7] ZYXOR.
    pub xyz_overrun: bool,
    /// STATUS_REG[6:4] ZOR, YOR, XOR as `[x, y, z]`.
    pub axis_overrun: [bool; 3],
    /// STATUS_REG[3] ZYXDA.
    pub xyz_data_ready: bool,
    /// STATUS_REG[2:0] ZDA, YDA, XDA as `[x, y, z]`.
    pub axis_data_ready: [bool; 3],
}

impl From<StatusReg> for StatusSnapshot {
    fn from(status: StatusReg) -> Self {
        Self {
            xyz_overrun: status.xyz_overrun(),
            axis_overrun: [status.x_overrun(), status.y_overrun(), status.z_overrun()],
            xyz_data_ready: status.xyz_data_available(),
            axis_data_ready: [
                status.x_data_available(),
                status.y_data_available(),
                status.z_data_available(),
            ],
        }
    }
}

impl<T> Lis3dh<T> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus transport.
    pub fn new(transport: T, config: Config) -> Self {
        Self {
            protocol: RegisterProtocol::new(transport),
            config,
            profile: DeviceProfile::default(),
        }
    }

    /// Consumes the driver and returns the owned transport.
    pub fn release(self) -> (T, Config) {
        (self.protocol.release(), self.config)
    }

    /// Provides mutable access to the underlying transport.
    pub fn interface_mut(&mut self) -> &mut T {
        self.protocol.transport_mut()
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register writes applied by [`init`](Self::init).
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Converts a raw sample to g using the configured full-scale range.
    pub fn convert(&self, raw: i16) -> f32 {
        convert_raw(raw, self.config.full_scale_g)
    }
}

impl<SPI, CS> Lis3dh<SpiTransport<SPI, CS>>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for `embedded-hal` SPI buses.
    pub fn new_spi(spi: SPI, cs: CS, config: Config) -> Self {
        Self::new(SpiTransport::new(spi, cs), config)
    }

    /// Releases the driver, returning the SPI bus, chip-select and configuration.
    pub fn release_spi(self) -> (SPI, CS, Config) {
        let (transport, config) = self.release();
        let (spi, cs) = transport.release();
        (spi, cs, config)
    }
}

impl<T, CommE> Lis3dh<T>
where
    T: Transport<Error = CommE>,
{
    // ==================================================================
    // == Initialization =================================================
    // ==================================================================
    /// Brings the sensor up with the fixed measurement profile.
    ///
    /// Waits out the power-on boot time, lets the board enable clocks and pins,
    /// configures the transport, then writes `CTRL_REG1` and `CTRL_REG4` in that
    /// order. No acknowledgement is read back; call [`self_test`](Self::self_test)
    /// before trusting samples.
    pub fn init(
        &mut self,
        delay: &mut impl DelayNs,
        platform: &mut impl Platform,
    ) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        delay.delay_ms(POWER_ON_DELAY_MS);

        platform.enable_clocks(&self.config.bus);
        platform.configure_pins(&self.config.bus);
        self.protocol.configure(&self.config.bus)?;

        self.apply_profile()?;
        debug!("lis3dh initialized");
        Ok(())
    }

    fn apply_profile(&mut self) -> Result<(), CommE> {
        let profile = self.profile;
        for &(register, value) in profile.writes() {
            trace!("profile write {:#x} <- {:#x}", register.value(), value);
            self.protocol.write_register(register, value)?;
        }
        Ok(())
    }

    // ==================================================================
    // == Register Access ================================================
    // ==================================================================
    /// Reads a single register.
    pub fn read_register(&mut self, register: RegisterAddress) -> Result<u8, CommE> {
        self.protocol.read_register(register).map_err(Error::from)
    }

    /// Writes a single register.
    pub fn write_register(&mut self, register: RegisterAddress, value: u8) -> Result<(), CommE> {
        self.protocol
            .write_register(register, value)
            .map_err(Error::from)
    }

    /// Reads a register by raw address, rejecting addresses with bit 7 set.
    pub fn read_register_raw(&mut self, address: u8) -> Result<u8, CommE> {
        let register = RegisterAddress::new(address).ok_or(Error::InvalidAddress(address))?;
        self.read_register(register)
    }

    /// Writes a register by raw address, rejecting addresses with bit 7 set.
    pub fn write_register_raw(&mut self, address: u8, value: u8) -> Result<(), CommE> {
        let register = RegisterAddress::new(address).ok_or(Error::InvalidAddress(address))?;
        self.write_register(register, value)
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Returns `true` only if `WHO_AM_I` holds the LIS3DH identity byte.
    pub fn self_test(&mut self) -> Result<bool, CommE> {
        Ok(self.run_self_test()?.passed)
    }

    /// Executes the self-test and returns the full report.
    pub fn run_self_test(&mut self) -> Result<SelfTestReport, CommE> {
        run_self_test(self)
    }

    /// Verifies `WHO_AM_I`, returning the byte read on success.
    pub fn check_identity(&mut self) -> Result<u8, CommE> {
        let who_am_i = self.read_register(REG_WHO_AM_I)?;
        if who_am_i != EXPECTED_WHO_AM_I {
            return Err(Error::IdentityMismatch(who_am_i));
        }
        Ok(who_am_i)
    }

    /// Returns a snapshot of `STATUS_REG`.
    pub fn read_status(&mut self) -> Result<StatusSnapshot, CommE> {
        let raw = self.read_register(REG_STATUS)?;
        Ok(StatusSnapshot::from(StatusReg::from(raw)))
    }

    // ==================================================================
    // == Data Acquisition ===============================================
    // ==================================================================
    /// Reads one axis as a raw two's-complement sample, low byte first.
    pub fn read_axis_raw(&mut self, axis: Axis) -> Result<i16, CommE> {
        let (low_register, high_register) = axis.output_registers();
        let low = self.read_register(low_register)?;
        let high = self.read_register(high_register)?;
        let raw = i16::from_le_bytes([low, high]);
        trace!("axis {} raw {}", axis, raw);
        Ok(raw)
    }

    /// Reads one axis in g.
    pub fn read_axis(&mut self, axis: Axis) -> Result<f32, CommE> {
        let raw = self.read_axis_raw(axis)?;
        Ok(self.convert(raw))
    }

    /// Reads the X axis in g.
    pub fn read_x(&mut self) -> Result<f32, CommE> {
        self.read_axis(Axis::X)
    }

    /// Reads the Y axis in g.
    pub fn read_y(&mut self) -> Result<f32, CommE> {
        self.read_axis(Axis::Y)
    }

    /// Reads the Z axis in g.
    pub fn read_z(&mut self) -> Result<f32, CommE> {
        self.read_axis(Axis::Z)
    }

    /// Reads a raw acceleration triplet.
    pub fn read_xyz_raw(&mut self) -> Result<[i16; 3], CommE> {
        Ok([
            self.read_axis_raw(Axis::X)?,
            self.read_axis_raw(Axis::Y)?,
            self.read_axis_raw(Axis::Z)?,
        ])
    }

    /// Reads all three axes in g.
    pub fn read_xyz(&mut self) -> Result<[f32; 3], CommE> {
        let raw = self.read_xyz_raw()?;
        Ok(raw.map(|sample| self.convert(sample)))
    }

    /// Returns acceleration in milli-g from the 12-bit high-resolution data.
    pub fn read_xyz_mg(&mut self) -> Result<[i32; 3], CommE> {
        let sensitivity = i32::from(self.config.sensitivity_mg);
        let raw = self.read_xyz_raw()?;
        Ok(raw.map(|sample| i32::from(sample >> HIGH_RESOLUTION_SHIFT) * sensitivity))
    }
}
