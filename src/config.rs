//! Configuration primitives for the LIS3DH driver.

use crate::params::{BusInstance, PinLocation, WaitPolicy};

/// Default SPI clock rate.
pub const DEFAULT_BUS_SPEED_HZ: u32 = 2_000_000;
/// Default peripheral clock feeding the USART (EFM32 HFRCO at reset).
pub const DEFAULT_PERIPHERAL_CLOCK_HZ: u32 = 14_000_000;
/// Default full-scale range in g, matching the fixed ±2 g device profile.
pub const DEFAULT_FULL_SCALE_G: f32 = 2.0;
/// Default sensitivity in mg/digit for ±2 g high-resolution data.
pub const DEFAULT_SENSITIVITY_MG: u16 = 1;

/// Serial bus selection. Fixed for the lifetime of a driver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// SPI clock rate in hertz.
    pub speed_hz: u32,
    /// Clock feeding the USART peripheral, used to derive the clock divider.
    pub peripheral_clock_hz: u32,
    /// USART instance wired to the sensor.
    pub instance: BusInstance,
    /// Pin routing location for MOSI/MISO/CLK.
    pub location: PinLocation,
    /// Wait behaviour while polling transmit status flags.
    pub wait: WaitPolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            speed_hz: DEFAULT_BUS_SPEED_HZ,
            peripheral_clock_hz: DEFAULT_PERIPHERAL_CLOCK_HZ,
            instance: BusInstance::Usart1,
            location: PinLocation::Loc1,
            wait: WaitPolicy::Unbounded,
        }
    }
}

/// User-facing configuration for the LIS3DH driver.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Serial bus selection.
    pub bus: BusConfig,
    /// Full-scale range in g used to convert raw samples.
    ///
    /// Only the conversion uses this; the sensor is always programmed for ±2 g,
    /// so any other value rescales every reading in g.
    pub full_scale_g: f32,
    /// Sensitivity in mg/digit applied to 12-bit high-resolution data.
    pub sensitivity_mg: u16,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration can drive the sensor.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.bus.speed_hz == 0 {
            return Err(ConfigError::ZeroBusSpeed);
        }

        if !self.full_scale_g.is_finite() || self.full_scale_g <= 0.0 {
            return Err(ConfigError::InvalidFullScale);
        }

        if self.sensitivity_mg == 0 {
            return Err(ConfigError::InvalidSensitivity);
        }

        Ok(())
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

    /// Overrides the SPI clock rate.
    pub fn bus_speed_hz(mut self, speed_hz: u32) -> Self {
        self.config.bus.speed_hz = speed_hz;
        self
    }

    /// Overrides the peripheral clock used for divider computation.
    pub fn peripheral_clock_hz(mut self, clock_hz: u32) -> Self {
        self.config.bus.peripheral_clock_hz = clock_hz;
        self
    }

    /// Selects the USART instance.
    pub fn bus_instance(mut self, instance: BusInstance) -> Self {
        self.config.bus.instance = instance;
        self
    }

    /// Selects the pin routing location.
    pub fn pin_location(mut self, location: PinLocation) -> Self {
        self.config.bus.location = location;
        self
    }

    /// Sets the status-flag wait policy.
    pub fn wait_policy(mut self, wait: WaitPolicy) -> Self {
        self.config.bus.wait = wait;
        self
    }

    /// Overrides the full-scale range used for conversion.
    ///
    /// The sensor itself stays at ±2 g; see [`Config::full_scale_g`].
    pub fn full_scale_g(mut self, full_scale_g: f32) -> Self {
        self.config.full_scale_g = full_scale_g;
        self
    }

    /// Overrides the sensitivity used for milli-g readings.
    pub fn sensitivity_mg(mut self, sensitivity_mg: u16) -> Self {
        self.config.sensitivity_mg = sensitivity_mg;
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

impl Default for Config {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            full_scale_g: DEFAULT_FULL_SCALE_G,
            sensitivity_mg: DEFAULT_SENSITIVITY_MG,
        }
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bus speed is zero.
    ZeroBusSpeed,
    /// Full-scale range is not a positive finite number.
    InvalidFullScale,
    /// Sensitivity must be non-zero.
    InvalidSensitivity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_board() {
        let config = Config::default();
        assert_eq!(config.bus.speed_hz, 2_000_000);
        assert_eq!(config.bus.instance, BusInstance::Usart1);
        assert_eq!(config.bus.location, PinLocation::Loc1);
        assert_eq!(config.bus.wait, WaitPolicy::Unbounded);
        assert_eq!(config.full_scale_g, 2.0);
        assert_eq!(config.sensitivity_mg, 1);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn builder_overrides_fields() {
        let config = Config::new()
            .bus_speed_hz(1_000_000)
            .bus_instance(BusInstance::Usart2)
            .pin_location(PinLocation::Loc3)
            .wait_policy(WaitPolicy::Bounded { max_polls: 10 })
            .full_scale_g(4.0)
            .sensitivity_mg(2)
            .build();

        assert_eq!(config.bus.speed_hz, 1_000_000);
        assert_eq!(config.bus.instance, BusInstance::Usart2);
        assert_eq!(config.bus.location, PinLocation::Loc3);
        assert_eq!(config.bus.wait, WaitPolicy::Bounded { max_polls: 10 });
        assert_eq!(config.full_scale_g, 4.0);
        assert_eq!(config.sensitivity_mg, 2);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero_speed = Config::new().bus_speed_hz(0).build();
        assert_eq!(zero_speed.validate(), Err(ConfigError::ZeroBusSpeed));

        let nan_scale = Config::new().full_scale_g(f32::NAN).build();
        assert_eq!(nan_scale.validate(), Err(ConfigError::InvalidFullScale));

        let negative_scale = Config::new().full_scale_g(-2.0).build();
        assert_eq!(negative_scale.validate(), Err(ConfigError::InvalidFullScale));

        let zero_sensitivity = Config::new().sensitivity_mg(0).build();
        assert_eq!(zero_sensitivity.validate(), Err(ConfigError::InvalidSensitivity));
    }

    #[test]
    fn validate_leaves_clock_limits_to_the_transport() {
        let fast = Config::new().bus_speed_hz(8_000_000).build();
        assert_eq!(fast.validate(), Ok(()));
    }
}
