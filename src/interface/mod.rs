//! Bus transport abstraction for the LIS3DH driver.
//!
//! A [`Transport`] moves single bytes over the serial link and owns the
//! chip-select line. [`RegisterProtocol`] frames register accesses on top of it.

pub mod protocol;
pub mod spi;
pub mod usart;

#[cfg(test)]
pub(crate) mod sim;

pub use self::protocol::RegisterProtocol;

use crate::config::BusConfig;

/// Full-duplex byte transport with an explicit chip-select line.
pub trait Transport {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Applies the bus configuration to the underlying peripheral.
    ///
    /// Transports whose peripheral was configured elsewhere keep the default no-op.
    fn configure(&mut self, config: &BusConfig) -> core::result::Result<(), Self::Error> {
        let _ = config;
        Ok(())
    }

    /// Asserts chip-select (drives the line low).
    fn select(&mut self) -> core::result::Result<(), Self::Error>;

    /// Deasserts chip-select (drives the line high).
    fn deselect(&mut self) -> core::result::Result<(), Self::Error>;

    /// Shifts `byte` out and returns the byte shifted in during the same exchange.
    fn transfer(&mut self, byte: u8) -> core::result::Result<u8, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn configure(&mut self, config: &BusConfig) -> core::result::Result<(), Self::Error> {
        T::configure(self, config)
    }

    fn select(&mut self) -> core::result::Result<(), Self::Error> {
        T::select(self)
    }

    fn deselect(&mut self) -> core::result::Result<(), Self::Error> {
        T::deselect(self)
    }

    fn transfer(&mut self, byte: u8) -> core::result::Result<u8, Self::Error> {
        T::transfer(self, byte)
    }
}

/// Errors raised by the bundled transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<B, P> {
    /// The serial peripheral reported an error.
    Bus(B),
    /// Driving the chip-select pin failed.
    ChipSelect(P),
    /// A status flag was not raised within the configured wait policy.
    Timeout,
    /// The requested bus speed cannot be derived from the peripheral clock.
    UnsupportedSpeed,
}
