//! Transport built on top of an `embedded-hal` [`SpiBus`] and a chip-select [`OutputPin`].
//!
//! The HAL owns clocking and pin muxing, so this transport only drives the
//! chip-select line and single-byte exchanges. `flush` stands in for waiting on
//! the peripheral's transmit-complete flag.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{BusError, Transport};

/// SPI-based transport for the LIS3DH driver.
pub struct SpiTransport<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiTransport<SPI, CS> {
    /// Creates a new transport from an exclusive SPI bus and its chip-select pin.
    pub const fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Provides mutable access to the wrapped SPI bus.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the transport and returns the owned bus and pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Transport for SpiTransport<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = BusError<SPI::Error, CS::Error>;

    fn select(&mut self) -> core::result::Result<(), Self::Error> {
        self.cs.set_low().map_err(BusError::ChipSelect)
    }

    fn deselect(&mut self) -> core::result::Result<(), Self::Error> {
        self.cs.set_high().map_err(BusError::ChipSelect)
    }

    fn transfer(&mut self, byte: u8) -> core::result::Result<u8, Self::Error> {
        let mut frame = [byte];
        self.spi.transfer_in_place(&mut frame).map_err(BusError::Bus)?;
        self.spi.flush().map_err(BusError::Bus)?;
        Ok(frame[0])
    }
}
