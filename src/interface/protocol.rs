//! Single-register framing over a [`Transport`].
//!
//! Every access is one chip-select window holding exactly two exchanges:
//! the command byte (address plus read/write marker) and the data byte.

use super::Transport;
use crate::config::BusConfig;
use crate::registers::{RegisterAddress, DUMMY_BYTE};

/// Frames register reads and writes on top of a byte transport.
///
/// Holding the transport by value (or `&mut`) makes each frame exclusive: no
/// other access can interleave between select and deselect.
pub struct RegisterProtocol<T> {
    transport: T,
}

impl<T> RegisterProtocol<T> {
    /// Wraps a transport.
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Provides mutable access to the wrapped transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the protocol and returns the owned transport.
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T> RegisterProtocol<T>
where
    T: Transport,
{
    /// Forwards bus configuration to the transport.
    pub fn configure(&mut self, config: &BusConfig) -> core::result::Result<(), T::Error> {
        self.transport.configure(config)
    }

    /// Reads a single register.
    pub fn read_register(&mut self, address: RegisterAddress) -> core::result::Result<u8, T::Error> {
        self.frame(address.read_command(), DUMMY_BYTE)
    }

    /// Writes a single register.
    pub fn write_register(
        &mut self,
        address: RegisterAddress,
        value: u8,
    ) -> core::result::Result<(), T::Error> {
        self.frame(address.write_command(), value).map(|_| ())
    }

    fn frame(&mut self, command: u8, data: u8) -> core::result::Result<u8, T::Error> {
        self.transport.select()?;

        // Chip-select must be released even when an exchange fails mid-frame.
        let exchanged = self.exchange(command, data);
        let released = self.transport.deselect();

        let received = exchanged?;
        released?;
        Ok(received)
    }

    fn exchange(&mut self, command: u8, data: u8) -> core::result::Result<u8, T::Error> {
        // The byte clocked in during the command phase is undefined.
        let _ = self.transport.transfer(command)?;
        self.transport.transfer(data)
    }
}

#[cfg(test)]
mod tests {
    use super::RegisterProtocol;
    use crate::interface::sim::{Event, SimulatedDevice};
    use crate::registers::{RegisterAddress, DUMMY_BYTE};

    #[test]
    fn write_then_read_round_trips_every_address() {
        let mut protocol = RegisterProtocol::new(SimulatedDevice::new());

        for raw in 0..=RegisterAddress::MAX {
            let address = RegisterAddress::new(raw).unwrap();
            for value in [0x00, 0x5A, 0xA5, 0xFF, raw] {
                protocol.write_register(address, value).unwrap();
                assert_eq!(protocol.read_register(address).unwrap(), value);
            }
        }
    }

    #[test]
    fn read_is_one_window_with_two_exchanges() {
        let device = SimulatedDevice::new().with_register(0x0F, 0x33);
        let mut protocol = RegisterProtocol::new(device);

        let value = protocol
            .read_register(RegisterAddress::new(0x0F).unwrap())
            .unwrap();

        assert_eq!(value, 0x33);
        assert_eq!(
            protocol.release().events,
            [
                Event::Select,
                Event::Transfer(0x8F),
                Event::Transfer(DUMMY_BYTE),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn write_is_one_window_with_two_exchanges() {
        let mut protocol = RegisterProtocol::new(SimulatedDevice::new());

        protocol
            .write_register(RegisterAddress::new(0x20).unwrap(), 0x47)
            .unwrap();

        let device = protocol.release();
        assert_eq!(device.registers[0x20], 0x47);
        assert_eq!(
            device.events,
            [
                Event::Select,
                Event::Transfer(0x20),
                Event::Transfer(0x47),
                Event::Deselect,
            ]
        );
    }

    #[test]
    fn command_byte_carries_read_write_marker() {
        let mut protocol = RegisterProtocol::new(SimulatedDevice::new());

        for raw in 0..=RegisterAddress::MAX {
            let address = RegisterAddress::new(raw).unwrap();
            protocol.read_register(address).unwrap();
            protocol.write_register(address, 0).unwrap();
        }

        let commands = protocol.release().commands();
        for (raw, pair) in (0..=RegisterAddress::MAX).zip(commands.chunks_exact(2)) {
            assert_eq!(pair[0], 0x80 | raw);
            assert_eq!(pair[1], raw);
        }
    }

    #[test]
    fn failed_exchange_still_releases_chip_select() {
        let mut device = SimulatedDevice::new();
        device.fail_on_transfer = Some(1);
        let mut protocol = RegisterProtocol::new(device);

        let result = protocol.read_register(RegisterAddress::new(0x28).unwrap());

        assert_eq!(result, Err(()));
        assert_eq!(
            protocol.release().events,
            [Event::Select, Event::Transfer(0xA8), Event::Deselect]
        );
    }

    #[test]
    fn borrowed_transport_is_accepted() {
        let mut device = SimulatedDevice::new();
        {
            let mut protocol = RegisterProtocol::new(&mut device);
            protocol
                .write_register(RegisterAddress::new(0x23).unwrap(), 0x88)
                .unwrap();
        }
        assert_eq!(device.registers[0x23], 0x88);
    }
}
