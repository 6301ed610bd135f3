#![allow(dead_code)]

use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

pub use lis3dh_spi::interface::spi::SpiTransport;
pub use lis3dh_spi::{Error, Lis3dh};

pub const DUMMY: u8 = 0x25;

/// Bus expectations for a sequence of register frames.
#[derive(Default)]
pub struct Script {
    spi: Vec<SpiTransaction<u8>>,
    cs: Vec<PinTransaction>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(mut self, address: u8, value: u8) -> Self {
        self.frame(0x80 | address, 0x00, DUMMY, value);
        self
    }

    pub fn write(mut self, address: u8, value: u8) -> Self {
        self.frame(address, 0x00, value, 0x00);
        self
    }

    pub fn mocks(&self) -> (SpiMock<u8>, PinMock) {
        (SpiMock::new(&self.spi), PinMock::new(&self.cs))
    }

    fn frame(&mut self, command: u8, command_reply: u8, data: u8, data_reply: u8) {
        self.cs.push(PinTransaction::set(State::Low));
        self.exchange(command, command_reply);
        self.exchange(data, data_reply);
        self.cs.push(PinTransaction::set(State::High));
    }

    fn exchange(&mut self, out: u8, reply: u8) {
        self.spi
            .push(SpiTransaction::transfer_in_place(vec![out], vec![reply]));
        self.spi.push(SpiTransaction::flush());
    }
}

pub fn finish(lis3dh: Lis3dh<SpiTransport<SpiMock<u8>, PinMock>>) {
    let (mut spi, mut cs, _) = lis3dh.release_spi();
    spi.done();
    cs.done();
}
