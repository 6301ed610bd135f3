//! Polled transport for a USART running in synchronous (SPI master) mode.
//!
//! Each exchange waits for the transmit buffer to drain (`STATUS.TXBL`), loads
//! `TXDATA`, waits for transmission complete (`STATUS.TXC`) and then reads
//! `RXDATA`. How long those waits may spin is set by a [`WaitPolicy`].

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;

use super::{BusError, Transport};
use crate::config::BusConfig;
use crate::params::{BusInstance, WaitPolicy};

/// `CTRL.SYNC`: synchronous mode.
pub const CTRL_SYNC: u32 = 1 << 0;
/// `CTRL.CLKPOL`: clock idles high.
pub const CTRL_CLKPOL: u32 = 1 << 8;
/// `CTRL.CLKPHA`: sample on the trailing edge.
pub const CTRL_CLKPHA: u32 = 1 << 9;
/// `CTRL.MSBF`: most significant bit first.
pub const CTRL_MSBF: u32 = 1 << 10;
/// `CTRL.TXBIL`: TXBL raised when the buffer is empty.
pub const CTRL_TXBIL: u32 = 1 << 12;
/// `CMD.RXEN`.
pub const CMD_RXEN: u32 = 1 << 0;
/// `CMD.TXEN`.
pub const CMD_TXEN: u32 = 1 << 2;
/// `CMD.MASTEREN`.
pub const CMD_MASTEREN: u32 = 1 << 4;
/// `FRAME.DATABITS` encoding for eight data bits.
pub const FRAME_DATABITS_EIGHT: u32 = 0x5;
/// `ROUTE.RXPEN`.
pub const ROUTE_RXPEN: u32 = 1 << 0;
/// `ROUTE.TXPEN`.
pub const ROUTE_TXPEN: u32 = 1 << 1;
/// `ROUTE.CLKPEN`.
pub const ROUTE_CLKPEN: u32 = 1 << 3;
/// Bit offset of `ROUTE.LOCATION`.
pub const ROUTE_LOCATION_SHIFT: u32 = 8;
/// `STATUS.TXC`: transmission complete.
pub const STATUS_TXC: u32 = 1 << 5;
/// `STATUS.TXBL`: transmit buffer level reached.
pub const STATUS_TXBL: u32 = 1 << 6;
/// Writable bits of `CLKDIV.DIV`.
pub const CLKDIV_MASK: u32 = 0x001F_FFC0;

const CTRL_SPI_MODE: u32 = CTRL_SYNC | CTRL_CLKPOL | CTRL_CLKPHA | CTRL_MSBF | CTRL_TXBIL;
const CMD_ENABLE: u32 = CMD_RXEN | CMD_TXEN | CMD_MASTEREN;
const ROUTE_PINS: u32 = ROUTE_RXPEN | ROUTE_TXPEN | ROUTE_CLKPEN;

/// USART registers touched by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsartRegister {
    /// `CTRL`.
    Ctrl,
    /// `FRAME`.
    Frame,
    /// `CMD`.
    Cmd,
    /// `STATUS`.
    Status,
    /// `CLKDIV`.
    ClkDiv,
    /// `RXDATA`.
    RxData,
    /// `TXDATA`.
    TxData,
    /// `ROUTE`.
    Route,
}

impl UsartRegister {
    /// Byte offset from the peripheral base address.
    pub const fn offset(self) -> usize {
        match self {
            Self::Ctrl => 0x000,
            Self::Frame => 0x004,
            Self::Cmd => 0x00C,
            Self::Status => 0x010,
            Self::ClkDiv => 0x014,
            Self::RxData => 0x01C,
            Self::TxData => 0x034,
            Self::Route => 0x054,
        }
    }
}

/// Word-level access to one USART register block.
pub trait UsartRegisters {
    /// Reads a register.
    fn read(&mut self, register: UsartRegister) -> u32;

    /// Writes a register.
    fn write(&mut self, register: UsartRegister, value: u32);

    /// Read-modify-write helper.
    fn modify<F>(&mut self, register: UsartRegister, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let current = self.read(register);
        self.write(register, f(current));
    }
}

/// Memory-mapped register block of an on-chip USART.
pub struct MmioUsart {
    base: usize,
}

impl MmioUsart {
    /// Creates a handle to the registers of `instance`.
    ///
    /// # Safety
    ///
    /// `instance` must exist on the running part, its clock must be enabled,
    /// and no other code may access the same registers while the handle lives.
    pub const unsafe fn new(instance: BusInstance) -> Self {
        Self {
            base: instance.base_address(),
        }
    }

    fn register_ptr(&self, register: UsartRegister) -> *mut u32 {
        (self.base + register.offset()) as *mut u32
    }
}

impl UsartRegisters for MmioUsart {
    fn read(&mut self, register: UsartRegister) -> u32 {
        // SAFETY: the address lies inside the register block handed over in `new`.
        unsafe { core::ptr::read_volatile(self.register_ptr(register)) }
    }

    fn write(&mut self, register: UsartRegister, value: u32) {
        // SAFETY: the address lies inside the register block handed over in `new`.
        unsafe { core::ptr::write_volatile(self.register_ptr(register), value) }
    }
}

/// Computes `CLKDIV` for synchronous mode: `256 * (f_periph / (2 * f_bus) - 1)`.
///
/// Returns `None` when `speed_hz` is zero or above half the peripheral clock.
pub fn clock_divider(peripheral_clock_hz: u32, speed_hz: u32) -> Option<u32> {
    if speed_hz == 0 || speed_hz > peripheral_clock_hz / 2 {
        return None;
    }
    let scaled = u64::from(peripheral_clock_hz) * 128 / u64::from(speed_hz);
    let divider = u32::try_from(scaled - 256).unwrap_or(u32::MAX);
    Some(divider & CLKDIV_MASK)
}

/// Transport driving a USART register block plus a GPIO chip-select.
pub struct UsartTransport<R, CS> {
    regs: R,
    cs: CS,
    wait: WaitPolicy,
}

impl<R, CS> UsartTransport<R, CS> {
    /// Creates a transport that waits on status flags without a bound.
    pub const fn new(regs: R, cs: CS) -> Self {
        Self {
            regs,
            cs,
            wait: WaitPolicy::Unbounded,
        }
    }

    /// Replaces the status-flag wait policy.
    pub fn with_wait_policy(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Returns the active wait policy.
    pub fn wait_policy(&self) -> WaitPolicy {
        self.wait
    }

    /// Consumes the transport and returns the register block and pin.
    pub fn release(self) -> (R, CS) {
        (self.regs, self.cs)
    }
}

impl<R, CS> UsartTransport<R, CS>
where
    R: UsartRegisters,
    CS: OutputPin,
{
    fn wait_for(&mut self, flag: u32) -> core::result::Result<(), BusError<Infallible, CS::Error>> {
        match self.wait {
            WaitPolicy::Unbounded => {
                while self.regs.read(UsartRegister::Status) & flag == 0 {
                    core::hint::spin_loop();
                }
                Ok(())
            }
            WaitPolicy::Bounded { max_polls } => {
                for _ in 0..max_polls {
                    if self.regs.read(UsartRegister::Status) & flag != 0 {
                        return Ok(());
                    }
                    core::hint::spin_loop();
                }
                warn!("usart status flag {:#x} not raised after {} polls", flag, max_polls);
                Err(BusError::Timeout)
            }
        }
    }
}

impl<R, CS> Transport for UsartTransport<R, CS>
where
    R: UsartRegisters,
    CS: OutputPin,
{
    type Error = BusError<Infallible, CS::Error>;

    fn configure(&mut self, config: &BusConfig) -> core::result::Result<(), Self::Error> {
        let Some(divider) = clock_divider(config.peripheral_clock_hz, config.speed_hz) else {
            warn!(
                "usart: {} Hz unreachable from a {} Hz peripheral clock",
                config.speed_hz,
                config.peripheral_clock_hz
            );
            return Err(BusError::UnsupportedSpeed);
        };
        let location = u32::from(config.location.index()) << ROUTE_LOCATION_SHIFT;
        debug!("usart: clkdiv {:#x}, route location {}", divider, config.location.index());

        self.wait = config.wait;
        self.regs.modify(UsartRegister::Ctrl, |ctrl| ctrl | CTRL_SPI_MODE);
        self.regs.write(UsartRegister::ClkDiv, divider);
        self.regs.write(UsartRegister::Cmd, CMD_ENABLE);
        self.regs.write(UsartRegister::Frame, FRAME_DATABITS_EIGHT);
        self.regs
            .modify(UsartRegister::Route, |route| route | location | ROUTE_PINS);

        // Idle with the sensor deselected.
        self.cs.set_high().map_err(BusError::ChipSelect)
    }

    fn select(&mut self) -> core::result::Result<(), Self::Error> {
        self.cs.set_low().map_err(BusError::ChipSelect)
    }

    fn deselect(&mut self) -> core::result::Result<(), Self::Error> {
        self.cs.set_high().map_err(BusError::ChipSelect)
    }

    fn transfer(&mut self, byte: u8) -> core::result::Result<u8, Self::Error> {
        self.wait_for(STATUS_TXBL)?;
        self.regs.write(UsartRegister::TxData, u32::from(byte));
        self.wait_for(STATUS_TXC)?;
        Ok((self.regs.read(UsartRegister::RxData) & 0xFF) as u8)
    }
}
