//! Board bring-up hooks invoked by [`Lis3dh::init`](crate::Lis3dh::init).

use crate::config::BusConfig;

/// Clock gating and pin muxing owned by the board support code.
///
/// HALs that configure clocks and pins before handing out peripherals can pass
/// `&mut ()`, which does nothing.
pub trait Platform {
    /// Enables the GPIO and USART peripheral clocks.
    fn enable_clocks(&mut self, bus: &BusConfig);

    /// Configures MOSI/CLK/CS as push-pull outputs and MISO as input.
    fn configure_pins(&mut self, bus: &BusConfig);
}

impl Platform for () {
    fn enable_clocks(&mut self, _bus: &BusConfig) {}

    fn configure_pins(&mut self, _bus: &BusConfig) {}
}
