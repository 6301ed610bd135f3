//! Register-file double that answers frames the way the sensor's SPI slave does.

use super::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Select,
    Deselect,
    Transfer(u8),
}

pub(crate) struct SimulatedDevice {
    pub(crate) registers: [u8; 128],
    pub(crate) events: Vec<Event>,
    /// Fails the n-th transfer (1-based) with `Err(())`.
    pub(crate) fail_on_transfer: Option<usize>,
    selected: bool,
    command: Option<u8>,
}

impl SimulatedDevice {
    pub(crate) fn new() -> Self {
        Self {
            registers: [0; 128],
            events: Vec::new(),
            fail_on_transfer: None,
            selected: false,
            command: None,
        }
    }

    pub(crate) fn with_register(mut self, address: u8, value: u8) -> Self {
        self.registers[usize::from(address)] = value;
        self
    }

    /// Command bytes of every frame, in bus order.
    pub(crate) fn commands(&self) -> Vec<u8> {
        self.frames().into_iter().map(|(command, _)| command).collect()
    }

    /// `(command, data)` byte pairs of every completed frame.
    pub(crate) fn frames(&self) -> Vec<(u8, u8)> {
        let bytes: Vec<u8> = self
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Transfer(byte) => Some(*byte),
                _ => None,
            })
            .collect();
        bytes.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
    }
}

impl Transport for SimulatedDevice {
    type Error = ();

    fn select(&mut self) -> Result<(), ()> {
        self.events.push(Event::Select);
        self.selected = true;
        self.command = None;
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), ()> {
        self.events.push(Event::Deselect);
        self.selected = false;
        Ok(())
    }

    fn transfer(&mut self, byte: u8) -> Result<u8, ()> {
        self.events.push(Event::Transfer(byte));
        let transfers = self
            .events
            .iter()
            .filter(|event| matches!(event, Event::Transfer(_)))
            .count();
        if self.fail_on_transfer == Some(transfers) {
            return Err(());
        }
        assert!(self.selected, "transfer outside chip-select window");

        match self.command.take() {
            None => {
                self.command = Some(byte);
                Ok(0xFF)
            }
            Some(command) => {
                let address = usize::from(command & 0x7F);
                if command & 0x80 != 0 {
                    Ok(self.registers[address])
                } else {
                    self.registers[address] = byte;
                    Ok(0xFF)
                }
            }
        }
    }
}
