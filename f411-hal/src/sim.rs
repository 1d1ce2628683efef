//! A host-side stand-in for the memory-mapped peripherals.
//!
//! [Simulator] implements [RegisterAccess], so every driver in this
//! crate (and anything built on them) runs against it unchanged. It
//! models just enough of the hardware to be useful in tests:
//!
//! * plain registers are memory, with [Event::Write] logged;
//! * GPIO `BSRR` / `ODR` writes update the output state and log
//!   [Event::Pin] for every pin that changes;
//! * SPI `DR` writes log [Event::Mosi], exchange a frame with any
//!   attached and selected [Slave] and log [Event::Miso], and `SR`
//!   reports `TXE`, `RXNE`, `OVR` and `BSY` the way the drivers expect;
//! * any SPI status flag can be [stalled][Simulator::stall()] to force
//!   a timeout.

use core::cell::RefCell;
use std::boxed::Box;
use std::collections::BTreeMap;
use std::vec::Vec;

use crate::gpio::{PinId, PinState, Port};
use crate::reg::RegisterAccess;
use crate::spi::{Channel, Flag, Status};

// register offsets the simulator gives meaning to
const GPIO_ODR: u32 = 0x14;
const GPIO_BSRR: u32 = 0x18;
const SPI_SR: u32 = 0x08;
const SPI_DR: u32 = 0x0c;

// every block is 1 KiB
const BLOCK_SIZE: u32 = 0x400;

/// Something that happened on the simulated hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A register write, as issued by a driver.
    Write { address: u32, value: u32 },
    /// An output pin changed state.
    Pin(PinId, PinState),
    /// A frame sent by the controller.
    Mosi(Channel, u16),
    /// A frame clocked back in from the bus.
    Miso(Channel, u16),
}

/// A device model on a simulated SPI bus.
pub trait Slave {
    /// Chip-select went active.
    fn select(&mut self) {}

    /// Exchange one frame while selected.
    fn exchange(&mut self, mosi: u16) -> u16;

    /// Chip-select went inactive.
    fn deselect(&mut self) {}
}

#[derive(Debug, Default)]
struct SpiState {
    rx: u16,
    rx_pending: bool,
    overrun: bool,
    // a DR read arms the SR read that clears OVR
    dr_read: bool,
    stalled: [bool; 3],
}

impl SpiState {
    fn stalled(&self, flag: Flag) -> bool {
        self.stalled[flag as usize]
    }

    fn status(&self) -> Status {
        let mut status = Status::empty();
        if !self.stalled(Flag::TxEmpty) {
            status |= Status::TXE;
        }
        if self.rx_pending && !self.stalled(Flag::RxNotEmpty) {
            status |= Status::RXNE;
        }
        if self.overrun {
            status |= Status::OVR;
        }
        if self.stalled(Flag::NotBusy) {
            status |= Status::BSY;
        }
        status
    }
}

struct Attached {
    channel: Channel,
    cs: Option<PinId>,
    selected: bool,
    slave: Box<dyn Slave>,
}

#[derive(Default)]
struct State {
    memory: BTreeMap<u32, u32>,
    events: Vec<Event>,
    spi: [SpiState; 4],
    slaves: Vec<Attached>,
}

impl State {
    fn load(&self, address: u32) -> u32 {
        self.memory.get(&address).copied().unwrap_or(0)
    }

    fn pin_state(&self, pin: PinId) -> PinState {
        let odr = self.load(pin.port().block().address(GPIO_ODR));
        (odr & pin.mask() != 0).into()
    }

    fn set_odr(&mut self, port: Port, value: u32) {
        let address = port.block().address(GPIO_ODR);
        let old = self.load(address);
        let value = value & 0xffff;
        self.memory.insert(address, value);

        for pin in 0..16 {
            if (old ^ value) & (1 << pin) == 0 {
                continue;
            }
            let Some(id) = PinId::try_new(port, pin) else {
                continue;
            };
            let state = self.pin_state(id);
            self.events.push(Event::Pin(id, state));

            for attached in self.slaves.iter_mut().filter(|a| a.cs == Some(id)) {
                match state {
                    PinState::Low if !attached.selected => {
                        attached.selected = true;
                        attached.slave.select();
                    }
                    PinState::High if attached.selected => {
                        attached.selected = false;
                        attached.slave.deselect();
                    }
                    _ => {}
                }
            }
        }
    }

    fn spi_write(&mut self, channel: Channel, value: u32) {
        let mosi = value as u16;
        self.events.push(Event::Mosi(channel, mosi));

        let mut miso = 0;
        for attached in self
            .slaves
            .iter_mut()
            .filter(|a| a.channel == channel && a.selected)
        {
            miso |= attached.slave.exchange(mosi);
        }
        self.events.push(Event::Miso(channel, miso));

        let spi = &mut self.spi[channel.index()];
        if spi.rx_pending {
            spi.overrun = true;
        }
        spi.rx = miso;
        spi.rx_pending = true;
        spi.dr_read = false;
    }

    fn spi_read(&mut self, channel: Channel, offset: u32) -> u32 {
        let spi = &mut self.spi[channel.index()];
        match offset {
            SPI_DR => {
                spi.rx_pending = false;
                spi.dr_read = true;
                spi.rx as u32
            }
            SPI_SR => {
                let status = spi.status();
                if spi.dr_read {
                    spi.overrun = false;
                }
                spi.dr_read = false;
                status.bits()
            }
            _ => 0,
        }
    }
}

fn decode_port(address: u32) -> Option<(Port, u32)> {
    Port::ALL.iter().find_map(|port| {
        let offset = address.wrapping_sub(port.block().base());
        (offset < BLOCK_SIZE).then_some((*port, offset))
    })
}

fn decode_channel(address: u32) -> Option<(Channel, u32)> {
    Channel::ALL.iter().find_map(|channel| {
        let offset = address.wrapping_sub(channel.block().base());
        (offset < BLOCK_SIZE).then_some((*channel, offset))
    })
}

/// A simulated register file.
///
/// Share it by reference: `&Simulator` is the [RegisterAccess]
/// handed to drivers.
#[derive(Default)]
pub struct Simulator {
    state: RefCell<State>,
}

impl core::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Simulator").finish_non_exhaustive()
    }
}

impl Simulator {
    /// A simulator with every register zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a register without side effects.
    pub fn peek(&self, address: u32) -> u32 {
        let state = self.state.borrow();
        match decode_channel(address) {
            Some((channel, SPI_SR)) => state.spi[channel.index()].status().bits(),
            Some((channel, SPI_DR)) => state.spi[channel.index()].rx as u32,
            _ => state.load(address),
        }
    }

    /// Set a register without side effects or events.
    ///
    /// Use this to set up input registers such as GPIO `IDR`.
    pub fn poke(&self, address: u32, value: u32) {
        self.state.borrow_mut().memory.insert(address, value);
    }

    /// Every plain register written so far.
    pub fn memory(&self) -> BTreeMap<u32, u32> {
        self.state.borrow().memory.clone()
    }

    /// Everything that has happened so far, oldest first.
    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    /// Forget the event log.
    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// The state an output pin is being driven to.
    pub fn pin(&self, pin: PinId) -> PinState {
        self.state.borrow().pin_state(pin)
    }

    /// Hold a status flag in its not-ready state until unstalled.
    pub fn stall(&self, channel: Channel, flag: Flag) {
        self.state.borrow_mut().spi[channel.index()].stalled[flag as usize] = true;
    }

    /// Let a stalled status flag behave normally again.
    pub fn unstall(&self, channel: Channel, flag: Flag) {
        self.state.borrow_mut().spi[channel.index()].stalled[flag as usize] = false;
    }

    /// Put a device model on a channel.
    ///
    /// With a chip-select pin, the device only answers while that
    /// output is low. Without one, it is always selected.
    pub fn attach(&self, channel: Channel, cs: Option<PinId>, slave: impl Slave + 'static) {
        let mut state = self.state.borrow_mut();
        let mut slave: Box<dyn Slave> = Box::new(slave);
        let selected = cs.map_or(true, |pin| state.pin_state(pin).is_low());
        if selected {
            slave.select();
        }
        state.slaves.push(Attached {
            channel,
            cs,
            selected,
            slave,
        });
    }
}

impl RegisterAccess for Simulator {
    unsafe fn read(&self, address: u32) -> u32 {
        let mut state = self.state.borrow_mut();
        match decode_channel(address) {
            Some((channel, offset @ (SPI_SR | SPI_DR))) => state.spi_read(channel, offset),
            _ => state.load(address),
        }
    }

    unsafe fn write(&self, address: u32, value: u32) {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Write { address, value });

        if let Some((port, offset)) = decode_port(address) {
            match offset {
                GPIO_BSRR => {
                    let odr = state.load(port.block().address(GPIO_ODR));
                    // set wins over reset
                    let odr = (odr & !(value >> 16)) | (value & 0xffff);
                    state.set_odr(port, odr);
                    return;
                }
                GPIO_ODR => {
                    state.set_odr(port, value);
                    return;
                }
                _ => {}
            }
        }

        if let Some((channel, SPI_DR)) = decode_channel(address) {
            state.spi_write(channel, value);
            return;
        }

        state.memory.insert(address, value);
    }
}
