//! Interfaces for interacting with GPIO pins.
//!
//! Pins are configured in bulk from a table of [PinConfig] with
//! [Gpio::init()], then driven either by [PinId] through [Gpio], or
//! through an exclusive [Output] / [Input] handle that implements the
//! embedded-hal digital traits.

use crate::reg::{Block, Reg, RegisterAccess};
use crate::InvalidIdentifier;

mod config;
pub use config::*;

mod hal02;
mod hal1;

mod pin;
pub use pin::*;

const MODER: u32 = 0x00;
const OTYPER: u32 = 0x04;
const OSPEEDR: u32 = 0x08;
const PUPDR: u32 = 0x0c;
const IDR: u32 = 0x10;
const ODR: u32 = 0x14;
const BSRR: u32 = 0x18;
const AFRL: u32 = 0x20;
const AFRH: u32 = 0x24;

/// A GPIO port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    H,
}

impl Port {
    /// Every port, in register table order.
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::H];

    /// The register block for this port.
    #[inline(always)]
    pub const fn block(self) -> Block {
        match self {
            Self::A => Block::new(0x4002_0000),
            Self::B => Block::new(0x4002_0400),
            Self::C => Block::new(0x4002_0800),
            Self::D => Block::new(0x4002_0c00),
            Self::H => Block::new(0x4002_1c00),
        }
    }

    /// A mask of the pins bonded out on this port.
    #[inline(always)]
    pub const fn available_pins(self) -> u16 {
        match self {
            Self::A => 0xffff,
            // no PB11 on this package
            Self::B => 0xf7ff,
            Self::C => 0xffff,
            Self::D => 1 << 2,
            Self::H => 0b11,
        }
    }

    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for Port {
    type Error = InvalidIdentifier;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(InvalidIdentifier(value))
    }
}

/// A single pin, validated against the port it lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    port: Port,
    pin: u8,
}

impl PinId {
    /// Name a pin.
    ///
    /// # Panics
    /// If the pin does not exist on this port.
    #[inline(always)]
    pub const fn new(port: Port, pin: u8) -> Self {
        match Self::try_new(port, pin) {
            Some(id) => id,
            None => panic!("pin does not exist on this port"),
        }
    }

    /// Name a pin, or [None] if it does not exist on this port.
    #[inline(always)]
    pub const fn try_new(port: Port, pin: u8) -> Option<Self> {
        if pin < 16 && port.available_pins() & (1 << pin) != 0 {
            Some(Self { port, pin })
        } else {
            None
        }
    }

    /// The port this pin is on.
    #[inline(always)]
    pub const fn port(&self) -> Port {
        self.port
    }

    /// The pin number within the port.
    #[inline(always)]
    pub const fn pin(&self) -> u8 {
        self.pin
    }

    /// This pin's bit in the IDR / ODR registers.
    #[inline(always)]
    pub const fn mask(&self) -> u32 {
        1 << self.pin
    }

    #[inline(always)]
    pub(crate) fn reg<'a, R>(&self, io: &'a R, offset: u32) -> Reg<'a, R>
    where
        R: RegisterAccess,
    {
        // safety: every offset used in this module is a GPIO register,
        // and the port names a real block
        unsafe { self.port.block().reg(io, offset) }
    }
}

/// The GPIO driver, owning every port.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gpio<R> {
    io: R,
    taken: [u16; 5],
}

impl<R> Gpio<R>
where
    R: RegisterAccess,
{
    /// Take control of the GPIO ports.
    #[inline(always)]
    pub fn new(io: R) -> Self {
        Self { io, taken: [0; 5] }
    }

    /// Configure every pin in the table, in order.
    pub fn init(&mut self, configs: &[PinConfig]) {
        for config in configs {
            self.configure(config);
        }
    }

    /// Configure a single pin.
    ///
    /// Only the fields belonging to this pin are written.
    pub fn configure(&mut self, config: &PinConfig) {
        let id = config.pin;
        let pin = id.pin() as u32;
        trace!("gpio: configure {}", id);

        id.reg(&self.io, MODER)
            .write_field(pin * 2, 2, config.mode.bits());
        id.reg(&self.io, OTYPER)
            .write_field(pin, 1, config.output_type.bits());
        id.reg(&self.io, OSPEEDR)
            .write_field(pin * 2, 2, config.speed.bits());
        id.reg(&self.io, PUPDR)
            .write_field(pin * 2, 2, config.pull.bits());

        let (afr, shift) = if pin < 8 {
            (AFRL, pin * 4)
        } else {
            (AFRH, (pin - 8) * 4)
        };
        id.reg(&self.io, afr)
            .write_field(shift, 4, config.function.bits());
    }

    /// Read the input state of a pin.
    #[inline(always)]
    pub fn read(&self, pin: PinId) -> PinState {
        pin::read_input(&self.io, pin)
    }

    /// Drive a pin to a state.
    ///
    /// # Panics
    /// If this pin has been handed out as a handle.
    #[inline(always)]
    pub fn write(&mut self, pin: PinId, state: PinState) {
        self.assert_free(pin);
        pin::write_output(&self.io, pin, state)
    }

    /// Flip the output state of a pin.
    ///
    /// # Panics
    /// If this pin has been handed out as a handle.
    #[inline(always)]
    pub fn toggle(&mut self, pin: PinId) {
        self.assert_free(pin);
        pin::toggle_output(&self.io, pin)
    }

    /// The state this pin is being driven to.
    #[inline(always)]
    pub fn output_state(&self, pin: PinId) -> PinState {
        pin::read_output(&self.io, pin)
    }

    /// Hand out exclusive control of a pin as an output.
    ///
    /// Returns [None] if the pin is already handed out.
    pub fn take_output(&mut self, pin: PinId) -> Option<Output<R>>
    where
        R: Clone,
    {
        self.claim(pin)?;
        Some(Output::new(self.io.clone(), pin))
    }

    /// Hand out exclusive control of a pin as an input.
    ///
    /// Returns [None] if the pin is already handed out.
    pub fn take_input(&mut self, pin: PinId) -> Option<Input<R>>
    where
        R: Clone,
    {
        self.claim(pin)?;
        Some(Input::new(self.io.clone(), pin))
    }

    /// Give back an output handle.
    #[inline(always)]
    pub fn release_output(&mut self, pin: Output<R>) {
        self.unclaim(pin.id());
    }

    /// Give back an input handle.
    #[inline(always)]
    pub fn release_input(&mut self, pin: Input<R>) {
        self.unclaim(pin.id());
    }

    /// Write any register directly.
    ///
    /// # Safety
    /// Nothing is checked. The caller is responsible for `address`
    /// naming a writable register, and for not confusing the state
    /// of pins that have been handed out.
    #[inline(always)]
    pub unsafe fn register_write(&mut self, address: u32, value: u32) {
        self.io.write(address, value)
    }

    /// Read any register directly.
    ///
    /// # Safety
    /// Nothing is checked. The caller is responsible for `address`
    /// naming a readable register.
    #[inline(always)]
    pub unsafe fn register_read(&self, address: u32) -> u32 {
        self.io.read(address)
    }

    fn claim(&mut self, pin: PinId) -> Option<()> {
        let taken = &mut self.taken[pin.port().index()];
        if *taken & (1 << pin.pin()) != 0 {
            return None;
        }
        *taken |= 1 << pin.pin();
        Some(())
    }

    fn unclaim(&mut self, pin: PinId) {
        self.taken[pin.port().index()] &= !(1 << pin.pin());
    }

    fn assert_free(&self, pin: PinId) {
        assert!(
            self.taken[pin.port().index()] & (1 << pin.pin()) == 0,
            "pin is owned by a handle"
        );
    }
}
