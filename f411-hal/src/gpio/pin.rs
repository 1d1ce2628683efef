use crate::reg::RegisterAccess;

use super::{PinId, BSRR, IDR, ODR};

/// Digital pin state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Low = 0,
    High = 1,
}

impl From<bool> for PinState {
    #[inline(always)]
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl core::ops::Not for PinState {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

impl PinState {
    /// Is the pin high?
    #[inline(always)]
    pub fn is_high(&self) -> bool {
        *self == Self::High
    }

    /// Is the pin low?
    #[inline(always)]
    pub fn is_low(&self) -> bool {
        *self == Self::Low
    }
}

#[inline(always)]
pub(super) fn read_input<R: RegisterAccess>(io: &R, pin: PinId) -> PinState {
    pin.reg(io, IDR).is_set(pin.mask()).into()
}

#[inline(always)]
pub(super) fn read_output<R: RegisterAccess>(io: &R, pin: PinId) -> PinState {
    pin.reg(io, ODR).is_set(pin.mask()).into()
}

// BSRR writes are atomic per pin, no read-modify-write of ODR
#[inline(always)]
pub(super) fn write_output<R: RegisterAccess>(io: &R, pin: PinId, state: PinState) {
    let bit = match state {
        PinState::High => pin.mask(),
        PinState::Low => pin.mask() << 16,
    };
    pin.reg(io, BSRR).write(bit);
}

#[inline(always)]
pub(super) fn toggle_output<R: RegisterAccess>(io: &R, pin: PinId) {
    write_output(io, pin, !read_output(io, pin));
}

/// Exclusive control of one pin as an output.
///
/// The pin must already be configured as an output, usually by
/// [Gpio::init()][super::Gpio::init()].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Output<R> {
    io: R,
    id: PinId,
}

impl<R> Output<R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    pub(super) fn new(io: R, id: PinId) -> Self {
        Self { io, id }
    }

    /// Which pin this is.
    #[inline(always)]
    pub fn id(&self) -> PinId {
        self.id
    }

    /// Get the current output drive state.
    #[inline(always)]
    pub fn get_state(&self) -> PinState {
        read_output(&self.io, self.id)
    }

    /// Is the output set high?
    #[inline(always)]
    pub fn is_set_high(&self) -> bool {
        self.get_state().is_high()
    }

    /// Is the output set low?
    #[inline(always)]
    pub fn is_set_low(&self) -> bool {
        self.get_state().is_low()
    }

    /// Set the current output drive state.
    #[inline(always)]
    pub fn set_state(&mut self, state: PinState) {
        write_output(&self.io, self.id, state)
    }

    /// Set the current output high.
    #[inline(always)]
    pub fn set_high(&mut self) {
        self.set_state(PinState::High);
    }

    /// Set the current output low.
    #[inline(always)]
    pub fn set_low(&mut self) {
        self.set_state(PinState::Low);
    }

    /// Toggle the output.
    #[inline(always)]
    pub fn toggle(&mut self) {
        toggle_output(&self.io, self.id)
    }
}

/// Exclusive control of one pin as an input.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Input<R> {
    io: R,
    id: PinId,
}

impl<R> Input<R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    pub(super) fn new(io: R, id: PinId) -> Self {
        Self { io, id }
    }

    /// Which pin this is.
    #[inline(always)]
    pub fn id(&self) -> PinId {
        self.id
    }

    /// Read the input pin.
    #[inline(always)]
    pub fn read(&self) -> PinState {
        read_input(&self.io, self.id)
    }

    /// Is the input pin high?
    #[inline(always)]
    pub fn is_high(&self) -> bool {
        self.read().is_high()
    }

    /// Is the input pin low?
    #[inline(always)]
    pub fn is_low(&self) -> bool {
        self.read().is_low()
    }
}
