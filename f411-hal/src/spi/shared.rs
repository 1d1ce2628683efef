//! An SPI bus that can be shared between several devices.
//!
//! Each device keeps its own chip-select pin. Every operation borrows
//! the bus inside a critical section, so operations never interleave
//! at the word level. Keeping a chip-select transaction whole is up
//! to the devices, which is trivially true in a single polling loop.

use core::cell::RefCell;

use critical_section::{with, Mutex};
use embedded_hal_1::spi as hal1;

use crate::reg::RegisterAccess;

use super::{Bus, Error, Word};

/// Storage for a shared SPI bus.
#[derive(Debug)]
pub struct SharedBusController<R> {
    bus: Mutex<RefCell<Bus<R>>>,
}

/// One user's handle to a shared SPI bus.
#[derive(Debug)]
pub struct SharedBus<'a, R> {
    bus: &'a Mutex<RefCell<Bus<R>>>,
}

impl<R> SharedBusController<R>
where
    R: RegisterAccess,
{
    /// Share a bus.
    pub fn new(bus: Bus<R>) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(bus)),
        }
    }

    /// Stop sharing and recover the bus.
    pub fn free(self) -> Bus<R> {
        self.bus.into_inner().into_inner()
    }

    /// Acquire an instance of the shared bus.
    pub fn acquire(&self) -> SharedBus<'_, R> {
        SharedBus { bus: &self.bus }
    }
}

impl<'a, R> SharedBus<'a, R>
where
    R: RegisterAccess,
{
    /// Borrow the underlying bus for the length of `f`.
    pub fn with_bus<T>(&self, f: impl FnOnce(&mut Bus<R>) -> T) -> T {
        with(|cs| f(&mut self.bus.borrow_ref_mut(cs)))
    }
}

impl<'a, R> hal1::ErrorType for SharedBus<'a, R>
where
    R: RegisterAccess,
{
    type Error = Error;
}

impl<'a, R, W> hal1::SpiBus<W> for SharedBus<'a, R>
where
    R: RegisterAccess,
    W: Word,
{
    fn read(&mut self, words: &mut [W]) -> Result<(), Self::Error> {
        self.with_bus(|bus| hal1::SpiBus::read(bus, words))
    }

    fn write(&mut self, words: &[W]) -> Result<(), Self::Error> {
        self.with_bus(|bus| hal1::SpiBus::write(bus, words))
    }

    fn transfer(&mut self, read: &mut [W], write: &[W]) -> Result<(), Self::Error> {
        self.with_bus(|bus| hal1::SpiBus::transfer(bus, read, write))
    }

    fn transfer_in_place(&mut self, words: &mut [W]) -> Result<(), Self::Error> {
        self.with_bus(|bus| hal1::SpiBus::transfer_in_place(bus, words))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.with_bus(|bus| hal1::SpiBus::<W>::flush(bus))
    }
}
