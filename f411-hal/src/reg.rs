//! Raw access to memory-mapped registers.
//!
//! Drivers never do address arithmetic themselves. Identifiers such
//! as [Port][crate::gpio::Port] and [Channel][crate::spi::Channel]
//! map to a [Block], and a [Block] hands out [Reg]s at fixed offsets.

/// Something that can read and write 32-bit registers by address.
///
/// [Mmio] is the real thing. The simulator implements this too, so
/// everything above this layer can run on the host.
pub trait RegisterAccess {
    /// Read the register at `address`.
    ///
    /// # Safety
    /// `address` must name a readable register. Reads of some
    /// registers have side effects (clearing status flags, for
    /// example).
    unsafe fn read(&self, address: u32) -> u32;

    /// Write `value` to the register at `address`.
    ///
    /// # Safety
    /// `address` must name a writable register, and the write must
    /// not break an invariant some other owner depends on.
    unsafe fn write(&self, address: u32, value: u32);

    /// Read, modify, and write back the register at `address`.
    ///
    /// # Safety
    /// Same as [read()][Self::read] and [write()][Self::write].
    #[inline(always)]
    unsafe fn modify(&self, address: u32, f: impl FnOnce(u32) -> u32) {
        let value = self.read(address);
        self.write(address, f(value));
    }
}

impl<T> RegisterAccess for &T
where
    T: RegisterAccess + ?Sized,
{
    #[inline(always)]
    unsafe fn read(&self, address: u32) -> u32 {
        T::read(self, address)
    }

    #[inline(always)]
    unsafe fn write(&self, address: u32, value: u32) {
        T::write(self, address, value)
    }
}

/// Volatile access to the real memory-mapped peripherals.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Get a handle to the memory-mapped peripherals.
    ///
    /// # Safety
    /// Outside of [Peripherals::take()][crate::Peripherals::take()],
    /// nothing stops two owners from driving the same peripheral.
    #[inline(always)]
    pub const unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl Clone for Mmio {
    #[inline(always)]
    fn clone(&self) -> Self {
        // safety: we are already holding a handle
        unsafe { Self::steal() }
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    unsafe fn read(&self, address: u32) -> u32 {
        core::ptr::read_volatile(address as usize as *const u32)
    }

    #[inline(always)]
    unsafe fn write(&self, address: u32, value: u32) {
        core::ptr::write_volatile(address as usize as *mut u32, value)
    }
}

/// An opaque handle to one peripheral's register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Block {
    base: u32,
}

impl Block {
    #[inline(always)]
    pub(crate) const fn new(base: u32) -> Self {
        Self { base }
    }

    /// The base address of this block.
    #[inline(always)]
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// The address of the register at `offset` in this block.
    #[inline(always)]
    pub const fn address(&self, offset: u32) -> u32 {
        self.base + offset
    }

    /// Bind the register at `offset` to an accessor.
    ///
    /// # Safety
    /// `offset` must be a register of this block.
    #[inline(always)]
    pub(crate) unsafe fn reg<R>(self, io: &R, offset: u32) -> Reg<'_, R>
    where
        R: RegisterAccess,
    {
        Reg {
            io,
            address: self.address(offset),
        }
    }
}

/// A single register, bound to the accessor that reaches it.
///
/// These only come from a [Block], so the address is always valid.
pub struct Reg<'a, R> {
    io: &'a R,
    address: u32,
}

impl<'a, R> Reg<'a, R>
where
    R: RegisterAccess,
{
    /// The address of this register.
    #[inline(always)]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Read this register.
    #[inline(always)]
    pub fn read(&self) -> u32 {
        // safety: address came from a validated block
        unsafe { self.io.read(self.address) }
    }

    /// Write this register.
    #[inline(always)]
    pub fn write(&self, value: u32) {
        // safety: address came from a validated block
        unsafe { self.io.write(self.address, value) }
    }

    /// Read, modify, and write back this register.
    #[inline(always)]
    pub fn modify(&self, f: impl FnOnce(u32) -> u32) {
        // safety: address came from a validated block
        unsafe { self.io.modify(self.address, f) }
    }

    /// Set the bits in `mask`, leave the rest alone.
    #[inline(always)]
    pub fn set_bits(&self, mask: u32) {
        self.modify(|r| r | mask)
    }

    /// Clear the bits in `mask`, leave the rest alone.
    #[inline(always)]
    pub fn clear_bits(&self, mask: u32) {
        self.modify(|r| r & !mask)
    }

    /// Replace the `width`-bit field at `shift` with `value`.
    #[inline(always)]
    pub fn write_field(&self, shift: u32, width: u32, value: u32) {
        let mask = ((1u32 << width) - 1) << shift;
        self.modify(|r| (r & !mask) | ((value << shift) & mask))
    }

    /// Are all the bits in `mask` set?
    #[inline(always)]
    pub fn is_set(&self, mask: u32) -> bool {
        self.read() & mask == mask
    }
}
