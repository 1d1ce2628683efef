//! Register-level GPIO and SPI drivers for STM32F411 parts.
//!
//! Everything here talks to the hardware through a
//! [RegisterAccess][reg::RegisterAccess] implementation. On the
//! target that is [reg::Mmio], handed out once by
//! [Peripherals::take()]. With the `sim` feature, [sim::Simulator]
//! stands in for the hardware so drivers can be exercised on the
//! host.

#![no_std]

#[cfg(any(test, feature = "sim"))]
extern crate std;

#[macro_use]
mod fmt;

pub mod prelude;

pub mod block;
pub mod gpio;
pub mod power;
pub mod reg;
pub mod spi;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

mod peripherals;
pub use peripherals::*;

/// A numeric identifier that does not name anything on this part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidIdentifier(pub u8);

impl core::fmt::Display for InvalidIdentifier {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "no peripheral with identifier {}", self.0)
    }
}
