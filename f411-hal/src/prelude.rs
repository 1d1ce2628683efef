//! Traits needed to drive the handles in this crate.

pub use embedded_hal_1::digital::{InputPin, OutputPin, StatefulOutputPin};
pub use embedded_hal_1::spi::SpiBus;
