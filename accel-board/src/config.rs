//! Pin and SPI setup for the board, applied once by
//! [Board::new()][crate::Board::new()].

use crate::hal::gpio::{AltFunction, Mode, PinConfig, PinId, Port, Speed};
use crate::hal::spi::{self, BitOrder, Channel, ClockDivider, Role, SlaveSelect};

/// Accelerometer chip select, active low.
pub const ACCEL_CS: PinId = PinId::new(Port::A, 4);
/// SPI1 clock.
pub const SCK: PinId = PinId::new(Port::A, 5);
/// SPI1 data in.
pub const MISO: PinId = PinId::new(Port::A, 6);
/// SPI1 data out.
pub const MOSI: PinId = PinId::new(Port::A, 7);

/// The channel the accelerometer is wired to.
pub const ACCEL_SPI: Channel = Channel::Spi1;

/// Every pin the board uses.
pub static PINS: [PinConfig; 4] = [
    PinConfig::new(ACCEL_CS).mode(Mode::Output).speed(Speed::High),
    PinConfig::new(SCK)
        .mode(Mode::Alternate)
        .speed(Speed::VeryHigh)
        .function(AltFunction::Af5),
    PinConfig::new(MISO)
        .mode(Mode::Alternate)
        .speed(Speed::VeryHigh)
        .function(AltFunction::Af5),
    PinConfig::new(MOSI)
        .mode(Mode::Alternate)
        .speed(Speed::VeryHigh)
        .function(AltFunction::Af5),
];

/// Every SPI channel the board uses.
///
/// Chip select is a plain GPIO, so NSS is managed in software.
pub static SPI: [spi::Config; 1] = [spi::Config::new(ACCEL_SPI)
    .mode(spi::Mode::MODE_3)
    .role(Role::Master)
    .divider(ClockDivider::Div4)
    .slave_select(SlaveSelect::Software)
    .bit_order(BitOrder::MsbFirst)];
