//! Bring-up and polling for an ADXL345 on SPI1 of an STM32F411.
//!
//! [Board::new()] applies the tables in [config], hands SPI1 and the
//! chip-select pin to the accelerometer driver and starts it
//! measuring. After that, [Board::poll()] reads one sample.

#![no_std]

#[cfg(test)]
extern crate std;

use core::convert::Infallible;

#[macro_use]
mod fmt;

pub mod config;

/// HAL crate, providing the GPIO and SPI drivers.
pub use f411_hal as hal;

/// Accelerometer driver crate.
pub use adxl345;

use adxl345::{Acceleration, Adxl345, Initialized};
use hal::gpio::{Gpio, Output, PinState};
use hal::power::Gates;
use hal::reg::{Mmio, RegisterAccess};
use hal::spi::{self, Bus, Spi};
use hal::Peripherals;

#[cfg(test)]
mod model;

/// The accelerometer driver, as wired on this board.
pub type Accelerometer<R = Mmio> = Adxl345<Bus<R>, Output<R>, Initialized>;

/// An error from the accelerometer or its bus.
pub type AccelError = adxl345::Error<spi::Error, Infallible>;

/// An error during board bring-up or polling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The accelerometer bus or chip-select pin was already handed out.
    Unavailable,
    /// The accelerometer did not respond as expected.
    Accelerometer(AccelError),
}

impl From<AccelError> for Error {
    fn from(e: AccelError) -> Self {
        Self::Accelerometer(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "accelerometer bus or chip select already in use"),
            Self::Accelerometer(adxl345::Error::Spi(e)) => write!(f, "accelerometer: {}", e),
            Self::Accelerometer(adxl345::Error::WrongDevice(id)) => {
                write!(f, "accelerometer: unexpected device id {:#x}", id)
            }
            Self::Accelerometer(adxl345::Error::ChipSelect(e)) => match *e {},
        }
    }
}

/// The board, with its accelerometer running.
///
/// The rest of the GPIO and SPI drivers stay available for anything
/// else on the board.
#[derive(Debug)]
pub struct Board<R = Mmio> {
    pub gpio: Gpio<R>,
    pub spi: Spi<R>,
    pub gates: Gates<R>,
    accel: Accelerometer<R>,
}

impl<R> Board<R>
where
    R: RegisterAccess + Clone,
{
    /// Bring up the board on a set of peripherals.
    ///
    /// Clocks GPIOA and SPI1, applies [config::PINS] and
    /// [config::SPI], checks the accelerometer's device id and puts it
    /// in measurement mode.
    ///
    /// On failure, the peripherals come back with the error. The bus
    /// and chip-select pin are released first.
    pub fn new(p: Peripherals<R>) -> Result<Self, (Peripherals<R>, Error)> {
        let Peripherals {
            mut gpio,
            mut spi,
            mut gates,
        } = p;

        gates.enable(config::ACCEL_CS.port());
        gates.enable(config::ACCEL_SPI);
        // chip select idles high before the pin becomes an output
        gpio.write(config::ACCEL_CS, PinState::High);
        gpio.init(&config::PINS);
        spi.init(&config::SPI);

        let Some(bus) = spi.take_bus(config::ACCEL_SPI) else {
            return Err((Peripherals { gpio, spi, gates }, Error::Unavailable));
        };
        let Some(cs) = gpio.take_output(config::ACCEL_CS) else {
            spi.release_bus(bus);
            return Err((Peripherals { gpio, spi, gates }, Error::Unavailable));
        };

        let mut accel = match Adxl345::new(bus, cs) {
            Ok(accel) => accel,
            // only the pin is touched, and it cannot fail
            Err(e) => return Err((Peripherals { gpio, spi, gates }, e.into())),
        };
        if let Err(e) = accel.check_device_id() {
            let p = Self::reclaim(gpio, spi, gates, accel.release());
            return Err((p, e.into()));
        }
        let accel = match accel.init() {
            Ok(accel) => accel,
            Err((accel, e)) => {
                let p = Self::reclaim(gpio, spi, gates, accel.release());
                return Err((p, e.into()));
            }
        };
        info!("board: accelerometer ready");

        Ok(Self {
            gpio,
            spi,
            gates,
            accel,
        })
    }

    fn reclaim(
        mut gpio: Gpio<R>,
        mut spi: Spi<R>,
        gates: Gates<R>,
        (bus, cs): (Bus<R>, Output<R>),
    ) -> Peripherals<R> {
        spi.release_bus(bus);
        gpio.release_output(cs);
        Peripherals { gpio, spi, gates }
    }

    /// Read one sample from the accelerometer, in g.
    pub fn poll(&mut self) -> Result<Acceleration, Error> {
        let g = self.accel.read_acceleration()?;
        trace!("board: sample {} {} {}", g.x, g.y, g.z);
        Ok(g)
    }

    /// Direct access to the accelerometer driver.
    pub fn accelerometer(&mut self) -> &mut Accelerometer<R> {
        &mut self.accel
    }

    /// Shut down the board, returning the peripherals.
    ///
    /// The accelerometer keeps measuring. Its bus and chip-select pin
    /// go back to the GPIO and SPI drivers.
    pub fn free(self) -> Peripherals<R> {
        Self::reclaim(self.gpio, self.spi, self.gates, self.accel.release())
    }
}
