//! A driver for the Analog Devices ADXL345 accelerometer, over 4-wire
//! SPI with a GPIO chip select.
//!
//! The driver starts out [Uninitialized]. [Adxl345::init()] puts the
//! device into ±4 g measurement mode and hands back an [Initialized]
//! driver, which can read samples.

#![no_std]

#[cfg(test)]
extern crate std;

use core::marker::PhantomData;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

#[macro_use]
mod fmt;

pub mod registers;
pub use registers::Register;

mod scale;
pub use scale::*;

#[cfg(test)]
mod mock;

/// The value of the DEVID register on a genuine part.
pub const DEVICE_ID: u8 = 0xe5;

/// First of the six data registers, DATAX0.
pub const DATA_START: u8 = 0x32;

const ADDRESS_MASK: u8 = 0x3f;
const MULTI_BYTE: u8 = 0x40;
const READ: u8 = 0x80;

/// The command byte that starts every transaction.
///
/// Every command sets the multi-byte bit, so bursts auto-increment.
#[inline(always)]
const fn command(address: u8, read: bool) -> u8 {
    let cmd = (address & ADDRESS_MASK) | MULTI_BYTE;
    if read {
        cmd | READ
    } else {
        cmd
    }
}

/// Driver state before [Adxl345::init()]. (type state)
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Uninitialized;

/// Driver state after [Adxl345::init()]. (type state)
#[derive(Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Initialized;

/// An interface to the ADXL345.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Adxl345<Spi, Cs, State = Initialized> {
    spi: Spi,
    cs: Cs,
    _state: PhantomData<State>,
}

/// An error produced by the ADXL345 interface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE, PinE> {
    /// SPI bus error.
    Spi(SpiE),
    /// Chip select pin error.
    ChipSelect(PinE),
    /// DEVID did not read back as [DEVICE_ID].
    WrongDevice(u8),
}

impl<Spi, Cs> Adxl345<Spi, Cs, Uninitialized>
where
    Spi: SpiBus<u8>,
    Cs: OutputPin,
{
    /// Create the interface on a bus and chip select pin.
    ///
    /// Chip select is driven high (inactive) before returning.
    pub fn new(spi: Spi, mut cs: Cs) -> Result<Self, Error<Spi::Error, Cs::Error>> {
        cs.set_high().map_err(Error::ChipSelect)?;
        Ok(Self {
            spi,
            cs,
            _state: PhantomData,
        })
    }

    /// Put the device in ±4 g measurement mode.
    ///
    /// On failure, the uninitialized driver comes back with the error.
    #[allow(clippy::type_complexity)]
    pub fn init(
        mut self,
    ) -> Result<Adxl345<Spi, Cs, Initialized>, (Self, Error<Spi::Error, Cs::Error>)> {
        match self.init_registers() {
            Ok(()) => {
                debug!("adxl345: measuring at +/-4g");
                Ok(Adxl345 {
                    spi: self.spi,
                    cs: self.cs,
                    _state: PhantomData,
                })
            }
            Err(e) => Err((self, e)),
        }
    }

    fn init_registers(&mut self) -> Result<(), Error<Spi::Error, Cs::Error>> {
        self.write(registers::DataFormat::new().with_range(registers::Range::G4))?;
        // standby first, so measurement starts from a clean state
        self.write(registers::PowerControl::new())?;
        self.write(registers::PowerControl::new().with_measure(true))?;
        Ok(())
    }
}

impl<Spi, Cs, State> Adxl345<Spi, Cs, State>
where
    Spi: SpiBus<u8>,
    Cs: OutputPin,
{
    /// Release the bus and chip select pin used by this interface.
    pub fn release(self) -> (Spi, Cs) {
        (self.spi, self.cs)
    }

    /// Run `f` on the bus with chip select held low.
    ///
    /// Chip select goes high exactly once afterwards, whether or not
    /// the bus failed.
    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Spi) -> Result<T, Spi::Error>,
    ) -> Result<T, Error<Spi::Error, Cs::Error>> {
        self.cs.set_low().map_err(Error::ChipSelect)?;

        let res = f(&mut self.spi).and_then(|v| self.spi.flush().map(|()| v));
        let deselect = self.cs.set_high();

        let v = res.map_err(Error::Spi)?;
        deselect.map_err(Error::ChipSelect)?;
        Ok(v)
    }

    /// Write a raw register on the device.
    fn write_raw(&mut self, address: u8, value: u8) -> Result<(), Error<Spi::Error, Cs::Error>> {
        self.transaction(|spi| spi.write(&[command(address, false), value]))
    }

    /// Write a register on the device.
    fn write<R>(&mut self, value: R) -> Result<(), Error<Spi::Error, Cs::Error>>
    where
        R: Register,
    {
        self.write_raw(R::ADDRESS, value.into())
    }

    /// Read `buffer.len()` consecutive registers, starting at `address`.
    pub fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Error<Spi::Error, Cs::Error>> {
        self.transaction(|spi| {
            spi.write(&[command(address, true)])?;
            spi.read(buffer)
        })
    }

    /// Read a register on the device.
    pub fn read_register<R>(&mut self) -> Result<R, Error<Spi::Error, Cs::Error>>
    where
        R: Register,
    {
        let mut value = [0];
        self.read(R::ADDRESS, &mut value)?;
        Ok(value[0].into())
    }

    /// Read the DEVID register.
    pub fn device_id(&mut self) -> Result<u8, Error<Spi::Error, Cs::Error>> {
        Ok(self.read_register::<registers::DeviceId>()?.id())
    }

    /// Check that this is really an ADXL345.
    pub fn check_device_id(&mut self) -> Result<(), Error<Spi::Error, Cs::Error>> {
        match self.device_id()? {
            DEVICE_ID => Ok(()),
            other => {
                warn!("adxl345: unexpected device id {=u8:#x}", other);
                Err(Error::WrongDevice(other))
            }
        }
    }
}

impl<Spi, Cs> Adxl345<Spi, Cs, Initialized>
where
    Spi: SpiBus<u8>,
    Cs: OutputPin,
{
    /// Read one raw sample of all three axes in a single burst.
    pub fn read_raw_axes(&mut self) -> Result<RawAxes, Error<Spi::Error, Cs::Error>> {
        let mut data = [0; 6];
        self.read(DATA_START, &mut data)?;
        Ok(RawAxes::from_le_bytes(data))
    }

    /// Read one sample of all three axes, in g.
    pub fn read_acceleration(&mut self) -> Result<Acceleration, Error<Spi::Error, Cs::Error>> {
        Ok(self.read_raw_axes()?.to_g())
    }
}
