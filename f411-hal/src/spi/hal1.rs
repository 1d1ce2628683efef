use embedded_hal_1::spi as hal1;
use embedded_hal_nb::spi as hal1nb;

use crate::block;
use crate::reg::RegisterAccess;

use super::{Bus, Error, Word};

impl hal1::Error for Error {
    #[inline(always)]
    fn kind(&self) -> hal1::ErrorKind {
        match self {
            Self::Timeout(_) => hal1::ErrorKind::Other,
        }
    }
}

impl<R> hal1::ErrorType for Bus<R>
where
    R: RegisterAccess,
{
    type Error = Error;
}

// embedded-hal allows empty buffers, where our own methods do not
impl<R, W> hal1::SpiBus<W> for Bus<R>
where
    R: RegisterAccess,
    W: Word,
{
    #[inline(always)]
    fn read(&mut self, words: &mut [W]) -> Result<(), Self::Error> {
        if words.is_empty() {
            return Ok(());
        }
        Bus::receive(self, words)
    }

    #[inline(always)]
    fn write(&mut self, words: &[W]) -> Result<(), Self::Error> {
        if words.is_empty() {
            return Ok(());
        }
        Bus::transfer(self, words)
    }

    #[inline(always)]
    fn transfer(&mut self, read: &mut [W], write: &[W]) -> Result<(), Self::Error> {
        Bus::exchange(self, read, write)
    }

    #[inline(always)]
    fn transfer_in_place(&mut self, words: &mut [W]) -> Result<(), Self::Error> {
        Bus::exchange_in_place(self, words)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<(), Self::Error> {
        Bus::flush(self)
    }
}

impl<R, W> hal1nb::FullDuplex<W> for Bus<R>
where
    R: RegisterAccess,
    W: Word,
{
    #[inline(always)]
    fn read(&mut self) -> block::Result<W, Self::Error> {
        Bus::read_one(self)
    }

    #[inline(always)]
    fn write(&mut self, word: W) -> block::Result<(), Self::Error> {
        Bus::write_one(self, word)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{Event, Simulator};
    use crate::spi::{Channel, Config, Spi};
    use hal1::SpiBus;

    #[test]
    fn empty_buffers_are_no_ops() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[Config::new(Channel::Spi1)]);
        let mut bus = spi.take_bus(Channel::Spi1).unwrap();

        SpiBus::<u8>::write(&mut bus, &[]).unwrap();
        SpiBus::<u8>::read(&mut bus, &mut []).unwrap();
        SpiBus::<u8>::transfer(&mut bus, &mut [], &[]).unwrap();
        assert!(!sim.events().iter().any(|e| matches!(e, Event::Mosi(..))));

        SpiBus::<u8>::write(&mut bus, &[0xa5]).unwrap();
        SpiBus::<u8>::flush(&mut bus).unwrap();
        assert!(sim.events().contains(&Event::Mosi(Channel::Spi1, 0xa5)));
    }

    #[test]
    fn timeout_is_other() {
        use hal1::Error as _;
        assert_eq!(
            Error::Timeout(crate::spi::Flag::NotBusy).kind(),
            hal1::ErrorKind::Other
        );
    }
}
