use embedded_hal_02::blocking::spi as hal02blocking;
use embedded_hal_02::spi as hal02;

use crate::block;
use crate::reg::RegisterAccess;

use super::{Bus, Error, Word};

impl<R, W> hal02::FullDuplex<W> for Bus<R>
where
    R: RegisterAccess,
    W: Word,
{
    type Error = Error;

    fn read(&mut self) -> block::Result<W, Self::Error> {
        Bus::read_one(self)
    }

    fn send(&mut self, word: W) -> block::Result<(), Self::Error> {
        Bus::write_one(self, word)
    }
}

// the blocking traits have blanket impls over any word type, so these
// are spelled out per word
macro_rules! blocking_impl {
    ($($word:ty),+) => {
        $(
            impl<R> hal02blocking::Transfer<$word> for Bus<R>
            where
                R: RegisterAccess,
            {
                type Error = Error;

                fn transfer<'w>(&mut self, words: &'w mut [$word]) -> Result<&'w [$word], Self::Error> {
                    Bus::exchange_in_place(self, words)?;
                    Ok(words)
                }
            }

            impl<R> hal02blocking::Write<$word> for Bus<R>
            where
                R: RegisterAccess,
            {
                type Error = Error;

                fn write(&mut self, words: &[$word]) -> Result<(), Self::Error> {
                    if words.is_empty() {
                        return Ok(());
                    }
                    Bus::transfer(self, words)
                }
            }
        )+
    };
}

blocking_impl!(u8, u16);

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{Event, Simulator, Slave};
    use crate::spi::{Channel, Config, Spi, WordSize};
    use embedded_hal_02::blocking::spi::{Transfer, Write};
    use std::vec::Vec;

    // answers each frame with its complement
    struct Invert;

    impl Slave for Invert {
        fn exchange(&mut self, mosi: u16) -> u16 {
            !mosi
        }
    }

    fn mosi(sim: &Simulator) -> Vec<u16> {
        sim.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Mosi(_, v) => Some(v),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn blocking_bytes() {
        let sim = Simulator::new();
        sim.attach(Channel::Spi1, None, Invert);
        let mut spi = Spi::new(&sim);
        spi.init(&[Config::new(Channel::Spi1)]);
        let mut bus = spi.take_bus(Channel::Spi1).unwrap();

        Write::<u8>::write(&mut bus, &[0x12, 0x34]).unwrap();
        Write::<u8>::write(&mut bus, &[]).unwrap();
        let mut words = [0x0fu8];
        assert_eq!(Transfer::<u8>::transfer(&mut bus, &mut words).unwrap(), [0xf0]);
        assert_eq!(mosi(&sim), [0x12, 0x34, 0x0f]);
    }

    #[test]
    fn blocking_halfwords() {
        let sim = Simulator::new();
        sim.attach(Channel::Spi2, None, Invert);
        let mut spi = Spi::new(&sim);
        spi.init(&[Config::new(Channel::Spi2).word_size(WordSize::Bits16)]);
        let mut bus = spi.take_bus(Channel::Spi2).unwrap();

        Write::<u16>::write(&mut bus, &[0xbeef]).unwrap();
        let mut words = [0x00ffu16, 0x1234];
        assert_eq!(
            Transfer::<u16>::transfer(&mut bus, &mut words).unwrap(),
            [0xff00, 0xedcb]
        );
        assert_eq!(mosi(&sim), [0xbeef, 0x00ff, 0x1234]);
    }
}
