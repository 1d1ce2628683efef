use crate::block;
use crate::reg::RegisterAccess;

use super::{Channel, Config, Error, Regs, Word};

/// Exclusive control of one configured SPI channel.
///
/// Get one from [Spi::take_bus()][super::Spi::take_bus()]. Chip
/// select is not touched; drive it from a GPIO [Output][crate::gpio::Output].
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bus<R> {
    io: R,
    config: Config,
}

impl<R> Bus<R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    pub(super) fn new(io: R, config: Config) -> Self {
        Self { io, config }
    }

    /// The channel this bus drives.
    #[inline(always)]
    pub fn channel(&self) -> Channel {
        self.config.channel
    }

    /// The configuration this channel was set up with.
    #[inline(always)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline(always)]
    fn regs<W: Word>(&self) -> Regs<'_, R> {
        assert!(
            self.config.word_size == W::SIZE,
            "word size does not match channel configuration"
        );
        Regs::new(&self.io, self.config.channel, self.config.timeout)
    }

    /// Read a single word, if one has arrived.
    ///
    /// To work, this must be preceeded by a [write_one()][Self::write_one()].
    #[inline(always)]
    pub fn read_one<W: Word>(&mut self) -> block::Result<W, Error> {
        self.regs::<W>().read_one()
    }

    /// Start sending a single word, if there is room.
    #[inline(always)]
    pub fn write_one<W: Word>(&mut self, word: W) -> block::Result<(), Error> {
        self.regs::<W>().write_one(word)
    }

    /// Wait until the last word has left the shift register.
    #[inline(always)]
    pub fn flush(&mut self) -> Result<(), Error> {
        // word size is irrelevant here
        Regs::new(&self.io, self.config.channel, self.config.timeout).flush()
    }

    /// Write every word in `words`, discarding whatever comes back.
    ///
    /// # Panics
    /// If `words` is empty, or the channel uses a different word size.
    #[inline]
    pub fn transfer<W: Word>(&mut self, words: &[W]) -> Result<(), Error> {
        assert!(!words.is_empty(), "transfer of an empty buffer");
        self.regs::<W>().transfer(words)
    }

    /// Fill `words` from the bus, clocking out zeros.
    ///
    /// # Panics
    /// If `words` is empty, or the channel uses a different word size.
    #[inline]
    pub fn receive<W: Word>(&mut self, words: &mut [W]) -> Result<(), Error> {
        assert!(!words.is_empty(), "receive into an empty buffer");
        self.regs::<W>().receive(words)
    }

    /// Write and read simultaneously.
    ///
    /// If read is shorter than write, discard all incoming words
    /// after that point. If write is shorter than read, write 0
    /// after the end of write.
    #[inline]
    pub fn exchange<W: Word>(&mut self, read: &mut [W], write: &[W]) -> Result<(), Error> {
        self.regs::<W>().exchange(read, write)
    }

    /// Write and read simultaneously, overwriting the buffer.
    #[inline]
    pub fn exchange_in_place<W: Word>(&mut self, words: &mut [W]) -> Result<(), Error> {
        self.regs::<W>().exchange_in_place(words)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::block::Timeout;
    use crate::sim::{Event, Simulator, Slave};
    use crate::spi::{Flag, Spi};
    use std::vec::Vec;

    // echoes the previous frame, like a shift register loopback
    struct Echo {
        last: u16,
    }

    impl Slave for Echo {
        fn exchange(&mut self, mosi: u16) -> u16 {
            core::mem::replace(&mut self.last, mosi)
        }
    }

    fn bus(sim: &Simulator) -> Bus<&Simulator> {
        let mut spi = Spi::new(sim);
        spi.init(&[Config::new(Channel::Spi2).timeout(Timeout::Polls(4))]);
        spi.take_bus(Channel::Spi2).unwrap()
    }

    #[test]
    fn exchange_pads_both_sides() {
        let sim = Simulator::new();
        sim.attach(Channel::Spi2, None, Echo { last: 0x99 });
        let mut bus = bus(&sim);

        let mut read = [0u8; 4];
        bus.exchange(&mut read, &[1, 2]).unwrap();
        assert_eq!(read, [0x99, 1, 2, 0]);

        let mut read = [0u8; 1];
        bus.exchange(&mut read, &[7, 8, 9]).unwrap();
        assert_eq!(read, [0]);

        let mosi: Vec<u16> = sim
            .events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Mosi(Channel::Spi2, w) => Some(w),
                _ => None,
            })
            .collect();
        assert_eq!(mosi, [1, 2, 0, 0, 7, 8, 9]);
    }

    #[test]
    fn exchange_in_place_overwrites() {
        let sim = Simulator::new();
        sim.attach(Channel::Spi2, None, Echo { last: 0 });
        let mut bus = bus(&sim);

        let mut words = [0x10u8, 0x20, 0x30];
        bus.exchange_in_place(&mut words).unwrap();
        assert_eq!(words, [0x00, 0x10, 0x20]);
    }

    #[test]
    fn one_word_at_a_time() {
        let sim = Simulator::new();
        sim.attach(Channel::Spi2, None, Echo { last: 0x42 });
        let mut bus = bus(&sim);

        assert_eq!(bus.read_one::<u8>(), Err(block::Error::WouldBlock));
        bus.write_one(0x11u8).unwrap();
        assert_eq!(bus.read_one::<u8>(), Ok(0x42));

        sim.stall(Channel::Spi2, Flag::TxEmpty);
        assert_eq!(bus.write_one(0x11u8), Err(block::Error::WouldBlock));
        assert_eq!(bus.flush(), Err(Error::Timeout(Flag::TxEmpty)));
    }
}
