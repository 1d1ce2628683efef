//! Interfaces for SPI.
//!
//! [Spi] owns all four channels. Configure them from a table with
//! [Spi::init()], then either drive a channel by [Channel] through
//! [Spi], or take an exclusive [Bus] handle that implements the
//! embedded-hal SPI traits.
//!
//! Every wait on a status flag is bounded by the channel's
//! [Timeout] and fails with [Error::Timeout] when it runs out.

use core::convert::Infallible;

use crate::block::{self, Expired, Timeout};
use crate::reg::{Block, Reg, RegisterAccess};
use crate::InvalidIdentifier;

mod bus;
pub use bus::*;

mod config;
pub use config::*;

mod hal02;
mod hal1;

mod shared;
pub use shared::*;

const CR1: u32 = 0x00;
const CR2: u32 = 0x04;
const SR: u32 = 0x08;
const DR: u32 = 0x0c;

bitflags::bitflags! {
    struct Control: u32 {
        const CPHA = 1 << 0;
        const CPOL = 1 << 1;
        const MSTR = 1 << 2;
        const BR = 0b111 << 3;
        const SPE = 1 << 6;
        const LSBFIRST = 1 << 7;
        const SSI = 1 << 8;
        const SSM = 1 << 9;
        const RXONLY = 1 << 10;
        const DFF = 1 << 11;
    }
}

bitflags::bitflags! {
    struct Control2: u32 {
        const SSOE = 1 << 2;
    }
}

bitflags::bitflags! {
    pub(crate) struct Status: u32 {
        const RXNE = 1 << 0;
        const TXE = 1 << 1;
        const OVR = 1 << 6;
        const BSY = 1 << 7;
    }
}

/// An SPI channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Spi1,
    Spi2,
    Spi3,
    Spi4,
}

impl Channel {
    /// Every channel, in register table order.
    pub const ALL: [Self; 4] = [Self::Spi1, Self::Spi2, Self::Spi3, Self::Spi4];

    /// The register block for this channel.
    #[inline(always)]
    pub const fn block(self) -> Block {
        match self {
            Self::Spi1 => Block::new(0x4001_3000),
            Self::Spi2 => Block::new(0x4000_3800),
            Self::Spi3 => Block::new(0x4000_3c00),
            Self::Spi4 => Block::new(0x4001_3400),
        }
    }

    #[inline(always)]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Channels are numbered from 1, as in the reference manual.
impl TryFrom<u8> for Channel {
    type Error = InvalidIdentifier;

    #[inline(always)]
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        value
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize))
            .copied()
            .ok_or(InvalidIdentifier(value))
    }
}

/// A status flag the driver waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Flag {
    /// Transmit buffer empty.
    TxEmpty,
    /// Receive buffer not empty.
    RxNotEmpty,
    /// Busy flag clear.
    NotBusy,
}

impl Flag {
    #[inline(always)]
    fn ready(self, status: Status) -> bool {
        match self {
            Self::TxEmpty => status.contains(Status::TXE),
            Self::RxNotEmpty => status.contains(Status::RXNE),
            Self::NotBusy => !status.contains(Status::BSY),
        }
    }
}

/// An SPI error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The peripheral did not raise this flag within the timeout.
    Timeout(Flag),
}

impl core::fmt::Display for Error {
    #[allow(clippy::missing_inline_in_public_items)]
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Self::Timeout(flag) => write!(f, "SPI timed out waiting for {:?}", flag),
        }
    }
}

/// A data frame the SPI can move, either [u8] or [u16].
#[allow(private_bounds)]
pub trait Word: WordSealed + Copy + Default + 'static {
    /// The frame size this word needs.
    const SIZE: WordSize;
}

pub(crate) trait WordSealed {
    fn to_bits(self) -> u32;
    fn from_bits(bits: u32) -> Self;
}

impl Word for u8 {
    const SIZE: WordSize = WordSize::Bits8;
}

impl WordSealed for u8 {
    #[inline(always)]
    fn to_bits(self) -> u32 {
        self as u32
    }

    #[inline(always)]
    fn from_bits(bits: u32) -> Self {
        bits as u8
    }
}

impl Word for u16 {
    const SIZE: WordSize = WordSize::Bits16;
}

impl WordSealed for u16 {
    #[inline(always)]
    fn to_bits(self) -> u32 {
        self as u32
    }

    #[inline(always)]
    fn from_bits(bits: u32) -> Self {
        bits as u16
    }
}

// one CR1 field: which bits it owns, and the bits for each choice
trait Field: Copy {
    const MASK: Control;
    fn bits(self) -> Control;
}

impl Field for Phase {
    const MASK: Control = Control::CPHA;

    #[inline(always)]
    fn bits(self) -> Control {
        match self {
            Self::Cpha0 => Control::empty(),
            Self::Cpha1 => Control::CPHA,
        }
    }
}

impl Field for Polarity {
    const MASK: Control = Control::CPOL;

    #[inline(always)]
    fn bits(self) -> Control {
        match self {
            Self::Cpol0 => Control::empty(),
            Self::Cpol1 => Control::CPOL,
        }
    }
}

impl Field for Role {
    const MASK: Control = Control::MSTR;

    #[inline(always)]
    fn bits(self) -> Control {
        match self {
            Self::Slave => Control::empty(),
            Self::Master => Control::MSTR,
        }
    }
}

impl Field for ClockDivider {
    const MASK: Control = Control::BR;

    #[inline(always)]
    fn bits(self) -> Control {
        Control::from_bits_truncate(ClockDivider::bits(self) << 3)
    }
}

impl Field for BitOrder {
    const MASK: Control = Control::LSBFIRST;

    #[inline(always)]
    fn bits(self) -> Control {
        match self {
            Self::MsbFirst => Control::empty(),
            Self::LsbFirst => Control::LSBFIRST,
        }
    }
}

impl Field for TransferType {
    const MASK: Control = Control::RXONLY;

    #[inline(always)]
    fn bits(self) -> Control {
        match self {
            Self::FullDuplex => Control::empty(),
            Self::ReceiveOnly => Control::RXONLY,
        }
    }
}

impl Field for WordSize {
    const MASK: Control = Control::DFF;

    #[inline(always)]
    fn bits(self) -> Control {
        match self {
            Self::Bits8 => Control::empty(),
            Self::Bits16 => Control::DFF,
        }
    }
}

/// One channel's registers, with the wait policy it was configured
/// with.
#[derive(Clone, Copy)]
pub(crate) struct Regs<'a, R> {
    io: &'a R,
    channel: Channel,
    timeout: Timeout,
}

impl<'a, R> Regs<'a, R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    pub(crate) fn new(io: &'a R, channel: Channel, timeout: Timeout) -> Self {
        Self {
            io,
            channel,
            timeout,
        }
    }

    #[inline(always)]
    fn reg(&self, offset: u32) -> Reg<'a, R> {
        // safety: only called with the offsets defined above
        unsafe { self.channel.block().reg(self.io, offset) }
    }

    #[inline(always)]
    fn status(&self) -> Status {
        Status::from_bits_truncate(self.reg(SR).read())
    }

    #[inline(always)]
    fn check(&self, flag: Flag) -> block::Result<(), Infallible> {
        if flag.ready(self.status()) {
            Ok(())
        } else {
            Err(block::Error::WouldBlock)
        }
    }

    fn wait(&self, flag: Flag) -> Result<(), Error> {
        block::poll(self.timeout, || self.check(flag)).map_err(|e| match e {
            Expired::TimedOut => {
                warn!("spi: {} timed out waiting for {}", self.channel, flag);
                Error::Timeout(flag)
            }
            Expired::Other(never) => match never {},
        })
    }

    fn configure(&self, config: &Config) {
        let cr1 = self.reg(CR1);

        // frame format and clock only change with the peripheral off
        cr1.clear_bits(Control::SPE.bits());

        program(&cr1, config.mode.phase);
        program(&cr1, config.mode.polarity);
        program(&cr1, config.role);
        program(&cr1, config.divider);
        program(&cr1, config.bit_order);
        program(&cr1, config.transfer_type);
        program(&cr1, config.word_size);

        let cr2 = self.reg(CR2);
        match config.slave_select {
            SlaveSelect::Software => {
                cr1.set_bits((Control::SSM | Control::SSI).bits());
            }
            SlaveSelect::HardwareMaster => {
                cr1.clear_bits(Control::SSM.bits());
                cr2.set_bits(Control2::SSOE.bits());
            }
            SlaveSelect::HardwareSlave => {
                cr1.clear_bits(Control::SSM.bits());
                cr2.clear_bits(Control2::SSOE.bits());
            }
        }

        cr1.set_bits(Control::SPE.bits());
    }

    #[inline(always)]
    pub(crate) fn read_one<W: Word>(&self) -> block::Result<W, Error> {
        if self.check(Flag::RxNotEmpty).is_err() {
            return Err(block::Error::WouldBlock);
        }
        Ok(W::from_bits(self.reg(DR).read()))
    }

    #[inline(always)]
    pub(crate) fn write_one<W: Word>(&self, word: W) -> block::Result<(), Error> {
        if self.check(Flag::TxEmpty).is_err() {
            return Err(block::Error::WouldBlock);
        }
        self.reg(DR).write(word.to_bits());
        Ok(())
    }

    /// Wait for the last frame to leave the shift register.
    pub(crate) fn flush(&self) -> Result<(), Error> {
        self.wait(Flag::TxEmpty)?;
        self.wait(Flag::NotBusy)
    }

    pub(crate) fn transfer<W: Word>(&self, words: &[W]) -> Result<(), Error> {
        for word in words {
            self.wait(Flag::TxEmpty)?;
            self.reg(DR).write(word.to_bits());
        }
        self.flush()?;
        self.clear_overrun();
        Ok(())
    }

    pub(crate) fn receive<W: Word>(&self, words: &mut [W]) -> Result<(), Error> {
        for word in words.iter_mut() {
            self.reg(DR).write(0);
            self.wait(Flag::RxNotEmpty)?;
            *word = W::from_bits(self.reg(DR).read());
        }
        Ok(())
    }

    /// Clock out `write` while clocking in `read`, padding the shorter
    /// side: missing outgoing words are zero, extra incoming words are
    /// dropped.
    pub(crate) fn exchange<W: Word>(&self, read: &mut [W], write: &[W]) -> Result<(), Error> {
        for i in 0..read.len().max(write.len()) {
            let incoming = self.exchange_one(write.get(i).copied().unwrap_or_default())?;
            if let Some(slot) = read.get_mut(i) {
                *slot = incoming;
            }
        }
        self.flush()
    }

    pub(crate) fn exchange_in_place<W: Word>(&self, words: &mut [W]) -> Result<(), Error> {
        for word in words.iter_mut() {
            *word = self.exchange_one(*word)?;
        }
        self.flush()
    }

    #[inline(always)]
    fn exchange_one<W: Word>(&self, word: W) -> Result<W, Error> {
        self.wait(Flag::TxEmpty)?;
        self.reg(DR).write(word.to_bits());
        self.wait(Flag::RxNotEmpty)?;
        Ok(W::from_bits(self.reg(DR).read()))
    }

    // OVR clears on a DR read followed by an SR read
    #[inline(always)]
    fn clear_overrun(&self) {
        let _ = self.reg(DR).read();
        let _ = self.reg(SR).read();
    }
}

#[inline(always)]
fn program<R, F>(cr1: &Reg<'_, R>, field: F)
where
    R: RegisterAccess,
    F: Field,
{
    cr1.modify(|r| (r & !F::MASK.bits()) | field.bits().bits())
}

/// The SPI driver, owning every channel.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Spi<R> {
    io: R,
    configs: [Option<Config>; 4],
    taken: [bool; 4],
}

impl<R> Spi<R>
where
    R: RegisterAccess,
{
    /// Take control of the SPI channels.
    #[inline(always)]
    pub fn new(io: R) -> Self {
        Self {
            io,
            configs: [None; 4],
            taken: [false; 4],
        }
    }

    /// Configure every channel in the table, in order.
    pub fn init(&mut self, configs: &[Config]) {
        for config in configs {
            self.configure(config);
        }
    }

    /// Configure a single channel, and enable it.
    ///
    /// # Panics
    /// If this channel has been handed out as a [Bus].
    pub fn configure(&mut self, config: &Config) {
        let channel = config.channel;
        assert!(!self.taken[channel.index()], "channel is owned by a bus handle");
        debug!("spi: configure {}", channel);

        Regs::new(&self.io, channel, config.timeout).configure(config);
        self.configs[channel.index()] = Some(*config);
    }

    /// The configuration last applied to a channel, if any.
    #[inline(always)]
    pub fn config(&self, channel: Channel) -> Option<&Config> {
        self.configs[channel.index()].as_ref()
    }

    /// Write every word in `words`, discarding whatever comes back.
    ///
    /// Waits until the bus is idle before returning, and clears any
    /// receive overrun the write caused.
    ///
    /// # Panics
    /// If `words` is empty, or if the channel is unconfigured, handed
    /// out, or configured for a different word size.
    pub fn transfer<W: Word>(&mut self, channel: Channel, words: &[W]) -> Result<(), Error> {
        assert!(!words.is_empty(), "transfer of an empty buffer");
        self.regs::<W>(channel).transfer(words)
    }

    /// Fill `words` from the bus, clocking out zeros.
    ///
    /// # Panics
    /// Under the same conditions as [transfer()][Self::transfer()].
    pub fn receive<W: Word>(&mut self, channel: Channel, words: &mut [W]) -> Result<(), Error> {
        assert!(!words.is_empty(), "receive into an empty buffer");
        self.regs::<W>(channel).receive(words)
    }

    /// Hand out exclusive control of a configured channel.
    ///
    /// Returns [None] if the channel is already handed out.
    ///
    /// # Panics
    /// If the channel has not been configured.
    pub fn take_bus(&mut self, channel: Channel) -> Option<Bus<R>>
    where
        R: Clone,
    {
        let config = *self.expect_config(channel);
        if self.taken[channel.index()] {
            return None;
        }
        self.taken[channel.index()] = true;
        Some(Bus::new(self.io.clone(), config))
    }

    /// Give back a bus handle.
    #[inline(always)]
    pub fn release_bus(&mut self, bus: Bus<R>) {
        self.taken[bus.channel().index()] = false;
    }

    /// Write any register directly.
    ///
    /// # Safety
    /// Nothing is checked. The caller is responsible for `address`
    /// naming a writable register, and for not disturbing channels
    /// that are in use.
    #[inline(always)]
    pub unsafe fn register_write(&mut self, address: u32, value: u32) {
        self.io.write(address, value)
    }

    /// Read any register directly.
    ///
    /// # Safety
    /// Nothing is checked. Reading DR or SR can clear status flags.
    #[inline(always)]
    pub unsafe fn register_read(&self, address: u32) -> u32 {
        self.io.read(address)
    }

    fn expect_config(&self, channel: Channel) -> &Config {
        let Some(config) = self.configs[channel.index()].as_ref() else {
            panic!("channel is not configured");
        };
        config
    }

    fn regs<W: Word>(&self, channel: Channel) -> Regs<'_, R> {
        assert!(!self.taken[channel.index()], "channel is owned by a bus handle");
        let config = self.expect_config(channel);
        assert!(
            config.word_size == W::SIZE,
            "word size does not match channel configuration"
        );
        Regs::new(&self.io, channel, config.timeout)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::{Event, Simulator, Slave};
    use quickcheck::{Arbitrary, Gen};
    use quickcheck_macros::quickcheck;
    use std::vec::Vec;

    impl Arbitrary for Config {
        fn arbitrary(g: &mut Gen) -> Self {
            use ClockDivider::*;
            Config::new(*g.choose(&Channel::ALL).unwrap())
                .mode(*g.choose(&[Mode::MODE_0, Mode::MODE_1, Mode::MODE_2, Mode::MODE_3]).unwrap())
                .role(*g.choose(&[Role::Master, Role::Slave]).unwrap())
                .divider(*g.choose(&[Div2, Div4, Div8, Div16, Div32, Div64, Div128, Div256]).unwrap())
                .slave_select(
                    *g.choose(&[
                        SlaveSelect::Software,
                        SlaveSelect::HardwareMaster,
                        SlaveSelect::HardwareSlave,
                    ])
                    .unwrap(),
                )
                .bit_order(*g.choose(&[BitOrder::MsbFirst, BitOrder::LsbFirst]).unwrap())
                .transfer_type(
                    *g.choose(&[TransferType::FullDuplex, TransferType::ReceiveOnly]).unwrap(),
                )
                .word_size(*g.choose(&[WordSize::Bits8, WordSize::Bits16]).unwrap())
        }
    }

    // answers each frame with a running count, starting at `next`
    struct Counter {
        next: u16,
    }

    impl Slave for Counter {
        fn exchange(&mut self, _mosi: u16) -> u16 {
            let v = self.next;
            self.next = self.next.wrapping_add(1);
            v
        }
    }

    const SPI1: Config = Config::new(Channel::Spi1)
        .mode(Mode::MODE_3)
        .divider(ClockDivider::Div4)
        .timeout(Timeout::Polls(16));

    fn cr1(sim: &Simulator, channel: Channel) -> u32 {
        sim.peek(channel.block().address(CR1))
    }

    fn cr2(sim: &Simulator, channel: Channel) -> u32 {
        sim.peek(channel.block().address(CR2))
    }

    fn mosi(sim: &Simulator) -> Vec<u16> {
        sim.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Mosi(_, w) => Some(w),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn channel_numbers() {
        assert_eq!(Channel::try_from(1), Ok(Channel::Spi1));
        assert_eq!(Channel::try_from(4), Ok(Channel::Spi4));
        assert_eq!(Channel::try_from(0), Err(InvalidIdentifier(0)));
        assert_eq!(Channel::try_from(5), Err(InvalidIdentifier(5)));
    }

    #[test]
    fn configure_mode3_master() {
        let sim = Simulator::new();
        // CRCNEXT is not ours to touch
        sim.poke(Channel::Spi1.block().address(CR1), 1 << 12);

        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);

        // CPHA | CPOL | MSTR | BR=001 | SPE | SSI | SSM
        assert_eq!(cr1(&sim, Channel::Spi1), 0x134f);
        assert_eq!(cr2(&sim, Channel::Spi1), 0);
        assert_eq!(spi.config(Channel::Spi1), Some(&SPI1));
        assert_eq!(spi.config(Channel::Spi2), None);
    }

    #[test]
    fn hardware_nss_leaves_ssi() {
        let sim = Simulator::new();
        sim.poke(Channel::Spi2.block().address(CR1), (Control::SSI | Control::SSM).bits());

        let mut spi = Spi::new(&sim);
        spi.configure(
            &Config::new(Channel::Spi2)
                .slave_select(SlaveSelect::HardwareMaster)
                .word_size(WordSize::Bits16),
        );

        let r = Control::from_bits_truncate(cr1(&sim, Channel::Spi2));
        assert!(r.contains(Control::SSI | Control::DFF | Control::SPE));
        assert!(!r.contains(Control::SSM));
        assert_eq!(cr2(&sim, Channel::Spi2), Control2::SSOE.bits());

        spi.configure(&Config::new(Channel::Spi2).slave_select(SlaveSelect::HardwareSlave));
        assert_eq!(cr2(&sim, Channel::Spi2), 0);
    }

    #[quickcheck]
    fn configure_sets_exactly_the_fields(config: Config, background: u32) -> bool {
        let sim = Simulator::new();
        let address = config.channel.block().address(CR1);
        sim.poke(address, background);

        Spi::new(&sim).configure(&config);
        let r = Control::from_bits_truncate(sim.peek(address));

        let ours = Control::CPHA
            | Control::CPOL
            | Control::MSTR
            | Control::BR
            | Control::SPE
            | Control::LSBFIRST
            | Control::SSM
            | Control::RXONLY
            | Control::DFF;
        let untouched = !(ours | Control::SSI).bits();

        let ssm = config.slave_select == SlaveSelect::Software;
        sim.peek(address) & untouched == background & untouched
            && r.contains(Control::SPE)
            && r.contains(Control::CPHA) == (config.mode.phase == Phase::Cpha1)
            && r.contains(Control::CPOL) == (config.mode.polarity == Polarity::Cpol1)
            && r.contains(Control::MSTR) == (config.role == Role::Master)
            && (r & Control::BR).bits() >> 3 == config.divider.bits()
            && r.contains(Control::LSBFIRST) == (config.bit_order == BitOrder::LsbFirst)
            && r.contains(Control::RXONLY) == (config.transfer_type == TransferType::ReceiveOnly)
            && r.contains(Control::DFF) == (config.word_size == WordSize::Bits16)
            && r.contains(Control::SSM) == ssm
            && (!ssm || r.contains(Control::SSI))
            && (ssm || r.contains(Control::SSI) == (background & Control::SSI.bits() != 0))
    }

    #[quickcheck]
    fn init_is_idempotent(configs: Vec<Config>) -> bool {
        let once = Simulator::new();
        Spi::new(&once).init(&configs);

        let twice = Simulator::new();
        let mut spi = Spi::new(&twice);
        spi.init(&configs);
        spi.init(&configs);

        once.memory() == twice.memory()
    }

    #[quickcheck]
    fn transfer_writes_each_word_in_order(words: Vec<u8>) -> bool {
        if words.is_empty() {
            return true;
        }
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);

        spi.transfer(Channel::Spi1, &words).is_ok()
            && mosi(&sim) == words.iter().map(|&w| w as u16).collect::<Vec<_>>()
    }

    #[quickcheck]
    fn receive_fills_each_word_in_order(len: u8, start: u8) -> bool {
        let len = len as usize % 64 + 1;
        let sim = Simulator::new();
        sim.attach(Channel::Spi1, None, Counter { next: start as u16 });
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);

        let mut buf = std::vec![0xaau8; len];
        let ok = spi.receive(Channel::Spi1, &mut buf).is_ok();
        let expected: Vec<u8> = (0..len).map(|i| start.wrapping_add(i as u8)).collect();

        ok && buf == expected && mosi(&sim) == std::vec![0; len]
    }

    #[test]
    fn transfer_clears_overrun() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);

        spi.transfer(Channel::Spi1, &[1u8, 2, 3]).unwrap();
        let sr = Status::from_bits_truncate(sim.peek(Channel::Spi1.block().address(SR)));
        assert!(!sr.contains(Status::OVR));
        assert!(!sr.contains(Status::RXNE));
    }

    #[test]
    fn stalled_flags_time_out() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);

        sim.stall(Channel::Spi1, Flag::TxEmpty);
        assert_eq!(
            spi.transfer(Channel::Spi1, &[0x55u8]),
            Err(Error::Timeout(Flag::TxEmpty))
        );
        assert!(mosi(&sim).is_empty());
        sim.unstall(Channel::Spi1, Flag::TxEmpty);

        sim.stall(Channel::Spi1, Flag::NotBusy);
        assert_eq!(
            spi.transfer(Channel::Spi1, &[0x55u8]),
            Err(Error::Timeout(Flag::NotBusy))
        );
        sim.unstall(Channel::Spi1, Flag::NotBusy);

        sim.stall(Channel::Spi1, Flag::RxNotEmpty);
        let mut buf = [0u8; 2];
        assert_eq!(
            spi.receive(Channel::Spi1, &mut buf),
            Err(Error::Timeout(Flag::RxNotEmpty))
        );
    }

    #[test]
    fn sixteen_bit_frames() {
        let sim = Simulator::new();
        sim.attach(Channel::Spi3, None, Counter { next: 0x1234 });
        let mut spi = Spi::new(&sim);
        spi.init(&[Config::new(Channel::Spi3).word_size(WordSize::Bits16)]);

        spi.transfer(Channel::Spi3, &[0xbeefu16]).unwrap();
        let mut buf = [0u16; 1];
        spi.receive(Channel::Spi3, &mut buf).unwrap();
        assert_eq!(mosi(&sim), [0xbeef, 0]);
        assert_eq!(buf, [0x1235]);
    }

    #[test]
    #[should_panic(expected = "empty buffer")]
    fn empty_transfer_panics() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);
        let _ = spi.transfer::<u8>(Channel::Spi1, &[]);
    }

    #[test]
    #[should_panic(expected = "not configured")]
    fn unconfigured_channel_panics() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        let _ = spi.transfer(Channel::Spi2, &[0u8]);
    }

    #[test]
    #[should_panic(expected = "word size")]
    fn word_size_mismatch_panics() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);
        let _ = spi.transfer(Channel::Spi1, &[0u16]);
    }

    #[test]
    #[should_panic(expected = "owned by a bus handle")]
    fn indexed_access_to_handed_out_channel_panics() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);
        let _bus = spi.take_bus(Channel::Spi1).unwrap();
        let _ = spi.transfer(Channel::Spi1, &[0u8]);
    }

    #[test]
    fn buses_are_exclusive() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        spi.init(&[SPI1]);

        let bus = spi.take_bus(Channel::Spi1).unwrap();
        assert!(spi.take_bus(Channel::Spi1).is_none());
        spi.release_bus(bus);
        assert!(spi.take_bus(Channel::Spi1).is_some());
    }

    #[test]
    fn raw_register_access() {
        let sim = Simulator::new();
        let mut spi = Spi::new(&sim);
        let address = Channel::Spi4.block().address(CR2);
        // safety: CR2 is a plain read/write register
        unsafe {
            spi.register_write(address, 0x44);
            assert_eq!(spi.register_read(address), 0x44);
        }
        assert!(sim.events().contains(&Event::Write {
            address,
            value: 0x44
        }));
    }
}
