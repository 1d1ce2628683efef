use crate::block::{Timeout, DEFAULT_POLLS};

use super::Channel;

/// Choices for clock phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Sample on the first clock edge.
    Cpha0,
    /// Sample on the second clock edge.
    Cpha1,
}

/// Choices for clock polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low.
    Cpol0,
    /// Clock idles high.
    Cpol1,
}

/// An SPI mode describing clock polarity and phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode {
    pub polarity: Polarity,
    pub phase: Phase,
}

impl Mode {
    /// SPI mode 0: CPOL = 0, CPHA = 0.
    pub const MODE_0: Self = Self {
        polarity: Polarity::Cpol0,
        phase: Phase::Cpha0,
    };

    /// SPI mode 1: CPOL = 0, CPHA = 1.
    pub const MODE_1: Self = Self {
        polarity: Polarity::Cpol0,
        phase: Phase::Cpha1,
    };

    /// SPI mode 2: CPOL = 1, CPHA = 0.
    pub const MODE_2: Self = Self {
        polarity: Polarity::Cpol1,
        phase: Phase::Cpha0,
    };

    /// SPI mode 3: CPOL = 1, CPHA = 1.
    pub const MODE_3: Self = Self {
        polarity: Polarity::Cpol1,
        phase: Phase::Cpha1,
    };
}

/// Which end of the bus drives the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    Master,
    Slave,
}

/// Choices for baud rate divider, from the peripheral clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockDivider {
    Div2,
    Div4,
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
    Div256,
}

impl ClockDivider {
    #[inline(always)]
    pub(super) const fn bits(self) -> u32 {
        match self {
            Self::Div2 => 0b000,
            Self::Div4 => 0b001,
            Self::Div8 => 0b010,
            Self::Div16 => 0b011,
            Self::Div32 => 0b100,
            Self::Div64 => 0b101,
            Self::Div128 => 0b110,
            Self::Div256 => 0b111,
        }
    }

    /// The division factor.
    #[inline(always)]
    pub const fn factor(self) -> u32 {
        2 << self.bits()
    }
}

/// How the NSS (slave select) line is managed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveSelect {
    /// NSS is internal and tied inactive. Chip-select is a GPIO.
    Software,
    /// The peripheral drives NSS as an output.
    HardwareMaster,
    /// NSS is an input from an external master.
    HardwareSlave,
}

/// Choices for bit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Whether the peripheral transmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferType {
    FullDuplex,
    ReceiveOnly,
}

/// Size of one data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordSize {
    Bits8,
    Bits16,
}

/// Configuration for one SPI channel.
///
/// These are meant to be written as `const` tables and handed to
/// [Spi::init()][super::Spi::init()]:
///
/// ```
/// use f411_hal::spi::{Channel, ClockDivider, Config, Mode};
///
/// const SPI: [Config; 1] = [Config::new(Channel::Spi1)
///     .mode(Mode::MODE_3)
///     .divider(ClockDivider::Div4)];
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub channel: Channel,
    pub mode: Mode,
    pub role: Role,
    pub divider: ClockDivider,
    pub slave_select: SlaveSelect,
    pub bit_order: BitOrder,
    pub transfer_type: TransferType,
    pub word_size: WordSize,
    /// How long any single wait on a status flag may spin.
    pub timeout: Timeout,
}

impl Config {
    /// Mode 0 master at the slowest clock, software NSS, MSB first,
    /// full duplex, 8-bit words, default timeout.
    #[inline(always)]
    pub const fn new(channel: Channel) -> Self {
        Self {
            channel,
            mode: Mode::MODE_0,
            role: Role::Master,
            divider: ClockDivider::Div256,
            slave_select: SlaveSelect::Software,
            bit_order: BitOrder::MsbFirst,
            transfer_type: TransferType::FullDuplex,
            word_size: WordSize::Bits8,
            timeout: Timeout::Polls(DEFAULT_POLLS),
        }
    }

    /// Set the mode.
    #[inline(always)]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the role.
    #[inline(always)]
    pub const fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the clock divider.
    #[inline(always)]
    pub const fn divider(mut self, divider: ClockDivider) -> Self {
        self.divider = divider;
        self
    }

    /// Set the slave select management.
    #[inline(always)]
    pub const fn slave_select(mut self, slave_select: SlaveSelect) -> Self {
        self.slave_select = slave_select;
        self
    }

    /// Set the bit order.
    #[inline(always)]
    pub const fn bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    /// Set the transfer type.
    #[inline(always)]
    pub const fn transfer_type(mut self, transfer_type: TransferType) -> Self {
        self.transfer_type = transfer_type;
        self
    }

    /// Set the word size.
    #[inline(always)]
    pub const fn word_size(mut self, word_size: WordSize) -> Self {
        self.word_size = word_size;
        self
    }

    /// Set the flag wait timeout.
    #[inline(always)]
    pub const fn timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = timeout;
        self
    }
}
