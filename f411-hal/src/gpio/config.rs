use super::PinId;

/// Pin direction / function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    #[default]
    Input,
    Output,
    /// Routed to a peripheral, see [AltFunction].
    Alternate,
    Analog,
}

impl Mode {
    #[inline(always)]
    pub(crate) const fn bits(self) -> u32 {
        match self {
            Self::Input => 0b00,
            Self::Output => 0b01,
            Self::Alternate => 0b10,
            Self::Analog => 0b11,
        }
    }
}

/// Output driver type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    #[default]
    PushPull,
    OpenDrain,
}

impl OutputType {
    #[inline(always)]
    pub(crate) const fn bits(self) -> u32 {
        match self {
            Self::PushPull => 0,
            Self::OpenDrain => 1,
        }
    }
}

/// Output slew rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    #[default]
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Speed {
    #[inline(always)]
    pub(crate) const fn bits(self) -> u32 {
        match self {
            Self::Low => 0b00,
            Self::Medium => 0b01,
            Self::High => 0b10,
            Self::VeryHigh => 0b11,
        }
    }
}

/// Internal pull resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    #[default]
    None,
    Up,
    Down,
}

impl Pull {
    #[inline(always)]
    pub(crate) const fn bits(self) -> u32 {
        match self {
            Self::None => 0b00,
            Self::Up => 0b01,
            Self::Down => 0b10,
        }
    }
}

/// Alternate function selection, only meaningful in [Mode::Alternate].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AltFunction {
    #[default]
    Af0 = 0,
    Af1,
    Af2,
    Af3,
    Af4,
    /// SPI1 through SPI4 on most pins.
    Af5,
    /// SPI3 on most pins.
    Af6,
    Af7,
    Af8,
    Af9,
    Af10,
    Af11,
    Af12,
    Af13,
    Af14,
    Af15,
}

impl AltFunction {
    /// Every alternate function, in numeric order.
    pub const ALL: [Self; 16] = [
        Self::Af0,
        Self::Af1,
        Self::Af2,
        Self::Af3,
        Self::Af4,
        Self::Af5,
        Self::Af6,
        Self::Af7,
        Self::Af8,
        Self::Af9,
        Self::Af10,
        Self::Af11,
        Self::Af12,
        Self::Af13,
        Self::Af14,
        Self::Af15,
    ];

    #[inline(always)]
    pub(crate) const fn bits(self) -> u32 {
        self as u32
    }
}

/// Everything needed to set up one pin.
///
/// Built with chained `const` setters so whole tables can live in
/// `static`s:
///
/// ```
/// use f411_hal::gpio::{AltFunction, Mode, PinConfig, PinId, Port, Speed};
///
/// const SCK: PinConfig = PinConfig::new(PinId::new(Port::A, 5))
///     .mode(Mode::Alternate)
///     .speed(Speed::VeryHigh)
///     .function(AltFunction::Af5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub pin: PinId,
    pub mode: Mode,
    pub output_type: OutputType,
    pub speed: Speed,
    pub pull: Pull,
    pub function: AltFunction,
}

impl PinConfig {
    /// A floating input, low speed, push-pull, AF0.
    #[inline(always)]
    pub const fn new(pin: PinId) -> Self {
        Self {
            pin,
            mode: Mode::Input,
            output_type: OutputType::PushPull,
            speed: Speed::Low,
            pull: Pull::None,
            function: AltFunction::Af0,
        }
    }

    #[inline(always)]
    pub const fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[inline(always)]
    pub const fn output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    #[inline(always)]
    pub const fn speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    #[inline(always)]
    pub const fn pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    #[inline(always)]
    pub const fn function(mut self, function: AltFunction) -> Self {
        self.function = function;
        self
    }
}
