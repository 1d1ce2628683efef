//! Peripheral clock gates in the RCC.

use crate::reg::{Block, RegisterAccess};

/// The RCC register block.
pub(crate) const RCC: Block = Block::new(0x4002_3800);

const AHB1ENR: u32 = 0x30;
const APB1ENR: u32 = 0x40;
const APB2ENR: u32 = 0x44;

/// A peripheral with a clock gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Device {
    GpioA,
    GpioB,
    GpioC,
    GpioD,
    GpioH,
    Spi1,
    Spi2,
    Spi3,
    Spi4,
}

impl Device {
    /// The enable register offset and bit for this device.
    #[inline(always)]
    const fn gate(self) -> (u32, u32) {
        match self {
            Self::GpioA => (AHB1ENR, 0),
            Self::GpioB => (AHB1ENR, 1),
            Self::GpioC => (AHB1ENR, 2),
            Self::GpioD => (AHB1ENR, 3),
            Self::GpioH => (AHB1ENR, 7),
            Self::Spi2 => (APB1ENR, 14),
            Self::Spi3 => (APB1ENR, 15),
            Self::Spi1 => (APB2ENR, 12),
            Self::Spi4 => (APB2ENR, 13),
        }
    }
}

impl From<crate::gpio::Port> for Device {
    #[inline(always)]
    fn from(port: crate::gpio::Port) -> Self {
        use crate::gpio::Port;
        match port {
            Port::A => Self::GpioA,
            Port::B => Self::GpioB,
            Port::C => Self::GpioC,
            Port::D => Self::GpioD,
            Port::H => Self::GpioH,
        }
    }
}

impl From<crate::spi::Channel> for Device {
    #[inline(always)]
    fn from(channel: crate::spi::Channel) -> Self {
        use crate::spi::Channel;
        match channel {
            Channel::Spi1 => Self::Spi1,
            Channel::Spi2 => Self::Spi2,
            Channel::Spi3 => Self::Spi3,
            Channel::Spi4 => Self::Spi4,
        }
    }
}

/// Control over every peripheral clock gate.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gates<R> {
    io: R,
}

impl<R> Gates<R>
where
    R: RegisterAccess,
{
    #[inline(always)]
    pub(crate) fn new(io: R) -> Self {
        Self { io }
    }

    /// Turn on the clock for a device.
    #[inline(always)]
    pub fn enable(&mut self, device: impl Into<Device>) {
        let (offset, bit) = device.into().gate();
        // safety: the gate table only names RCC enable registers
        unsafe { RCC.reg(&self.io, offset).set_bits(1 << bit) }
    }

    /// Turn off the clock for a device.
    #[inline(always)]
    pub fn disable(&mut self, device: impl Into<Device>) {
        let (offset, bit) = device.into().gate();
        // safety: the gate table only names RCC enable registers
        unsafe { RCC.reg(&self.io, offset).clear_bits(1 << bit) }
    }

    /// Is the clock for a device on?
    #[inline(always)]
    pub fn is_enabled(&self, device: impl Into<Device>) -> bool {
        let (offset, bit) = device.into().gate();
        // safety: the gate table only names RCC enable registers
        unsafe { RCC.reg(&self.io, offset).is_set(1 << bit) }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gpio::Port;
    use crate::sim::Simulator;
    use crate::spi::Channel;

    #[test]
    fn gates_touch_only_their_bit() {
        let sim = Simulator::new();
        let mut gates = Gates::new(&sim);

        gates.enable(Port::A);
        gates.enable(Channel::Spi1);
        assert_eq!(sim.peek(RCC.address(AHB1ENR)), 1 << 0);
        assert_eq!(sim.peek(RCC.address(APB2ENR)), 1 << 12);
        assert!(gates.is_enabled(Device::GpioA));
        assert!(!gates.is_enabled(Device::Spi2));

        gates.enable(Port::H);
        gates.disable(Port::A);
        assert_eq!(sim.peek(RCC.address(AHB1ENR)), 1 << 7);
    }
}
