//! Interfaces for the internal registers of the ADXL345.

use bitfield_struct::bitfield;

/// A trait describing a register generically.
pub trait Register: Clone + From<u8> + Into<u8> {
    /// The address of this register, 6 bits.
    const ADDRESS: u8;
}

/// 0x00 Device ID, fixed at [DEVICE_ID][crate::DEVICE_ID].
#[cfg_attr(not(feature = "defmt"), bitfield(u8))]
#[cfg_attr(feature = "defmt", bitfield(u8, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId {
    #[bits(8, access = RO)]
    pub id: u8,
}

impl Register for DeviceId {
    const ADDRESS: u8 = 0x00;
}

/// 0x2C Data rate and power mode control.
#[cfg_attr(not(feature = "defmt"), bitfield(u8))]
#[cfg_attr(feature = "defmt", bitfield(u8, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BwRate {
    /// Output data rate code, 0b1010 is 100 Hz.
    #[bits(4)]
    pub rate: u8,
    /// Reduced power operation, at the cost of noise.
    pub low_power: bool,
    #[bits(3)]
    __: u8,
}

impl Register for BwRate {
    const ADDRESS: u8 = 0x2c;
}

/// 0x2D Power-saving features control.
#[cfg_attr(not(feature = "defmt"), bitfield(u8))]
#[cfg_attr(feature = "defmt", bitfield(u8, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PowerControl {
    /// Reading frequency in sleep mode.
    #[bits(2)]
    pub wakeup: u8,
    /// Sleep mode.
    pub sleep: bool,
    /// Measurement mode. Clear for standby.
    pub measure: bool,
    /// Automatic switch to sleep on inactivity.
    pub auto_sleep: bool,
    /// Serial activity and inactivity detection.
    pub link: bool,
    #[bits(2)]
    __: u8,
}

impl Register for PowerControl {
    const ADDRESS: u8 = 0x2d;
}

/// 0x31 Data format control.
#[cfg_attr(not(feature = "defmt"), bitfield(u8))]
#[cfg_attr(feature = "defmt", bitfield(u8, defmt = true))]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataFormat {
    /// Measurement range.
    #[bits(2, from = Range::from_bits, into = Range::into_bits)]
    pub range: Range,
    /// Left-justified (MSB) mode.
    pub justify: bool,
    /// Full resolution, 4 mg/LSB at every range.
    pub full_res: bool,
    __: bool,
    /// Interrupts active low.
    pub int_invert: bool,
    /// 3-wire SPI.
    pub three_wire: bool,
    /// Apply a self-test force.
    pub self_test: bool,
}

impl Register for DataFormat {
    const ADDRESS: u8 = 0x31;
}

/// Measurement range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Range {
    /// ±2 g.
    G2 = 0,
    /// ±4 g.
    G4 = 1,
    /// ±8 g.
    G8 = 2,
    /// ±16 g.
    G16 = 3,
}

impl Range {
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    pub const fn from_bits(v: u8) -> Self {
        match v & 0b11 {
            0 => Self::G2,
            1 => Self::G4,
            2 => Self::G8,
            _ => Self::G16,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn data_format() {
        assert_eq!(0x01, DataFormat::new().with_range(Range::G4).into_bits());
        assert_eq!(0x0a, DataFormat::new().with_range(Range::G8).with_full_res(true).into_bits());

        let f = DataFormat::from_bits(0xc3);
        assert_eq!(f.range(), Range::G16);
        assert!(f.self_test());
        assert!(f.three_wire());
        assert!(!f.int_invert());
        assert!(!f.full_res());
    }

    #[test]
    fn power_control() {
        assert_eq!(0x00, PowerControl::new().into_bits());
        assert_eq!(0x08, PowerControl::new().with_measure(true).into_bits());

        let p = PowerControl::from_bits(0x3f);
        assert_eq!(p.wakeup(), 0b11);
        assert!(p.sleep());
        assert!(p.measure());
        assert!(p.auto_sleep());
        assert!(p.link());
    }

    #[test]
    fn bw_rate() {
        let r = BwRate::from_bits(0x1a);
        assert_eq!(r.rate(), 0b1010);
        assert!(r.low_power());
    }

    #[test]
    fn device_id() {
        assert_eq!(DeviceId::from(0xe5).id(), crate::DEVICE_ID);
    }
}
