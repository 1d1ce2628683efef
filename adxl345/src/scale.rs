/// g per LSB at ±4 g, 10-bit resolution.
pub const SCALE_4G: f32 = 0.0078;

/// One sample of the three axes, as read from the data registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawAxes {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

impl RawAxes {
    /// Decode DATAX0 through DATAZ1, each axis little-endian.
    pub const fn from_le_bytes(b: [u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([b[0], b[1]]),
            y: i16::from_le_bytes([b[2], b[3]]),
            z: i16::from_le_bytes([b[4], b[5]]),
        }
    }

    /// Convert to g, assuming the ±4 g range.
    pub fn to_g(self) -> Acceleration {
        Acceleration {
            x: to_g(self.x),
            y: to_g(self.y),
            z: to_g(self.z),
        }
    }
}

/// Acceleration on three axes, in g.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Convert a single raw axis reading to g, assuming the ±4 g range.
#[inline(always)]
pub fn to_g(raw: i16) -> f32 {
    raw as f32 * SCALE_4G
}
