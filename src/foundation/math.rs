/// Physical size of one relative spacing/padding unit.
pub const RELATIVE_UNIT_INCHES: f64 = 0.0625;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Inches to pixels at `density`, truncated.
pub(crate) fn inches_to_px(inches: f64, density: u32) -> f64 {
    (inches * f64::from(density)).floor()
}

/// Relative units to pixels at `density`, truncated.
pub(crate) fn units_to_px(units: f64, density: u32) -> f64 {
    inches_to_px(units * RELATIVE_UNIT_INCHES, density)
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Composite one straight-alpha RGBA8 pixel over opaque white.
pub(crate) fn flatten_over_white(px: [u8; 4]) -> [u8; 3] {
    let a = u16::from(px[3]);
    let inv = 255 - a;
    let mut out = [0u8; 3];
    for (o, c) in out.iter_mut().zip(px) {
        let v = mul_div255_u16(u16::from(c), a) + mul_div255_u16(255, inv);
        *o = v.min(255) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
