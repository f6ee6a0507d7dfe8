use std::fmt;

/// A raw two-byte instruction word with accessors for its operand fields.
///
/// Every `u16` is a valid `Opcode`; whether it names a real instruction is
/// decided by [`Instruction::decode`](crate::Instruction::decode).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Build the word from the byte at `PC` (high) and `PC + 1` (low).
    #[inline]
    pub const fn from_bytes(high: u8, low: u8) -> Self {
        Opcode((high as u16) << 8 | low as u16)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// The four nibbles, most significant first.
    #[inline]
    pub const fn nibbles(self) -> (u8, u8, u8, u8) {
        (
            ((self.0 & 0xF000) >> 12) as u8,
            ((self.0 & 0x0F00) >> 8) as u8,
            ((self.0 & 0x00F0) >> 4) as u8,
            (self.0 & 0x000F) as u8,
        )
    }

    /// Bits 8-11, a register index.
    #[inline]
    pub const fn x(self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    /// Bits 4-7, a register index.
    #[inline]
    pub const fn y(self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    /// Bits 0-3.
    #[inline]
    pub const fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// Bits 0-7, an immediate byte.
    #[inline]
    pub const fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// Bits 0-11, an address.
    #[inline]
    pub const fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Opcode;

    #[test]
    fn fields_of_a_draw_word() {
        let op = Opcode::from_bytes(0xD1, 0x2F);
        assert_eq!(op.raw(), 0xD12F);
        assert_eq!(op.nibbles(), (0xD, 0x1, 0x2, 0xF));
        assert_eq!(op.x(), 1);
        assert_eq!(op.y(), 2);
        assert_eq!(op.n(), 0xF);
        assert_eq!(op.nn(), 0x2F);
        assert_eq!(op.nnn(), 0x12F);
    }

    #[test]
    fn fields_stay_in_range_for_every_word() {
        for raw in 0..=u16::MAX {
            let op = Opcode(raw);
            assert!(op.x() < 16 && op.y() < 16);
            assert!(op.n() < 16);
            assert!(op.nnn() <= 0x0FFF);
            let (a, b, c, d) = op.nibbles();
            let rebuilt = (a as u16) << 12 | (b as u16) << 8 | (c as u16) << 4 | d as u16;
            assert_eq!(rebuilt, raw);
        }
    }

    #[test]
    fn displays_as_four_hex_digits() {
        assert_eq!(Opcode(0x00E0).to_string(), "00E0");
        assert_eq!(Opcode(0xF165).to_string(), "F165");
    }
}
