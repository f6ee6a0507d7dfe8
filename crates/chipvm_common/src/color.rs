#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new_rgb(0, 0, 0);
    pub const WHITE: Color = Color::new_rgb(255, 255, 255);

    #[inline]
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Integer approximation of perceived brightness (ITU-R BT.601 weights).
    pub const fn luma(&self) -> u8 {
        let sum = 299 * self.r as u32 + 587 * self.g as u32 + 114 * self.b as u32;
        (sum / 1000) as u8
    }

    /// Write this color into an RGB24 buffer at pixel `index`.
    #[inline]
    pub fn write_rgb24(&self, buffer: &mut [u8], index: usize) {
        let offset = index * 3;
        buffer[offset] = self.r;
        buffer[offset + 1] = self.g;
        buffer[offset + 2] = self.b;
    }

    /// Read the pixel at `index` back out of an RGB24 buffer.
    #[inline]
    pub fn read_rgb24(buffer: &[u8], index: usize) -> Color {
        let offset = index * 3;
        Color::new_rgb(buffer[offset], buffer[offset + 1], buffer[offset + 2])
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn luma_of_extremes() {
        assert_eq!(Color::BLACK.luma(), 0);
        assert_eq!(Color::WHITE.luma(), 255);
    }

    #[test]
    fn rgb24_buffer_access() {
        let mut buffer = vec![0u8; 2 * 3];
        Color::new_rgb(1, 2, 3).write_rgb24(&mut buffer, 1);
        assert_eq!(buffer, [0, 0, 0, 1, 2, 3]);
        assert_eq!(Color::read_rgb24(&buffer, 1), Color::new_rgb(1, 2, 3));
    }
}
