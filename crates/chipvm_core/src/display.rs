use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

pub const SCREEN_CELLS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;
/// Sprites are always one byte wide.
pub const SPRITE_WIDTH: usize = 8;

/// 64x32 monochrome framebuffer, row-major, indexed by `x + y * 64`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Framebuffer {
    cells: [bool; SCREEN_CELLS],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            cells: [false; SCREEN_CELLS],
        }
    }
}

impl Framebuffer {
    pub fn clear(&mut self) {
        self.cells = [false; SCREEN_CELLS];
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.cells[x % SCREEN_WIDTH + (y % SCREEN_HEIGHT) * SCREEN_WIDTH]
    }

    pub fn cells(&self) -> &[bool; SCREEN_CELLS] {
        &self.cells
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&on| on).count()
    }

    /// XOR a sprite onto the screen with its top-left corner at `(x, y)`.
    ///
    /// The origin is wrapped onto the screen once, then every pixel wraps
    /// around the edges on its own. Returns `true` if any lit pixel was
    /// turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x0 = x as usize % SCREEN_WIDTH;
        let y0 = y as usize % SCREEN_HEIGHT;
        let mut collision = false;
        for (row, &bits) in sprite.iter().enumerate() {
            let py = (y0 + row) % SCREEN_HEIGHT;
            for col in 0..SPRITE_WIDTH {
                if (bits >> (7 - col)) & 0x1 == 0 {
                    continue;
                }
                let px = (x0 + col) % SCREEN_WIDTH;
                let cell = &mut self.cells[px + py * SCREEN_WIDTH];
                collision |= *cell;
                *cell = !*cell;
            }
        }
        collision
    }
}
