pub mod app;
mod cpu;
pub mod display;
pub mod emulator;
pub mod error;
pub mod instruction;
pub mod keypad;
mod machine;
pub mod opcode;
pub mod timer;

pub use app::EmulatorApp;
pub use display::Framebuffer;
pub use emulator::{Emulator, EmulatorConfig, Step};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use keypad::RunMode;
pub use opcode::Opcode;
pub use timer::{TimerClock, TIMER_HZ};

/// Addressable memory in bytes.
pub const RAM_SIZE: usize = 4096;
/// Framebuffer width in pixels.
pub const SCREEN_WIDTH: usize = 64;
/// Framebuffer height in pixels.
pub const SCREEN_HEIGHT: usize = 32;
pub const NUM_REGS: usize = 16;
pub const NUM_KEYS: usize = 16;
pub const STACK_SIZE: usize = 16;
/// Index of VF, the register written by carry, borrow, shift and collision.
pub const FLAG_REG: usize = 0xF;
/// Programs are loaded and start executing here.
pub const START_ADDRESS: u16 = 0x200;
/// Largest program that fits between `START_ADDRESS` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = RAM_SIZE - START_ADDRESS as usize;
/// Last address an instruction can be fetched from (it occupies two bytes).
pub const LAST_INSTRUCTION_ADDRESS: u16 = RAM_SIZE as u16 - 2;
/// Where the hexadecimal digit glyphs live in memory.
pub const FONT_ADDRESS: u16 = 0x050;
/// Bytes per digit glyph.
pub const FONT_GLYPH_SIZE: usize = 5;
pub const FONTSET_SIZE: usize = 80;

pub const FONTSET: [u8; FONTSET_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
