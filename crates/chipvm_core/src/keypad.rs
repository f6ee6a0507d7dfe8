use crate::NUM_KEYS;

/// Whether the interpreter is executing or parked on a key-wait instruction.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum RunMode {
    #[default]
    Running,
    /// Parked by `LD Vx, K`; the payload is the destination register.
    AwaitingKey(usize),
}

/// Latched press state of the 16 logical keys.
///
/// Written by the host between steps, read by the interpreter.
#[derive(Clone, Default, Debug)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn set(&mut self, key: usize, pressed: bool) {
        self.keys[key & 0xF] = pressed;
    }

    #[inline]
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys[key & 0xF]
    }

    /// Lowest-numbered key currently held, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|key| key as u8)
    }
}
