use crate::display::Framebuffer;
use crate::error::{Chip8Error, Result};
use crate::keypad::{Keypad, RunMode};
use crate::timer::Timers;
use crate::{
    FONTSET, FONT_ADDRESS, MAX_PROGRAM_SIZE, NUM_REGS, RAM_SIZE, STACK_SIZE, START_ADDRESS,
};

/// Everything the interpreter can observe or change.
///
/// Mutation goes through the dispatcher, the compositor, the timers and the
/// host's key and program-load entry points. The helpers here only enforce
/// bounds; they do not implement any instruction.
#[derive(Clone)]
pub(crate) struct Machine {
    pub(crate) ram: [u8; RAM_SIZE],
    /// V0..VF
    pub(crate) v_reg: [u8; NUM_REGS],
    pub(crate) i_reg: u16,
    pub(crate) pc: u16,
    /// Next free stack slot.
    pub(crate) stack_pointer: usize,
    pub(crate) stack: [u16; STACK_SIZE],
    pub(crate) timers: Timers,
    pub(crate) screen: Framebuffer,
    pub(crate) keypad: Keypad,
    pub(crate) run_mode: RunMode,
}

impl Default for Machine {
    fn default() -> Self {
        let mut machine = Self {
            ram: [0; RAM_SIZE],
            v_reg: [0; NUM_REGS],
            i_reg: 0,
            pc: START_ADDRESS,
            stack_pointer: 0,
            stack: [0; STACK_SIZE],
            timers: Timers::default(),
            screen: Framebuffer::default(),
            keypad: Keypad::default(),
            run_mode: RunMode::Running,
        };
        machine.load_font();
        machine
    }
}

impl Machine {
    pub(crate) fn reset(&mut self) {
        *self = Machine::default();
    }

    fn load_font(&mut self) {
        let start = FONT_ADDRESS as usize;
        self.ram[start..start + FONTSET.len()].copy_from_slice(&FONTSET);
    }

    /// Copy a program image to `START_ADDRESS`.
    pub(crate) fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::InvalidProgramLength {
                len: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = START_ADDRESS as usize;
        self.ram[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Validate that `len` bytes starting at `addr` are all addressable.
    pub(crate) fn check_range(addr: usize, len: usize) -> Result<()> {
        match addr.checked_add(len) {
            Some(end) if end <= RAM_SIZE => Ok(()),
            _ => Err(Chip8Error::OutOfBoundsAddress {
                address: addr.max(RAM_SIZE),
            }),
        }
    }

    pub(crate) fn read_bytes(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let addr = addr as usize;
        Self::check_range(addr, len)?;
        Ok(&self.ram[addr..addr + len])
    }

    pub(crate) fn write_bytes(&mut self, addr: u16, bytes: &[u8]) -> Result<()> {
        let addr = addr as usize;
        Self::check_range(addr, bytes.len())?;
        self.ram[addr..addr + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Push a return address; `pc` is only used for error reporting.
    pub(crate) fn push(&mut self, return_address: u16, pc: u16) -> Result<()> {
        if self.stack_pointer >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { pc });
        }
        self.stack[self.stack_pointer] = return_address;
        self.stack_pointer += 1;
        Ok(())
    }

    pub(crate) fn pop(&mut self, pc: u16) -> Result<u16> {
        if self.stack_pointer == 0 {
            return Err(Chip8Error::StackUnderflow { pc });
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer])
    }
}
