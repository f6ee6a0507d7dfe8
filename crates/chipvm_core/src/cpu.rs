//! Instruction semantics.
//!
//! Each handler validates everything that can fail before it touches the
//! machine, then reports how the program counter should move. The PC is
//! only updated once the handler has succeeded.

use rand::Rng;

use crate::emulator::Emulator;
use crate::error::Result;
use crate::instruction::Instruction;
use crate::keypad::RunMode;
use crate::{FLAG_REG, FONT_ADDRESS, FONT_GLYPH_SIZE, NUM_REGS, RAM_SIZE};

/// How the program counter moves after an instruction.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Flow {
    /// Advance to the following instruction.
    Next,
    /// Skip the following instruction when the condition holds.
    SkipIf(bool),
    Jump(u16),
    /// Leave the PC where it is.
    Hold,
}

impl Emulator {
    pub(crate) fn execute(&mut self, instruction: Instruction) -> Result<()> {
        let flow = match instruction {
            Instruction::ClearScreen => self.op_cls(),
            Instruction::Return => self.op_ret()?,
            Instruction::Jump(addr) => Flow::Jump(addr),
            Instruction::Call(addr) => self.op_call(addr)?,
            Instruction::SkipEqImm { x, nn } => Flow::SkipIf(self.v(x) == nn),
            Instruction::SkipNeImm { x, nn } => Flow::SkipIf(self.v(x) != nn),
            Instruction::SkipEqReg { x, y } => Flow::SkipIf(self.v(x) == self.v(y)),
            Instruction::SkipNeReg { x, y } => Flow::SkipIf(self.v(x) != self.v(y)),
            Instruction::LoadImm { x, nn } => self.set_v(x, nn),
            Instruction::AddImm { x, nn } => self.set_v(x, self.v(x).wrapping_add(nn)),
            Instruction::LoadReg { x, y } => self.set_v(x, self.v(y)),
            Instruction::Or { x, y } => self.set_v(x, self.v(x) | self.v(y)),
            Instruction::And { x, y } => self.set_v(x, self.v(x) & self.v(y)),
            Instruction::Xor { x, y } => self.set_v(x, self.v(x) ^ self.v(y)),
            Instruction::AddReg { x, y } => self.op_add_carry(x, y),
            Instruction::Sub { x, y } => self.op_sub_borrow(x, x, y),
            Instruction::SubN { x, y } => self.op_sub_borrow(x, y, x),
            Instruction::ShiftRight { x, .. } => self.op_shr(x),
            Instruction::ShiftLeft { x, .. } => self.op_shl(x),
            Instruction::LoadIndex(addr) => {
                self.machine.i_reg = addr;
                Flow::Next
            }
            Instruction::JumpOffset(addr) => {
                let target = (addr as usize + self.v(0) as usize) % RAM_SIZE;
                Flow::Jump(target as u16)
            }
            Instruction::Random { x, nn } => {
                let byte: u8 = self.rng.gen();
                self.set_v(x, byte & nn)
            }
            Instruction::Draw { x, y, n } => self.op_draw(x, y, n)?,
            Instruction::SkipKeyPressed { x } => {
                Flow::SkipIf(self.machine.keypad.is_pressed(self.v(x) as usize))
            }
            Instruction::SkipKeyNotPressed { x } => {
                Flow::SkipIf(!self.machine.keypad.is_pressed(self.v(x) as usize))
            }
            Instruction::LoadDelay { x } => self.set_v(x, self.machine.timers.delay),
            Instruction::WaitKey { x } => {
                log::debug!("Waiting for key into V{:X}", x);
                self.machine.run_mode = RunMode::AwaitingKey(x);
                Flow::Hold
            }
            Instruction::SetDelay { x } => {
                self.machine.timers.delay = self.v(x);
                Flow::Next
            }
            Instruction::SetSound { x } => {
                self.machine.timers.sound = self.v(x);
                Flow::Next
            }
            Instruction::AddIndex { x } => {
                self.machine.i_reg = self.machine.i_reg.wrapping_add(self.v(x) as u16);
                Flow::Next
            }
            Instruction::LoadFont { x } => {
                let digit = (self.v(x) & 0xF) as u16;
                self.machine.i_reg = FONT_ADDRESS + digit * FONT_GLYPH_SIZE as u16;
                Flow::Next
            }
            Instruction::StoreBcd { x } => {
                let val = self.v(x);
                let digits = [val / 100, (val / 10) % 10, val % 10];
                self.machine.write_bytes(self.machine.i_reg, &digits)?;
                Flow::Next
            }
            Instruction::StoreRegs { x } => {
                let regs = self.machine.v_reg;
                self.machine.write_bytes(self.machine.i_reg, &regs[..=x])?;
                Flow::Next
            }
            Instruction::LoadRegs { x } => {
                let mut loaded = [0u8; NUM_REGS];
                loaded[..=x].copy_from_slice(self.machine.read_bytes(self.machine.i_reg, x + 1)?);
                self.machine.v_reg[..=x].copy_from_slice(&loaded[..=x]);
                Flow::Next
            }
        };
        self.apply_flow(flow);
        Ok(())
    }

    fn apply_flow(&mut self, flow: Flow) {
        let pc = &mut self.machine.pc;
        match flow {
            Flow::Next | Flow::SkipIf(false) => *pc = pc.wrapping_add(2),
            Flow::SkipIf(true) => *pc = pc.wrapping_add(4),
            Flow::Jump(addr) => *pc = addr,
            Flow::Hold => {}
        }
    }

    #[inline]
    fn v(&self, idx: usize) -> u8 {
        self.machine.v_reg[idx]
    }

    #[inline]
    fn set_v(&mut self, idx: usize, val: u8) -> Flow {
        self.machine.v_reg[idx] = val;
        Flow::Next
    }

    /// Store `val` in `Vx`, then the flag. VF as destination ends up holding
    /// the flag.
    #[inline]
    fn set_v_with_flag(&mut self, idx: usize, val: u8, flag: bool) -> Flow {
        self.machine.v_reg[idx] = val;
        self.machine.v_reg[FLAG_REG] = flag as u8;
        Flow::Next
    }

    fn op_cls(&mut self) -> Flow {
        self.machine.screen.clear();
        Flow::Next
    }

    fn op_ret(&mut self) -> Result<Flow> {
        let return_address = self.machine.pop(self.machine.pc)?;
        Ok(Flow::Jump(return_address))
    }

    fn op_call(&mut self, addr: u16) -> Result<Flow> {
        let pc = self.machine.pc;
        self.machine.push(pc.wrapping_add(2), pc)?;
        Ok(Flow::Jump(addr))
    }

    /// VF = 1 when the unsigned sum does not fit in a byte.
    fn op_add_carry(&mut self, x: usize, y: usize) -> Flow {
        let (val, carry) = self.v(x).overflowing_add(self.v(y));
        self.set_v_with_flag(x, val, carry)
    }

    /// `Vdst = Va - Vb`, VF = 1 when no borrow occurred (`Va >= Vb`).
    fn op_sub_borrow(&mut self, dst: usize, a: usize, b: usize) -> Flow {
        let (val, borrow) = self.v(a).overflowing_sub(self.v(b));
        self.set_v_with_flag(dst, val, !borrow)
    }

    fn op_shr(&mut self, x: usize) -> Flow {
        let val = self.v(x);
        self.set_v_with_flag(x, val >> 1, (val & 0x1) == 1)
    }

    fn op_shl(&mut self, x: usize) -> Flow {
        let val = self.v(x);
        self.set_v_with_flag(x, val << 1, (val & 0x80) != 0)
    }

    fn op_draw(&mut self, x: usize, y: usize, height: u8) -> Result<Flow> {
        let height = height as usize;
        // Copy out so the framebuffer can be borrowed mutably.
        let mut rows = [0u8; 16];
        // An empty sprite reads no memory, so `I` is not checked.
        if height > 0 {
            let sprite = self.machine.read_bytes(self.machine.i_reg, height)?;
            rows[..height].copy_from_slice(sprite);
        }
        let (origin_x, origin_y) = (self.v(x), self.v(y));
        let collision = self
            .machine
            .screen
            .draw_sprite(origin_x, origin_y, &rows[..height]);
        self.machine.v_reg[FLAG_REG] = collision as u8;
        Ok(Flow::Next)
    }
}
