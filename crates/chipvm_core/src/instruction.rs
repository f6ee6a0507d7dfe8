use std::fmt;

use crate::error::{Chip8Error, Result};
use crate::opcode::Opcode;

/// One recognised instruction with its operands already extracted.
///
/// Register operands (`x`, `y`) are indices in `0..16`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Instruction {
    /// 00E0 - CLS
    ClearScreen,
    /// 00EE - RET
    Return,
    /// 1NNN - JP addr
    Jump(u16),
    /// 2NNN - CALL addr
    Call(u16),
    /// 3XNN - SE Vx, byte
    SkipEqImm { x: usize, nn: u8 },
    /// 4XNN - SNE Vx, byte
    SkipNeImm { x: usize, nn: u8 },
    /// 5XY0 - SE Vx, Vy
    SkipEqReg { x: usize, y: usize },
    /// 6XNN - LD Vx, byte
    LoadImm { x: usize, nn: u8 },
    /// 7XNN - ADD Vx, byte
    AddImm { x: usize, nn: u8 },
    /// 8XY0 - LD Vx, Vy
    LoadReg { x: usize, y: usize },
    /// 8XY1 - OR Vx, Vy
    Or { x: usize, y: usize },
    /// 8XY2 - AND Vx, Vy
    And { x: usize, y: usize },
    /// 8XY3 - XOR Vx, Vy
    Xor { x: usize, y: usize },
    /// 8XY4 - ADD Vx, Vy
    AddReg { x: usize, y: usize },
    /// 8XY5 - SUB Vx, Vy
    Sub { x: usize, y: usize },
    /// 8XY6 - SHR Vx
    ShiftRight { x: usize, y: usize },
    /// 8XY7 - SUBN Vx, Vy
    SubN { x: usize, y: usize },
    /// 8XYE - SHL Vx
    ShiftLeft { x: usize, y: usize },
    /// 9XY0 - SNE Vx, Vy
    SkipNeReg { x: usize, y: usize },
    /// ANNN - LD I, addr
    LoadIndex(u16),
    /// BNNN - JP V0, addr
    JumpOffset(u16),
    /// CXNN - RND Vx, byte
    Random { x: usize, nn: u8 },
    /// DXYN - DRW Vx, Vy, nibble
    Draw { x: usize, y: usize, n: u8 },
    /// EX9E - SKP Vx
    SkipKeyPressed { x: usize },
    /// EXA1 - SKNP Vx
    SkipKeyNotPressed { x: usize },
    /// FX07 - LD Vx, DT
    LoadDelay { x: usize },
    /// FX0A - LD Vx, K
    WaitKey { x: usize },
    /// FX15 - LD DT, Vx
    SetDelay { x: usize },
    /// FX18 - LD ST, Vx
    SetSound { x: usize },
    /// FX1E - ADD I, Vx
    AddIndex { x: usize },
    /// FX29 - LD F, Vx
    LoadFont { x: usize },
    /// FX33 - LD B, Vx
    StoreBcd { x: usize },
    /// FX55 - LD [I], Vx
    StoreRegs { x: usize },
    /// FX65 - LD Vx, [I]
    LoadRegs { x: usize },
}

impl Instruction {
    /// Decode an instruction word fetched from `pc`.
    ///
    /// Matching is exact on the fixed bits of every family; anything else is
    /// `UnknownOpcode`, including the legacy `0NNN` machine-code call.
    pub fn decode(opcode: Opcode, pc: u16) -> Result<Instruction> {
        let x = opcode.x();
        let y = opcode.y();
        let n = opcode.n();
        let nn = opcode.nn();
        let nnn = opcode.nnn();
        let instruction = match opcode.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, _, _, _) => Instruction::Jump(nnn),
            (0x2, _, _, _) => Instruction::Call(nnn),
            (0x3, _, _, _) => Instruction::SkipEqImm { x, nn },
            (0x4, _, _, _) => Instruction::SkipNeImm { x, nn },
            (0x5, _, _, 0x0) => Instruction::SkipEqReg { x, y },
            (0x6, _, _, _) => Instruction::LoadImm { x, nn },
            (0x7, _, _, _) => Instruction::AddImm { x, nn },
            (0x8, _, _, 0x0) => Instruction::LoadReg { x, y },
            (0x8, _, _, 0x1) => Instruction::Or { x, y },
            (0x8, _, _, 0x2) => Instruction::And { x, y },
            (0x8, _, _, 0x3) => Instruction::Xor { x, y },
            (0x8, _, _, 0x4) => Instruction::AddReg { x, y },
            (0x8, _, _, 0x5) => Instruction::Sub { x, y },
            (0x8, _, _, 0x6) => Instruction::ShiftRight { x, y },
            (0x8, _, _, 0x7) => Instruction::SubN { x, y },
            (0x8, _, _, 0xE) => Instruction::ShiftLeft { x, y },
            (0x9, _, _, 0x0) => Instruction::SkipNeReg { x, y },
            (0xA, _, _, _) => Instruction::LoadIndex(nnn),
            (0xB, _, _, _) => Instruction::JumpOffset(nnn),
            (0xC, _, _, _) => Instruction::Random { x, nn },
            (0xD, _, _, _) => Instruction::Draw { x, y, n },
            (0xE, _, 0x9, 0xE) => Instruction::SkipKeyPressed { x },
            (0xE, _, 0xA, 0x1) => Instruction::SkipKeyNotPressed { x },
            (0xF, _, 0x0, 0x7) => Instruction::LoadDelay { x },
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey { x },
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay { x },
            (0xF, _, 0x1, 0x8) => Instruction::SetSound { x },
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex { x },
            (0xF, _, 0x2, 0x9) => Instruction::LoadFont { x },
            (0xF, _, 0x3, 0x3) => Instruction::StoreBcd { x },
            (0xF, _, 0x5, 0x5) => Instruction::StoreRegs { x },
            (0xF, _, 0x6, 0x5) => Instruction::LoadRegs { x },
            _ => {
                return Err(Chip8Error::UnknownOpcode {
                    opcode: opcode.raw(),
                    pc,
                })
            }
        };
        Ok(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Instruction::ClearScreen => write!(f, "CLS"),
            Instruction::Return => write!(f, "RET"),
            Instruction::Jump(addr) => write!(f, "JP {addr:#05X}"),
            Instruction::Call(addr) => write!(f, "CALL {addr:#05X}"),
            Instruction::SkipEqImm { x, nn } => write!(f, "SE V{x:X}, {nn:#04X}"),
            Instruction::SkipNeImm { x, nn } => write!(f, "SNE V{x:X}, {nn:#04X}"),
            Instruction::SkipEqReg { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            Instruction::LoadImm { x, nn } => write!(f, "LD V{x:X}, {nn:#04X}"),
            Instruction::AddImm { x, nn } => write!(f, "ADD V{x:X}, {nn:#04X}"),
            Instruction::LoadReg { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Instruction::Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            Instruction::And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Instruction::Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Instruction::AddReg { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Instruction::Sub { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            Instruction::ShiftRight { x, .. } => write!(f, "SHR V{x:X}"),
            Instruction::SubN { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            Instruction::ShiftLeft { x, .. } => write!(f, "SHL V{x:X}"),
            Instruction::SkipNeReg { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            Instruction::LoadIndex(addr) => write!(f, "LD I, {addr:#05X}"),
            Instruction::JumpOffset(addr) => write!(f, "JP V0, {addr:#05X}"),
            Instruction::Random { x, nn } => write!(f, "RND V{x:X}, {nn:#04X}"),
            Instruction::Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Instruction::SkipKeyPressed { x } => write!(f, "SKP V{x:X}"),
            Instruction::SkipKeyNotPressed { x } => write!(f, "SKNP V{x:X}"),
            Instruction::LoadDelay { x } => write!(f, "LD V{x:X}, DT"),
            Instruction::WaitKey { x } => write!(f, "LD V{x:X}, K"),
            Instruction::SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            Instruction::SetSound { x } => write!(f, "LD ST, V{x:X}"),
            Instruction::AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            Instruction::LoadFont { x } => write!(f, "LD F, V{x:X}"),
            Instruction::StoreBcd { x } => write!(f, "LD B, V{x:X}"),
            Instruction::StoreRegs { x } => write!(f, "LD [I], V{x:X}"),
            Instruction::LoadRegs { x } => write!(f, "LD V{x:X}, [I]"),
        }
    }
}
