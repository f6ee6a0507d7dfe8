use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use typed_builder::TypedBuilder;

use crate::display::Framebuffer;
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::keypad::RunMode;
use crate::machine::Machine;
use crate::opcode::Opcode;
use crate::timer::TimerClock;
use crate::{LAST_INSTRUCTION_ADDRESS, NUM_KEYS, NUM_REGS, START_ADDRESS};

/// Construction-time options for an [`Emulator`].
#[derive(TypedBuilder, Clone, Copy, Debug, Default)]
pub struct EmulatorConfig {
    /// Seed for `RND`. Without one the generator is seeded from entropy.
    #[builder(default)]
    pub rng_seed: Option<u64>,
}

/// What a single [`Emulator::step`] did.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Step {
    /// One instruction was fetched, decoded and executed.
    Executed(Instruction),
    /// Parked on a key-wait and no key is held.
    Waiting,
    /// A key-wait was satisfied by this key.
    KeyReceived(u8),
}

pub struct Emulator {
    pub(crate) machine: Machine,
    pub(crate) rng: StdRng,
    config: EmulatorConfig,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new(EmulatorConfig::default())
    }
}

impl Emulator {
    pub fn new(config: EmulatorConfig) -> Self {
        Self {
            machine: Machine::default(),
            rng: make_rng(config.rng_seed),
            config,
        }
    }

    /// Return to the power-on state. The RNG is re-seeded from the config, so
    /// a seeded emulator replays identically after a reset.
    pub fn reset(&mut self) {
        log::info!("CHIP-8 reset");
        self.machine.reset();
        self.rng = make_rng(self.config.rng_seed);
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.machine.load_program(rom)?;
        log::info!("Loaded {} byte program at {:#05X}", rom.len(), START_ADDRESS);
        Ok(())
    }

    /// Run one fetch-decode-execute cycle, or one poll of the key latch when
    /// parked on a key-wait.
    ///
    /// Errors are fatal to this machine; the state is left as it was before
    /// the failing instruction.
    pub fn step(&mut self) -> Result<Step> {
        if let RunMode::AwaitingKey(reg) = self.machine.run_mode {
            return Ok(self.poll_key_wait(reg));
        }

        let pc = self.machine.pc;
        let opcode = self.fetch_opcode()?;
        let instruction = Instruction::decode(opcode, pc)?;
        log::trace!("{:#05X}: {} {}", pc, opcode, instruction);
        self.execute(instruction)?;
        Ok(Step::Executed(instruction))
    }

    fn fetch_opcode(&self) -> Result<Opcode> {
        let pc = self.machine.pc;
        if !(START_ADDRESS..=LAST_INSTRUCTION_ADDRESS).contains(&pc) {
            return Err(Chip8Error::OutOfBoundsAddress {
                address: pc as usize,
            });
        }
        let pc = pc as usize;
        Ok(Opcode::from_bytes(
            self.machine.ram[pc],
            self.machine.ram[pc + 1],
        ))
    }

    fn poll_key_wait(&mut self, reg: usize) -> Step {
        match self.machine.keypad.first_pressed() {
            Some(key) => {
                log::debug!("Key {:X} satisfied wait into V{:X}", key, reg);
                self.machine.v_reg[reg] = key;
                self.machine.pc = self.machine.pc.wrapping_add(2);
                self.machine.run_mode = RunMode::Running;
                Step::KeyReceived(key)
            }
            None => Step::Waiting,
        }
    }

    /// One 60 Hz decay of the delay and sound timers.
    ///
    /// Returns whether the tone should be playing after the tick.
    pub fn tick_timers(&mut self) -> bool {
        let was_active = self.machine.timers.sound_active();
        let active = self.machine.timers.tick();
        if was_active && !active {
            log::debug!("Sound timer expired");
        }
        active
    }

    /// Apply every timer tick that `elapsed` wall-clock time accounts for.
    ///
    /// Returns the number of ticks applied.
    pub fn advance_timers(&mut self, clock: &mut TimerClock, elapsed: Duration) -> u32 {
        let ticks = clock.advance(elapsed);
        for _ in 0..ticks {
            self.tick_timers();
        }
        ticks
    }

    pub fn set_key(&mut self, idx: usize, pressed: bool) {
        assert!(idx < NUM_KEYS, "Invalid key index: {}", idx);
        self.machine.keypad.set(idx, pressed);
    }

    pub fn is_key_pressed(&self, idx: usize) -> bool {
        self.machine.keypad.is_pressed(idx)
    }

    pub fn get_display(&self) -> &Framebuffer {
        &self.machine.screen
    }

    pub fn sound_active(&self) -> bool {
        self.machine.timers.sound_active()
    }

    pub fn pc(&self) -> u16 {
        self.machine.pc
    }

    pub fn index(&self) -> u16 {
        self.machine.i_reg
    }

    pub fn registers(&self) -> &[u8; NUM_REGS] {
        &self.machine.v_reg
    }

    pub fn register(&self, idx: usize) -> u8 {
        self.machine.v_reg[idx & 0xF]
    }

    pub fn delay_timer(&self) -> u8 {
        self.machine.timers.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.machine.timers.sound
    }

    pub fn stack_depth(&self) -> usize {
        self.machine.stack_pointer
    }

    /// The most recently pushed return address.
    pub fn stack_top(&self) -> Option<u16> {
        self.machine
            .stack_pointer
            .checked_sub(1)
            .map(|top| self.machine.stack[top])
    }

    pub fn run_mode(&self) -> RunMode {
        self.machine.run_mode
    }

    pub fn memory(&self) -> &[u8] {
        &self.machine.ram
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
