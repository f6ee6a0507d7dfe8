use std::time::Duration;

use anyhow::{Context, Result};
use chipvm_common::app::App;
use chipvm_common::color::Color;
use chipvm_common::key::Key;

use crate::emulator::{Emulator, EmulatorConfig};
use crate::timer::TimerClock;
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Instructions run per 60 Hz frame when nothing else is configured.
pub const DEFAULT_INSTRUCTIONS_PER_FRAME: u32 = 10;

/// Frontend-facing driver for the interpreter.
///
/// Each `update` runs a fixed budget of instructions, then applies whatever
/// timer ticks the elapsed wall-clock time accounts for. Instruction rate and
/// timer rate are independent of each other.
pub struct EmulatorApp {
    should_exit: bool,
    pub emulator: Emulator,
    clock: TimerClock,
    instructions_per_frame: u32,
}

impl Default for EmulatorApp {
    fn default() -> Self {
        Self::new(EmulatorConfig::default(), DEFAULT_INSTRUCTIONS_PER_FRAME)
    }
}

impl EmulatorApp {
    pub fn new(config: EmulatorConfig, instructions_per_frame: u32) -> Self {
        Self {
            should_exit: false,
            emulator: Emulator::new(config),
            clock: TimerClock::new(),
            instructions_per_frame,
        }
    }

    fn run_instructions(&mut self) -> Result<()> {
        for _ in 0..self.instructions_per_frame {
            let pc = self.emulator.pc();
            self.emulator
                .step()
                .with_context(|| format!("CHIP-8 fault at PC {:#05X}", pc))?;
        }
        Ok(())
    }

    fn render(&self, screen_state: &mut [u8]) {
        let display = self.emulator.get_display();
        for (i, pixel) in display.cells().iter().enumerate() {
            let color = if *pixel { Color::WHITE } else { Color::BLACK };
            color.write_rgb24(screen_state, i);
        }
    }
}

impl App for EmulatorApp {
    fn init(&mut self) {
        log::info!("Chip8 init");
        self.clock.reset();
    }

    fn update(&mut self, screen_state: &mut [u8], elapsed: Duration) -> Result<()> {
        if let Err(err) = self.run_instructions() {
            log::error!("{:#}", err);
            self.should_exit = true;
            return Err(err);
        }
        self.emulator.advance_timers(&mut self.clock, elapsed);
        self.render(screen_state);
        Ok(())
    }

    fn handle_key_event(&mut self, key: Key, is_down: bool) {
        log::debug!("Chip8 key event: {:?} pressed={}", key, is_down);
        match key {
            Key::Escape if is_down => self.should_exit = true,
            _ => {
                if let Some(idx) = key2btn(key) {
                    self.emulator.set_key(idx, is_down);
                }
            }
        }
    }

    fn audio_active(&self) -> bool {
        self.emulator.sound_active()
    }

    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn exit(&mut self) {
        log::info!("Chip8 exit");
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn title(&self) -> String {
        "chipvm".to_string()
    }
}

/// Map the left-hand 4x4 block of a keyboard onto the hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R  ->  4 5 6 D
/// A S D F      7 8 9 E
/// Z X C V      A 0 B F
/// ```
pub fn key2btn(key: Key) -> Option<usize> {
    match key {
        Key::Num1 => Some(0x1),
        Key::Num2 => Some(0x2),
        Key::Num3 => Some(0x3),
        Key::Num4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        Key::Escape | Key::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{key2btn, EmulatorApp};
    use crate::emulator::EmulatorConfig;
    use crate::{Chip8Error, SCREEN_HEIGHT, SCREEN_WIDTH};
    use chipvm_common::app::App;
    use chipvm_common::key::Key;
    use std::collections::HashSet;
    use std::time::Duration;

    fn app_with(program: &[u8], instructions_per_frame: u32) -> EmulatorApp {
        let config = EmulatorConfig::builder().rng_seed(Some(7)).build();
        let mut app = EmulatorApp::new(config, instructions_per_frame);
        app.emulator.load_rom(program).unwrap();
        app.init();
        app
    }

    fn screen() -> Vec<u8> {
        vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 3]
    }

    #[test]
    fn keypad_mapping_covers_every_key_once() {
        let keys = [
            Key::Num1, Key::Num2, Key::Num3, Key::Num4,
            Key::Q, Key::W, Key::E, Key::R,
            Key::A, Key::S, Key::D, Key::F,
            Key::Z, Key::X, Key::C, Key::V,
        ];
        let mapped: HashSet<usize> = keys.iter().filter_map(|&k| key2btn(k)).collect();
        assert_eq!(mapped, (0..16).collect());
        assert_eq!(key2btn(Key::None), None);
    }

    #[test]
    fn key_events_reach_the_latch() {
        let mut app = app_with(&[0x12, 0x00], 1);
        app.handle_key_event(Key::V, true);
        assert!(app.emulator.is_key_pressed(0xF));
        app.handle_key_event(Key::V, false);
        assert!(!app.emulator.is_key_pressed(0xF));
    }

    #[test]
    fn escape_requests_exit() {
        let mut app = app_with(&[0x12, 0x00], 1);
        assert!(!app.should_exit());
        app.handle_key_event(Key::Escape, true);
        assert!(app.should_exit());
    }

    #[test]
    fn update_runs_budget_and_renders() {
        // LD I, font(0); DRW V0, V0, 5; JP self
        let program = [0xF0, 0x29, 0xD0, 0x05, 0x12, 0x04];
        let mut app = app_with(&program, 3);
        let mut buffer = screen();
        app.update(&mut buffer, Duration::ZERO).unwrap();
        assert_eq!(app.emulator.pc(), 0x204);
        // Top-left pixel of the "0" glyph is lit and rendered white.
        assert_eq!(&buffer[..3], &[255, 255, 255]);
        // Column 4 is not part of the glyph.
        assert_eq!(&buffer[12..15], &[0, 0, 0]);
    }

    #[test]
    fn timers_follow_elapsed_time_not_instruction_count() {
        // LD V0, 30; LD DT, V0; JP self
        let program = [0x60, 0x1E, 0xF0, 0x15, 0x12, 0x04];
        let mut app = app_with(&program, 100);
        let mut buffer = screen();
        app.update(&mut buffer, Duration::ZERO).unwrap();
        assert_eq!(app.emulator.delay_timer(), 30);
        app.update(&mut buffer, Duration::ZERO).unwrap();
        assert_eq!(app.emulator.delay_timer(), 30);
        app.update(&mut buffer, Duration::from_millis(500)).unwrap();
        assert_eq!(app.emulator.delay_timer(), 0);
    }

    #[test]
    fn sound_timer_drives_audio_signal() {
        // LD V0, 2; LD ST, V0; JP self
        let program = [0x60, 0x02, 0xF0, 0x18, 0x12, 0x04];
        let mut app = app_with(&program, 2);
        let mut buffer = screen();
        let frame = Duration::from_nanos(16_666_667);
        app.update(&mut buffer, Duration::ZERO).unwrap();
        assert!(app.audio_active());
        app.update(&mut buffer, frame).unwrap();
        assert!(app.audio_active());
        app.update(&mut buffer, frame).unwrap();
        assert!(!app.audio_active());
    }

    #[test]
    fn fault_stops_the_app_with_context() {
        let mut app = app_with(&[0xFF, 0xFF], 1);
        let err = app.update(&mut screen(), Duration::ZERO).unwrap_err();
        assert!(app.should_exit());
        assert!(err.to_string().contains("0x200"));
        assert_eq!(
            err.downcast_ref::<Chip8Error>(),
            Some(&Chip8Error::UnknownOpcode {
                opcode: 0xFFFF,
                pc: 0x200
            })
        );
    }
}
