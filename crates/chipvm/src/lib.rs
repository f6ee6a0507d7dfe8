use anyhow::Result;
use chipvm_core::app::DEFAULT_INSTRUCTIONS_PER_FRAME;
use chipvm_core::{EmulatorApp, EmulatorConfig};
use chipvm_term::{App, ScriptedKey, TermContext, TermInitInfo};
use clap::Parser;

/// Hand-assembled demo: draws the glyphs 0-F in two rows, then shows the
/// most recently pressed key's glyph in the bottom-right corner.
pub const DEMO_PROGRAM: &[u8] = &[
    0x00, 0xE0, // 200: CLS
    0x60, 0x00, // 202: LD V0, 0x00
    0x61, 0x01, // 204: LD V1, 0x01
    0x62, 0x01, // 206: LD V2, 0x01
    0xF0, 0x29, // 208: LD F, V0
    0xD1, 0x25, // 20A: DRW V1, V2, 5
    0x71, 0x08, // 20C: ADD V1, 0x08
    0x70, 0x01, // 20E: ADD V0, 0x01
    0x30, 0x08, // 210: SE V0, 0x08
    0x12, 0x08, // 212: JP 0x208
    0x61, 0x01, // 214: LD V1, 0x01
    0x62, 0x08, // 216: LD V2, 0x08
    0xF0, 0x29, // 218: LD F, V0
    0xD1, 0x25, // 21A: DRW V1, V2, 5
    0x71, 0x08, // 21C: ADD V1, 0x08
    0x70, 0x01, // 21E: ADD V0, 0x01
    0x30, 0x10, // 220: SE V0, 0x10
    0x12, 0x18, // 222: JP 0x218
    0x64, 0x38, // 224: LD V4, 0x38
    0x65, 0x18, // 226: LD V5, 0x18
    0xD4, 0x55, // 228: DRW V4, V5, 5   ; I still points at "F"
    0xF3, 0x0A, // 22A: LD V3, K
    0xD4, 0x55, // 22C: DRW V4, V5, 5   ; erase the old glyph
    0xF3, 0x29, // 22E: LD F, V3
    0xD4, 0x55, // 230: DRW V4, V5, 5
    0xE3, 0xA1, // 232: SKNP V3
    0x12, 0x32, // 234: JP 0x232        ; until the key is released
    0x12, 0x2A, // 236: JP 0x22A
];

/// Run CHIP-8 programs in the terminal
///
/// Without a ROM the bundled demo runs. Set RUST_LOG=debug (or trace) for
/// interpreter logging.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chipvm", version, about, long_about = None)]
pub struct Options {
    /// Program image to load at 0x200
    #[arg(value_name = "ROM")]
    pub rom_path: Option<String>,

    /// Stop after N frames at 60 per second
    #[arg(long = "frames", value_name = "N")]
    pub max_frames: Option<u64>,

    /// Instructions per frame
    #[arg(long = "ipf", value_name = "N", default_value_t = DEFAULT_INSTRUCTIONS_PER_FRAME)]
    pub instructions_per_frame: u32,

    /// Seed for the random-number instruction
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Comma separated key events, e.g. 30:q:down,40:q:up
    #[arg(
        long = "keys",
        value_name = "SCRIPT",
        value_delimiter = ',',
        value_parser = ScriptedKey::parse
    )]
    pub key_script: Vec<ScriptedKey>,

    /// Redraw the screen every frame
    #[arg(long)]
    pub live: bool,

    /// Pace frames to wall-clock time
    #[arg(long)]
    pub realtime: bool,

    /// Ring the terminal bell while the sound timer runs
    #[arg(long)]
    pub bell: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rom_path: None,
            max_frames: None,
            instructions_per_frame: DEFAULT_INSTRUCTIONS_PER_FRAME,
            seed: None,
            key_script: Vec::new(),
            live: false,
            realtime: false,
            bell: false,
        }
    }
}

/// Load `rom` into a fresh machine and drive it through the terminal frontend.
pub fn run(rom: &[u8], options: Options) -> Result<EmulatorApp> {
    let config = EmulatorConfig::builder().rng_seed(options.seed).build();
    let mut app = EmulatorApp::new(config, options.instructions_per_frame);
    app.emulator.load_rom(rom)?;

    let init_info = TermInitInfo::builder()
        .width(app.width())
        .height(app.height())
        .title(app.title())
        .realtime(options.realtime)
        .live(options.live)
        .bell(options.bell)
        .max_frames(options.max_frames)
        .key_script(options.key_script)
        .build();
    TermContext::run(init_info, &mut app)?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::{run, Options, DEMO_PROGRAM};
    use chipvm_core::{RunMode, SCREEN_WIDTH};
    use chipvm_term::chipvm_common::key::Key;
    use chipvm_term::ScriptedKey;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("chipvm").chain(args.iter().copied()))
    }

    #[test]
    fn parses_all_options() {
        let options = parse(&[
            "game.ch8", "--frames", "120", "--ipf", "15", "--seed", "7", "--keys",
            "6:x:up,5:x:down", "--live", "--realtime", "--bell",
        ])
        .unwrap();
        assert_eq!(options.rom_path.as_deref(), Some("game.ch8"));
        assert_eq!(options.max_frames, Some(120));
        assert_eq!(options.instructions_per_frame, 15);
        assert_eq!(options.seed, Some(7));
        assert_eq!(
            options.key_script,
            [
                ScriptedKey { frame: 6, key: Key::X, pressed: false },
                ScriptedKey { frame: 5, key: Key::X, pressed: true },
            ]
        );
        assert!(options.live && options.realtime && options.bell);
    }

    #[test]
    fn defaults_without_arguments() {
        assert_eq!(parse(&[]).unwrap(), Options::default());
    }

    #[test]
    fn repeated_key_scripts_accumulate() {
        let options = parse(&["--keys", "1:q:down", "--keys", "2:q:up"]).unwrap();
        assert_eq!(options.key_script.len(), 2);
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse(&["--frames"]).is_err());
        assert!(parse(&["--frames", "many"]).is_err());
        assert!(parse(&["--turbo"]).is_err());
        assert!(parse(&["a.ch8", "b.ch8"]).is_err());
        assert!(parse(&["--keys", "1:w"]).is_err());
        assert_eq!(
            parse(&["--help"]).unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }

    #[test]
    fn demo_draws_glyphs_then_waits_for_a_key() {
        let options = Options {
            max_frames: Some(11),
            seed: Some(1),
            ..Options::default()
        };
        let app = run(DEMO_PROGRAM, options).unwrap();
        let emu = &app.emulator;
        assert_eq!(emu.run_mode(), RunMode::AwaitingKey(3));
        assert_eq!(emu.pc(), 0x22A);
        let display = emu.get_display();
        // Top row of the "0" glyph at (1, 1).
        assert!((1..5).all(|x| display.pixel(x, 1)));
        assert!(!display.pixel(0, 1));
        assert!(!display.pixel(SCREEN_WIDTH - 1, 1));
        // "F" in the corner: its fourth row only has the leftmost pixel.
        assert!(display.pixel(56, 27));
        assert!(!display.pixel(59, 27));
    }

    #[test]
    fn demo_shows_the_pressed_key() {
        let options = Options {
            max_frames: Some(14),
            key_script: vec![
                ScriptedKey { frame: 13, key: Key::W, pressed: false },
                ScriptedKey { frame: 11, key: Key::W, pressed: true },
            ],
            ..Options::default()
        };
        let app = run(DEMO_PROGRAM, options).unwrap();
        let emu = &app.emulator;
        // W is keypad 5; the "5" glyph's fourth row only has the rightmost pixel.
        assert_eq!(emu.register(3), 0x5);
        let display = emu.get_display();
        assert!((56..60).all(|x| display.pixel(x, 24)));
        assert!(display.pixel(59, 27));
        assert!(!display.pixel(56, 27));
        assert_eq!(emu.run_mode(), RunMode::AwaitingKey(3));
        assert_eq!(emu.pc(), 0x22A);
    }
}
