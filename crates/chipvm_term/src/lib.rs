use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use typed_builder::TypedBuilder;

pub use chipvm_common;
pub use chipvm_common::app::App;

use chipvm_common::color::Color;
use chipvm_common::key::Key;

/// Target frame time, ~16.67ms for 60 frames per second.
pub const FRAME_TIME: Duration = Duration::from_nanos(16_666_667);

const LIT: char = '█';
const UNLIT: char = ' ';

/// A key transition to inject before a given frame is updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptedKey {
    pub frame: u64,
    pub key: Key,
    pub pressed: bool,
}

impl ScriptedKey {
    /// Parse one `frame:key:down|up` entry.
    pub fn parse(entry: &str) -> Result<Self> {
        let mut parts = entry.trim().split(':');
        let (Some(frame), Some(key), Some(state), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            bail!("key event '{}' is not of the form frame:key:down|up", entry);
        };
        let frame = frame
            .parse::<u64>()
            .with_context(|| format!("invalid frame number in key event '{}'", entry))?;
        let key = Key::from_name(key).ok_or_else(|| anyhow!("unknown key '{}'", key))?;
        let pressed = match state {
            "down" | "d" => true,
            "up" | "u" => false,
            other => bail!("key state must be 'down' or 'up', got '{}'", other),
        };
        Ok(Self {
            frame,
            key,
            pressed,
        })
    }
}

#[derive(TypedBuilder)]
pub struct TermInitInfo {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Stop after this many frames; run until the app exits otherwise.
    #[builder(default)]
    pub max_frames: Option<u64>,
    /// Sleep to hold 60 frames per second and feed measured frame times to
    /// the app. When off, every frame reports exactly `FRAME_TIME`.
    #[builder(default = false)]
    pub realtime: bool,
    /// Redraw the screen in place after every frame.
    #[builder(default = false)]
    pub live: bool,
    /// Ring the terminal bell when the tone starts.
    #[builder(default = false)]
    pub bell: bool,
    /// Replayed in frame order; events for the same frame keep their order.
    #[builder(default)]
    pub key_script: Vec<ScriptedKey>,
}

pub struct TermContext;

impl TermContext {
    /// Drive `app` until it exits or `max_frames` is reached, then print the
    /// final frame to stdout. The app is borrowed so the caller can inspect
    /// it afterwards.
    pub fn run(init_info: TermInitInfo, app: &mut impl App) -> Result<()> {
        let TermInitInfo {
            width,
            height,
            title,
            max_frames,
            realtime,
            live,
            bell,
            mut key_script,
        } = init_info;
        let (width, height) = (width as usize, height as usize);
        let mut screen_state = vec![0u8; width * height * 3];
        let stdout = io::stdout();
        key_script.sort_by_key(|event| event.frame);
        let mut script = key_script.into_iter().peekable();
        let mut tone = false;
        let mut frame: u64 = 0;

        app.init();
        log::info!("{}: {}x{} terminal frontend", title, width, height);
        let mut last_frame = Instant::now();

        loop {
            if app.should_exit() || max_frames.is_some_and(|max| frame >= max) {
                app.exit();
                break;
            }

            while let Some(event) = script.next_if(|event| event.frame <= frame) {
                app.handle_key_event(event.key, event.pressed);
            }

            let elapsed = if realtime {
                last_frame.elapsed()
            } else {
                FRAME_TIME
            };
            last_frame = Instant::now();
            app.update(&mut screen_state, elapsed)?;

            let active = app.audio_active();
            if active != tone {
                log::debug!("tone {}", if active { "on" } else { "off" });
                if active && bell {
                    let mut out = stdout.lock();
                    out.write_all(b"\x07")?;
                    out.flush()?;
                }
                tone = active;
            }

            if live {
                let mut out = stdout.lock();
                // Cursor home, then overwrite the previous frame.
                write!(out, "\x1b[H{}", render_text(&screen_state, width, height))?;
                out.flush()?;
            }

            if realtime {
                let spent = last_frame.elapsed();
                if spent < FRAME_TIME {
                    std::thread::sleep(FRAME_TIME - spent);
                }
            }
            frame += 1;
        }

        let mut out = stdout.lock();
        write!(out, "{}", render_text(&screen_state, width, height))?;
        out.flush()?;
        log::info!("{}: stopped after {} frames", title, frame);
        Ok(())
    }
}

/// Render an RGB24 screen as text, one character per pixel and one line per
/// row. Bright pixels are drawn as full blocks.
pub fn render_text(screen_state: &[u8], width: usize, height: usize) -> String {
    let mut text = String::with_capacity((width * LIT.len_utf8() + 1) * height);
    for y in 0..height {
        for x in 0..width {
            let lit = Color::read_rgb24(screen_state, y * width + x).luma() >= 128;
            text.push(if lit { LIT } else { UNLIT });
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::{render_text, ScriptedKey, TermContext, TermInitInfo, FRAME_TIME};
    use anyhow::{bail, Result};
    use chipvm_common::app::App;
    use chipvm_common::color::Color;
    use chipvm_common::key::Key;
    use std::time::Duration;

    #[test]
    fn parses_key_entries() {
        assert_eq!(
            ScriptedKey::parse("12:w:down").unwrap(),
            ScriptedKey {
                frame: 12,
                key: Key::W,
                pressed: true
            }
        );
        assert!(!ScriptedKey::parse("3:1:up").unwrap().pressed);
        assert!(ScriptedKey::parse("x:w:down").is_err());
        assert!(ScriptedKey::parse("1:?:down").is_err());
        assert!(ScriptedKey::parse("1:w:sideways").is_err());
        assert!(ScriptedKey::parse("1:w").is_err());
        assert!(ScriptedKey::parse("1:w:down:extra").is_err());
    }

    #[test]
    fn renders_bright_pixels_as_blocks() {
        let mut screen = vec![0u8; 3 * 2 * 3];
        Color::WHITE.write_rgb24(&mut screen, 1);
        Color::WHITE.write_rgb24(&mut screen, 5);
        assert_eq!(render_text(&screen, 3, 2), " █ \n  █\n");
    }

    #[derive(Default)]
    struct RecordingApp {
        frames: u64,
        elapsed: Vec<Duration>,
        keys: Vec<(u64, Key, bool)>,
        exited: bool,
        fail_at: Option<u64>,
    }

    impl App for RecordingApp {
        fn init(&mut self) {}

        fn update(&mut self, screen: &mut [u8], elapsed: Duration) -> Result<()> {
            if self.fail_at == Some(self.frames) {
                bail!("boom");
            }
            self.elapsed.push(elapsed);
            Color::WHITE.write_rgb24(screen, 0);
            self.frames += 1;
            Ok(())
        }

        fn handle_key_event(&mut self, key: Key, is_down: bool) {
            self.keys.push((self.frames, key, is_down));
        }

        fn audio_active(&self) -> bool {
            false
        }

        fn should_exit(&self) -> bool {
            false
        }

        fn exit(&mut self) {
            self.exited = true;
        }

        fn width(&self) -> u32 {
            2
        }

        fn height(&self) -> u32 {
            1
        }

        fn title(&self) -> String {
            "test".to_string()
        }
    }

    fn info(max_frames: u64, key_script: Vec<ScriptedKey>) -> TermInitInfo {
        TermInitInfo::builder()
            .width(2)
            .height(1)
            .title("test".to_string())
            .max_frames(Some(max_frames))
            .key_script(key_script)
            .build()
    }

    #[test]
    fn runs_fixed_frames_with_fixed_frame_time() {
        let mut app = RecordingApp::default();
        TermContext::run(info(5, Vec::new()), &mut app).unwrap();
        assert_eq!(app.frames, 5);
        assert!(app.exited);
        assert!(app.elapsed.iter().all(|&e| e == FRAME_TIME));
    }

    #[test]
    fn replays_key_script_before_the_frame() {
        let script = ["3:q:up", "1:q:down"]
            .into_iter()
            .map(ScriptedKey::parse)
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let mut app = RecordingApp::default();
        TermContext::run(info(5, script), &mut app).unwrap();
        assert_eq!(app.keys, [(1, Key::Q, true), (3, Key::Q, false)]);
    }

    #[test]
    fn update_errors_stop_the_loop() {
        let mut app = RecordingApp {
            fail_at: Some(2),
            ..Default::default()
        };
        let err = TermContext::run(info(10, Vec::new()), &mut app).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(app.frames, 2);
    }
}
