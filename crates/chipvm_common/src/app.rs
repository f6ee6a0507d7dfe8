use std::time::Duration;

use anyhow::Result;

use crate::key::Key;

/// Contract between a frontend loop and the machine it drives.
///
/// The frontend owns pacing and presentation; the app owns the machine and
/// decides how much emulated work one `update` represents.
pub trait App {
    fn init(&mut self);
    /// Advance by one frame that took `elapsed` of wall-clock time and write
    /// the resulting picture into `screen` as RGB24.
    fn update(&mut self, screen: &mut [u8], elapsed: Duration) -> Result<()>;
    fn handle_key_event(&mut self, key: Key, is_down: bool);
    /// Whether a tone should currently be audible.
    fn audio_active(&self) -> bool;
    fn should_exit(&self) -> bool;
    fn exit(&mut self);

    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn title(&self) -> String;
}
