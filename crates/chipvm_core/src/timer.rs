//! Delay and sound countdowns, decayed at a fixed 60 Hz.
//!
//! Decay is driven by wall-clock time only. The interpreter never ticks the
//! timers from instruction dispatch; the host calls
//! [`Emulator::tick_timers`](crate::Emulator::tick_timers) once per 1/60 s,
//! or feeds elapsed time through a [`TimerClock`].

use std::time::Duration;

/// Timer decay rate.
pub const TIMER_HZ: u32 = 60;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// The delay (DT) and sound (ST) countdown registers.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Decrement both timers by one, stopping at zero.
    ///
    /// Returns whether the tone should still be playing afterwards.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        self.sound_active()
    }

    #[inline]
    pub fn sound_active(&self) -> bool {
        self.sound > 0
    }
}

/// Converts elapsed wall-clock time into whole timer ticks.
///
/// The fractional remainder is carried exactly (in units of 1/60 ns), so
/// feeding one second in any number of slices yields exactly 60 ticks.
#[derive(Clone, Copy, Default, Debug)]
pub struct TimerClock {
    pending: u128,
}

impl TimerClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for `elapsed` time and return how many ticks are now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.pending += elapsed.as_nanos() * u128::from(TIMER_HZ);
        let ticks = self.pending / NANOS_PER_SEC;
        self.pending %= NANOS_PER_SEC;
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    pub fn reset(&mut self) {
        self.pending = 0;
    }
}
