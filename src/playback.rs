//! Playback position and the play/pause state machine
//!
//! [`Playback`] only knows the number of states it navigates; it never touches
//! the states themselves. [`Ticker`] is the scheduler that drives play mode: a
//! tick is re-armed only after the caller has finished rendering, and
//! cancelling simply stops re-arming.

use std::time::{Duration, Instant};

/// Whether playback is advancing on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Paused,
    Playing,
}

/// Events advanced per tick at a given speed setting
pub fn stride_for_speed(speed: u32) -> usize {
    (speed / 5).max(1) as usize
}

/// Current position in a sequence of `len` heap states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playback {
    position: usize,
    len: usize,
    mode: Mode,
    stride: usize,
}

impl Playback {
    pub fn new(len: usize) -> Self {
        Playback {
            position: 0,
            len,
            mode: Mode::Paused,
            stride: 1,
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.set_stride(stride);
        self
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_playing(&self) -> bool {
        self.mode == Mode::Playing
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn set_stride(&mut self, stride: usize) {
        self.stride = stride.max(1);
    }

    pub fn last_index(&self) -> usize {
        self.len.saturating_sub(1)
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.position == self.last_index()
    }

    /// Move to `index`, clamped into range
    pub fn seek(&mut self, index: i64) {
        self.position = index.clamp(0, self.last_index() as i64) as usize;
    }

    /// Move by `delta` states, clamped into range
    pub fn step(&mut self, delta: i64) {
        self.seek((self.position as i64).saturating_add(delta));
    }

    /// Start advancing; does nothing when already at the end
    pub fn play(&mut self) {
        if !self.is_at_end() {
            self.mode = Mode::Playing;
        }
    }

    pub fn pause(&mut self) {
        self.mode = Mode::Paused;
    }

    pub fn toggle(&mut self) {
        match self.mode {
            Mode::Playing => self.pause(),
            Mode::Paused => self.play(),
        }
    }

    /// Advance one tick. Returns whether the position changed.
    ///
    /// Reaching the last state switches back to [`Mode::Paused`].
    pub fn tick(&mut self) -> bool {
        if self.mode != Mode::Playing {
            return false;
        }
        let before = self.position;
        self.step(self.stride as i64);
        if self.is_at_end() {
            self.mode = Mode::Paused;
        }
        self.position != before
    }

    /// State under a timeline click at `fraction` of the timeline width
    pub fn timeline_index(&self, fraction: f64) -> usize {
        if self.len == 0 || !fraction.is_finite() {
            return 0;
        }
        let index = (fraction.clamp(0.0, 1.0) * self.len as f64).floor() as usize;
        index.min(self.last_index())
    }
}

/// Cancellable repeating tick
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker {
            interval,
            next_due: None,
        }
    }

    /// Schedule the next tick one interval after `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Schedule a tick that is already due
    pub fn arm_immediately(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Consume the pending tick if it is due. The ticker stays disarmed until
    /// [`Ticker::arm`] is called again.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = None;
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending tick, if any
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
