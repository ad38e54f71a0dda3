use std::time::Duration;

use crate::core::{Clock, SystemClock};

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the first frame, drives the animation phase
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
    /// Wall-clock timestamp used for throttling
    pub timestamp: Duration,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32, timestamp: Duration) -> Self {
        Self {
            number,
            time,
            delta,
            timestamp,
        }
    }
}

/// Infinite iterator that yields frame information
/// Use this in a loop: `for frame in frames { ... }`
pub struct FrameIterator<C: Clock = SystemClock> {
    clock: C,
    frame_number: u64,
    start: Duration,
    last_frame: Duration,
}

impl FrameIterator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl<C: Clock> FrameIterator<C> {
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            frame_number: 0,
            start: now,
            last_frame: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Current time on the underlying clock
    pub fn now(&self) -> Duration {
        self.clock.now()
    }
}

impl Default for FrameIterator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Iterator for FrameIterator<C> {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = self.clock.now();
        let delta = now.saturating_sub(self.last_frame).as_secs_f32();
        let time = now.saturating_sub(self.start).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta, now);

        self.frame_number += 1;
        self.last_frame = now;

        Some(info)
    }
}

/// Frames-per-second estimate, refreshed once per `window` seconds
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    window: f32,
    frames: u32,
    accumulated: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(window: f32) -> Self {
        Self {
            window,
            frames: 0,
            accumulated: 0.0,
            fps: 0.0,
        }
    }

    /// Count a frame; returns the new estimate when the window rolls over
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.accumulated += delta;

        if self.accumulated >= self.window {
            self.fps = self.frames as f32 / self.accumulated;
            self.frames = 0;
            self.accumulated = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
