// Playback clock - walks mission time forward on a fixed wall-clock tick
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("playback step of {tick:?} x {rate} does not fit a mission duration")]
pub struct PlaybackError {
    pub tick: std::time::Duration,
    pub rate: u32,
}

#[derive(Debug, Clone)]
pub struct Playback {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    current: DateTime<Utc>,
}

impl Playback {
    /// `rate` mission seconds pass for every wall-clock second
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tick: std::time::Duration,
        rate: u32,
    ) -> Result<Self, PlaybackError> {
        let step = Duration::from_std(tick)
            .ok()
            .zip(i32::try_from(rate).ok())
            .and_then(|(tick, rate)| tick.checked_mul(rate))
            .ok_or(PlaybackError { tick, rate })?;

        Ok(Self {
            start,
            end,
            step,
            current: start,
        })
    }

    pub fn current(&self) -> DateTime<Utc> {
        self.current
    }

    /// Move one tick forward, wrapping to the start once past the end
    pub fn advance(&mut self) -> DateTime<Utc> {
        self.current = match self.current.checked_add_signed(self.step) {
            Some(next) if next <= self.end => next,
            _ => self.start,
        };
        self.current
    }

    pub fn seek(&mut self, instant: DateTime<Utc>) {
        self.current = instant.clamp(self.start, self.end);
    }
}
