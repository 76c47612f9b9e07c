//! The fixed-period animation tick.
//!
//! The host owns the actual timer. On every expiry it calls
//! [`Scheduler::tick`], which samples the wall clock once and derives the
//! hand angles and any chime from that one sample.

use crate::chimes::{ChimeRequest, Chimes, Clip};
use crate::time::{HandAngles, TimeSample};
use std::time::Duration;

/// Twenty ticks a second.
pub const TICK_PERIOD: Duration = Duration::from_millis(50);

pub trait TimeSource {
    fn sample(&self) -> TimeSample;
}

impl<F: Fn() -> TimeSample> TimeSource for F {
    fn sample(&self) -> TimeSample {
        self()
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub sample: TimeSample,
    pub angles: HandAngles,
    pub chime: Option<ChimeRequest>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    running: bool,
    ticks: u64,
}

impl Scheduler {
    /// Returns true if the scheduler was stopped before.
    pub fn start(&mut self) -> bool {
        if self.running {
            log::debug!("Scheduler already running");
            return false;
        }
        self.running = true;
        log::debug!("Scheduler started");
        true
    }

    /// Returns true if the scheduler was running before.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        log::debug!("Scheduler stopped after {} ticks", self.ticks);
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick<K: Clip>(
        &mut self,
        source: &impl TimeSource,
        chimes: &mut Chimes<K>,
    ) -> Option<Tick> {
        if !self.running {
            return None;
        }
        self.ticks += 1;
        let sample = source.sample();
        Some(Tick {
            sample,
            angles: sample.into(),
            chime: chimes.ring(sample),
        })
    }
}
