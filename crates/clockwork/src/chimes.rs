//! Hour and quarter chimes, gated on every clip having loaded.

use crate::time::TimeSample;
use derive_more::{AsRef, Deref, Display, From, Into};
use std::collections::HashSet;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

pub const HOUR_CLIPS: usize = 12;
pub const QUARTER_CLIPS: usize = 3;
/// Discrete clips that must report loaded before anything plays. The
/// looping tick is not one of them.
pub const READINESS_BARRIER: usize = HOUR_CLIPS + QUARTER_CLIPS;

/// Hourly chimes open with a wind-up; they are started this many seconds
/// before the hour so the strike lands on it.
pub const HOUR_LEAD_IN: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ClipId {
    #[display("hour chime {_0}")]
    Hour(u8),
    #[display("quarter chime {_0}")]
    Quarter(u8),
    #[display("tick")]
    Tick,
}

impl ClipId {
    pub fn all() -> impl Iterator<Item = ClipId> {
        (1..=HOUR_CLIPS as u8)
            .map(ClipId::Hour)
            .chain((1..=QUARTER_CLIPS as u8).map(ClipId::Quarter))
            .chain(std::iter::once(ClipId::Tick))
    }

    pub fn source(&self) -> ClipSource {
        match self {
            ClipId::Hour(n) => ClipSource::new(format!("h{n}.mp3")),
            ClipId::Quarter(n) => ClipSource::new(format!("q{n}.mp3")),
            ClipId::Tick => ClipSource::new("ticktock2.mp3"),
        }
    }
}

/// Identifier the host resolves to an audio asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct ClipSource(String);

crate::impl_string_newtype!(ClipSource);

/// A playable sound owned by the host.
pub trait Clip {
    /// Starts playback. Calling it while the clip is already playing must be
    /// harmless.
    fn play(&self);
    /// Stops playback, keeping the position.
    fn pause(&self);
    fn set_looping(&self, looping: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, EnumIter)]
pub enum LoadFailure {
    #[strum(to_string = "Audio download aborted")]
    Aborted,
    #[strum(to_string = "Audio download failed due to network error")]
    Network,
    #[strum(to_string = "Audio could not be decoded")]
    Decode,
    #[strum(to_string = "Audio format not supported")]
    Unsupported,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChimeError {
    #[error("{kind} ({clip}): {message}")]
    AssetLoad {
        clip: ClipSource,
        kind: LoadFailure,
        message: String,
    },
}

/// What to do when a clip cannot be loaded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, StrumDisplay, EnumIter,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum FailurePolicy {
    /// Surface the error to the host, which stops.
    Halt,
    /// Log it and run without sound.
    #[default]
    Silence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum ChimeState {
    Loading,
    Ready,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChimeRequest {
    Hour(u32),
    Quarter(u32),
}

impl ChimeRequest {
    /// The chime a sample calls for, if any. Minute zero has no quarter
    /// chime; the hour covers it.
    pub fn due(t: TimeSample) -> Option<Self> {
        match (t.minute(), t.second()) {
            (59, s) if s == 60 - HOUR_LEAD_IN => Some(Self::Hour(upcoming_hour(t.hour()))),
            (m @ (15 | 30 | 45), 0) => Some(Self::Quarter(m / 15)),
            _ => None,
        }
    }

    pub fn clip(&self) -> ClipId {
        match *self {
            Self::Hour(h) => ClipId::Hour(h as u8),
            Self::Quarter(q) => ClipId::Quarter(q as u8),
        }
    }
}

fn upcoming_hour(hour: u32) -> u32 {
    match hour {
        0 | 12 => 1,
        h => h + 1,
    }
}

struct ClipBank<K> {
    hours: [K; HOUR_CLIPS],
    quarters: [K; QUARTER_CLIPS],
    tick: K,
}

impl<K> ClipBank<K> {
    fn get(&self, id: ClipId) -> Option<&K> {
        match id {
            ClipId::Hour(n) => self.hours.get(usize::from(n).checked_sub(1)?),
            ClipId::Quarter(n) => self.quarters.get(usize::from(n).checked_sub(1)?),
            ClipId::Tick => Some(&self.tick),
        }
    }
}

pub struct Chimes<K> {
    bank: Option<ClipBank<K>>,
    ready: HashSet<ClipId>,
    state: ChimeState,
    last_fired: Option<(ChimeRequest, TimeSample)>,
}

impl<K: Clip> Chimes<K> {
    /// Opens every clip through `open`. The set stays `Loading` until each
    /// discrete clip is reported with [`Chimes::mark_ready`].
    pub fn load(mut open: impl FnMut(ClipId) -> K) -> Self {
        let hours = std::array::from_fn(|i| open(ClipId::Hour(i as u8 + 1)));
        let quarters = std::array::from_fn(|i| open(ClipId::Quarter(i as u8 + 1)));
        let tick = open(ClipId::Tick);
        tick.set_looping(true);

        Self {
            bank: Some(ClipBank {
                hours,
                quarters,
                tick,
            }),
            ready: HashSet::new(),
            state: ChimeState::Loading,
            last_fired: None,
        }
    }

    /// A set with no clips at all.
    pub fn silent() -> Self {
        Self {
            bank: None,
            ready: HashSet::new(),
            state: ChimeState::Muted,
            last_fired: None,
        }
    }

    pub fn state(&self) -> ChimeState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == ChimeState::Loading
    }

    pub fn clip(&self, id: ClipId) -> Option<&K> {
        self.bank.as_ref()?.get(id)
    }

    /// Records that `id` is fully buffered. Returns true on the call that
    /// completes the barrier.
    pub fn mark_ready(&mut self, id: ClipId) -> bool {
        if self.state != ChimeState::Loading {
            log::debug!("Ignoring readiness of {id} while {}", self.state);
            return false;
        }
        if id == ClipId::Tick {
            log::debug!("Tick clip buffered");
            return false;
        }
        if !self.ready.insert(id) {
            log::debug!("Duplicate readiness for {id}");
            return false;
        }
        log::debug!(
            "{id} ready ({}/{READINESS_BARRIER})",
            self.ready.len()
        );
        if self.ready.len() == READINESS_BARRIER {
            self.state = ChimeState::Ready;
            log::info!("All chimes loaded");
            return true;
        }
        false
    }

    /// Records a clip that failed to load. Nothing plays afterwards; with
    /// [`FailurePolicy::Halt`] the error is handed back to the caller.
    pub fn mark_failed(
        &mut self,
        id: ClipId,
        kind: LoadFailure,
        message: impl Into<String>,
        policy: FailurePolicy,
    ) -> Result<(), ChimeError> {
        let err = ChimeError::AssetLoad {
            clip: id.source(),
            kind,
            message: message.into(),
        };
        self.state = ChimeState::Muted;
        match policy {
            FailurePolicy::Halt => Err(err),
            FailurePolicy::Silence => {
                log::error!("{err}; continuing without chimes");
                Ok(())
            }
        }
    }

    /// Plays the clip for `request`. A no-op unless every clip is loaded.
    pub fn play(&self, request: ChimeRequest) -> bool {
        if self.state != ChimeState::Ready {
            return false;
        }
        match self.clip(request.clip()) {
            Some(clip) => {
                clip.play();
                true
            }
            None => {
                log::warn!("No clip for {request:?}");
                false
            }
        }
    }

    /// Starts the looping tick track once the set is ready.
    pub fn start_tick(&self) -> bool {
        if self.state != ChimeState::Ready {
            return false;
        }
        self.clip(ClipId::Tick).inspect(|tick| tick.play()).is_some()
    }

    /// Silences the tick track. Works in any state so a set that is being
    /// replaced can be quietened too.
    pub fn stop_tick(&self) {
        if let Some(tick) = self.clip(ClipId::Tick) {
            tick.pause();
        }
    }

    /// Plays whatever chime `sample` calls for. A request already played for
    /// the same sample is not repeated.
    pub fn ring(&mut self, sample: TimeSample) -> Option<ChimeRequest> {
        let request = ChimeRequest::due(sample)?;
        if self.last_fired == Some((request, sample)) {
            return None;
        }
        if !self.play(request) {
            return None;
        }
        log::debug!("Chiming {request:?} at {sample:?}");
        self.last_fired = Some((request, sample));
        Some(request)
    }
}
