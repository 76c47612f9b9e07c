use crate::canvas::Canvas;
use crate::chimes::{ChimeError, ChimeState, Chimes, Clip, ClipId, FailurePolicy, LoadFailure};
use crate::face::{FaceRenderer, FaceText};
use crate::hands;
use crate::scheduler::{Scheduler, Tick, TimeSource};
use crate::surface::{Surface, SurfaceError};
use crate::text::LayoutError;
use crate::time::HandAngles;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DialEvent {
    /// Both layers now have this diameter.
    Resized(f64),
    /// Every discrete chime clip has loaded.
    AudioReady,
}

/// Work the host must carry out after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    RedrawFace,
    RedrawHands,
    /// Arm the periodic tick timer.
    StartTicking,
    /// Remove the tick timer.
    StopTicking,
}

/// The clock as a whole: two stacked layers of one diameter, the face and
/// hand renderers, the chimes, and the tick scheduler.
pub struct Dial<K> {
    diameter: f64,
    face: Surface,
    hands: Surface,
    renderer: FaceRenderer,
    chimes: Chimes<K>,
    scheduler: Scheduler,
    angles: HandAngles,
    policy: FailurePolicy,
    /// Set by [`Dial::stop`]; only an explicit [`Dial::start`] clears it.
    held: bool,
}

impl<K: Clip> Dial<K> {
    pub fn new(
        diameter: f64,
        text: FaceText,
        chimes: Chimes<K>,
        policy: FailurePolicy,
    ) -> Result<Self, DialError> {
        let surface = Surface::new(diameter)?;
        Ok(Self {
            diameter,
            face: surface,
            hands: surface,
            renderer: FaceRenderer::new(text)?,
            chimes,
            scheduler: Scheduler::default(),
            angles: HandAngles::default(),
            policy,
            held: false,
        })
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn surface(&self) -> &Surface {
        &self.face
    }

    pub fn chime_state(&self) -> ChimeState {
        self.chimes.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn angles(&self) -> HandAngles {
        self.angles
    }

    /// Resizes both layers. Setting the current diameter again does nothing;
    /// an invalid one is rejected and the dial keeps its size.
    pub fn set_diameter(&mut self, diameter: f64) -> Result<Vec<Reaction>, SurfaceError> {
        let diameter = Surface::validate(diameter)?;
        if diameter == self.diameter {
            return Ok(Vec::new());
        }
        self.face.resize(diameter)?;
        self.hands.resize(diameter)?;
        self.diameter = diameter;
        log::info!("Dial diameter set to {diameter}px");
        Ok(self.dispatch(DialEvent::Resized(diameter)))
    }

    /// Swaps in a new chime set. The old tick track is silenced; the new
    /// one starts once every clip has loaded.
    pub fn set_chimes(&mut self, chimes: Chimes<K>) {
        log::debug!("Chimes replaced ({})", chimes.state());
        self.chimes.stop_tick();
        self.chimes = chimes;
    }

    pub fn set_failure_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
    }

    pub fn set_face_text(&mut self, text: FaceText) -> Result<Vec<Reaction>, LayoutError> {
        if *self.renderer.text() == text {
            return Ok(Vec::new());
        }
        self.renderer = FaceRenderer::new(text)?;
        Ok(vec![Reaction::RedrawFace])
    }

    /// Reactions for first display: paint both layers and, when nothing is
    /// left to load, start ticking.
    pub fn mount(&mut self) -> Vec<Reaction> {
        let mut reactions = vec![Reaction::RedrawFace, Reaction::RedrawHands];
        reactions.extend(self.resume());
        reactions
    }

    pub fn dispatch(&mut self, event: DialEvent) -> Vec<Reaction> {
        match event {
            DialEvent::Resized(_) => {
                let mut reactions = vec![Reaction::RedrawFace, Reaction::RedrawHands];
                reactions.extend(self.resume());
                reactions
            }
            // a set swapped in while running only needs its tick track
            DialEvent::AudioReady if self.scheduler.is_running() => {
                self.chimes.start_tick();
                Vec::new()
            }
            DialEvent::AudioReady => self.resume().into_iter().collect(),
        }
    }

    pub fn clip_ready(&mut self, id: ClipId) -> Vec<Reaction> {
        if self.chimes.mark_ready(id) {
            self.dispatch(DialEvent::AudioReady)
        } else {
            Vec::new()
        }
    }

    /// Applies the failure policy. Under `Silence` the hands start without
    /// sound; under `Halt` the error is returned for the host to act on.
    pub fn clip_failed(
        &mut self,
        id: ClipId,
        kind: LoadFailure,
        message: impl Into<String>,
    ) -> Result<Vec<Reaction>, ChimeError> {
        self.chimes.mark_failed(id, kind, message, self.policy)?;
        Ok(self.resume().into_iter().collect())
    }

    /// Starts ticking on the dial's own initiative, which a requested stop
    /// overrides.
    fn resume(&mut self) -> Option<Reaction> {
        if self.held {
            log::debug!("Clock held by stop request");
            return None;
        }
        self.start()
    }

    /// Starts ticking unless chimes are still loading or it already runs.
    /// While loading, the request stands and ticking begins once they load.
    pub fn start(&mut self) -> Option<Reaction> {
        self.held = false;
        if self.chimes.is_loading() {
            log::debug!("Start deferred until chimes have loaded");
            return None;
        }
        if !self.scheduler.start() {
            return None;
        }
        self.chimes.start_tick();
        Some(Reaction::StartTicking)
    }

    /// Stops the hands and the tick track until [`Dial::start`] is called.
    pub fn stop(&mut self) -> Option<Reaction> {
        self.held = true;
        self.chimes.stop_tick();
        self.scheduler.stop().then_some(Reaction::StopTicking)
    }

    /// One timer expiry. Returns `None` while stopped.
    pub fn tick(&mut self, source: &impl TimeSource) -> Option<Tick> {
        let tick = self.scheduler.tick(source, &mut self.chimes)?;
        self.angles = tick.angles;
        Some(tick)
    }

    pub fn draw_face<C: Canvas>(&self, canvas: &C) -> Result<(), C::Error> {
        self.renderer.draw(canvas, &self.face)
    }

    pub fn draw_hands<C: Canvas>(&self, canvas: &C) -> Result<(), C::Error> {
        hands::draw_hands(canvas, &self.hands, &self.angles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::recording::Recorder;
    use crate::chimes::testing::{self, CountingClip, plays};
    use crate::chimes::ChimeRequest;
    use crate::time::TimeSample;

    fn dial(chimes: Chimes<CountingClip>, policy: FailurePolicy) -> Dial<CountingClip> {
        Dial::new(600.0, FaceText::default(), chimes, policy).unwrap()
    }

    fn deliver_all(dial: &mut Dial<CountingClip>) -> Vec<Reaction> {
        ClipId::all().flat_map(|id| dial.clip_ready(id)).collect()
    }

    #[test]
    fn test_rejects_invalid_initial_diameter() {
        let result = Dial::new(0.0, FaceText::default(), testing::loading(), FailurePolicy::Halt);
        assert!(matches!(
            result,
            Err(DialError::Surface(SurfaceError::InvalidDimension(_)))
        ));
    }

    #[test]
    fn test_ticking_waits_for_audio() {
        let mut dial = dial(testing::loading(), FailurePolicy::Silence);
        assert_eq!(
            dial.mount(),
            vec![Reaction::RedrawFace, Reaction::RedrawHands]
        );
        assert!(!dial.is_running());
        assert_eq!(dial.start(), None);

        assert_eq!(deliver_all(&mut dial), vec![Reaction::StartTicking]);
        assert!(dial.is_running());
        assert_eq!(dial.chime_state(), ChimeState::Ready);
    }

    #[test]
    fn test_muted_dial_ticks_immediately() {
        let mut dial = dial(Chimes::silent(), FailurePolicy::Silence);
        assert_eq!(
            dial.mount(),
            vec![
                Reaction::RedrawFace,
                Reaction::RedrawHands,
                Reaction::StartTicking
            ]
        );
    }

    #[test]
    fn test_resize_cascades_once() {
        let mut dial = dial(testing::ready(), FailurePolicy::Silence);
        assert_eq!(dial.set_diameter(600.0).unwrap(), Vec::new());

        let reactions = dial.set_diameter(300.0).unwrap();
        assert_eq!(
            reactions,
            vec![
                Reaction::RedrawFace,
                Reaction::RedrawHands,
                Reaction::StartTicking
            ]
        );
        assert_eq!(dial.surface().ratio(), 0.5);

        // a second resize must not arm another timer
        let reactions = dial.set_diameter(450.0).unwrap();
        assert!(!reactions.contains(&Reaction::StartTicking));
    }

    #[test]
    fn test_invalid_diameter_keeps_size() {
        let mut dial = dial(testing::ready(), FailurePolicy::Silence);
        dial.set_diameter(300.0).unwrap();
        assert!(dial.set_diameter(-1.0).is_err());
        assert!(dial.set_diameter(f64::NAN).is_err());
        assert_eq!(dial.diameter(), 300.0);
        assert_eq!(dial.surface().radius(), 150.0);
    }

    #[test]
    fn test_round_trip_reproduces_drawing() {
        let mut dial = dial(testing::ready(), FailurePolicy::Silence);
        let sample = TimeSample::new(10, 8, 37).unwrap();
        dial.start();
        dial.tick(&|| sample);

        let before = (Recorder::new(), Recorder::new());
        dial.draw_face(&before.0).unwrap();
        dial.draw_hands(&before.1).unwrap();

        dial.set_diameter(300.0).unwrap();
        dial.set_diameter(600.0).unwrap();
        assert_eq!(dial.surface().ratio(), 1.0);

        let after = (Recorder::new(), Recorder::new());
        dial.draw_face(&after.0).unwrap();
        dial.draw_hands(&after.1).unwrap();
        assert_eq!(before.0.ops(), after.0.ops());
        assert_eq!(before.1.ops(), after.1.ops());
    }

    #[test]
    fn test_hour_lead_in_scenario() {
        let mut dial = dial(testing::loading(), FailurePolicy::Silence);
        deliver_all(&mut dial);
        let sample = TimeSample::new(11, 59, 56).unwrap();
        let tick = dial.tick(&|| sample).unwrap();
        assert_eq!(tick.chime, Some(ChimeRequest::Hour(12)));
        assert_eq!(dial.angles(), HandAngles::from(sample));
    }

    #[test]
    fn test_halt_policy_returns_error() {
        let mut dial = dial(testing::loading(), FailurePolicy::Halt);
        let err = dial
            .clip_failed(ClipId::Hour(4), LoadFailure::Unsupported, "no demuxer")
            .unwrap_err();
        assert!(err.to_string().contains("h4.mp3"));
        assert!(!dial.is_running());
    }

    #[test]
    fn test_silence_policy_starts_without_sound() {
        let mut dial = dial(testing::loading(), FailurePolicy::Silence);
        let reactions = dial
            .clip_failed(ClipId::Quarter(1), LoadFailure::Network, "offline")
            .unwrap();
        assert_eq!(reactions, vec![Reaction::StartTicking]);
        assert_eq!(dial.chime_state(), ChimeState::Muted);

        let tick = dial
            .tick(&|| TimeSample::new(2, 15, 0).unwrap())
            .unwrap();
        assert_eq!(tick.chime, None);
    }

    #[test]
    fn test_stop_halts_ticks() {
        let mut dial = dial(testing::ready(), FailurePolicy::Silence);
        assert_eq!(dial.start(), Some(Reaction::StartTicking));
        assert_eq!(dial.stop(), Some(Reaction::StopTicking));
        assert_eq!(dial.stop(), None);
        assert_eq!(dial.tick(&|| TimeSample::default()), None);
        assert_eq!(plays(dial_chimes(&dial), ClipId::Tick), 1);
        let tick = dial_chimes(&dial).clip(ClipId::Tick).unwrap();
        assert!(!tick.playing.get());
    }

    #[test]
    fn test_resize_after_stop_stays_stopped() {
        let mut dial = dial(testing::ready(), FailurePolicy::Silence);
        dial.start();
        dial.stop();

        let reactions = dial.set_diameter(300.0).unwrap();
        assert_eq!(reactions, vec![Reaction::RedrawFace, Reaction::RedrawHands]);
        assert!(!dial.is_running());
        assert_eq!(plays(dial_chimes(&dial), ClipId::Tick), 1);

        assert_eq!(dial.start(), Some(Reaction::StartTicking));
        assert_eq!(dial.set_diameter(600.0).unwrap().len(), 2);
        assert!(dial.is_running());
    }

    #[test]
    fn test_stop_while_loading_holds_after_load() {
        let mut dial = dial(testing::loading(), FailurePolicy::Silence);
        dial.mount();
        assert_eq!(dial.stop(), None);
        assert_eq!(deliver_all(&mut dial), Vec::new());
        assert!(!dial.is_running());
    }

    #[test]
    fn test_start_while_loading_waits_for_load() {
        let mut dial = dial(testing::loading(), FailurePolicy::Silence);
        dial.stop();
        assert_eq!(dial.start(), None);
        assert_eq!(deliver_all(&mut dial), vec![Reaction::StartTicking]);
    }

    #[test]
    fn test_chimes_swapped_while_running() {
        let mut dial = dial(testing::ready(), FailurePolicy::Silence);
        dial.start();
        dial.set_chimes(testing::loading());
        assert!(dial.is_running());
        assert_eq!(deliver_all(&mut dial), Vec::new());
        assert_eq!(plays(dial_chimes(&dial), ClipId::Tick), 1);
    }

    #[test]
    fn test_policy_can_change_after_construction() {
        let mut dial = dial(testing::loading(), FailurePolicy::Silence);
        dial.set_failure_policy(FailurePolicy::Halt);
        assert!(
            dial.clip_failed(ClipId::Tick, LoadFailure::Decode, "bad")
                .is_err()
        );
    }

    #[test]
    fn test_loading_chimes_defer_start() {
        let mut dial = dial(Chimes::silent(), FailurePolicy::Silence);
        dial.set_chimes(testing::loading());
        assert_eq!(dial.mount().len(), 2);
        assert_eq!(deliver_all(&mut dial), vec![Reaction::StartTicking]);
    }

    #[test]
    fn test_face_text_change_redraws_face() {
        let mut dial = dial(testing::ready(), FailurePolicy::Silence);
        assert_eq!(dial.set_face_text(FaceText::default()).unwrap(), Vec::new());

        let text = FaceText {
            maker: "J . SMITH".into(),
            ..FaceText::default()
        };
        assert_eq!(
            dial.set_face_text(text).unwrap(),
            vec![Reaction::RedrawFace]
        );
        let canvas = Recorder::new();
        dial.draw_face(&canvas).unwrap();
        assert!(canvas.texts().iter().any(|t| t.text == "J"));
    }

    fn dial_chimes(dial: &Dial<CountingClip>) -> &Chimes<CountingClip> {
        &dial.chimes
    }
}
