use crate::config::{self, ChimeConfig};
use crate::events::AppEvent;
use crate::gui::theme;
use crate::sys::audio::{ClipStatus, MediaClip};
use crate::sys::clock::LocalClock;
use clockwork::canvas::CairoCanvas;
use clockwork::chimes::{Chimes, ClipId, LoadFailure};
use clockwork::dial::{Dial, Reaction};
use clockwork::scheduler::TICK_PERIOD;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub dial: Rc<RefCell<Dial<MediaClip>>>,
    /// Chime settings the current clip set was opened with.
    pub chimes: ChimeConfig,
    /// Face layer rendered at the current diameter; `None` after a resize.
    pub face_cache: Rc<RefCell<Option<cairo::ImageSurface>>>,
    pub timer: Option<glib::SourceId>,
    pub root: gtk::ApplicationWindow,
    pub face_area: gtk::DrawingArea,
    pub hands_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Tick,
    ClipReady(ClipId),
    ClipFailed(ClipId, LoadFailure, String),
    SetDiameter(f64),
    Start,
    Stop,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::SetDiameter(d) => AppMsg::SetDiameter(d),
            AppEvent::Start => AppMsg::Start,
            AppEvent::Stop => AppMsg::Stop,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl From<(ClipId, ClipStatus)> for AppMsg {
    fn from((id, status): (ClipId, ClipStatus)) -> Self {
        match status {
            ClipStatus::Ready => AppMsg::ClipReady(id),
            ClipStatus::Failed(kind, message) => AppMsg::ClipFailed(id, kind, message),
        }
    }
}

/// Opens the clip set `config` describes; each clip reports back through
/// `sender` once it has loaded or failed.
fn open_chimes(config: &ChimeConfig, sender: &ComponentSender<AppModel>) -> Chimes<MediaClip> {
    if !config.enabled {
        return Chimes::silent();
    }
    match config.audio_dir() {
        Ok(dir) => Chimes::load(|id| {
            let clip = MediaClip::open(&dir, id);
            let sender = sender.clone();
            clip.watch(move |id, status| sender.input(AppMsg::from((id, status))));
            clip
        }),
        Err(e) => {
            log::error!("Chimes disabled: {}", e);
            Chimes::silent()
        }
    }
}

fn render_face(dial: &Dial<MediaClip>) -> Result<cairo::ImageSurface, cairo::Error> {
    let size = dial.diameter().ceil() as i32;
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, size, size)?;
    {
        let cr = cairo::Context::new(&surface)?;
        dial.draw_face(&CairoCanvas::new(&cr))?;
    }
    Ok(surface)
}

fn paint_face(
    cr: &cairo::Context,
    dial: &Dial<MediaClip>,
    cache: &mut Option<cairo::ImageSurface>,
) -> Result<(), cairo::Error> {
    if cache.is_none() {
        *cache = Some(render_face(dial)?);
    }
    if let Some(surface) = cache.as_ref() {
        cr.set_source_surface(surface, 0.0, 0.0)?;
        cr.paint()?;
    }
    Ok(())
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Dial<MediaClip>,
        ChimeConfig,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Dudley"),
            add_css_class: "dudley-window",
            set_decorated: false,
            set_resizable: false,

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "face_area"]
                gtk::DrawingArea {
                    add_css_class: "dudley-layer",
                },

                #[name = "hands_area"]
                add_overlay = &gtk::DrawingArea {
                    add_css_class: "dudley-layer",
                    set_can_target: false,
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (mut dial, chimes, rx) = init;

        theme::load_css();
        dial.set_chimes(open_chimes(&chimes, &sender));

        let widgets = view_output!();

        let mut model = AppModel {
            dial: Rc::new(RefCell::new(dial)),
            chimes,
            face_cache: Rc::new(RefCell::new(None)),
            timer: None,
            root: root.clone(),
            face_area: widgets.face_area.clone(),
            hands_area: widgets.hands_area.clone(),
        };

        let (dial_draw, cache_draw) = (model.dial.clone(), model.face_cache.clone());
        widgets.face_area.set_draw_func(move |_, cr, _, _| {
            let dial = dial_draw.borrow();
            if let Err(e) = paint_face(cr, &dial, &mut cache_draw.borrow_mut()) {
                log::error!("Drawing error: {}", e);
            }
        });

        let dial_draw = model.dial.clone();
        widgets.hands_area.set_draw_func(move |_, cr, _, _| {
            if let Err(e) = dial_draw.borrow().draw_hands(&CairoCanvas::new(cr)) {
                log::error!("Drawing error: {}", e);
            }
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        model.fit_to_dial();
        let reactions = model.dial.borrow_mut().mount();
        model.apply(reactions, &sender);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Tick => {
                if self.dial.borrow_mut().tick(&LocalClock).is_some() {
                    self.hands_area.queue_draw();
                }
            }
            AppMsg::ClipReady(id) => {
                let reactions = self.dial.borrow_mut().clip_ready(id);
                self.apply(reactions, &sender);
            }
            AppMsg::ClipFailed(id, kind, message) => {
                let result = self.dial.borrow_mut().clip_failed(id, kind, message);
                match result {
                    Ok(reactions) => self.apply(reactions, &sender),
                    Err(e) => {
                        log::error!("{}", e);
                        relm4::main_application().quit();
                    }
                }
            }
            AppMsg::SetDiameter(diameter) => self.set_diameter(diameter, &sender),
            AppMsg::Start => {
                let reaction = self.dial.borrow_mut().start();
                self.apply(reaction, &sender);
            }
            AppMsg::Stop => {
                let reaction = self.dial.borrow_mut().stop();
                self.apply(reaction, &sender);
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.set_diameter(new_config.diameter, &sender);
                    let result = self
                        .dial
                        .borrow_mut()
                        .set_face_text(new_config.face.into());
                    match result {
                        Ok(reactions) => self.apply(reactions, &sender),
                        Err(e) => log::error!("Failed to apply face text: {}", e),
                    }
                    self.set_chime_config(new_config.chimes, &sender);
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    fn set_diameter(&mut self, diameter: f64, sender: &ComponentSender<Self>) {
        let result = self.dial.borrow_mut().set_diameter(diameter);
        match result {
            Ok(reactions) => {
                self.fit_to_dial();
                self.apply(reactions, sender);
            }
            Err(e) => log::warn!("{}", e),
        }
    }

    fn set_chime_config(&mut self, chimes: ChimeConfig, sender: &ComponentSender<Self>) {
        let mut dial = self.dial.borrow_mut();
        dial.set_failure_policy(chimes.on_error);
        if self.chimes.needs_reopen(&chimes) {
            log::info!("Reopening chimes");
            dial.set_chimes(open_chimes(&chimes, sender));
        }
        self.chimes = chimes;
    }

    fn fit_to_dial(&self) {
        let size = self.dial.borrow().diameter().ceil() as i32;
        for area in [&self.face_area, &self.hands_area] {
            area.set_content_width(size);
            area.set_content_height(size);
        }
        self.root.set_default_size(size, size);
    }

    fn apply(
        &mut self,
        reactions: impl IntoIterator<Item = Reaction>,
        sender: &ComponentSender<Self>,
    ) {
        for reaction in reactions {
            match reaction {
                Reaction::RedrawFace => {
                    self.face_cache.borrow_mut().take();
                    self.face_area.queue_draw();
                }
                Reaction::RedrawHands => self.hands_area.queue_draw(),
                Reaction::StartTicking => {
                    if let Some(old) = self.timer.take() {
                        old.remove();
                    }
                    let sender = sender.clone();
                    self.timer = Some(glib::timeout_add_local(TICK_PERIOD, move || {
                        sender.input(AppMsg::Tick);
                        glib::ControlFlow::Continue
                    }));
                    log::info!("Clock started");
                }
                Reaction::StopTicking => {
                    if let Some(timer) = self.timer.take() {
                        timer.remove();
                    }
                    log::info!("Clock stopped");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_map_to_messages() {
        assert!(matches!(
            AppMsg::from(AppEvent::SetDiameter(320.0)),
            AppMsg::SetDiameter(d) if d == 320.0
        ));
        assert!(matches!(AppMsg::from(AppEvent::Stop), AppMsg::Stop));
        assert!(matches!(
            AppMsg::from(AppEvent::ConfigReload),
            AppMsg::ConfigReload
        ));
    }

    #[test]
    fn test_clip_status_maps_to_messages() {
        assert!(matches!(
            AppMsg::from((ClipId::Hour(3), ClipStatus::Ready)),
            AppMsg::ClipReady(ClipId::Hour(3))
        ));
        let failed = AppMsg::from((
            ClipId::Tick,
            ClipStatus::Failed(LoadFailure::Decode, "bad".into()),
        ));
        assert!(matches!(
            failed,
            AppMsg::ClipFailed(ClipId::Tick, LoadFailure::Decode, ref m) if m == "bad"
        ));
    }
}
