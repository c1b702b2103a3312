//! The page-transition state machine.
//!
//! At most one transition mutates the page at a time. A request arriving
//! while one is in flight replaces whatever was queued before it and runs
//! once the current transition settles, so a burst of clicks applies only
//! its last target.

use log::{debug, info, warn};
use std::rc::Rc;
use std::time::Duration;

use super::command::Command;
use super::dom::Document;
use super::history::{History, HistoryBridge};
use super::indicator::{IndicatorScheduler, IndicatorTarget, Track};
use super::menu::MenuOverlay;
use super::registry::SectionRegistry;
use super::render::RenderHooks;
use super::section::{IconGroupId, SectionId, TransitionRequest};
use super::storage::Storage;
use crate::config::Config;

/// Root attribute naming the icon group being navigated to
pub const NAV_INTENT_ATTRIBUTE: &str = "data-tab";

/// Messages driving the navigator
#[derive(Debug, Clone, PartialEq)]
pub enum NavMsg {
    /// Navigation control or deep link asks for a section
    Request(TransitionRequest),
    /// First frame after hide/reset has been committed
    FrameCommitted(TransitionRequest),
    /// Second frame: safe to show the target
    Reveal(TransitionRequest),
    /// Settle delay elapsed, the transition is over
    Settled,
    MeasureIndicator(IndicatorTarget),
    /// Web fonts finished loading
    FontsReady,
    Resize,
    ResizeSettled(u64),
    OrientationChange,
    /// Tab visibility changed (true = foreground)
    VisibilityChanged(bool),
    /// A CSS transition finished on the element with this id
    TransitionEnd(String),
    /// Back/forward navigation changed the location
    PopState,
    OpenMenu,
    CloseMenu,
    MenuHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning(SectionId),
}

/// Mutual exclusion state, owned by the navigator alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionState {
    phase: Phase,
    queued: Option<TransitionRequest>,
}

impl TransitionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn queued(&self) -> Option<&TransitionRequest> {
        self.queued.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, Phase::Transitioning(_))
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            queued: None,
        }
    }
}

pub struct Navigator {
    document: Rc<dyn Document>,
    storage: Rc<dyn Storage>,
    history: Rc<dyn History>,
    hooks: RenderHooks,
    registry: SectionRegistry,
    indicator: IndicatorScheduler,
    menu: MenuOverlay,
    bridge: HistoryBridge,
    state: TransitionState,
    settle: Duration,
    active: Option<SectionId>,
    startup_tracking: bool,
    completed: u64,
}

impl Navigator {
    pub fn new(
        config: &Config,
        document: Rc<dyn Document>,
        storage: Rc<dyn Storage>,
        history: Rc<dyn History>,
    ) -> Self {
        Self {
            document,
            storage,
            history,
            hooks: RenderHooks::new(),
            registry: SectionRegistry::new(),
            indicator: IndicatorScheduler::new(&config.timing),
            menu: MenuOverlay::new(config.timing.menu_close()),
            bridge: HistoryBridge::new(&config.navigation),
            state: TransitionState::default(),
            settle: config.timing.settle(),
            active: None,
            startup_tracking: true,
            completed: 0,
        }
    }

    pub fn with_hooks(mut self, hooks: RenderHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn hooks_mut(&mut self) -> &mut RenderHooks {
        &mut self.hooks
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    /// Section shown by the most recent reveal
    pub fn active_section(&self) -> Option<SectionId> {
        self.active
    }

    /// Number of transitions that have fully settled
    pub fn completed_transitions(&self) -> u64 {
        self.completed
    }

    pub fn document(&self) -> &Rc<dyn Document> {
        &self.document
    }

    pub fn bridge(&self) -> &HistoryBridge {
        &self.bridge
    }

    /// Resolve the first section from URL, persisted selection or default
    pub fn start(&mut self) -> Command<NavMsg> {
        let request = self
            .bridge
            .resolve_initial_request(self.history.as_ref(), self.storage.as_ref());
        self.request(request)
    }

    pub fn update(&mut self, msg: NavMsg) -> Command<NavMsg> {
        let document = Rc::clone(&self.document);
        let document = document.as_ref();

        match msg {
            NavMsg::Request(request) => self.request(request),
            NavMsg::FrameCommitted(request) => Command::next_frame(NavMsg::Reveal(request)),
            NavMsg::Reveal(request) => self.reveal(request),
            NavMsg::Settled => self.settle(),
            NavMsg::MeasureIndicator(target) => {
                self.indicator.apply(document, &target);
                Command::None
            }
            NavMsg::FontsReady => {
                self.indicator.on_fonts_ready(document);
                Command::None
            }
            NavMsg::Resize => self.indicator.on_resize(),
            NavMsg::ResizeSettled(generation) => {
                self.indicator.on_resize_settled(document, generation)
            }
            NavMsg::OrientationChange => self.indicator.on_orientation_change(),
            NavMsg::VisibilityChanged(visible) => {
                if visible {
                    // Browser chrome may have resized while backgrounded
                    self.indicator.on_resize()
                } else {
                    Command::None
                }
            }
            NavMsg::TransitionEnd(element_id) => {
                self.indicator.on_transition_end(document, &element_id);
                Command::None
            }
            NavMsg::PopState => {
                let request = self
                    .bridge
                    .on_pop_state(self.history.as_ref(), self.storage.as_ref());
                self.request(request)
            }
            NavMsg::OpenMenu => {
                self.menu.open(document);
                Command::None
            }
            NavMsg::CloseMenu => self.menu.close(document),
            NavMsg::MenuHidden => {
                self.menu.finish_close(document);
                Command::None
            }
        }
    }

    fn request(&mut self, request: TransitionRequest) -> Command<NavMsg> {
        if let Phase::Transitioning(current) = self.state.phase {
            debug!("Transition to {} in flight, queueing {}", current, request);
            if let Some(dropped) = self.state.queued.replace(request) {
                debug!("Dropping superseded request {}", dropped);
            }
            return Command::None;
        }

        self.begin(request)
    }

    /// Hide everything and reset icons, then wait two frames so the cleared
    /// state is painted before anything is shown.
    fn begin(&mut self, request: TransitionRequest) -> Command<NavMsg> {
        info!("Transition to {}", request);
        self.state.phase = Phase::Transitioning(request.section);

        let document = Rc::clone(&self.document);
        let document = document.as_ref();

        for container in self.registry.containers(document) {
            container.remove_class("visible");
            container.add_class("hidden");
        }

        for group in IconGroupId::ALL {
            let icons = self.registry.icons(document, group);
            for icon in icons.icons() {
                icon.remove_class("selected");
                icon.force_layout();
            }
            if let Some(text) = icons.default_label {
                for label in icons.labels() {
                    label.set_text(text);
                }
            }
        }

        document.set_root_attribute(NAV_INTENT_ATTRIBUTE, request.section.icon_group().as_str());

        Command::next_frame(NavMsg::FrameCommitted(request))
    }

    fn reveal(&mut self, request: TransitionRequest) -> Command<NavMsg> {
        let document = Rc::clone(&self.document);
        let document = document.as_ref();
        let descriptor = self.registry.describe(document, request.section);

        match &descriptor.container {
            Some(container) => {
                container.remove_class("hidden");
                container.add_class("visible");
            }
            None => debug!("No container for section {}", request.section),
        }

        for icon in descriptor.icons.icons() {
            icon.add_class("selected");
        }
        if let Some(text) = descriptor.icons.active_label {
            for label in descriptor.icons.labels() {
                label.set_text(text);
            }
        }

        self.persist(request.section);
        self.active = Some(request.section);

        let mut commands = vec![self.menu.close(document)];

        let tracked = [
            (Track::Mobile, &descriptor.icons.mobile_icon),
            (Track::Desktop, &descriptor.icons.desktop_icon),
        ];
        for (track, icon) in tracked {
            let Some(item_id) = icon.as_ref().and_then(|i| i.id()) else {
                continue;
            };
            let target = IndicatorTarget::new(track, item_id);
            commands.push(if self.startup_tracking {
                self.indicator.track_on_startup(document, target)
            } else {
                self.indicator.track(document, target)
            });
        }
        self.startup_tracking = false;

        self.hooks.activate(request.section, request.payload());

        commands.push(Command::delay(self.settle, NavMsg::Settled));
        Command::batch(commands)
    }

    fn settle(&mut self) -> Command<NavMsg> {
        self.state.phase = Phase::Idle;
        self.completed += 1;

        match self.state.queued.take() {
            Some(next) => {
                debug!("Applying queued request {}", next);
                self.request(next)
            }
            None => Command::None,
        }
    }

    fn persist(&self, section: SectionId) {
        if let Err(e) = self.storage.set(self.bridge.storage_key(), section.as_str()) {
            warn!("Could not persist selection {}: {:#}", section, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::dom::MemoryDocument;
    use crate::nav::history::MemoryHistory;
    use crate::nav::storage::MemoryStorage;

    fn navigator(doc: &MemoryDocument) -> Navigator {
        for section in SectionId::ALL {
            doc.insert(crate::nav::registry::container_id(section), None, &["hidden"]);
        }
        doc.insert("home-icon", None, &["navbar-icon-item"]);
        doc.insert("blog-icon", None, &["navbar-icon-item"]);
        Navigator::new(
            &Config::default(),
            Rc::new(doc.clone()),
            Rc::new(MemoryStorage::new()),
            Rc::new(MemoryHistory::new("https://site.test/")),
        )
    }

    #[test]
    fn test_request_while_idle_hides_and_defers() {
        let doc = MemoryDocument::new();
        let mut nav = navigator(&doc);
        doc.element_by_id("home-page").unwrap().add_class("visible");

        let cmd = nav.update(NavMsg::Request(SectionId::Blog.into()));
        assert_eq!(
            cmd,
            Command::NextFrame(NavMsg::FrameCommitted(SectionId::Blog.into()))
        );
        assert_eq!(nav.state().phase(), Phase::Transitioning(SectionId::Blog));
        assert!(!doc.has_class("home-page", "visible"));
        assert!(doc.has_class("home-page", "hidden"));
        assert!(!doc.has_class("blog-page", "visible"));
        assert_eq!(doc.root_attribute(NAV_INTENT_ATTRIBUTE).as_deref(), Some("blog"));
    }

    #[test]
    fn test_request_while_in_flight_only_queues() {
        let doc = MemoryDocument::new();
        let mut nav = navigator(&doc);
        nav.update(NavMsg::Request(SectionId::Blog.into()));

        assert!(nav.update(NavMsg::Request(SectionId::Repos.into())).is_none());
        assert!(nav.update(NavMsg::Request(SectionId::Contact.into())).is_none());
        assert_eq!(nav.state().queued(), Some(&SectionId::Contact.into()));
        assert_eq!(doc.root_attribute(NAV_INTENT_ATTRIBUTE).as_deref(), Some("blog"));
    }

    #[test]
    fn test_frame_committed_defers_once_more() {
        let doc = MemoryDocument::new();
        let mut nav = navigator(&doc);
        let request = TransitionRequest::new(SectionId::Home);
        assert_eq!(
            nav.update(NavMsg::FrameCommitted(request.clone())),
            Command::NextFrame(NavMsg::Reveal(request))
        );
    }

    #[test]
    fn test_settle_replays_queued_request() {
        let doc = MemoryDocument::new();
        let mut nav = navigator(&doc);
        nav.update(NavMsg::Request(SectionId::Blog.into()));
        nav.update(NavMsg::Request(SectionId::Home.into()));

        let cmd = nav.update(NavMsg::Settled);
        assert_eq!(
            cmd,
            Command::NextFrame(NavMsg::FrameCommitted(SectionId::Home.into()))
        );
        assert_eq!(nav.state().phase(), Phase::Transitioning(SectionId::Home));
        assert_eq!(nav.state().queued(), None);
        assert_eq!(nav.completed_transitions(), 1);
    }

    #[test]
    fn test_reveal_ends_with_settle_timer() {
        let doc = MemoryDocument::new();
        let mut nav = navigator(&doc);
        nav.update(NavMsg::Request(SectionId::Home.into()));

        let leaves = nav.update(NavMsg::Reveal(SectionId::Home.into())).into_leaves();
        assert_eq!(
            leaves.last(),
            Some(&Command::delay(Duration::from_millis(300), NavMsg::Settled))
        );
        assert!(doc.has_class("home-page", "visible"));
        assert!(doc.has_class("home-icon", "selected"));
        assert_eq!(nav.active_section(), Some(SectionId::Home));
    }
}
