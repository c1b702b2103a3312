//! Interactive terminal preview of the navigator.
//!
//! The real state machine runs against an in-memory page whose layout is
//! recomputed every frame from the terminal size, so transitions, the
//! coalescing queue and indicator convergence can be watched live.

pub mod layout;
pub mod site;
pub mod theme;
pub mod view;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::{debug, info};
use ratatui::layout::Rect as Area;
use std::rc::Rc;
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::nav::{
    FontStatus, History, IconGroupId, MemoryDocument, MemoryHistory, NavMsg, NavRuntime, Navigator,
    SectionId, SectionRegistry, Storage, TransitionRequest,
};

use self::layout::{Regions, SiteLayout};
use self::theme::Theme;

pub struct Preview {
    runtime: NavRuntime,
    doc: MemoryDocument,
    history: MemoryHistory,
    registry: SectionRegistry,
    layout: SiteLayout,
    regions: Option<Regions>,
    theme: Theme,
    article_param: String,
    demo_article: String,
    tab_visible: bool,
}

impl Preview {
    pub fn new(config: &Config, storage: Rc<dyn Storage>, initial_url: &str) -> Self {
        let doc = MemoryDocument::new();
        site::build(&doc);
        let history = MemoryHistory::new(initial_url);

        let navigator = Navigator::new(config, Rc::new(doc.clone()), storage, Rc::new(history.clone()))
            .with_hooks(site::placeholder_renderers(&doc));

        Self {
            runtime: NavRuntime::new(navigator, config.timing.frame_interval()),
            doc,
            history,
            registry: SectionRegistry::new(),
            layout: SiteLayout::new(config.timing.settle()),
            regions: None,
            theme: Theme::from_name(&config.preview.theme),
            article_param: config.navigation.article_param.clone(),
            demo_article: config.navigation.demo_article.clone(),
            tab_visible: true,
        }
    }

    /// Lay out the page for the initial size and run the page-load sequence
    pub fn start(&mut self, area: Area) {
        self.relayout(area, Duration::ZERO);
        self.runtime.start();
    }

    /// Advance to wall-clock time `now`, relaying out first so timers that
    /// fire during this step measure the current geometry
    pub fn tick(&mut self, area: Area, now: Duration) {
        self.relayout(area, now);
        self.runtime.advance_to(now);
    }

    fn relayout(&mut self, area: Area, now: Duration) {
        let regions = Regions::compute(area);
        let resized = self.regions.is_some_and(|previous| previous != regions);
        self.regions = Some(regions);

        if let Some(item_id) = self.layout.apply(&self.doc, &regions, now) {
            self.runtime.dispatch(NavMsg::TransitionEnd(item_id));
        }
        if resized {
            debug!("Terminal resized to {}x{}", area.width, area.height);
            self.runtime.dispatch(NavMsg::Resize);
        }
    }

    pub fn navigator(&self) -> &Navigator {
        self.runtime.navigator()
    }

    pub fn runtime(&self) -> &NavRuntime {
        &self.runtime
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.doc
    }

    pub fn location(&self) -> String {
        self.history.location()
    }

    pub fn regions(&self) -> Option<&Regions> {
        self.regions.as_ref()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn tab_visible(&self) -> bool {
        self.tab_visible
    }

    pub fn request(&mut self, request: TransitionRequest) {
        self.runtime.dispatch(NavMsg::Request(request));
    }

    /// Follow an article link: push a history entry, then navigate
    pub fn open_article(&mut self, slug: &str) {
        if let Ok(mut url) = Url::parse(&self.history.location()) {
            url.query_pairs_mut()
                .clear()
                .append_pair(&self.article_param, slug);
            self.history.push(url.as_str());
        }
        self.request(TransitionRequest::article(slug));
    }

    /// Step through the menu order from the active section's icon group
    pub fn cycle(&mut self, forward: bool) {
        let order = SectionId::menu_order();
        let current = self
            .navigator()
            .active_section()
            .map(|s| s.icon_group().landing_section())
            .and_then(|s| order.iter().position(|o| *o == s))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.request(order[next].into());
    }

    pub fn history_back(&mut self) {
        if self.history.back() {
            self.runtime.dispatch(NavMsg::PopState);
        }
    }

    pub fn history_forward(&mut self) {
        if self.history.forward() {
            self.runtime.dispatch(NavMsg::PopState);
        }
    }

    pub fn toggle_tab_visibility(&mut self) {
        self.tab_visible = !self.tab_visible;
        info!("Tab {}", if self.tab_visible { "foregrounded" } else { "backgrounded" });
        self.runtime.dispatch(NavMsg::VisibilityChanged(self.tab_visible));
    }

    pub fn signal_fonts_ready(&mut self) {
        if self.runtime.fonts() != FontStatus::Ready {
            self.runtime.signal_fonts_ready();
        }
    }

    /// Returns false when the preview should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return true;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
            KeyCode::Char('q') => return false,
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                let section = SectionId::menu_order()[index];
                self.request(section.into());
            }
            KeyCode::Char('a') => {
                let slug = self.demo_article.clone();
                self.open_article(&slug);
            }
            KeyCode::Left => self.cycle(false),
            KeyCode::Right => self.cycle(true),
            KeyCode::Char('[') => self.history_back(),
            KeyCode::Char(']') => self.history_forward(),
            KeyCode::Char('m') => self.runtime.dispatch(NavMsg::OpenMenu),
            KeyCode::Esc => self.runtime.dispatch(NavMsg::CloseMenu),
            KeyCode::Char('v') => self.toggle_tab_visibility(),
            KeyCode::Char('f') => self.signal_fonts_ready(),
            _ => {}
        }
        true
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        if let Some(group) = self.icon_at(mouse.column, mouse.row) {
            debug!("Clicked {} icon", group);
            self.request(group.landing_section().into());
        }
    }

    /// Icon group whose desktop or mobile item covers a terminal cell
    fn icon_at(&self, column: u16, row: u16) -> Option<IconGroupId> {
        let (x, y) = (f64::from(column) + 0.5, f64::from(row) + 0.5);
        self.doc
            .ids_with_classes(&["navbar-icon-item"])
            .into_iter()
            .chain(self.doc.ids_with_classes(&["mobile-nav-item"]))
            .find(|id| self.doc.rect(id).is_some_and(|rect| rect.contains(x, y)))
            .and_then(|id| self.registry.group_for_icon(&id))
    }
}
