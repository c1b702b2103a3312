#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pageflow::config::Config;
use pageflow::nav::registry::container_id;
use pageflow::nav::{
    MemoryDocument, MemoryHistory, MemoryStorage, NavRuntime, Navigator, Rect, RenderHooks,
    SectionId, TransitionRequest,
};
use pageflow::preview::site;

pub const ORIGIN: &str = "https://site.test/";

pub type Activations = Rc<RefCell<Vec<(SectionId, Option<String>)>>>;

/// A page plus its environment, driven in virtual time
pub struct Harness {
    pub doc: MemoryDocument,
    pub storage: MemoryStorage,
    pub history: MemoryHistory,
    pub runtime: NavRuntime,
    pub activations: Activations,
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

pub fn harness(url: &str, storage: MemoryStorage) -> Harness {
    let doc = MemoryDocument::new();
    site::build(&doc);
    lay_out(&doc);

    let history = MemoryHistory::new(url);
    let activations: Activations = Rc::new(RefCell::new(Vec::new()));

    let mut hooks = RenderHooks::new();
    let sink = Rc::clone(&activations);
    hooks.observe(move |section: SectionId, payload: Option<&str>| {
        sink.borrow_mut().push((section, payload.map(str::to_string)));
    });

    let config = Config::default();
    let navigator = Navigator::new(
        &config,
        Rc::new(doc.clone()),
        Rc::new(storage.clone()),
        Rc::new(history.clone()),
    )
    .with_hooks(hooks);

    Harness {
        doc,
        storage,
        history,
        runtime: NavRuntime::new(navigator, config.timing.frame_interval()),
        activations,
    }
}

/// Fixed geometry: a sidebar on the left, a bottom bar of 48px items
fn lay_out(doc: &MemoryDocument) {
    doc.set_rect(site::SIDEBAR_ID, Rect::new(0.0, 0.0, 80.0, 600.0));
    doc.set_rect(site::BOTTOM_BAR_ID, Rect::new(0.0, 600.0, 360.0, 56.0));

    let groups = ["home", "repos", "blog", "contact"];
    for (i, group) in groups.iter().enumerate() {
        let offset = i as f64;
        doc.set_rect(
            &format!("{}-icon", group),
            Rect::new(0.0, 100.0 + offset * 60.0, 80.0, 60.0),
        );
        doc.set_rect(
            &format!("{}-clickable", group),
            Rect::new(12.0, 110.0 + offset * 60.0, 56.0, 40.0),
        );
        doc.set_rect(
            &format!("mobile-{}-icon", group),
            Rect::new(8.0 + offset * 56.0, 604.0, 48.0, 48.0),
        );
    }
}

impl Harness {
    pub fn fresh() -> Self {
        harness(ORIGIN, MemoryStorage::new())
    }

    /// Load the page and let the first transition settle
    pub fn loaded(mut self) -> Self {
        self.runtime.start();
        self.settle();
        self
    }

    pub fn settle(&mut self) {
        self.runtime.run_until_idle().expect("navigation settles");
    }

    pub fn request(&mut self, section: SectionId) {
        self.runtime
            .dispatch(pageflow::nav::NavMsg::Request(TransitionRequest::new(section)));
    }

    pub fn visible_sections(&self) -> Vec<SectionId> {
        SectionId::ALL
            .into_iter()
            .filter(|s| self.doc.has_class(container_id(*s), "visible"))
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.doc.ids_with_classes(&["selected"])
    }

    pub fn persisted(&self) -> Option<String> {
        use pageflow::nav::Storage;
        self.storage.get("page-section").expect("storage available")
    }

    pub fn activated_sections(&self) -> Vec<SectionId> {
        self.activations.borrow().iter().map(|(s, _)| *s).collect()
    }

    /// Observable state compared between equivalent request sequences
    pub fn end_state(&self) -> (Vec<SectionId>, Vec<String>, Option<String>) {
        (self.visible_sections(), self.selected_ids(), self.persisted())
    }
}
