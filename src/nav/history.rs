//! URL and browser-history reconciliation.

use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

use super::section::{SectionId, TransitionRequest};
use super::storage::Storage;
use crate::config::NavigationSettings;

/// The parts of browser history the bridge needs.
/// The bridge never pushes entries, it only replaces the current one.
pub trait History {
    /// Full URL of the current entry
    fn location(&self) -> String;

    /// Replace the current entry's URL without creating a new entry
    fn replace_state(&self, url: &str);
}

#[derive(Debug, Default)]
struct HistoryState {
    entries: Vec<String>,
    index: usize,
    replacements: usize,
}

/// In-memory session history with back/forward traversal.
/// Clones share the same entries.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    state: Rc<RefCell<HistoryState>>,
}

impl MemoryHistory {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(HistoryState {
                entries: vec![initial_url.into()],
                index: 0,
                replacements: 0,
            })),
        }
    }

    /// Push a new entry, discarding any forward entries (as link navigation does)
    pub fn push(&self, url: impl Into<String>) {
        let mut state = self.state.borrow_mut();
        let keep = state.index + 1;
        state.entries.truncate(keep);
        state.entries.push(url.into());
        state.index = keep;
    }

    /// Step back. Returns true when the location changed (a popstate is due).
    pub fn back(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.index == 0 {
            return false;
        }
        state.index -= 1;
        true
    }

    /// Step forward. Returns true when the location changed.
    pub fn forward(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.index + 1 >= state.entries.len() {
            return false;
        }
        state.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    pub fn replacements(&self) -> usize {
        self.state.borrow().replacements
    }
}

impl History for MemoryHistory {
    fn location(&self) -> String {
        let state = self.state.borrow();
        state.entries.get(state.index).cloned().unwrap_or_default()
    }

    fn replace_state(&self, url: &str) {
        let mut state = self.state.borrow_mut();
        let index = state.index;
        if let Some(entry) = state.entries.get_mut(index) {
            *entry = url.to_string();
        }
        state.replacements += 1;
    }
}

/// What the URL asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    Article(String),
    Section(SectionId),
    /// A deep-link parameter was present but unusable
    Malformed,
    /// No deep-link parameter
    Absent,
}

/// Result of inspecting one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResolution {
    pub target: UrlTarget,
    /// The URL with consumed parameters removed, when it differs from the input
    pub rewritten: Option<String>,
}

/// Article slugs are opaque but restricted to URL-safe word characters
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Derives the transition to apply from the URL, persisted selection or default
#[derive(Debug, Clone)]
pub struct HistoryBridge {
    section_param: String,
    article_param: String,
    storage_key: String,
    default_section: SectionId,
}

impl HistoryBridge {
    pub fn new(settings: &NavigationSettings) -> Self {
        Self {
            section_param: settings.section_param.clone(),
            article_param: settings.article_param.clone(),
            storage_key: settings.storage_key.clone(),
            default_section: settings.default_section,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn default_section(&self) -> SectionId {
        self.default_section
    }

    /// Inspect a URL without touching history or storage
    pub fn resolve_url(&self, location: &str) -> UrlResolution {
        let url = match Url::parse(location) {
            Ok(url) => url,
            Err(e) => {
                debug!("Ignoring unparsable location {:?}: {}", location, e);
                return UrlResolution {
                    target: UrlTarget::Absent,
                    rewritten: None,
                };
            }
        };

        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
        };
        let article = param(&self.article_param);
        let section = param(&self.section_param);

        let rewritten = section.as_ref().map(|_| self.strip_param(&url, &self.section_param));

        let target = if let Some(slug) = article {
            if is_valid_slug(&slug) {
                UrlTarget::Article(slug)
            } else {
                warn!("Malformed article slug in URL: {:?}", slug);
                UrlTarget::Malformed
            }
        } else if let Some(name) = section {
            match name.parse::<SectionId>() {
                Ok(id) => UrlTarget::Section(restorable(id)),
                Err(_) => {
                    warn!("Unknown section in URL: {:?}", name);
                    UrlTarget::Malformed
                }
            }
        } else {
            UrlTarget::Absent
        };

        UrlResolution { target, rewritten }
    }

    /// Pick the initial transition for the current location.
    /// Consumes the `section` parameter by replacing the current entry.
    pub fn resolve_initial_request(
        &self,
        history: &dyn History,
        storage: &dyn Storage,
    ) -> TransitionRequest {
        let resolution = self.resolve_url(&history.location());

        let request = match resolution.target {
            UrlTarget::Article(slug) => TransitionRequest::article(slug),
            UrlTarget::Section(section) => TransitionRequest::new(section),
            UrlTarget::Malformed => TransitionRequest::new(self.default_section),
            UrlTarget::Absent => TransitionRequest::new(
                self.persisted_selection(storage)
                    .unwrap_or(self.default_section),
            ),
        };

        if let Some(url) = resolution.rewritten {
            debug!("Stripping consumed deep-link parameter: {}", url);
            history.replace_state(&url);
        }

        info!("Resolved initial request: {}", request);
        request
    }

    /// Re-derive the section after back/forward navigation
    pub fn on_pop_state(&self, history: &dyn History, storage: &dyn Storage) -> TransitionRequest {
        self.resolve_initial_request(history, storage)
    }

    /// Last persisted section. Storage failures and unknown values read as absent.
    pub fn persisted_selection(&self, storage: &dyn Storage) -> Option<SectionId> {
        let value = match storage.get(&self.storage_key) {
            Ok(value) => value?,
            Err(e) => {
                warn!("Could not read persisted selection: {:#}", e);
                return None;
            }
        };

        match value.parse::<SectionId>() {
            Ok(section) => Some(restorable(section)),
            Err(_) => {
                debug!("Ignoring unknown persisted selection {:?}", value);
                None
            }
        }
    }

    fn strip_param(&self, url: &Url, name: &str) -> String {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != name)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        let mut stripped = url.clone();
        if kept.is_empty() {
            stripped.set_query(None);
        } else {
            stripped.query_pairs_mut().clear().extend_pairs(kept);
        }
        stripped.to_string()
    }
}

/// Without a slug an article cannot be shown; restore its group's landing section
fn restorable(section: SectionId) -> SectionId {
    section.icon_group().landing_section()
}
