use log::debug;
use std::collections::HashMap;

use super::section::SectionId;

/// External collaborator that fills a section's container once it is visible.
///
/// Renderers must not change visibility or selection state.
pub trait SectionRenderer {
    fn on_section_activated(&mut self, section: SectionId, payload: Option<&str>);
}

impl<F> SectionRenderer for F
where
    F: FnMut(SectionId, Option<&str>),
{
    fn on_section_activated(&mut self, section: SectionId, payload: Option<&str>) {
        self(section, payload)
    }
}

/// Renderers keyed by section, plus observers notified of every activation
#[derive(Default)]
pub struct RenderHooks {
    renderers: HashMap<SectionId, Vec<Box<dyn SectionRenderer>>>,
    observers: Vec<Box<dyn SectionRenderer>>,
}

impl RenderHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer for one section
    pub fn register(&mut self, section: SectionId, renderer: impl SectionRenderer + 'static) {
        self.renderers
            .entry(section)
            .or_default()
            .push(Box::new(renderer));
    }

    /// Register an observer of the active section
    pub fn observe(&mut self, observer: impl SectionRenderer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn activate(&mut self, section: SectionId, payload: Option<&str>) {
        let renderers = self.renderers.get_mut(&section);
        debug!(
            "Activating {} with {} renderer(s), {} observer(s)",
            section,
            renderers.as_ref().map_or(0, |r| r.len()),
            self.observers.len()
        );

        if let Some(renderers) = renderers {
            for renderer in renderers.iter_mut() {
                renderer.on_section_activated(section, payload);
            }
        }
        for observer in self.observers.iter_mut() {
            observer.on_section_activated(section, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_renderers_are_keyed_by_section() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = RenderHooks::new();

        let sink = Rc::clone(&calls);
        hooks.register(SectionId::Article, move |s: SectionId, p: Option<&str>| {
            sink.borrow_mut().push(format!("article:{}:{}", s, p.unwrap_or("-")));
        });
        let sink = Rc::clone(&calls);
        hooks.observe(move |s: SectionId, _: Option<&str>| {
            sink.borrow_mut().push(format!("observer:{}", s));
        });

        hooks.activate(SectionId::Home, None);
        hooks.activate(SectionId::Article, Some("fagram-desktop"));

        assert_eq!(
            *calls.borrow(),
            vec![
                "observer:home".to_string(),
                "article:article:fagram-desktop".to_string(),
                "observer:article".to_string(),
            ]
        );
    }
}
