use log::debug;
use std::time::Duration;

use super::command::Command;
use super::controller::NavMsg;
use super::dom::Document;

const PANEL: &str = ".mobile-panel-wrapper";
const OVERLAY: &str = ".overlay";

/// Slide-in navigation panel and its dimming overlay on narrow layouts
pub struct MenuOverlay {
    close_delay: Duration,
}

impl MenuOverlay {
    pub fn new(close_delay: Duration) -> Self {
        Self { close_delay }
    }

    pub fn is_open(&self, document: &dyn Document) -> bool {
        document
            .query_selector(PANEL)
            .is_some_and(|panel| panel.has_class("visible"))
    }

    pub fn open(&self, document: &dyn Document) {
        if let Some(panel) = document.query_selector(PANEL) {
            panel.add_class("visible");
        }
        if let Some(overlay) = document.query_selector(OVERLAY) {
            overlay.remove_class("hidden");
        }
    }

    /// Start the closing animation; the panel is fully hidden after the delay.
    /// Does nothing when the panel is not open.
    pub fn close(&self, document: &dyn Document) -> Command<NavMsg> {
        if !self.is_open(document) {
            return Command::None;
        }

        debug!("Closing navigation panel");
        if let Some(panel) = document.query_selector(PANEL) {
            panel.add_class("hiding");
        }
        if let Some(overlay) = document.query_selector(OVERLAY) {
            overlay.add_class("hiding");
        }
        Command::delay(self.close_delay, NavMsg::MenuHidden)
    }

    pub fn finish_close(&self, document: &dyn Document) {
        if let Some(panel) = document.query_selector(PANEL) {
            panel.remove_class("visible");
            panel.remove_class("hiding");
        }
        if let Some(overlay) = document.query_selector(OVERLAY) {
            overlay.add_class("hidden");
            overlay.remove_class("hiding");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::dom::MemoryDocument;

    fn doc() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.insert("panel", None, &["mobile-panel-wrapper"]);
        doc.insert("overlay", None, &["overlay", "hidden"]);
        doc
    }

    #[test]
    fn test_open_then_close_sequence() {
        let doc = doc();
        let menu = MenuOverlay::new(Duration::from_millis(200));

        menu.open(&doc);
        assert!(menu.is_open(&doc));
        assert!(!doc.has_class("overlay", "hidden"));

        let cmd = menu.close(&doc);
        assert_eq!(cmd, Command::delay(Duration::from_millis(200), NavMsg::MenuHidden));
        assert!(doc.has_class("panel", "hiding"));
        assert!(doc.has_class("overlay", "hiding"));

        menu.finish_close(&doc);
        assert!(!menu.is_open(&doc));
        assert!(!doc.has_class("panel", "hiding"));
        assert!(doc.has_class("overlay", "hidden"));
        assert!(!doc.has_class("overlay", "hiding"));
    }

    #[test]
    fn test_close_when_already_closed_is_noop() {
        let doc = doc();
        let menu = MenuOverlay::new(Duration::from_millis(200));
        assert!(menu.close(&doc).is_none());
        assert!(!doc.has_class("panel", "hiding"));
    }

    #[test]
    fn test_missing_elements_are_tolerated() {
        let doc = MemoryDocument::new();
        let menu = MenuOverlay::new(Duration::from_millis(200));
        menu.open(&doc);
        menu.finish_close(&doc);
        assert!(!menu.is_open(&doc));
    }
}
