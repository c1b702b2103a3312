//! Terminal stand-in for the browser's layout engine.
//!
//! One terminal cell is one CSS pixel. The selected bottom-bar item grows to
//! show its label over the settle window, so its box and the boxes after it
//! keep moving for a while after selection, which is what the indicator
//! scheduler's repeated measurements exist to follow.

use ratatui::layout::{Constraint, Direction, Layout, Rect as Area};
use std::time::Duration;

use super::site::{BOTTOM_BAR_ID, SIDEBAR_ID, clickable_id};
use crate::nav::registry::{container_id, icon_group_spec};
use crate::nav::{IconGroupId, MemoryDocument, Rect, SectionId};

const SIDEBAR_WIDTH: u16 = 14;
const BOTTOM_BAR_HEIGHT: u16 = 3;
const ICON_HEIGHT: u16 = 3;
const COLLAPSED_ITEM_WIDTH: f64 = 5.0;
const ITEM_GAP: f64 = 1.0;

/// Screen regions for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub header: Area,
    pub sidebar: Area,
    pub content: Area,
    pub bottom_bar: Area,
    pub status: Area,
}

impl Regions {
    pub fn compute(area: Area) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(BOTTOM_BAR_HEIGHT),
                Constraint::Length(1),
            ])
            .split(area);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
            .split(rows[1]);

        Self {
            header: rows[0],
            sidebar: middle[0],
            content: middle[1],
            bottom_bar: rows[2],
            status: rows[3],
        }
    }
}

fn to_rect(area: Area) -> Rect {
    Rect::new(
        f64::from(area.x),
        f64::from(area.y),
        f64::from(area.width),
        f64::from(area.height),
    )
}

fn expanded_width(group: IconGroupId) -> f64 {
    COLLAPSED_ITEM_WIDTH + group.as_str().len() as f64 + 1.0
}

struct Expansion {
    item_id: String,
    since: Duration,
    finished: bool,
}

/// Writes bounding boxes into the document each frame
pub struct SiteLayout {
    settle: Duration,
    expanding: Option<Expansion>,
}

impl SiteLayout {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            expanding: None,
        }
    }

    /// Fraction of the label expansion completed at `now`
    fn progress(&mut self, selected: Option<&str>, now: Duration) -> f64 {
        let Some(selected) = selected else {
            self.expanding = None;
            return 0.0;
        };

        let since = match &self.expanding {
            Some(expansion) if expansion.item_id == selected => expansion.since,
            _ => {
                self.expanding = Some(Expansion {
                    item_id: selected.to_string(),
                    since: now,
                    finished: false,
                });
                now
            }
        };

        if self.settle.is_zero() {
            return 1.0;
        }
        (now.saturating_sub(since).as_secs_f64() / self.settle.as_secs_f64()).min(1.0)
    }

    /// Lay out every element for `now`. Returns the id of an item whose
    /// expansion completed during this call, like a `transitionend` event.
    pub fn apply(&mut self, doc: &MemoryDocument, regions: &Regions, now: Duration) -> Option<String> {
        for section in SectionId::ALL {
            doc.set_rect(container_id(section), to_rect(regions.content));
        }

        let sidebar = to_rect(regions.sidebar);
        doc.set_rect(SIDEBAR_ID, sidebar);
        for (i, group) in IconGroupId::ALL.iter().enumerate() {
            let spec = icon_group_spec(*group);
            let y = sidebar.y + 1.0 + (i as f64) * f64::from(ICON_HEIGHT);
            doc.set_rect(
                spec.desktop_icon_id,
                Rect::new(sidebar.x, y, sidebar.width, f64::from(ICON_HEIGHT)),
            );
            doc.set_rect(
                &clickable_id(*group),
                Rect::new(sidebar.x + 1.0, y + 1.0, (sidebar.width - 2.0).max(1.0), 1.0),
            );
        }

        let bar = to_rect(regions.bottom_bar);
        doc.set_rect(BOTTOM_BAR_ID, bar);

        let selected = doc
            .ids_with_classes(&["mobile-nav-item", "selected"])
            .into_iter()
            .next();
        let progress = self.progress(selected.as_deref(), now);

        let mut x = bar.x + 1.0;
        for group in IconGroupId::ALL {
            let spec = icon_group_spec(group);
            let width = if selected.as_deref() == Some(spec.mobile_icon_id) {
                COLLAPSED_ITEM_WIDTH + (expanded_width(group) - COLLAPSED_ITEM_WIDTH) * progress
            } else {
                COLLAPSED_ITEM_WIDTH
            };
            doc.set_rect(spec.mobile_icon_id, Rect::new(x, bar.y, width, bar.height));
            x += width + ITEM_GAP;
        }

        match &mut self.expanding {
            Some(expansion) if progress >= 1.0 && !expansion.finished => {
                expansion.finished = true;
                Some(expansion.item_id.clone())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::Document;
    use crate::preview::site;

    fn setup() -> (MemoryDocument, Regions) {
        let doc = MemoryDocument::new();
        site::build(&doc);
        (doc, Regions::compute(Area::new(0, 0, 80, 24)))
    }

    #[test]
    fn test_regions_split_screen() {
        let regions = Regions::compute(Area::new(0, 0, 80, 24));
        assert_eq!(regions.header.height, 1);
        assert_eq!(regions.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(regions.bottom_bar.height, BOTTOM_BAR_HEIGHT);
        assert_eq!(regions.status.y, 23);
    }

    #[test]
    fn test_selected_item_expands_over_settle_window() {
        let (doc, regions) = setup();
        let mut layout = SiteLayout::new(Duration::from_millis(300));
        if let Some(icon) = doc.element_by_id("mobile-blog-icon") {
            icon.add_class("selected");
        }

        assert_eq!(layout.apply(&doc, &regions, Duration::from_millis(1000)), None);
        let start = doc.rect("mobile-blog-icon").unwrap().width;
        assert_eq!(layout.apply(&doc, &regions, Duration::from_millis(1150)), None);
        let half = doc.rect("mobile-blog-icon").unwrap().width;
        assert_eq!(
            layout.apply(&doc, &regions, Duration::from_millis(1300)).as_deref(),
            Some("mobile-blog-icon")
        );
        let full = doc.rect("mobile-blog-icon").unwrap().width;
        assert_eq!(layout.apply(&doc, &regions, Duration::from_millis(1400)), None);

        assert_eq!(start, COLLAPSED_ITEM_WIDTH);
        assert!(half > start && half < full);
        assert_eq!(full, expanded_width(IconGroupId::Blog));
        assert_eq!(doc.rect("mobile-home-icon").unwrap().width, COLLAPSED_ITEM_WIDTH);
    }

    #[test]
    fn test_items_after_selection_shift_right() {
        let (doc, regions) = setup();
        let mut layout = SiteLayout::new(Duration::ZERO);

        layout.apply(&doc, &regions, Duration::ZERO);
        let before = doc.rect("mobile-contact-icon").unwrap().x;

        if let Some(icon) = doc.element_by_id("mobile-home-icon") {
            icon.add_class("selected");
        }
        layout.apply(&doc, &regions, Duration::ZERO);
        let after = doc.rect("mobile-contact-icon").unwrap().x;

        assert!(after > before);
    }
}
