//! Keeps the sliding indicators aligned with the selected navigation items.
//!
//! A single measurement taken right after selection is usually stale: the
//! selected item's label is still expanding and web fonts may swap in later.
//! Each `track` call therefore measures immediately and again at a fixed list
//! of delays. Every measurement writes absolute values, so overlapping
//! tracking windows never need cancelling.

use log::{debug, trace};
use std::time::Duration;

use super::command::Command;
use super::controller::NavMsg;
use super::dom::Document;
use super::geometry::{self, Axis, IndicatorGeometry};
use crate::config::TimingSettings;

/// One of the two indicators on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// Bottom bar on narrow layouts
    Mobile,
    /// Sidebar on wide layouts
    Desktop,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Mobile, Track::Desktop];

    pub fn container_selector(&self) -> &'static str {
        match self {
            Track::Mobile => ".mobile-nav",
            Track::Desktop => ".navbar-elements-container",
        }
    }

    pub fn selected_item_selector(&self) -> &'static str {
        match self {
            Track::Mobile => ".mobile-nav-item.selected",
            Track::Desktop => ".navbar-icon-item.selected",
        }
    }

    /// The desktop indicator follows the icon's clickable area, not the whole row
    pub fn measured_child(&self) -> Option<&'static str> {
        match self {
            Track::Mobile => None,
            Track::Desktop => Some(".clickable"),
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Track::Mobile => Axis::Horizontal,
            Track::Desktop => Axis::Vertical,
        }
    }

    pub fn offset_property(&self) -> &'static str {
        match self {
            Track::Mobile => "--indicator-left",
            Track::Desktop => "--indicator-top",
        }
    }

    /// The desktop indicator height is fixed by the stylesheet
    pub fn size_property(&self) -> Option<&'static str> {
        match self {
            Track::Mobile => Some("--indicator-width"),
            Track::Desktop => None,
        }
    }
}

/// An indicator and the navigation item it should sit under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndicatorTarget {
    pub track: Track,
    pub item_id: String,
}

impl IndicatorTarget {
    pub fn new(track: Track, item_id: impl Into<String>) -> Self {
        Self {
            track,
            item_id: item_id.into(),
        }
    }
}

pub struct IndicatorScheduler {
    ticks: Vec<Duration>,
    resize_debounce: Duration,
    orientation_delay: Duration,
    resize_generation: u64,
}

impl IndicatorScheduler {
    pub fn new(timing: &TimingSettings) -> Self {
        Self {
            ticks: timing.indicator_ticks(),
            resize_debounce: timing.resize_debounce(),
            orientation_delay: timing.orientation_delay(),
            resize_generation: 0,
        }
    }

    /// Measure once and write the indicator's style variables.
    /// Handles are resolved now, so a replaced element is picked up.
    pub fn apply(&self, document: &dyn Document, target: &IndicatorTarget) -> Option<IndicatorGeometry> {
        let track = target.track;
        let container = document.query_selector(track.container_selector())?;
        let item = document.element_by_id(&target.item_id)?;
        let item = match track.measured_child() {
            Some(selector) => item.query_selector(selector)?,
            None => item,
        };

        let geometry = geometry::measure(Some(container.as_ref()), Some(item.as_ref()), track.axis())?;

        container.set_style_property(track.offset_property(), &geometry::px(geometry.offset));
        if let Some(size_property) = track.size_property() {
            container.set_style_property(size_property, &geometry::px(geometry.size));
        }

        trace!(
            "Indicator {:?} -> {} offset={} size={}",
            track, target.item_id, geometry.offset, geometry.size
        );
        Some(geometry)
    }

    /// Measure now and at every configured tick
    pub fn track(&self, document: &dyn Document, target: IndicatorTarget) -> Command<NavMsg> {
        self.apply(document, &target);

        Command::batch(
            self.ticks
                .iter()
                .map(|delay| Command::delay(*delay, NavMsg::MeasureIndicator(target.clone())))
                .collect(),
        )
    }

    /// Startup variant: one more correction once web fonts have loaded.
    /// The correction re-reads the selection when it fires, since the user
    /// may have navigated away from `target` by then.
    pub fn track_on_startup(&self, document: &dyn Document, target: IndicatorTarget) -> Command<NavMsg> {
        Command::batch(vec![
            self.track(document, target),
            Command::when_fonts_ready(NavMsg::FontsReady),
        ])
    }

    /// Targets for whichever items currently carry the selected flag
    pub fn selected_targets(&self, document: &dyn Document) -> Vec<IndicatorTarget> {
        Track::ALL
            .iter()
            .filter_map(|track| {
                let item = document.query_selector(track.selected_item_selector())?;
                Some(IndicatorTarget::new(*track, item.id()?))
            })
            .collect()
    }

    /// Web fonts swapped in: measure whatever is selected now
    pub fn on_fonts_ready(&self, document: &dyn Document) {
        let targets = self.selected_targets(document);
        debug!("Fonts ready, re-measuring {} indicator(s)", targets.len());
        for target in targets {
            self.apply(document, &target);
        }
    }

    /// Start (or restart) the resize debounce window
    pub fn on_resize(&mut self) -> Command<NavMsg> {
        self.resize_generation += 1;
        Command::delay(self.resize_debounce, NavMsg::ResizeSettled(self.resize_generation))
    }

    /// Re-track selected items if no newer resize arrived meanwhile
    pub fn on_resize_settled(&self, document: &dyn Document, generation: u64) -> Command<NavMsg> {
        if generation != self.resize_generation {
            trace!("Resize {} superseded by {}", generation, self.resize_generation);
            return Command::None;
        }

        let targets = self.selected_targets(document);
        debug!("Resize settled, re-tracking {} indicator(s)", targets.len());
        Command::batch(
            targets
                .into_iter()
                .map(|target| self.track(document, target))
                .collect(),
        )
    }

    /// Orientation changes report final dimensions late; wait, then treat as a resize
    pub fn on_orientation_change(&self) -> Command<NavMsg> {
        Command::delay(self.orientation_delay, NavMsg::Resize)
    }

    /// Event-driven refinement: a selected item finished its CSS transition
    pub fn on_transition_end(&self, document: &dyn Document, element_id: &str) {
        for target in self.selected_targets(document) {
            if target.item_id == element_id {
                self.apply(document, &target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::dom::{MemoryDocument, Rect};

    fn doc() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.insert("mobile-nav", None, &["mobile-nav"]);
        doc.insert("mobile-home-icon", Some("mobile-nav"), &["mobile-nav-item"]);
        doc.insert("mobile-blog-icon", Some("mobile-nav"), &["mobile-nav-item", "selected"]);
        doc.set_rect("mobile-nav", Rect::new(0.0, 600.0, 360.0, 56.0));
        doc.set_rect("mobile-home-icon", Rect::new(8.0, 604.0, 48.0, 48.0));
        doc.set_rect("mobile-blog-icon", Rect::new(64.0, 604.0, 96.0, 48.0));

        doc.insert("navbar", None, &["navbar-elements-container"]);
        doc.insert("blog-icon", Some("navbar"), &["navbar-icon-item", "selected"]);
        doc.insert("blog-clickable", Some("blog-icon"), &["clickable"]);
        doc.set_rect("navbar", Rect::new(0.0, 40.0, 80.0, 400.0));
        doc.set_rect("blog-icon", Rect::new(0.0, 150.0, 80.0, 60.0));
        doc.set_rect("blog-clickable", Rect::new(12.0, 160.0, 56.0, 40.0));
        doc
    }

    fn scheduler() -> IndicatorScheduler {
        IndicatorScheduler::new(&TimingSettings::default())
    }

    #[test]
    fn test_apply_mobile_writes_left_and_width() {
        let doc = doc();
        let target = IndicatorTarget::new(Track::Mobile, "mobile-blog-icon");
        scheduler().apply(&doc, &target).unwrap();

        assert_eq!(doc.style_property("mobile-nav", "--indicator-left").as_deref(), Some("64px"));
        assert_eq!(doc.style_property("mobile-nav", "--indicator-width").as_deref(), Some("96px"));
    }

    #[test]
    fn test_apply_desktop_measures_clickable_child() {
        let doc = doc();
        let target = IndicatorTarget::new(Track::Desktop, "blog-icon");
        let geometry = scheduler().apply(&doc, &target).unwrap();

        assert_eq!(geometry.offset, 120.0);
        assert_eq!(doc.style_property("navbar", "--indicator-top").as_deref(), Some("120px"));
        assert_eq!(doc.style_property("navbar", "--indicator-width"), None);
    }

    #[test]
    fn test_apply_missing_item_is_noop() {
        let doc = doc();
        let target = IndicatorTarget::new(Track::Mobile, "mobile-contact-icon");
        assert!(scheduler().apply(&doc, &target).is_none());
        assert_eq!(doc.style_property("mobile-nav", "--indicator-left"), None);
    }

    #[test]
    fn test_track_schedules_every_tick() {
        let doc = doc();
        let target = IndicatorTarget::new(Track::Mobile, "mobile-blog-icon");
        let leaves = scheduler().track(&doc, target.clone()).into_leaves();

        let delays: Vec<u64> = leaves
            .iter()
            .map(|c| match c {
                Command::Delay { after, msg } => {
                    assert_eq!(msg, &NavMsg::MeasureIndicator(target.clone()));
                    after.as_millis() as u64
                }
                other => panic!("unexpected command {:?}", other),
            })
            .collect();
        assert_eq!(delays, vec![16, 50, 100, 150, 200, 250, 300]);
        assert!(doc.style_property("mobile-nav", "--indicator-left").is_some());
    }

    #[test]
    fn test_startup_variant_waits_for_fonts() {
        let doc = doc();
        let target = IndicatorTarget::new(Track::Mobile, "mobile-blog-icon");
        let leaves = scheduler().track_on_startup(&doc, target).into_leaves();
        assert_eq!(
            leaves.last(),
            Some(&Command::WhenFontsReady(NavMsg::FontsReady))
        );
    }

    #[test]
    fn test_fonts_ready_measures_current_selection() {
        let doc = doc();
        let scheduler = scheduler();
        scheduler.apply(&doc, &IndicatorTarget::new(Track::Mobile, "mobile-home-icon"));
        assert_eq!(doc.style_property("mobile-nav", "--indicator-left").as_deref(), Some("8px"));

        scheduler.on_fonts_ready(&doc);
        assert_eq!(doc.style_property("mobile-nav", "--indicator-left").as_deref(), Some("64px"));
        assert_eq!(doc.style_property("navbar", "--indicator-top").as_deref(), Some("120px"));
    }

    #[test]
    fn test_selected_targets() {
        let doc = doc();
        let targets = scheduler().selected_targets(&doc);
        assert_eq!(
            targets,
            vec![
                IndicatorTarget::new(Track::Mobile, "mobile-blog-icon"),
                IndicatorTarget::new(Track::Desktop, "blog-icon"),
            ]
        );
    }

    #[test]
    fn test_resize_debounce_keeps_latest_generation() {
        let doc = doc();
        let mut scheduler = scheduler();
        scheduler.on_resize();
        scheduler.on_resize();

        assert!(scheduler.on_resize_settled(&doc, 1).is_none());
        assert!(!scheduler.on_resize_settled(&doc, 2).is_none());
    }

    #[test]
    fn test_transition_end_remeasures_selected_item() {
        let doc = doc();
        let scheduler = scheduler();
        doc.set_rect("mobile-blog-icon", Rect::new(64.0, 604.0, 120.0, 48.0));

        scheduler.on_transition_end(&doc, "mobile-home-icon");
        assert_eq!(doc.style_property("mobile-nav", "--indicator-width"), None);

        scheduler.on_transition_end(&doc, "mobile-blog-icon");
        assert_eq!(doc.style_property("mobile-nav", "--indicator-width").as_deref(), Some("120px"));
    }
}
