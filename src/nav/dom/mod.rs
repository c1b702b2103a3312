//! DOM-like surface the navigator drives.
//!
//! Handles are looked up at the time of use and may be absent; every
//! consumer treats a missing handle as a no-op. Implementations use interior
//! mutability so handles can be shared freely on the single UI thread.

pub mod memory;

use std::rc::Rc;

pub use memory::MemoryDocument;

/// Axis-aligned bounding box in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// A live element handle
pub trait Element {
    /// The element's id attribute, if it has one
    fn id(&self) -> Option<String>;

    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    fn set_text(&self, text: &str);
    fn text(&self) -> Option<String>;

    /// Set a CSS custom property (e.g. `--indicator-left`)
    fn set_style_property(&self, name: &str, value: &str);
    fn style_property(&self, name: &str) -> Option<String>;

    /// Current bounding box, `None` once the element is detached
    fn bounding_rect(&self) -> Option<Rect>;

    /// Force a synchronous layout pass so the next geometry read is fresh
    fn force_layout(&self);

    /// First descendant matching a compound selector
    fn query_selector(&self, selector: &str) -> Option<ElementRef>;
}

pub type ElementRef = Rc<dyn Element>;

/// The document root
pub trait Document {
    fn element_by_id(&self, id: &str) -> Option<ElementRef>;

    /// First element in document order matching a compound selector
    fn query_selector(&self, selector: &str) -> Option<ElementRef>;

    fn set_root_attribute(&self, name: &str, value: &str);
    fn root_attribute(&self, name: &str) -> Option<String>;
}

/// Compound selector made of `#id` and `.class` parts, e.g.
/// `.mobile-nav-item.selected`. Combinators are not supported.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Selector {
    /// Parse a compound selector. Returns `None` for anything outside the
    /// supported subset so lookups with it match nothing.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.contains(char::is_whitespace) {
            return None;
        }

        let mut selector = Selector::default();
        let mut rest = input;
        while !rest.is_empty() {
            let (is_id, tail) = if let Some(tail) = rest.strip_prefix('#') {
                (true, tail)
            } else if let Some(tail) = rest.strip_prefix('.') {
                (false, tail)
            } else {
                return None;
            };
            let end = tail.find(['.', '#']).unwrap_or(tail.len());
            let name = &tail[..end];
            if name.is_empty() {
                return None;
            }
            if is_id {
                if selector.id.is_some() {
                    return None;
                }
                selector.id = Some(name.to_string());
            } else {
                selector.classes.push(name.to_string());
            }
            rest = &tail[end..];
        }

        Some(selector)
    }

    pub fn matches(&self, id: Option<&str>, has_class: impl Fn(&str) -> bool) -> bool {
        if let Some(wanted) = &self.id {
            if id != Some(wanted.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| has_class(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound_selector() {
        let sel = Selector::parse(".mobile-nav-item.selected").unwrap();
        assert_eq!(sel.id, None);
        assert_eq!(sel.classes, vec!["mobile-nav-item", "selected"]);

        let sel = Selector::parse("#home-icon.selected").unwrap();
        assert_eq!(sel.id.as_deref(), Some("home-icon"));
        assert_eq!(sel.classes, vec!["selected"]);
    }

    #[test]
    fn test_reject_unsupported_selectors() {
        assert!(Selector::parse("").is_none());
        assert!(Selector::parse("div").is_none());
        assert!(Selector::parse(".a .b").is_none());
        assert!(Selector::parse("#a#b").is_none());
        assert!(Selector::parse(".").is_none());
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 5.0, 4.0, 2.0);
        assert!(rect.contains(10.0, 5.0));
        assert!(rect.contains(13.9, 6.9));
        assert!(!rect.contains(14.0, 5.0));
    }
}
