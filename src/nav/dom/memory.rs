use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use super::{Document, Element, ElementRef, Rect, Selector};

#[derive(Debug, Default)]
struct Node {
    parent: Option<String>,
    children: Vec<String>,
    classes: BTreeSet<String>,
    text: Option<String>,
    style: BTreeMap<String, String>,
    rect: Rect,
}

#[derive(Debug, Default)]
struct DocState {
    nodes: HashMap<String, Node>,
    /// Top-level element ids in insertion order
    roots: Vec<String>,
    root_attributes: BTreeMap<String, String>,
    layout_passes: u64,
}

impl DocState {
    /// Depth-first document order starting at the given ids
    fn walk(&self, start: &[String], out: &mut Vec<String>) {
        for id in start {
            if let Some(node) = self.nodes.get(id) {
                out.push(id.clone());
                self.walk(&node.children, out);
            }
        }
    }

    fn find(&self, start: &[String], selector: &Selector) -> Option<String> {
        let mut order = Vec::new();
        self.walk(start, &mut order);
        order.into_iter().find(|id| {
            let node = &self.nodes[id];
            selector.matches(Some(id.as_str()), |c| node.classes.contains(c))
        })
    }

    fn remove_subtree(&mut self, id: &str) {
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.remove_subtree(&child);
            }
        }
    }
}

/// In-memory document used by tests and the terminal preview.
///
/// Cloning yields another handle onto the same tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    state: Rc<RefCell<DocState>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element. Re-inserting an existing id replaces its classes
    /// and keeps its position in the tree.
    pub fn insert(&self, id: &str, parent: Option<&str>, classes: &[&str]) {
        let mut state = self.state.borrow_mut();
        let classes: BTreeSet<String> = classes.iter().map(|c| c.to_string()).collect();

        if let Some(node) = state.nodes.get_mut(id) {
            node.classes = classes;
            return;
        }

        let parent = parent.filter(|p| state.nodes.contains_key(*p)).map(str::to_string);
        match &parent {
            Some(p) => {
                if let Some(parent_node) = state.nodes.get_mut(p) {
                    parent_node.children.push(id.to_string());
                }
            }
            None => state.roots.push(id.to_string()),
        }

        state.nodes.insert(
            id.to_string(),
            Node {
                parent,
                classes,
                ..Node::default()
            },
        );
    }

    /// Detach an element and its descendants. Outstanding handles become inert.
    pub fn remove(&self, id: &str) {
        let mut state = self.state.borrow_mut();
        let parent = state.nodes.get(id).and_then(|n| n.parent.clone());
        match parent {
            Some(p) => {
                if let Some(parent_node) = state.nodes.get_mut(&p) {
                    parent_node.children.retain(|c| c != id);
                }
            }
            None => state.roots.retain(|r| r != id),
        }
        state.remove_subtree(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.borrow().nodes.contains_key(id)
    }

    pub fn set_rect(&self, id: &str, rect: Rect) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(id) {
            node.rect = rect;
        }
    }

    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.state.borrow().nodes.get(id).map(|n| n.rect)
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.state
            .borrow()
            .nodes
            .get(id)
            .is_some_and(|n| n.classes.contains(class))
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.state.borrow().nodes.get(id).and_then(|n| n.text.clone())
    }

    pub fn style_property(&self, id: &str, name: &str) -> Option<String> {
        self.state
            .borrow()
            .nodes
            .get(id)
            .and_then(|n| n.style.get(name).cloned())
    }

    /// Ids of all elements carrying every given class, in document order
    pub fn ids_with_classes(&self, classes: &[&str]) -> Vec<String> {
        let state = self.state.borrow();
        let mut order = Vec::new();
        state.walk(&state.roots, &mut order);
        order
            .into_iter()
            .filter(|id| classes.iter().all(|c| state.nodes[id].classes.contains(*c)))
            .collect()
    }

    /// Number of forced layout passes observed so far
    pub fn layout_passes(&self) -> u64 {
        self.state.borrow().layout_passes
    }

    fn handle(&self, id: String) -> ElementRef {
        Rc::new(MemoryElement {
            state: Rc::clone(&self.state),
            id,
        })
    }
}

impl Document for MemoryDocument {
    fn element_by_id(&self, id: &str) -> Option<ElementRef> {
        if self.contains(id) {
            Some(self.handle(id.to_string()))
        } else {
            None
        }
    }

    fn query_selector(&self, selector: &str) -> Option<ElementRef> {
        let selector = Selector::parse(selector)?;
        let found = {
            let state = self.state.borrow();
            state.find(&state.roots, &selector)
        };
        found.map(|id| self.handle(id))
    }

    fn set_root_attribute(&self, name: &str, value: &str) {
        self.state
            .borrow_mut()
            .root_attributes
            .insert(name.to_string(), value.to_string());
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.state.borrow().root_attributes.get(name).cloned()
    }
}

/// Handle onto a node of a `MemoryDocument`
struct MemoryElement {
    state: Rc<RefCell<DocState>>,
    id: String,
}

impl MemoryElement {
    fn with_node<R>(&self, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        self.state.borrow_mut().nodes.get_mut(&self.id).map(f)
    }
}

impl Element for MemoryElement {
    fn id(&self) -> Option<String> {
        Some(self.id.clone())
    }

    fn add_class(&self, class: &str) {
        self.with_node(|n| n.classes.insert(class.to_string()));
    }

    fn remove_class(&self, class: &str) {
        self.with_node(|n| n.classes.remove(class));
    }

    fn has_class(&self, class: &str) -> bool {
        self.with_node(|n| n.classes.contains(class)).unwrap_or(false)
    }

    fn set_text(&self, text: &str) {
        self.with_node(|n| n.text = Some(text.to_string()));
    }

    fn text(&self) -> Option<String> {
        self.with_node(|n| n.text.clone()).flatten()
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.with_node(|n| n.style.insert(name.to_string(), value.to_string()));
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.with_node(|n| n.style.get(name).cloned()).flatten()
    }

    fn bounding_rect(&self) -> Option<Rect> {
        self.with_node(|n| n.rect)
    }

    fn force_layout(&self) {
        let mut state = self.state.borrow_mut();
        if state.nodes.contains_key(&self.id) {
            state.layout_passes += 1;
        }
    }

    fn query_selector(&self, selector: &str) -> Option<ElementRef> {
        let selector = Selector::parse(selector)?;
        let found = {
            let state = self.state.borrow();
            let children = state.nodes.get(&self.id)?.children.clone();
            state.find(&children, &selector)
        };
        found.map(|id| -> ElementRef {
            Rc::new(MemoryElement {
                state: Rc::clone(&self.state),
                id,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryDocument {
        let doc = MemoryDocument::new();
        doc.insert("nav", None, &["mobile-nav"]);
        doc.insert("a", Some("nav"), &["mobile-nav-item"]);
        doc.insert("b", Some("nav"), &["mobile-nav-item", "selected"]);
        doc.insert("b-inner", Some("b"), &["clickable"]);
        doc
    }

    #[test]
    fn test_query_selector_document_order() {
        let doc = sample();
        let item = doc.query_selector(".mobile-nav-item").unwrap();
        assert_eq!(item.id().as_deref(), Some("a"));

        let selected = doc.query_selector(".mobile-nav-item.selected").unwrap();
        assert_eq!(selected.id().as_deref(), Some("b"));

        assert!(doc.query_selector(".missing").is_none());
    }

    #[test]
    fn test_element_query_selector_searches_descendants_only() {
        let doc = sample();
        let b = doc.element_by_id("b").unwrap();
        let inner = b.query_selector(".clickable").unwrap();
        assert_eq!(inner.id().as_deref(), Some("b-inner"));

        let a = doc.element_by_id("a").unwrap();
        assert!(a.query_selector(".clickable").is_none());
    }

    #[test]
    fn test_detached_handles_are_inert() {
        let doc = sample();
        let b = doc.element_by_id("b").unwrap();
        doc.remove("b");

        assert!(b.bounding_rect().is_none());
        b.add_class("visible");
        assert!(!b.has_class("visible"));
        assert!(!doc.contains("b-inner"));
        assert!(doc.element_by_id("b").is_none());
    }

    #[test]
    fn test_class_and_style_mutation() {
        let doc = sample();
        let a = doc.element_by_id("a").unwrap();
        a.add_class("selected");
        a.set_style_property("--indicator-left", "12px");
        a.set_text("home");

        assert!(doc.has_class("a", "selected"));
        assert_eq!(doc.style_property("a", "--indicator-left").as_deref(), Some("12px"));
        assert_eq!(doc.text("a").as_deref(), Some("home"));
        assert_eq!(doc.ids_with_classes(&["selected"]), vec!["a", "b"]);
    }

    #[test]
    fn test_force_layout_counts_passes() {
        let doc = sample();
        let a = doc.element_by_id("a").unwrap();
        a.force_layout();
        a.force_layout();
        assert_eq!(doc.layout_passes(), 2);
    }
}
