//! The page skeleton the preview navigates: the same element ids and
//! classes a browser build of the site would expose.

use crate::nav::registry::{container_id, icon_group_spec};
use crate::nav::{Document, IconGroupId, MemoryDocument, RenderHooks, SectionId};

pub const SIDEBAR_ID: &str = "navbar";
pub const BOTTOM_BAR_ID: &str = "mobile-nav";
pub const PANEL_ID: &str = "mobile-panel";
pub const OVERLAY_ID: &str = "overlay";

/// Id of the hit area inside a desktop icon
pub fn clickable_id(group: IconGroupId) -> String {
    format!("{}-clickable", group.as_str())
}

pub fn page_title(section: SectionId) -> &'static str {
    match section {
        SectionId::Home => "Home",
        SectionId::Repos => "Repositories",
        SectionId::Blog => "Blog",
        SectionId::Article => "Article",
        SectionId::Contact => "Contact",
    }
}

/// Insert every container, icon, label and the menu overlay
pub fn build(doc: &MemoryDocument) {
    for section in SectionId::ALL {
        doc.insert(container_id(section), None, &["page", "hidden"]);
    }

    doc.insert(SIDEBAR_ID, None, &["navbar-elements-container"]);
    doc.insert(BOTTOM_BAR_ID, None, &["mobile-nav"]);

    for group in IconGroupId::ALL {
        let spec = icon_group_spec(group);

        doc.insert(spec.desktop_icon_id, Some(SIDEBAR_ID), &["navbar-icon-item"]);
        doc.insert(&clickable_id(group), Some(spec.desktop_icon_id), &["clickable"]);
        doc.insert(spec.mobile_icon_id, Some(BOTTOM_BAR_ID), &["mobile-nav-item"]);

        if let Some(label) = spec.label {
            doc.insert(label.desktop_id, Some(spec.desktop_icon_id), &["font-icon"]);
            doc.insert(label.mobile_id, Some(spec.mobile_icon_id), &["font-icon"]);
        }
    }

    doc.insert(PANEL_ID, None, &["mobile-panel-wrapper"]);
    doc.insert(OVERLAY_ID, None, &["overlay", "hidden"]);
}

/// Stand-in content renderers that write a line of text into each page
pub fn placeholder_renderers(doc: &MemoryDocument) -> RenderHooks {
    let mut hooks = RenderHooks::new();

    for section in SectionId::ALL {
        let doc = doc.clone();
        hooks.register(section, move |section: SectionId, payload: Option<&str>| {
            let Some(container) = doc.element_by_id(container_id(section)) else {
                return;
            };
            let text = match (section, payload) {
                (SectionId::Article, Some(slug)) => format!("Rendering article '{}'", slug),
                (SectionId::Article, None) => "No article selected".to_string(),
                _ => format!("{} content", page_title(section)),
            };
            container.set_text(&text);
        });
    }

    hooks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::SectionRegistry;

    #[test]
    fn test_skeleton_resolves_every_handle() {
        let doc = MemoryDocument::new();
        build(&doc);
        let registry = SectionRegistry::new();

        for section in SectionId::ALL {
            let descriptor = registry.describe(&doc, section);
            assert!(descriptor.container.is_some(), "{} container", section);
            assert!(descriptor.icons.desktop_icon.is_some());
            assert!(descriptor.icons.mobile_icon.is_some());
        }
        assert!(doc.has_class(OVERLAY_ID, "hidden"));
    }

    #[test]
    fn test_placeholder_renders_article_slug() {
        let doc = MemoryDocument::new();
        build(&doc);
        let mut hooks = placeholder_renderers(&doc);

        hooks.activate(SectionId::Article, Some("fagram-desktop"));
        assert_eq!(
            doc.text("article-page").as_deref(),
            Some("Rendering article 'fagram-desktop'")
        );
    }
}
