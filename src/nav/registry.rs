//! Static section table and on-demand handle resolution.

use super::dom::{Document, ElementRef};
use super::section::{IconGroupId, SectionId};

/// Icon label text swapped on selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelSpec {
    pub desktop_id: &'static str,
    pub mobile_id: &'static str,
    pub default_text: &'static str,
    pub active_text: &'static str,
}

/// Element ids for one navigation icon group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGroupSpec {
    pub group: IconGroupId,
    pub desktop_icon_id: &'static str,
    pub mobile_icon_id: &'static str,
    pub label: Option<LabelSpec>,
}

const HOME_ICONS: IconGroupSpec = IconGroupSpec {
    group: IconGroupId::Home,
    desktop_icon_id: "home-icon",
    mobile_icon_id: "mobile-home-icon",
    label: Some(LabelSpec {
        desktop_id: "home-font-icon",
        mobile_id: "mobile-home-font-icon",
        default_text: "home",
        active_text: "home",
    }),
};

const REPOS_ICONS: IconGroupSpec = IconGroupSpec {
    group: IconGroupId::Repos,
    desktop_icon_id: "repos-icon",
    mobile_icon_id: "mobile-repos-icon",
    label: None,
};

const BLOG_ICONS: IconGroupSpec = IconGroupSpec {
    group: IconGroupId::Blog,
    desktop_icon_id: "blog-icon",
    mobile_icon_id: "mobile-blog-icon",
    label: Some(LabelSpec {
        desktop_id: "blog-font-icon",
        mobile_id: "mobile-blog-font-icon",
        default_text: "article",
        active_text: "article",
    }),
};

const CONTACT_ICONS: IconGroupSpec = IconGroupSpec {
    group: IconGroupId::Contact,
    desktop_icon_id: "contact-icon",
    mobile_icon_id: "mobile-contact-icon",
    label: Some(LabelSpec {
        desktop_id: "contact-font-icon",
        mobile_id: "mobile-contact-font-icon",
        default_text: "mail",
        active_text: "mail",
    }),
};

/// Container element id for a section
pub fn container_id(section: SectionId) -> &'static str {
    match section {
        SectionId::Home => "home-page",
        SectionId::Repos => "repos-page",
        SectionId::Blog => "blog-page",
        SectionId::Article => "article-page",
        SectionId::Contact => "contact-page",
    }
}

pub fn icon_group_spec(group: IconGroupId) -> &'static IconGroupSpec {
    match group {
        IconGroupId::Home => &HOME_ICONS,
        IconGroupId::Repos => &REPOS_ICONS,
        IconGroupId::Blog => &BLOG_ICONS,
        IconGroupId::Contact => &CONTACT_ICONS,
    }
}

/// Live handles for one section, resolved at the time of use.
/// Any handle may be absent.
pub struct SectionDescriptor {
    pub section: SectionId,
    pub group: IconGroupId,
    pub container: Option<ElementRef>,
    pub icons: IconHandles,
}

/// Live handles for one icon group
pub struct IconHandles {
    pub desktop_icon: Option<ElementRef>,
    pub mobile_icon: Option<ElementRef>,
    pub desktop_label: Option<ElementRef>,
    pub mobile_label: Option<ElementRef>,
    pub default_label: Option<&'static str>,
    pub active_label: Option<&'static str>,
}

impl IconHandles {
    pub fn icons(&self) -> impl Iterator<Item = &ElementRef> {
        self.desktop_icon.iter().chain(self.mobile_icon.iter())
    }

    pub fn labels(&self) -> impl Iterator<Item = &ElementRef> {
        self.desktop_label.iter().chain(self.mobile_label.iter())
    }
}

/// Maps section ids to their elements. Holds no handles itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionRegistry;

impl SectionRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn describe(&self, document: &dyn Document, section: SectionId) -> SectionDescriptor {
        let group = section.icon_group();
        SectionDescriptor {
            section,
            group,
            container: document.element_by_id(container_id(section)),
            icons: self.icons(document, group),
        }
    }

    pub fn icons(&self, document: &dyn Document, group: IconGroupId) -> IconHandles {
        let spec = icon_group_spec(group);
        let label = spec.label.as_ref();
        IconHandles {
            desktop_icon: document.element_by_id(spec.desktop_icon_id),
            mobile_icon: document.element_by_id(spec.mobile_icon_id),
            desktop_label: label.and_then(|l| document.element_by_id(l.desktop_id)),
            mobile_label: label.and_then(|l| document.element_by_id(l.mobile_id)),
            default_label: label.map(|l| l.default_text),
            active_label: label.map(|l| l.active_text),
        }
    }

    /// Every section container currently present in the document
    pub fn containers(&self, document: &dyn Document) -> Vec<ElementRef> {
        SectionId::ALL
            .iter()
            .filter_map(|s| document.element_by_id(container_id(*s)))
            .collect()
    }

    /// Icon group owning the given desktop or mobile icon id
    pub fn group_for_icon(&self, element_id: &str) -> Option<IconGroupId> {
        IconGroupId::ALL
            .into_iter()
            .map(icon_group_spec)
            .find(|g| g.desktop_icon_id == element_id || g.mobile_icon_id == element_id)
            .map(|g| g.group)
    }
}
