use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for each top-level page of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Home,
    Repos,
    Blog,
    Article,
    Contact,
}

/// Navigation icon group. Several sections may share one group
/// (an open article is shown under the blog icon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconGroupId {
    Home,
    Repos,
    Blog,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::Home,
        SectionId::Repos,
        SectionId::Blog,
        SectionId::Article,
        SectionId::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::Repos => "repos",
            SectionId::Blog => "blog",
            SectionId::Article => "article",
            SectionId::Contact => "contact",
        }
    }

    /// The icon group that lights up while this section is active
    pub fn icon_group(&self) -> IconGroupId {
        match self {
            SectionId::Home => IconGroupId::Home,
            SectionId::Repos => IconGroupId::Repos,
            SectionId::Blog | SectionId::Article => IconGroupId::Blog,
            SectionId::Contact => IconGroupId::Contact,
        }
    }

    /// Sections reachable from the navigation bar, in display order
    pub fn menu_order() -> [SectionId; 4] {
        [SectionId::Home, SectionId::Repos, SectionId::Blog, SectionId::Contact]
    }
}

impl IconGroupId {
    pub const ALL: [IconGroupId; 4] = [
        IconGroupId::Home,
        IconGroupId::Repos,
        IconGroupId::Blog,
        IconGroupId::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IconGroupId::Home => "home",
            IconGroupId::Repos => "repos",
            IconGroupId::Blog => "blog",
            IconGroupId::Contact => "contact",
        }
    }

    /// The section a click on this group's icon navigates to
    pub fn landing_section(&self) -> SectionId {
        match self {
            IconGroupId::Home => SectionId::Home,
            IconGroupId::Repos => SectionId::Repos,
            IconGroupId::Blog => SectionId::Blog,
            IconGroupId::Contact => SectionId::Contact,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IconGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(SectionId::Home),
            "repos" | "projects" => Ok(SectionId::Repos),
            "blog" => Ok(SectionId::Blog),
            "article" => Ok(SectionId::Article),
            "contact" => Ok(SectionId::Contact),
            other => anyhow::bail!("Unknown section '{}'", other),
        }
    }
}

/// A request to make a section visible, with an optional payload
/// (the article slug when the target is `article`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub section: SectionId,
    pub payload: Option<String>,
}

impl TransitionRequest {
    pub fn new(section: SectionId) -> Self {
        Self { section, payload: None }
    }

    pub fn article(slug: impl Into<String>) -> Self {
        Self {
            section: SectionId::Article,
            payload: Some(slug.into()),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl From<SectionId> for TransitionRequest {
    fn from(section: SectionId) -> Self {
        Self::new(section)
    }
}

impl fmt::Display for TransitionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Some(payload) => write!(f, "{}({})", self.section, payload),
            None => write!(f, "{}", self.section),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_names() {
        assert_eq!("blog".parse::<SectionId>().unwrap(), SectionId::Blog);
        assert_eq!(" Contact ".parse::<SectionId>().unwrap(), SectionId::Contact);
        assert_eq!("projects".parse::<SectionId>().unwrap(), SectionId::Repos);
        assert!("about".parse::<SectionId>().is_err());
        assert!("".parse::<SectionId>().is_err());
    }

    #[test]
    fn test_article_groups_under_blog() {
        assert_eq!(SectionId::Article.icon_group(), IconGroupId::Blog);
        assert_eq!(SectionId::Blog.icon_group(), IconGroupId::Blog);
        for group in IconGroupId::ALL {
            assert_eq!(group.landing_section().icon_group(), group);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&SectionId::Repos).unwrap();
        assert_eq!(json, "\"repos\"");
        let parsed: SectionId = serde_json::from_str("\"article\"").unwrap();
        assert_eq!(parsed, SectionId::Article);
    }

    #[test]
    fn test_request_display() {
        assert_eq!(TransitionRequest::new(SectionId::Home).to_string(), "home");
        assert_eq!(
            TransitionRequest::article("fagram-desktop").to_string(),
            "article(fagram-desktop)"
        );
    }
}
