use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::Deserialize;

/// Named locations in the page templates that the binder writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
    Brand,
    Header,
    HeroHeadline,
    HeroSubheadline,
    CtaResume,
    CtaProjects,
    ProjectsList,
    ExperienceHeading,
    EducationHeading,
    Main,
    ThemeToggle,
    ContactForm,
    ContactEmail,
    ContactMessage,
    ContactGmail,
}

impl Slot {
    pub const ALL: [Slot; 15] = [
        Slot::Brand,
        Slot::Header,
        Slot::HeroHeadline,
        Slot::HeroSubheadline,
        Slot::CtaResume,
        Slot::CtaProjects,
        Slot::ProjectsList,
        Slot::ExperienceHeading,
        Slot::EducationHeading,
        Slot::Main,
        Slot::ThemeToggle,
        Slot::ContactForm,
        Slot::ContactEmail,
        Slot::ContactMessage,
        Slot::ContactGmail,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Slot::Brand => "brand",
            Slot::Header => "header",
            Slot::HeroHeadline => "hero-headline",
            Slot::HeroSubheadline => "hero-subheadline",
            Slot::CtaResume => "cta-resume",
            Slot::CtaProjects => "cta-projects",
            Slot::ProjectsList => "projects-list",
            Slot::ExperienceHeading => "experience-heading",
            Slot::EducationHeading => "education-heading",
            Slot::Main => "main",
            Slot::ThemeToggle => "theme-toggle",
            Slot::ContactForm => "contact-form",
            Slot::ContactEmail => "contact-email",
            Slot::ContactMessage => "contact-message",
            Slot::ContactGmail => "contact-gmail",
        }
    }

    fn default_selector(self) -> &'static str {
        match self {
            Slot::Brand => ".navbar .navbar-brand",
            Slot::Header => "header",
            Slot::HeroHeadline => "h1.display-3 .text-gradient.d-inline, h1.display-3 span",
            Slot::HeroSubheadline => ".fs-3.fw-light",
            Slot::CtaResume => "a[data-slot=\"cta-resume\"]",
            Slot::CtaProjects => "a[data-slot=\"cta-projects\"]",
            Slot::ProjectsList => "#projects-list, section.py-5 .container.px-5.mb-5",
            Slot::ExperienceHeading => "h2.text-primary",
            Slot::EducationHeading => "h2.text-secondary",
            Slot::Main => "main",
            Slot::ThemeToggle => "#theme-toggle",
            Slot::ContactForm => "#contactFormSimple",
            Slot::ContactEmail => "#contactEmail",
            Slot::ContactMessage => "#contactMessage",
            Slot::ContactGmail => "#contactGmail",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Selector for every [`Slot`]. Built from the defaults, optionally
/// overridden from a JSON object keyed by slot name.
#[derive(Debug, Clone)]
pub struct SlotMap {
    selectors: BTreeMap<Slot, String>,
}

impl Default for SlotMap {
    fn default() -> Self {
        let selectors = Slot::ALL
            .iter()
            .map(|slot| (*slot, slot.default_selector().to_string()))
            .collect();
        Self { selectors }
    }
}

impl SlotMap {
    /// Defaults merged with the overrides in `json`. Every selector is
    /// compiled so a typo fails the build instead of silently matching nothing.
    pub fn from_json(json: &[u8]) -> anyhow::Result<Self> {
        let overrides: BTreeMap<Slot, String> =
            serde_json::from_slice(json).context("parse slot map")?;
        let mut map = Self::default();
        map.selectors.extend(overrides);
        map.validate()?;
        Ok(map)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        Self::from_json(&bytes).with_context(|| format!("load slots from {}", path.display()))
    }

    pub fn selector(&self, slot: Slot) -> &str {
        self.selectors
            .get(&slot)
            .map(String::as_str)
            .unwrap_or_else(|| slot.default_selector())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (slot, selector) in &self.selectors {
            if selector.trim().is_empty() {
                anyhow::bail!("slot {} has an empty selector", slot);
            }
            if kuchiki::Selectors::compile(selector).is_err() {
                anyhow::bail!("slot {} has an invalid selector: {}", slot, selector);
            }
        }
        Ok(())
    }

    /// First element under `root` matching the slot's selector.
    pub fn find(&self, root: &kuchiki::NodeRef, slot: Slot) -> Option<kuchiki::NodeRef> {
        root.select_first(self.selector(slot))
            .ok()
            .map(|n| n.as_node().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuchiki::traits::TendrilSink as _;

    #[test]
    fn defaults_compile() {
        SlotMap::default().validate().unwrap();
    }

    #[test]
    fn overrides_merge_onto_defaults() {
        let map = SlotMap::from_json(br#"{ "cta-resume": "header a.btn-primary" }"#).unwrap();
        assert_eq!(map.selector(Slot::CtaResume), "header a.btn-primary");
        assert_eq!(map.selector(Slot::Main), "main");
    }

    #[test]
    fn rejects_bad_selectors_and_unknown_slots() {
        assert!(SlotMap::from_json(br#"{ "main": "main[[" }"#).is_err());
        assert!(SlotMap::from_json(br#"{ "main": "  " }"#).is_err());
        assert!(SlotMap::from_json(br#"{ "sidebar": "aside" }"#).is_err());
    }

    #[test]
    fn named_cta_slots_ignore_position() {
        let doc = kuchiki::parse_html().one(
            r##"<header>
                 <a class="btn" href="#">first</a>
                 <a class="btn" data-slot="cta-projects" href="#">projects</a>
               </header>"##,
        );
        let map = SlotMap::default();
        assert!(map.find(&doc, Slot::CtaResume).is_none());
        let projects = map.find(&doc, Slot::CtaProjects).unwrap();
        assert_eq!(projects.text_contents(), "projects");
    }
}
