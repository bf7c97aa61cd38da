use std::sync::LazyLock;

use kuchiki::NodeRef;
use kuchiki::traits::TendrilSink as _;
use maud::html;
use regex::Regex;
use serde_json::Value;

use crate::content::ContentDocument;
use crate::dom;
use crate::html as fragments;
use crate::page::Page;
use crate::slots::{Slot, SlotMap};

static PLACEHOLDER_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)start\s*bootstrap").expect("placeholder title regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Seo,
    Hero,
    Projects,
    Work,
    Education,
}

impl Section {
    pub fn name(self) -> &'static str {
        match self {
            Section::Seo => "seo",
            Section::Hero => "hero",
            Section::Projects => "projects",
            Section::Work => "work",
            Section::Education => "education",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    Hidden(HideReason),
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideReason {
    EmptyList,
    FetchFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotOnPage,
    NoContent,
    MissingField(&'static str),
    MissingSlot(Slot),
}

/// What happened to each section of one page.
#[derive(Debug, Clone)]
pub struct BindReport {
    pub page: Page,
    pub sections: Vec<(Section, Outcome)>,
}

impl BindReport {
    pub fn outcome(&self, section: Section) -> Option<&Outcome> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, o)| o)
    }

    pub fn failed(&self) -> impl Iterator<Item = (Section, &str)> {
        self.sections.iter().filter_map(|(s, o)| match o {
            Outcome::Failed(msg) => Some((*s, msg.as_str())),
            _ => None,
        })
    }
}

/// Binds `content` into `html` and serializes the result.
///
/// `content` is `None` when the document could not be loaded; the page then
/// only has its list-dependent sections hidden.
pub fn bind_page(
    html: &str,
    page: &Page,
    content: Option<&ContentDocument>,
    slots: &SlotMap,
) -> anyhow::Result<(String, BindReport)> {
    let doc = kuchiki::parse_html().one(html);
    let report = bind_document(&doc, page, content, slots);
    Ok((dom::serialize(&doc)?, report))
}

pub fn bind_document(
    doc: &NodeRef,
    page: &Page,
    content: Option<&ContentDocument>,
    slots: &SlotMap,
) -> BindReport {
    let sections = match content {
        Some(content) => vec![
            run_step(page, Section::Seo, || apply_seo(doc, page, content)),
            run_step(page, Section::Hero, || apply_hero(doc, content, slots)),
            run_step(page, Section::Projects, || {
                apply_projects(doc, page, content, slots)
            }),
            run_step(page, Section::Work, || apply_work(doc, page, content, slots)),
            run_step(page, Section::Education, || {
                apply_education(doc, page, content, slots)
            }),
        ],
        None => hide_list_sections(doc, page, slots),
    };
    BindReport {
        page: page.clone(),
        sections,
    }
}

fn run_step(
    page: &Page,
    section: Section,
    step: impl FnOnce() -> anyhow::Result<Outcome>,
) -> (Section, Outcome) {
    let outcome = match step() {
        Ok(outcome) => outcome,
        Err(err) => Outcome::Failed(format!("{err:#}")),
    };
    match &outcome {
        Outcome::Failed(msg) => {
            tracing::warn!(%page, section = section.name(), error = %msg, "section failed")
        }
        other => tracing::debug!(%page, section = section.name(), outcome = ?other, "section bound"),
    }
    (section, outcome)
}

fn is_placeholder_title(title: &str) -> bool {
    title.trim().is_empty() || PLACEHOLDER_TITLE.is_match(title)
}

fn page_description<'a>(seo: &'a Value, page: &Page) -> &'a str {
    let non_empty = |v: Option<&'a Value>| v.and_then(Value::as_str).filter(|s| !s.is_empty());
    non_empty(seo.get("pages").and_then(|p| p.get(page.filename())))
        .or_else(|| non_empty(seo.get("default_description")))
        .unwrap_or("")
}

fn apply_seo(doc: &NodeRef, page: &Page, content: &ContentDocument) -> anyhow::Result<Outcome> {
    let Some(seo) = content.resolve("site.seo") else {
        return Ok(Outcome::Skipped(SkipReason::MissingField("site.seo")));
    };
    let head = doc
        .select_first("head")
        .map_err(|()| anyhow::anyhow!("page has no <head>"))?
        .as_node()
        .clone();

    let title = doc.select_first("title").ok().map(|t| t.as_node().clone());
    let existing = title.as_ref().map(|t| t.text_contents()).unwrap_or_default();
    let name = content.resolve_str("site.name", "").trim();
    if is_placeholder_title(&existing) && !name.is_empty() {
        let title = match title {
            Some(t) => t,
            None => {
                let t = dom::element("<title></title>", "title")
                    .ok_or_else(|| anyhow::anyhow!("build <title>"))?;
                head.append(t.clone());
                t
            }
        };
        dom::set_text(&title, name);
    }

    let meta = match doc.select_first(r#"meta[name="description"]"#) {
        Ok(m) => m.as_node().clone(),
        Err(()) => {
            let m = dom::element(r#"<meta name="description">"#, "meta")
                .ok_or_else(|| anyhow::anyhow!("build <meta>"))?;
            head.append(m.clone());
            m
        }
    };
    dom::set_attr(&meta, "content", page_description(seo, page));
    Ok(Outcome::Rendered)
}

/// Brand text on every page; headline, subheadline and call-to-action links
/// inside the header when the page has one.
fn apply_hero(doc: &NodeRef, content: &ContentDocument, slots: &SlotMap) -> anyhow::Result<Outcome> {
    if content.resolve("site").is_none() {
        return Ok(Outcome::Skipped(SkipReason::MissingField("site")));
    }

    if let Some(brand) = slots.find(doc, Slot::Brand) {
        dom::set_text(&brand, content.resolve_str("site.name", ""));
    }

    let Some(header) = slots.find(doc, Slot::Header) else {
        return Ok(Outcome::Skipped(SkipReason::MissingSlot(Slot::Header)));
    };

    for (slot, path) in [
        (Slot::HeroHeadline, "site.hero_headline"),
        (Slot::HeroSubheadline, "site.hero_subheadline"),
    ] {
        if let Some(node) = slots.find(&header, slot) {
            dom::set_text(&node, content.resolve_str(path, ""));
        }
    }

    for (slot, path, fallback) in [
        (Slot::CtaResume, "site.cta_resume_href", "resume.html"),
        (Slot::CtaProjects, "site.cta_projects_href", "projects.html"),
    ] {
        if let Some(node) = slots.find(&header, slot) {
            let href = content.resolve_str(path, fallback);
            dom::set_href(&node, if href.trim().is_empty() { fallback } else { href });
        }
    }

    Ok(Outcome::Rendered)
}

fn apply_projects(
    doc: &NodeRef,
    page: &Page,
    content: &ContentDocument,
    slots: &SlotMap,
) -> anyhow::Result<Outcome> {
    if *page != Page::Projects {
        return Ok(Outcome::Skipped(SkipReason::NotOnPage));
    }
    let Some(projects) = content.projects() else {
        return Ok(Outcome::Skipped(SkipReason::MissingField("projects")));
    };
    let Some(container) = slots.find(doc, Slot::ProjectsList) else {
        return Ok(Outcome::Skipped(SkipReason::MissingSlot(Slot::ProjectsList)));
    };

    if projects.is_empty() {
        dom::hide(&container);
        return Ok(Outcome::Hidden(HideReason::EmptyList));
    }

    dom::clear_children(&container);
    dom::append_all(&container, dom::fragment(fragments::projects_list(&projects)));
    Ok(Outcome::Rendered)
}

/// The `<section>` enclosing the heading in `slot`.
fn section_of(doc: &NodeRef, slots: &SlotMap, slot: Slot) -> Option<NodeRef> {
    slots
        .find(doc, slot)
        .and_then(|heading| dom::closest(&heading, "section"))
}

fn apply_work(
    doc: &NodeRef,
    page: &Page,
    content: &ContentDocument,
    slots: &SlotMap,
) -> anyhow::Result<Outcome> {
    if !matches!(page, Page::Resume | Page::Work) {
        return Ok(Outcome::Skipped(SkipReason::NotOnPage));
    }
    let Some(work) = content.work() else {
        return Ok(Outcome::Skipped(SkipReason::MissingField("work")));
    };

    let section = section_of(doc, slots, Slot::ExperienceHeading);
    let main = match page {
        Page::Work => slots.find(doc, Slot::Main),
        _ => None,
    };
    if section.is_none() && main.is_none() {
        let slot = match page {
            Page::Work => Slot::Main,
            _ => Slot::ExperienceHeading,
        };
        return Ok(Outcome::Skipped(SkipReason::MissingSlot(slot)));
    }

    if work.is_empty() {
        section.iter().chain(main.iter()).for_each(dom::hide);
        return Ok(Outcome::Hidden(HideReason::EmptyList));
    }

    if let Some(section) = &section {
        dom::remove_all(section, ".card");
        for job in &work {
            dom::append_all(section, dom::fragment(fragments::resume_job_card(job)));
        }
    }

    if let Some(main) = &main {
        let heading = main.select_first("h2").ok().map(|h| h.as_node().clone());
        if let Some(heading) = heading {
            dom::clear_children(main);
            main.append(heading);
        }
        dom::append_all(main, dom::fragment(fragments::work_list(&work)));
    }

    Ok(Outcome::Rendered)
}

fn apply_education(
    doc: &NodeRef,
    page: &Page,
    content: &ContentDocument,
    slots: &SlotMap,
) -> anyhow::Result<Outcome> {
    if !matches!(page, Page::Resume | Page::Education) {
        return Ok(Outcome::Skipped(SkipReason::NotOnPage));
    }
    let Some(education) = content.education() else {
        return Ok(Outcome::Skipped(SkipReason::MissingField("education")));
    };

    let section = section_of(doc, slots, Slot::EducationHeading);
    let main = match page {
        Page::Education => slots.find(doc, Slot::Main),
        _ => None,
    };
    if section.is_none() && main.is_none() {
        let slot = match page {
            Page::Education => Slot::Main,
            _ => Slot::EducationHeading,
        };
        return Ok(Outcome::Skipped(SkipReason::MissingSlot(slot)));
    }

    let courses = fragments::courses_row(&education);
    let mut rendered = false;

    if let Some(section) = &section {
        if education.degrees.is_empty() {
            dom::hide(section);
        } else {
            dom::remove_all(section, ".card");
            for degree in &education.degrees {
                dom::append_all(section, dom::fragment(fragments::resume_degree_card(degree)));
            }
            rendered = true;
        }
    }

    if let Some(main) = &main {
        if education.degrees.is_empty() && courses.is_none() {
            dom::hide(main);
        } else {
            let heading = match main.select_first("h2") {
                Ok(h) => h.as_node().clone(),
                Err(()) => dom::fragment(html! { h2 {} })
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("build <h2>"))?,
            };
            dom::set_text(&heading, "Education");
            dom::clear_children(main);
            main.append(heading);
            dom::append_all(main, dom::fragment(fragments::degree_list(&education.degrees)));
            if let Some(courses) = courses {
                dom::append_all(main, dom::fragment(courses));
            }
            rendered = true;
        }
    }

    Ok(if rendered {
        Outcome::Rendered
    } else {
        Outcome::Hidden(HideReason::EmptyList)
    })
}

/// Degraded pass for a page whose content could not be loaded: only the
/// sections fed by list data are hidden.
fn hide_list_sections(doc: &NodeRef, page: &Page, slots: &SlotMap) -> Vec<(Section, Outcome)> {
    let hide_slot = |slot: Slot, section_scoped: bool| -> Outcome {
        let target = if section_scoped {
            section_of(doc, slots, slot)
        } else {
            slots.find(doc, slot)
        };
        match target {
            Some(node) => {
                dom::hide(&node);
                Outcome::Hidden(HideReason::FetchFailed)
            }
            None => Outcome::Skipped(SkipReason::MissingSlot(slot)),
        }
    };
    let not_on_page = || Outcome::Skipped(SkipReason::NotOnPage);

    let projects = match page {
        Page::Projects => hide_slot(Slot::ProjectsList, false),
        _ => not_on_page(),
    };
    let work = match page {
        Page::Resume => hide_slot(Slot::ExperienceHeading, true),
        Page::Work => hide_slot(Slot::Main, false),
        _ => not_on_page(),
    };
    let education = match page {
        Page::Resume => hide_slot(Slot::EducationHeading, true),
        Page::Education => hide_slot(Slot::Main, false),
        _ => not_on_page(),
    };

    tracing::debug!(%page, "content unavailable; list sections hidden");
    vec![
        (Section::Seo, Outcome::Skipped(SkipReason::NoContent)),
        (Section::Hero, Outcome::Skipped(SkipReason::NoContent)),
        (Section::Projects, projects),
        (Section::Work, work),
        (Section::Education, education),
    ]
}
