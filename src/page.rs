use crate::slots::Slot;

/// Which page is being bound, derived from its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Index,
    Projects,
    Resume,
    Work,
    Education,
    Other(String),
}

impl Page {
    /// Last path segment of `path`; an empty segment (`/`, `site/`) is the index.
    pub fn from_path(path: &str) -> Self {
        let last = path.rsplit(['/', '\\']).next().unwrap_or("");
        Self::from_filename(last)
    }

    pub fn from_filename(filename: &str) -> Self {
        match filename {
            "" | "index.html" => Page::Index,
            "projects.html" => Page::Projects,
            "resume.html" => Page::Resume,
            "work.html" => Page::Work,
            "education.html" => Page::Education,
            other => Page::Other(other.to_string()),
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            Page::Index => "index.html",
            Page::Projects => "projects.html",
            Page::Resume => "resume.html",
            Page::Work => "work.html",
            Page::Education => "education.html",
            Page::Other(name) => name,
        }
    }

    /// Slots the page must carry for every section to bind.
    pub fn required_slots(&self) -> &'static [Slot] {
        match self {
            Page::Index => &[
                Slot::Header,
                Slot::HeroHeadline,
                Slot::CtaResume,
                Slot::CtaProjects,
            ],
            Page::Projects => &[Slot::ProjectsList],
            Page::Resume => &[Slot::ExperienceHeading, Slot::EducationHeading],
            Page::Work | Page::Education => &[Slot::Main],
            Page::Other(_) => &[],
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.filename())
    }
}
