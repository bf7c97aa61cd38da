use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use kuchiki::NodeRef;
use maud::html;

use crate::dom;
use crate::slots::{Slot, SlotMap};

/// Key under which the preference is persisted.
pub const STORAGE_KEY: &str = "theme";
/// Attribute on the root element carrying the active theme.
pub const ROOT_ATTR: &str = "data-bs-theme";
/// Marker set on the toggle button once the page's click handler is wired.
pub const BOUND_ATTR: &str = "data-theme-bound";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph for the button while this theme is active: it advertises the
    /// theme a click switches to.
    fn next_icon(self) -> &'static str {
        match self.toggled() {
            Theme::Dark => "\u{263E}",
            Theme::Light => "\u{2600}",
        }
    }

    fn next_label(self) -> String {
        format!("Switch to {} theme", self.toggled().as_str())
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent string key-value store holding the preference.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk. A missing or unreadable file is an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = std::fs::read(&path)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_vec_pretty(&self.entries).context("encode preferences")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

/// Persisted preference, else the system dark-mode signal, else light.
pub fn initial_theme(store: &impl PreferenceStore, system_prefers_dark: bool) -> Theme {
    store
        .get(STORAGE_KEY)
        .and_then(|v| Theme::parse(&v))
        .unwrap_or(if system_prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        })
}

/// Theme toggle bound to one page.
pub struct ThemeToggle<S> {
    store: S,
    theme: Theme,
    button: NodeRef,
    root: NodeRef,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    /// Resolves the initial theme, applies it to the page, and makes sure a
    /// toggle button exists (one is appended to `<body>` when the page lacks it).
    pub fn init(
        doc: &NodeRef,
        slots: &SlotMap,
        store: S,
        system_prefers_dark: bool,
    ) -> anyhow::Result<Self> {
        let root = doc
            .select_first("html")
            .map_err(|()| anyhow::anyhow!("page has no <html> element"))?
            .as_node()
            .clone();
        let button = ensure_button(doc, slots)?;
        let theme = initial_theme(&store, system_prefers_dark);
        let toggle = Self {
            store,
            theme,
            button,
            root,
        };
        toggle.apply();
        if bind_once(&toggle.button) {
            tracing::debug!(theme = %theme, "theme toggle bound");
        }
        Ok(toggle)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn button(&self) -> &NodeRef {
        &self.button
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Flips the theme, persists it, and updates the page.
    pub fn toggle(&mut self) -> anyhow::Result<Theme> {
        self.set(self.theme.toggled())
    }

    pub fn set(&mut self, theme: Theme) -> anyhow::Result<Theme> {
        self.store.set(STORAGE_KEY, theme.as_str())?;
        self.theme = theme;
        self.apply();
        Ok(theme)
    }

    fn apply(&self) {
        dom::set_attr(&self.root, ROOT_ATTR, self.theme.as_str());
        let label = self.theme.next_label();
        dom::set_attr(&self.button, "aria-label", &label);
        dom::set_attr(&self.button, "title", &label);
        dom::set_text(&self.button, self.theme.next_icon());
    }
}

/// The page's toggle button, created and appended to `<body>` when missing.
pub fn ensure_button(doc: &NodeRef, slots: &SlotMap) -> anyhow::Result<NodeRef> {
    if let Some(button) = slots.find(doc, Slot::ThemeToggle) {
        return Ok(button);
    }
    let body = doc
        .select_first("body")
        .map_err(|()| anyhow::anyhow!("page has no <body>"))?
        .as_node()
        .clone();
    let button = dom::fragment(html! {
        button type="button" id="theme-toggle" class="btn btn-sm btn-outline-secondary theme-toggle" {}
    })
    .into_iter()
    .next()
    .ok_or_else(|| anyhow::anyhow!("build theme toggle button"))?;
    body.append(button.clone());
    Ok(button)
}

/// Marks the button's click handler as bound. Returns `false` when it
/// already was, so repeated initialization never binds twice.
pub fn bind_once(button: &NodeRef) -> bool {
    if dom::get_attr(button, BOUND_ATTR).is_some() {
        return false;
    }
    dom::set_attr(button, BOUND_ATTR, "true")
}
