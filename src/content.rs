use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context as _;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::fetcher::Fetcher;

/// Location of the content document relative to the site root.
pub const CONTENT_PATH: &str = "data/content.json";

/// The parsed content document.
///
/// Every field is optional and a field of the wrong JSON type reads as absent,
/// so lookups never fail; they fall back to whatever default the caller asks for.
#[derive(Debug, Clone, Default)]
pub struct ContentDocument {
    root: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::labels")]
    pub stack: Vec<String>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub links: Option<ProjectLinks>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, deserialize_with = "lenient::string")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub demo: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub post: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient::records")]
    pub degrees: Vec<Degree>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub courses: Option<Courses>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Degree {
    #[serde(default, deserialize_with = "lenient::string")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub program: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Courses {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub current: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub planned: Vec<String>,
}

impl ProjectLinks {
    pub fn is_empty(&self) -> bool {
        [&self.github, &self.demo, &self.post]
            .iter()
            .all(|l| l.as_deref().unwrap_or("").is_empty())
    }
}

impl Education {
    pub fn current_courses(&self) -> &[String] {
        self.courses.as_ref().map(|c| c.current.as_slice()).unwrap_or(&[])
    }

    pub fn planned_courses(&self) -> &[String] {
        self.courses.as_ref().map(|c| c.planned.as_slice()).unwrap_or(&[])
    }
}

impl ContentDocument {
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    pub fn from_slice(bytes: &[u8]) -> anyhow::Result<Self> {
        let root: Value = serde_json::from_slice(bytes).context("parse content.json")?;
        Ok(Self { root })
    }

    /// Walks a dotted path (`site.seo.default_description`). Missing keys,
    /// non-object intermediates and `null` all resolve to `None`.
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        let mut cur = &self.root;
        for key in path.split('.') {
            cur = cur.as_object()?.get(key)?;
        }
        if cur.is_null() { None } else { Some(cur) }
    }

    /// String at `path`, or `fallback` when the path is missing or not a string.
    pub fn resolve_str<'a>(&'a self, path: &str, fallback: &'a str) -> &'a str {
        self.resolve(path)
            .and_then(Value::as_str)
            .unwrap_or(fallback)
    }

    /// `None` when `projects` is absent or not a list. Entries that are not
    /// objects are dropped.
    pub fn projects(&self) -> Option<Vec<Project>> {
        self.records("projects")
    }

    pub fn work(&self) -> Option<Vec<Job>> {
        self.records("work")
    }

    pub fn education(&self) -> Option<Education> {
        let value = self.resolve("education")?;
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    fn records<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        let items = self.resolve(key)?.as_array()?;
        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if !item.is_object() {
                tracing::debug!(list = key, index = idx, "skipping non-object entry");
                continue;
            }
            match serde_json::from_value(item.clone()) {
                Ok(v) => out.push(v),
                Err(err) => tracing::debug!(list = key, index = idx, %err, "skipping malformed entry"),
            }
        }
        Some(out)
    }
}

/// Where the content document comes from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Fetched from `<base>/data/content.json`.
    Remote(Url),
    /// Read from a file on disk.
    Local(PathBuf),
}

impl ContentSource {
    pub fn local_site(site_dir: &Path) -> Self {
        ContentSource::Local(site_dir.join(CONTENT_PATH))
    }
}

/// `data/content.json` joined onto `base`, with a `v=<millis>` cache buster
/// when the base has a host.
pub fn content_url(base: &Url, now_millis: u128) -> anyhow::Result<Url> {
    let mut url = base
        .join(CONTENT_PATH)
        .with_context(|| format!("resolve {} against {}", CONTENT_PATH, base))?;
    if url.host_str().is_some_and(|h| !h.is_empty()) {
        url.query_pairs_mut()
            .append_pair("v", &now_millis.to_string());
    }
    Ok(url)
}

pub async fn load_content(
    source: &ContentSource,
    fetcher: &Fetcher,
) -> anyhow::Result<ContentDocument> {
    match source {
        ContentSource::Local(path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
            ContentDocument::from_slice(&bytes)
        }
        ContentSource::Remote(base) => {
            let url = content_url(base, unix_millis())?;
            let (bytes, _headers) = fetcher.get_bytes(url).await?;
            ContentDocument::from_slice(&bytes)
        }
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize as _, Deserializer};
    use serde_json::Value;

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Like `strings`, but scalars are stringified (`["rust", 2024]`).
    pub fn labels<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn record<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let v = Value::deserialize(d)?;
        Ok(if v.is_object() {
            serde_json::from_value(v).ok()
        } else {
            None
        })
    }

    pub fn records<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            _ => Vec::new(),
        })
    }
}
