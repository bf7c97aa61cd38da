mod binder;
mod builtin;
mod cli;
mod contact;
mod content;
mod dom;
mod fetcher;
mod html;
mod page;
mod progress;
mod slots;
mod strict;
mod theme;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use kuchiki::traits::TendrilSink as _;

pub use binder::{BindReport, HideReason, Outcome, Section, SkipReason, bind_document, bind_page};
pub use cli::{BindArgs, Cli, Command, ContactArgs, ProgressMode, ThemeAction, ThemeArgs, ThemeChoice};
pub use contact::{ContactDraft, ContactLinkBuilder, Navigation};
pub use content::{ContentDocument, ContentSource, content_url, load_content};
pub use fetcher::Fetcher;
pub use page::Page;
pub use slots::{Slot, SlotMap};
pub use theme::{FileStore, MemoryStore, PreferenceStore, Theme, ThemeToggle};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Bind(args) => bind_site(&args).await.map(|_| ()),
        Command::Theme(args) => run_theme(&args),
        Command::Contact(args) => run_contact(&args),
    }
}

/// Binds every page of `args.site` and writes the results to `args.out`.
pub async fn bind_site(args: &BindArgs) -> anyhow::Result<Vec<BindReport>> {
    use std::io::IsTerminal as _;

    let progress_enabled = match args.progress {
        ProgressMode::Always => true,
        ProgressMode::Never => false,
        ProgressMode::Auto => std::io::stderr().is_terminal(),
    };
    let progress = progress::Progress::new(progress_enabled);

    let slots = match &args.slots {
        Some(path) => SlotMap::load(path)?,
        None => SlotMap::default(),
    };

    ensure_distinct_output(&args.site, &args.out)?;
    let pages = collect_pages(args)?;
    progress.set_pages_total(pages.len());

    progress.set_stage("loading content.json");
    let source = match &args.content_url {
        Some(url) => ContentSource::Remote(url.clone()),
        None => ContentSource::local_site(&args.site),
    };
    let fetcher = Fetcher::new(&args.user_agent)?;
    let content = match load_content(&source, &fetcher).await {
        Ok(content) => Some(content),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "content unavailable; hiding list sections");
            None
        }
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create {}", args.out.display()))?;

    let contact = ContactLinkBuilder::new(args.recipient.clone());
    let mut reports = Vec::with_capacity(pages.len());
    for path in &pages {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("page path {} has no file name", path.display()))?;
        progress.set_stage(format!("binding {filename}"));

        let html =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let page = Page::from_filename(filename);
        let doc = kuchiki::parse_html().one(html);

        if args.strict {
            strict::assert_slots_present(&doc, &page, &slots)?;
        }

        let report = bind_document(&doc, &page, content.as_ref(), &slots);
        if args.runtime_scripts {
            install_runtime(&doc, &slots, &contact)
                .with_context(|| format!("install runtime scripts into {}", filename))?;
        }

        let out_path = args.out.join(filename);
        std::fs::write(&out_path, dom::serialize(&doc)?)
            .with_context(|| format!("write {}", out_path.display()))?;

        let failed = report.failed().count();
        tracing::info!(page = %page, failed_sections = failed, "page bound");
        progress.page_done(filename, failed);
        reports.push(report);
    }

    progress.finish();
    Ok(reports)
}

/// Theme button plus runtime scripts; the contact script only on pages with
/// the contact form.
fn install_runtime(
    doc: &kuchiki::NodeRef,
    slots: &SlotMap,
    contact: &ContactLinkBuilder,
) -> anyhow::Result<()> {
    let button = theme::ensure_button(doc, slots)?;
    theme::bind_once(&button);
    // the button may already carry the marker from `theme --page`
    builtin::inject_script(doc, "theme", builtin::THEME_TOGGLE_JS);
    if contact.wire_page(doc, slots)? {
        builtin::inject_script(doc, "contact", builtin::CONTACT_JS);
    }
    Ok(())
}

/// The output directory must not be the site directory.
fn ensure_distinct_output(site: &Path, out: &Path) -> anyhow::Result<()> {
    let site = site
        .canonicalize()
        .with_context(|| format!("open site {}", site.display()))?;
    if let Ok(out) = out.canonicalize() {
        if out == site {
            anyhow::bail!("output directory {} is the site directory", out.display());
        }
    }
    Ok(())
}

fn collect_pages(args: &BindArgs) -> anyhow::Result<Vec<PathBuf>> {
    if !args.pages.is_empty() {
        return Ok(args.pages.iter().map(|p| args.site.join(p)).collect());
    }

    let mut pages = Vec::new();
    for entry in std::fs::read_dir(&args.site)
        .with_context(|| format!("read dir {}", args.site.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
            pages.push(path);
        }
    }
    pages.sort();
    Ok(pages)
}

fn run_theme(args: &ThemeArgs) -> anyhow::Result<()> {
    let store = FileStore::open(&args.store);
    let slots = SlotMap::default();

    let html = match &args.page {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?,
        None => String::new(),
    };
    let doc = kuchiki::parse_html().one(html);
    let mut toggle = ThemeToggle::init(&doc, &slots, store, args.system_dark)?;

    match args.action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            toggle.toggle()?;
        }
        ThemeAction::Set { theme } => {
            toggle.set(match theme {
                ThemeChoice::Light => Theme::Light,
                ThemeChoice::Dark => Theme::Dark,
            })?;
        }
    }

    if let Some(path) = &args.page {
        std::fs::write(path, dom::serialize(&doc)?)
            .with_context(|| format!("write {}", path.display()))?;
    }
    tracing::debug!(store = %args.store.display(), theme = %toggle.theme(), "theme resolved");
    println!("{}", toggle.theme());
    Ok(())
}

fn run_contact(args: &ContactArgs) -> anyhow::Result<()> {
    let builder = ContactLinkBuilder::new(args.recipient.clone());
    let draft = match &args.page {
        Some(path) => {
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            ContactDraft::from_form(&kuchiki::parse_html().one(html), &SlotMap::default())
        }
        None => ContactDraft::new(args.email.clone(), args.message.clone()),
    };

    println!("{}", builder.on_submit(&draft).url());
    println!("{}", builder.on_gmail_click(&draft)?.url());
    Ok(())
}
