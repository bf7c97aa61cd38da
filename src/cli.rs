use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use url::Url;

use crate::contact::DEFAULT_RECIPIENT;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressMode {
    /// Enable progress UI when stderr is a TTY.
    Auto,
    /// Always enable progress UI (even when piped).
    Always,
    /// Never show progress UI.
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (overridden by `RUST_LOG`).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bind the content document into every page of a site.
    Bind(BindArgs),
    /// Show or change the persisted theme preference.
    Theme(ThemeArgs),
    /// Print the `mailto:` and Gmail compose links for a contact draft.
    Contact(ContactArgs),
}

#[derive(Debug, clap::Args)]
pub struct BindArgs {
    /// Site directory holding the HTML page templates.
    #[arg(long, default_value = ".")]
    pub site: PathBuf,

    /// Base URL the content document is fetched from (`<url>/data/content.json`).
    ///
    /// If omitted, `data/content.json` is read from `--site`.
    #[arg(long)]
    pub content_url: Option<Url>,

    /// Output directory for bound pages. Must differ from `--site`.
    #[arg(long, default_value = "dist")]
    pub out: PathBuf,

    /// JSON file overriding slot selectors (`{"cta-resume": "header a.btn-primary"}`).
    #[arg(long)]
    pub slots: Option<PathBuf>,

    /// Only bind these page files (relative to `--site`). Defaults to every `*.html`.
    #[arg(long = "page")]
    pub pages: Vec<PathBuf>,

    /// Fail when a page lacks a slot its sections bind into.
    #[arg(long)]
    pub strict: bool,

    /// Add the theme toggle button and the theme/contact runtime scripts.
    #[arg(long)]
    pub runtime_scripts: bool,

    /// Recipient address for the contact form.
    #[arg(long, default_value = DEFAULT_RECIPIENT)]
    pub recipient: String,

    /// HTTP User-Agent used for fetching the content document.
    #[arg(long, default_value = "portfolio-binder/0.1")]
    pub user_agent: String,

    /// Progress display: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,
}

#[derive(Debug, clap::Args)]
pub struct ThemeArgs {
    /// Preference store (JSON file).
    #[arg(long, default_value = ".portfolio-prefs.json")]
    pub store: PathBuf,

    /// Treat the system color scheme as dark.
    #[arg(long)]
    pub system_dark: bool,

    /// Page to stamp with the resulting theme (rewritten in place).
    #[arg(long)]
    pub page: Option<PathBuf>,

    #[command(subcommand)]
    pub action: ThemeAction,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ThemeAction {
    /// Print the active theme.
    Show,
    /// Flip and persist the theme.
    Toggle,
    /// Persist an explicit theme.
    Set {
        #[arg(value_enum)]
        theme: ThemeChoice,
    },
}

#[derive(Debug, clap::Args)]
pub struct ContactArgs {
    /// Recipient address.
    #[arg(long, default_value = DEFAULT_RECIPIENT)]
    pub recipient: String,

    /// Sender address entered in the form.
    #[arg(long, default_value = "")]
    pub email: String,

    /// Message body entered in the form.
    #[arg(long, default_value = "")]
    pub message: String,

    /// Read the draft from the contact form fields of this page instead.
    #[arg(long)]
    pub page: Option<PathBuf>,
}
