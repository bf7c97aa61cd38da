use std::path::{Path, PathBuf};

use httpmock::Method::GET;
use httpmock::MockServer;
use portfolio_binder::{
    BindArgs, Cli, Command, HideReason, Outcome, Page, ProgressMode, Section, ThemeAction, ThemeArgs,
};
use tempfile::tempdir;
use url::Url;

const INDEX: &str = r##"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Personal - Start Bootstrap Theme</title></head>
<body>
  <nav class="navbar"><a class="navbar-brand" href="index.html">Start Bootstrap</a></nav>
  <header class="py-5">
    <div class="fs-3 fw-light text-muted">I can help your business to</div>
    <h1 class="display-3 fw-bolder"><span class="text-gradient d-inline">Get online and grow fast</span></h1>
    <a class="btn btn-primary" data-slot="cta-resume" href="#">Resume</a>
    <a class="btn btn-outline-dark" data-slot="cta-projects" href="#">Projects</a>
  </header>
</body>
</html>"##;

const PROJECTS: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Projects</title></head>
<body>
  <nav class="navbar"><a class="navbar-brand" href="index.html">Start Bootstrap</a></nav>
  <section class="py-5">
    <div class="container px-5 mb-5"><div class="card">template card</div></div>
  </section>
</body>
</html>"#;

const RESUME: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Resume</title></head>
<body>
  <main>
    <section><h2 class="text-primary fw-bolder mb-0">Experience</h2><div class="card">old job</div></section>
    <section><h2 class="text-secondary fw-bolder mb-0">Education</h2><div class="card">old degree</div></section>
  </main>
</body>
</html>"#;

const CONTACT: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><title>Contact</title></head>
<body>
  <form id="contactFormSimple">
    <input id="contactEmail" type="email">
    <textarea id="contactMessage"></textarea>
    <button type="submit">Send</button>
  </form>
  <a id="contactGmail" href="">Gmail</a>
</body>
</html>"#;

const CONTENT: &str = r#"{
  "site": {
    "name": "Ada Lovelace",
    "hero_headline": "Notes on the Analytical Engine",
    "cta_resume_href": "cv.html",
    "seo": {
      "default_description": "Portfolio of Ada Lovelace",
      "pages": { "projects.html": "Things I built" }
    }
  },
  "projects": [
    { "title": "Engine", "summary": "Bernoulli numbers", "stack": ["rust"] },
    { "title": "Loom", "links": { "github": "https://github.com/ada/loom", "demo": "" }, "cover_image": "img/loom.png" }
  ],
  "work": [
    { "role": "Analyst", "company": "Babbage & Co", "location": "London", "dates": "1842 - 1843", "bullets": ["Wrote note G"] }
  ],
  "education": {
    "degrees": [ { "school": "Home", "program": "Mathematics", "dates": "1830s" } ],
    "courses": { "current": ["Calculus"] }
  }
}"#;

fn write_site(dir: &Path, pages: &[(&str, &str)]) {
    for (name, html) in pages {
        std::fs::write(dir.join(name), html).unwrap();
    }
}

fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn args(site: PathBuf, out: PathBuf, content_url: Option<Url>) -> BindArgs {
    BindArgs {
        site,
        content_url,
        out,
        slots: None,
        pages: vec![],
        strict: false,
        runtime_scripts: false,
        recipient: "ada@example.com".to_string(),
        user_agent: "test-agent".to_string(),
        progress: ProgressMode::Never,
    }
}

fn report_for<'a>(
    reports: &'a [portfolio_binder::BindReport],
    page: Page,
) -> &'a portfolio_binder::BindReport {
    reports.iter().find(|r| r.page == page).unwrap()
}

#[tokio::test]
async fn binds_site_from_remote_content() {
    let server = MockServer::start();
    let content = server.mock(|when, then| {
        when.method(GET)
            .path("/data/content.json")
            .query_param_exists("v");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(CONTENT);
    });

    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    std::fs::create_dir_all(&site).unwrap();
    write_site(
        &site,
        &[("index.html", INDEX), ("projects.html", PROJECTS), ("resume.html", RESUME)],
    );
    let out = tmp.path().join("dist");

    let base = Url::parse(&server.url("/")).unwrap();
    let reports = portfolio_binder::bind_site(&args(site, out.clone(), Some(base)))
        .await
        .unwrap();
    content.assert();
    assert_eq!(reports.len(), 3);

    let index = read_to_string(&out.join("index.html"));
    assert!(index.contains("<title>Ada Lovelace</title>"));
    assert!(index.contains("Notes on the Analytical Engine"));
    assert!(index.contains("I can help your business to"));
    assert!(index.contains(r#"href="cv.html""#));
    assert!(index.contains(r#"href="projects.html""#));
    assert!(index.contains(r#"content="Portfolio of Ada Lovelace""#));

    let projects = read_to_string(&out.join("projects.html"));
    assert!(projects.contains("<title>Projects</title>"));
    assert!(projects.contains(r#"content="Things I built""#));
    assert!(!projects.contains("template card"));
    assert!(projects.contains("Bernoulli numbers"));
    assert!(projects.contains(r#"href="https://github.com/ada/loom""#));
    assert!(!projects.contains(">Demo<"));
    assert_eq!(projects.matches("btn btn-sm").count(), 1);
    assert_eq!(
        report_for(&reports, Page::Projects).outcome(Section::Projects),
        Some(&Outcome::Rendered)
    );

    let resume = read_to_string(&out.join("resume.html"));
    assert!(!resume.contains("old job"));
    assert!(!resume.contains("old degree"));
    assert!(resume.contains("Babbage &amp; Co"));
    assert!(resume.contains("Wrote note G"));
    assert!(resume.contains("Mathematics"));
    let resume_report = report_for(&reports, Page::Resume);
    assert_eq!(resume_report.outcome(Section::Work), Some(&Outcome::Rendered));
    assert_eq!(resume_report.outcome(Section::Education), Some(&Outcome::Rendered));
    assert_eq!(resume_report.failed().count(), 0);
}

#[tokio::test]
async fn failed_fetch_hides_list_sections_only() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data/content.json");
        then.status(404);
    });

    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    std::fs::create_dir_all(&site).unwrap();
    write_site(
        &site,
        &[("index.html", INDEX), ("projects.html", PROJECTS), ("resume.html", RESUME)],
    );
    let out = tmp.path().join("dist");

    let base = Url::parse(&server.url("/")).unwrap();
    let reports = portfolio_binder::bind_site(&args(site, out.clone(), Some(base)))
        .await
        .unwrap();

    let index = read_to_string(&out.join("index.html"));
    assert!(index.contains("Get online and grow fast"));
    assert!(!index.contains("display: none"));

    let projects = read_to_string(&out.join("projects.html"));
    assert!(projects.contains(r#"style="display: none""#));
    assert_eq!(
        report_for(&reports, Page::Projects).outcome(Section::Projects),
        Some(&Outcome::Hidden(HideReason::FetchFailed))
    );

    let resume = read_to_string(&out.join("resume.html"));
    assert_eq!(resume.matches("display: none").count(), 2);
    assert!(resume.contains("old job"));
}

#[tokio::test]
async fn local_content_with_runtime_scripts() {
    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    std::fs::create_dir_all(site.join("data")).unwrap();
    std::fs::write(site.join("data/content.json"), r#"{ "site": { "name": "Ada" }, "projects": [] }"#)
        .unwrap();
    write_site(
        &site,
        &[("projects.html", PROJECTS), ("contact.html", CONTACT)],
    );
    let out = tmp.path().join("dist");

    let mut args = args(site, out.clone(), None);
    args.runtime_scripts = true;
    let reports = portfolio_binder::bind_site(&args).await.unwrap();

    assert_eq!(
        report_for(&reports, Page::Projects).outcome(Section::Projects),
        Some(&Outcome::Hidden(HideReason::EmptyList))
    );
    let projects = read_to_string(&out.join("projects.html"));
    assert!(projects.contains(r#"id="theme-toggle""#));
    assert!(projects.contains(r#"data-theme-bound="true""#));
    assert!(projects.contains(r#"data-runtime="theme""#));
    assert!(!projects.contains(r#"data-runtime="contact""#));
    assert!(projects.contains(">Ada</a>"));

    let contact = read_to_string(&out.join("contact.html"));
    assert!(contact.contains(r#"action="mailto:ada%40example.com""#));
    assert!(contact.contains(r#"data-runtime="contact""#));
    assert!(contact.contains("https://mail.google.com/mail/?view=cm&amp;fs=1&amp;tf=1&amp;to=ada%40example.com"));
    assert_eq!(contact.matches(r#"id="theme-toggle""#).count(), 1);
}

#[tokio::test]
async fn stamped_theme_button_still_gets_runtime_script() {
    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    std::fs::create_dir_all(site.join("data")).unwrap();
    std::fs::write(site.join("data/content.json"), r#"{ "site": { "name": "Ada" } }"#).unwrap();
    write_site(&site, &[("index.html", INDEX)]);

    portfolio_binder::run(Cli {
        command: Command::Theme(ThemeArgs {
            store: tmp.path().join("prefs.json"),
            system_dark: false,
            page: Some(site.join("index.html")),
            action: ThemeAction::Show,
        }),
        verbose: false,
    })
    .await
    .unwrap();
    assert!(read_to_string(&site.join("index.html")).contains(r#"data-theme-bound="true""#));

    let out = tmp.path().join("dist");
    let mut args = args(site, out.clone(), None);
    args.runtime_scripts = true;
    portfolio_binder::bind_site(&args).await.unwrap();

    let index = read_to_string(&out.join("index.html"));
    assert_eq!(index.matches(r#"id="theme-toggle""#).count(), 1);
    assert_eq!(index.matches(r#"data-runtime="theme""#).count(), 1);
}

#[tokio::test]
async fn strict_mode_rejects_positional_buttons() {
    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    std::fs::create_dir_all(&site).unwrap();
    let positional = INDEX
        .replace(r#" data-slot="cta-resume""#, "")
        .replace(r#" data-slot="cta-projects""#, "");
    write_site(&site, &[("index.html", positional.as_str())]);

    let mut args = args(site, tmp.path().join("dist"), None);
    args.strict = true;
    let err = portfolio_binder::bind_site(&args).await.unwrap_err();
    assert!(format!("{err:#}").contains("cta-resume"));
}

#[tokio::test]
async fn refuses_to_overwrite_templates() {
    let tmp = tempdir().unwrap();
    write_site(tmp.path(), &[("index.html", INDEX)]);

    let args = args(tmp.path().to_path_buf(), tmp.path().to_path_buf(), None);
    assert!(portfolio_binder::bind_site(&args).await.is_err());
    assert_eq!(read_to_string(&tmp.path().join("index.html")), INDEX);
}
