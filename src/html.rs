use maud::{Markup, html};

use crate::content::{Degree, Education, Job, Project};

const BADGE_STYLE: &str = "border-color: var(--bs-primary); color: var(--bs-primary)";
const HIDE_ON_ERROR: &str = "this.style.display='none'";

fn text(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or("")
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

/// `parts` that are non-blank, joined with a middle dot.
fn meta_line(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .filter_map(|p| non_blank(p))
        .collect::<Vec<_>>()
        .join(" · ")
}

pub fn projects_list(projects: &[Project]) -> Markup {
    html! {
        div class="row gx-5 justify-content-center" {
            div class="col-lg-11 col-xl-9 col-xxl-8" {
                @for project in projects {
                    (project_card(project))
                }
            }
        }
    }
}

pub fn project_card(project: &Project) -> Markup {
    let title = text(&project.title);
    let alt = non_blank(&project.title).unwrap_or("Project image");
    let links = project.links.as_ref().filter(|l| !l.is_empty());

    html! {
        div class="card overflow-hidden shadow rounded-4 border-0 mb-5" {
            div class="card-body p-0" {
                div class="d-flex align-items-center" {
                    div class="p-5" {
                        h2 class="fw-bolder" { (title) }
                        p { (text(&project.summary)) }
                        @if !project.stack.is_empty() {
                            div class="mt-3" {
                                @for tag in &project.stack {
                                    span class="badge border me-2" style=(BADGE_STYLE) { (tag) }
                                }
                            }
                        }
                        @if let Some(links) = links {
                            div class="mt-3" {
                                @if let Some(href) = non_blank(&links.github) {
                                    a class="btn btn-sm btn-outline-dark me-2" href=(href) { "GitHub" }
                                }
                                @if let Some(href) = non_blank(&links.demo) {
                                    a class="btn btn-sm btn-outline-dark me-2" href=(href) { "Demo" }
                                }
                                @if let Some(href) = non_blank(&links.post) {
                                    a class="btn btn-sm btn-outline-dark" href=(href) { "Post" }
                                }
                            }
                        }
                    }
                    img class="img-fluid" alt=(alt) src=[non_blank(&project.cover_image)] onerror=(HIDE_ON_ERROR);
                }
            }
        }
    }
}

fn bullet_list(bullets: &[String]) -> Markup {
    html! {
        ul class="mb-0" {
            @for bullet in bullets {
                li { (bullet) }
            }
        }
    }
}

/// Card for the experience section of the resume page.
pub fn resume_job_card(job: &Job) -> Markup {
    html! {
        div class="card shadow border-0 rounded-4 mb-5" {
            div class="card-body p-5" {
                div class="row align-items-center gx-5" {
                    div class="col text-center text-lg-start mb-4 mb-lg-0" {
                        div class="bg-light p-4 rounded-4" {
                            div class="text-primary fw-bolder mb-2" { (text(&job.dates)) }
                            div class="small fw-bolder" { (text(&job.role)) }
                            div class="small text-muted" { (text(&job.company)) }
                            div class="small text-muted" { (text(&job.location)) }
                        }
                    }
                    div class="col-lg-8" {
                        (bullet_list(&job.bullets))
                    }
                }
            }
        }
    }
}

/// Jobs as rendered in the body of the work page.
pub fn work_list(jobs: &[Job]) -> Markup {
    html! {
        div class="container px-5 my-4" {
            @for job in jobs {
                @let title = format!("{} — {}", text(&job.role), text(&job.company));
                div class="card shadow border-0 rounded-4 mb-4" {
                    div class="card-body p-4" {
                        div class="fw-bolder" { (title.trim()) }
                        div class="small text-muted mb-2" { (meta_line(&[&job.dates, &job.location])) }
                        (bullet_list(&job.bullets))
                    }
                }
            }
        }
    }
}

/// Card for the education section of the resume page.
pub fn resume_degree_card(degree: &Degree) -> Markup {
    html! {
        div class="card shadow border-0 rounded-4 mb-5" {
            div class="card-body p-5" {
                div class="row align-items-center gx-5" {
                    div class="col text-center text-lg-start mb-4 mb-lg-0" {
                        div class="bg-light p-4 rounded-4" {
                            div class="text-secondary fw-bolder mb-2" { (text(&degree.dates)) }
                            div class="mb-2" {
                                div class="small fw-bolder" { (text(&degree.school)) }
                                div class="small text-muted" { (text(&degree.program)) }
                            }
                            div class="fst-italic" {
                                div class="small text-muted" { (text(&degree.program)) }
                                @if let Some(notes) = non_blank(&degree.notes) {
                                    div class="small text-muted" { (notes) }
                                }
                            }
                        }
                    }
                    div class="col-lg-8" {
                        div { (text(&degree.notes)) }
                    }
                }
            }
        }
    }
}

/// Degrees as rendered in the body of the education page.
pub fn degree_list(degrees: &[Degree]) -> Markup {
    html! {
        div class="container px-5 my-4" {
            @for degree in degrees {
                div class="card shadow border-0 rounded-4 mb-4" {
                    div class="card-body p-4" {
                        div class="fw-bolder" { (text(&degree.school)) }
                        div class="small text-muted mb-2" { (meta_line(&[&degree.program, &degree.dates])) }
                        @if let Some(notes) = non_blank(&degree.notes) {
                            div { (notes) }
                        }
                    }
                }
            }
        }
    }
}

/// Current/planned course columns, or `None` when there are no courses.
pub fn courses_row(education: &Education) -> Option<Markup> {
    let current = education.current_courses();
    let planned = education.planned_courses();
    if current.is_empty() && planned.is_empty() {
        return None;
    }
    Some(html! {
        div class="row g-4" {
            div class="col-md-6" {
                h3 class="fw-bolder" { "Current Courses" }
                (bullet_list(current))
            }
            div class="col-md-6" {
                h3 class="fw-bolder" { "Planned Courses" }
                (bullet_list(planned))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ProjectLinks;

    #[test]
    fn project_without_links_has_no_buttons() {
        let project = Project {
            title: Some("Binder".into()),
            stack: vec!["rust".into()],
            ..Default::default()
        };
        let out = project_card(&project).into_string();
        assert!(!out.contains("btn-outline-dark"));
        assert!(out.contains("badge border me-2"));
        assert!(out.contains(r#"alt="Binder""#));
        assert!(!out.contains("src="));
    }

    #[test]
    fn only_present_links_render() {
        let project = Project {
            links: Some(ProjectLinks {
                demo: Some("https://demo".into()),
                ..Default::default()
            }),
            cover_image: Some("img/cover.png".into()),
            ..Default::default()
        };
        let out = project_card(&project).into_string();
        assert!(out.contains(r#"href="https://demo""#));
        assert!(!out.contains("GitHub"));
        assert!(out.contains(r#"alt="Project image""#));
        assert!(out.contains(r#"src="img/cover.png""#));
    }

    #[test]
    fn work_meta_skips_blank_parts() {
        let job = Job {
            role: Some("Engineer".into()),
            company: Some("Acme".into()),
            location: Some("Remote".into()),
            ..Default::default()
        };
        let out = work_list(&[job]).into_string();
        assert!(out.contains("Engineer — Acme"));
        assert!(out.contains(">Remote<"));
        assert!(!out.contains(" · "));
    }

    #[test]
    fn no_courses_no_row() {
        assert!(courses_row(&Education::default()).is_none());
    }
}
