use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use indicatif::{HumanDuration, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Stage spinner plus a per-page bar on stderr. Counters are kept even when
/// the UI is disabled so the final summary can be logged.
pub struct Progress {
    enabled: bool,
    start: Instant,

    mp: Option<MultiProgress>,
    stage: ProgressBar,
    pages: ProgressBar,

    pages_total: AtomicU64,
    pages_done: AtomicU64,
    sections_failed: AtomicU64,
}

impl Progress {
    pub fn new(enabled: bool) -> Arc<Self> {
        let start = Instant::now();

        if !enabled {
            return Arc::new(Self {
                enabled: false,
                start,
                mp: None,
                stage: ProgressBar::hidden(),
                pages: ProgressBar::hidden(),
                pages_total: AtomicU64::new(0),
                pages_done: AtomicU64::new(0),
                sections_failed: AtomicU64::new(0),
            });
        }

        let mp = MultiProgress::with_draw_target(ProgressDrawTarget::stderr());

        let stage = mp.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}  [{elapsed_precise}]") {
            stage.set_style(style);
        }
        stage.enable_steady_tick(Duration::from_millis(80));
        stage.set_message("starting");

        let pages = mp.add(ProgressBar::new(0));
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}") {
            pages.set_style(style.progress_chars("##-"));
        }
        pages.set_message("pages");

        Arc::new(Self {
            enabled: true,
            start,
            mp: Some(mp),
            stage,
            pages,
            pages_total: AtomicU64::new(0),
            pages_done: AtomicU64::new(0),
            sections_failed: AtomicU64::new(0),
        })
    }

    pub fn set_stage(&self, msg: impl Into<String>) {
        if !self.enabled {
            return;
        }
        self.stage.set_message(msg.into());
    }

    pub fn set_pages_total(&self, total: usize) {
        self.pages_total.store(total as u64, Ordering::Relaxed);
        if self.enabled {
            self.pages.set_length(total as u64);
        }
    }

    pub fn page_done(&self, filename: &str, failed_sections: usize) {
        self.pages_done.fetch_add(1, Ordering::Relaxed);
        self.sections_failed
            .fetch_add(failed_sections as u64, Ordering::Relaxed);
        if self.enabled {
            self.pages.inc(1);
            self.pages.set_message(filename.to_string());
        }
    }

    pub fn finish(&self) {
        let done = self.pages_done.load(Ordering::Relaxed);
        let total = self.pages_total.load(Ordering::Relaxed);
        let failed = self.sections_failed.load(Ordering::Relaxed);
        tracing::info!(
            pages = done,
            total,
            failed_sections = failed,
            elapsed_ms = self.start.elapsed().as_millis() as u64,
            "bind finished"
        );

        if !self.enabled {
            return;
        }
        self.stage.finish_with_message("done");
        self.pages.finish_and_clear();
        if let Some(mp) = &self.mp {
            let _ = mp.println(format!(
                "Bound {done}/{total} pages in {}",
                HumanDuration(self.start.elapsed())
            ));
        }
    }
}
