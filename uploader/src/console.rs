//! Terminal rendering for the CLI: progress bars and notification lines.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use pixdrop::{BatchSnapshot, JobStatus, Level, Notification, Notifier};

const BAR_TEMPLATE: &str = "{prefix:>28!} [{bar:32.magenta/blue}] {pos:>3}% {msg}";

/// One bar per file plus a headline.
#[derive(Clone)]
pub struct ProgressBoard {
    multi: MultiProgress,
    headline: ProgressBar,
    bars: Vec<ProgressBar>,
    visible: bool,
}

impl ProgressBoard {
    pub fn new(names: &[String], visible: bool) -> Self {
        let multi = if visible {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let headline = multi.add(ProgressBar::new_spinner());
        headline.set_style(
            ProgressStyle::with_template("{spinner:.magenta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bars = names
            .iter()
            .map(|name| {
                let bar = multi.add(ProgressBar::new(100));
                bar.set_style(style.clone());
                bar.set_prefix(name.clone());
                bar
            })
            .collect();

        Self {
            multi,
            headline,
            bars,
            visible,
        }
    }

    /// Notifier that prints above the bars without tearing them.
    pub fn notifier(&self) -> ConsoleNotifier {
        ConsoleNotifier {
            multi: self.visible.then(|| self.multi.clone()),
        }
    }

    pub fn render(&self, snapshot: &BatchSnapshot) {
        match snapshot.in_flight() {
            0 => self.headline.set_message(snapshot.headline()),
            n => self
                .headline
                .set_message(format!("{} ({} in flight)", snapshot.headline(), n)),
        }
        self.headline.tick();

        for (bar, job) in self.bars.iter().zip(&snapshot.jobs) {
            bar.set_position(u64::from(job.percent()));
            match job.status {
                JobStatus::Pending => bar.set_message("queued"),
                JobStatus::InFlight => bar.set_message("uploading"),
                JobStatus::Succeeded => bar.set_message("✔ Uploaded"),
                JobStatus::Failed => bar.set_message("✘ failed"),
            }
        }
    }

    pub fn finish(&self) {
        for bar in &self.bars {
            bar.abandon();
        }
        self.headline.finish();
    }
}

/// Prints notifications to stderr, through the progress board when visible.
pub struct ConsoleNotifier {
    multi: Option<MultiProgress>,
}

impl ConsoleNotifier {
    pub fn plain() -> Self {
        Self { multi: None }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let prefix = match notification.level {
            Level::Warning => "⚠️ ",
            Level::Error => "❌",
        };
        let line = format!("{} {}", prefix, notification.message);

        match &self.multi {
            Some(multi) => {
                if multi.println(&line).is_err() {
                    eprintln!("{}", line);
                }
            }
            None => eprintln!("{}", line),
        }
    }
}
