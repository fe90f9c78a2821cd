use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use gitmerge::Progress;

pub struct ProgressContext {
    bar: ProgressBar,
    start: Instant,
}

impl ProgressContext {
    pub fn spinner(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            start: Instant::now(),
        }
    }

    pub fn fetching(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg}\n  {bar:40.cyan/blue} {pos}/{len} ({percent}%)")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━━─"),
        );
        bar.set_message("Fetching file contents...");
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            start: Instant::now(),
        }
    }

    pub fn update(&self, progress: Progress) {
        self.bar.set_length(progress.total as u64);
        self.bar.set_position(progress.completed as u64);
        self.bar.set_message(format!(
            "Processing {}/{}...",
            progress.completed, progress.total
        ));
    }

    pub fn finish(&self, summary: &str) {
        let elapsed = self.start.elapsed();
        self.bar.finish_with_message(format!(
            "{} {} in {:.1}s",
            style("Done").green(),
            summary,
            elapsed.as_secs_f64()
        ));
    }

    pub fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}
