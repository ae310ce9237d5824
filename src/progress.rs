use indicatif::{ProgressBar, ProgressStyle};

static PROGRESS_BAR_FORMAT: &str = "{spinner:.green}▕{wide_bar:.cyan}▏{percent}% {pos}/{len} ({eta})";
static PROGRESS_BAR_CHARS: &str = "█▉▊▋▌▍▎▏  ";

/// Notified once per account after it is fully resolved.
pub trait Progress {
    fn advance(&self, completed: u64, total: u64);

    fn finish(&self) {}
}

impl Progress for ProgressBar {
    fn advance(&self, completed: u64, total: u64) {
        self.set_length(total);
        self.set_position(completed);
    }

    fn finish(&self) {
        self.finish_and_clear();
    }
}

pub fn bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_FORMAT) {
        pb.set_style(style.progress_chars(PROGRESS_BAR_CHARS));
    }

    pb
}
