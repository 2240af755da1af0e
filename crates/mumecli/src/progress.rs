//! Terminal progress bars for long corpus passes.

use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;

/// One bar per label; a new label finishes the previous bar.
#[derive(Default)]
pub struct BarProgress {
    current: RefCell<Option<(String, ProgressBar)>>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(label: &str, total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{msg:>18.cyan} [{bar:40.green/dim}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");
        pb.set_style(style);
        pb.set_message(label.to_string());
        pb
    }

    pub fn finish(&self) {
        if let Some((_, pb)) = self.current.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl mume::Progress for BarProgress {
    fn progress(&self, label: &str, current: usize, total: usize) {
        let mut slot = self.current.borrow_mut();
        let stale = slot.as_ref().is_some_and(|(l, _)| l != label);
        if stale {
            if let Some((_, pb)) = slot.take() {
                pb.finish_and_clear();
            }
        }
        let (_, pb) = slot.get_or_insert_with(|| (label.to_string(), Self::bar(label, total)));
        pb.set_length(total as u64);
        pb.set_position(current as u64);
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
