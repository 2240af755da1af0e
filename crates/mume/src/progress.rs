/// Sink for "step i of n" notifications during long passes.
pub trait Progress {
    fn progress(&self, label: &str, current: usize, total: usize);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn progress(&self, _label: &str, _current: usize, _total: usize) {}
}
