/// Aggregated view of attempt progress, useful for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub current: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of questions answered, 0 to 100.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.answered as f64 / self.total as f64;
        ratio * 100.0
    }
}
