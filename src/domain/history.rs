//! Logo edit history.

use super::logo::Logo;

/// Never-empty stack of logo states. The last entry is the current logo.
///
/// Uploading starts a new baseline; only edits pushed on top of it can be
/// undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoHistory {
    entries: Vec<Logo>,
}

impl LogoHistory {
    /// Start a history seeded with one logo.
    #[must_use]
    pub fn new(initial: Logo) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    /// The current logo.
    #[must_use]
    pub fn current(&self) -> &Logo {
        // `entries` is never empty: every mutation keeps at least one element.
        &self.entries[self.entries.len() - 1]
    }

    /// Discard everything and start over from `logo`.
    pub fn reset(&mut self, logo: Logo) {
        self.entries.clear();
        self.entries.push(logo);
    }

    /// Record an edited logo on top of the current one.
    pub fn push(&mut self, logo: Logo) {
        self.entries.push(logo);
    }

    /// Revert one step. Returns the new current logo, or `None` when only
    /// the baseline is left.
    pub fn undo(&mut self) -> Option<&Logo> {
        if self.entries.len() <= 1 {
            return None;
        }
        self.entries.pop();
        Some(self.current())
    }

    /// Whether `undo` would change anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.entries.len() > 1
    }

    /// Number of stored states, baseline included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LogoHistory {
    fn default() -> Self {
        Self::new(Logo::placeholder())
    }
}
