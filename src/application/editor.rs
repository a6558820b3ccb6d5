//! Seam between the editor session and the generative image service.

use std::future::Future;

use crate::domain::{Logo, Result};

/// Produces an edited logo from the current one and a text instruction.
pub trait ImageEditor {
    /// Apply `prompt` to `image`.
    ///
    /// Implementations receive only inline logos and must return an inline
    /// logo on success.
    fn edit(&self, image: &Logo, prompt: &str) -> impl Future<Output = Result<Logo>> + Send;
}
