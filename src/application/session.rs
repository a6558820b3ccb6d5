//! The editor session: all mutable state behind the card editor.
//!
//! One session is owned by the CLI loop. Operations either succeed and update
//! the state, or fail and leave card, logo and history as they were. The
//! session keeps a single user-facing error message that each operation
//! overwrites or clears.

use fontdue::Font;

use super::editor::ImageEditor;
use super::export::{CardSnapshot, ExportComposer, RenderSettings};
use crate::domain::{
    AppConfig, AppError, Artifact, CardData, CardField, Direction, ExportFormat, ExportOptions,
    Logo, LogoHistory, Result,
};

/// Shown when the image editor fails for any reason.
pub const AI_EDIT_FAILED: &str = "Failed to generate image. Please try again.";

/// Proof that an AI edit was started; hand it back to
/// [`EditorSession::complete_ai_edit`].
#[derive(Debug)]
pub struct EditTicket {
    id: u64,
    logo: Logo,
    prompt: String,
}

impl EditTicket {
    /// The logo to send to the image editor.
    #[must_use]
    pub const fn logo(&self) -> &Logo {
        &self.logo
    }

    /// The trimmed edit instruction.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// State of one card editing session.
pub struct EditorSession {
    card: CardData,
    history: LogoHistory,
    options: ExportOptions,
    prompt: String,
    error: Option<String>,
    in_flight: Option<u64>,
    next_ticket: u64,
    max_logo_bytes: u64,
    composer: ExportComposer,
}

impl EditorSession {
    /// Start a session with the placeholder logo.
    #[must_use]
    pub fn new(card: CardData, options: ExportOptions, max_logo_bytes: u64, composer: ExportComposer) -> Self {
        Self {
            card,
            history: LogoHistory::default(),
            options,
            prompt: String::new(),
            error: None,
            in_flight: None,
            next_ticket: 0,
            max_logo_bytes,
            composer,
        }
    }

    /// Start a session with the sample card and configured defaults.
    #[must_use]
    pub fn from_config(config: &AppConfig, font: Option<Font>) -> Self {
        Self::new(
            CardData::sample(),
            config.export.options(),
            config.upload.max_logo_bytes,
            ExportComposer::new(RenderSettings::from(&config.export), font),
        )
    }

    #[must_use]
    pub const fn card(&self) -> &CardData {
        &self.card
    }

    #[must_use]
    pub fn logo(&self) -> &Logo {
        self.history.current()
    }

    #[must_use]
    pub const fn options(&self) -> ExportOptions {
        self.options
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The current user-facing error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of logos in the edit history.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether an AI edit is outstanding.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Replace one card field.
    ///
    /// # Errors
    /// Returns `InvalidField` if `name` is not a card field.
    pub fn update_field(&mut self, name: &str, value: &str) -> Result<()> {
        let field: CardField = name.parse()?;
        self.card = self.card.with_field(field, value);
        tracing::debug!(field = %field, "Updated card field");
        Ok(())
    }

    /// Replace the AI edit instruction.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_show_qr_code(&mut self, show: bool) {
        self.options.show_qr_code = show;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.options.direction = direction;
    }

    /// Make `bytes` the current logo and start a new history from it.
    ///
    /// # Errors
    /// Returns `LogoTooLarge` over the size limit and `InvalidImage` when the
    /// bytes are not a decodable image. State is unchanged on error.
    pub fn upload_logo(&mut self, bytes: &[u8]) -> Result<Logo> {
        let size = bytes.len() as u64;
        if size > self.max_logo_bytes {
            return Err(AppError::LogoTooLarge {
                size,
                limit: self.max_logo_bytes,
            });
        }

        let format = image::guess_format(bytes).map_err(|e| AppError::InvalidImage {
            message: e.to_string(),
        })?;
        image::load_from_memory_with_format(bytes, format).map_err(|e| AppError::InvalidImage {
            message: e.to_string(),
        })?;

        let logo = Logo::from_bytes(format.to_mime_type(), bytes);
        self.history.reset(logo.clone());
        tracing::info!(mime = format.to_mime_type(), size, "Uploaded logo");
        Ok(logo)
    }

    /// Check the AI edit preconditions and mark an edit as in flight.
    ///
    /// # Errors
    /// - `EmptyPrompt` when the prompt is blank; the current error is kept.
    /// - `EditInFlight` while another edit is outstanding.
    /// - `MissingLogo` when there is no uploaded logo; this also becomes the
    ///   current error.
    pub fn begin_ai_edit(&mut self) -> Result<EditTicket> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::EmptyPrompt);
        }
        if self.in_flight.is_some() {
            return Err(AppError::EditInFlight);
        }
        let logo = self.history.current();
        if !logo.is_inline() {
            self.error = Some(AppError::MissingLogo.to_string());
            return Err(AppError::MissingLogo);
        }

        let ticket = EditTicket {
            id: self.next_ticket,
            logo: logo.clone(),
            prompt: prompt.to_string(),
        };
        self.next_ticket += 1;
        self.in_flight = Some(ticket.id);
        self.error = None;

        tracing::debug!(ticket = ticket.id, "Started AI edit");
        Ok(ticket)
    }

    /// Apply the outcome of the edit started with `ticket`.
    ///
    /// # Errors
    /// - The editor's error, after recording the generic retry message.
    /// - `StaleEdit` when the current logo is no longer the one the edit
    ///   started from (an upload or undo happened meanwhile); the result is
    ///   dropped.
    /// - `InvalidInput` for a ticket that is not the outstanding one.
    pub fn complete_ai_edit(&mut self, ticket: EditTicket, outcome: Result<Logo>) -> Result<Logo> {
        if self.in_flight != Some(ticket.id) {
            return Err(AppError::invalid_input(format!(
                "edit #{} is not in progress",
                ticket.id
            )));
        }
        self.in_flight = None;

        match outcome {
            Ok(_) if self.history.current() != &ticket.logo => {
                tracing::warn!(ticket = ticket.id, "Logo changed during AI edit; discarding result");
                Err(AppError::StaleEdit)
            }
            Ok(logo) => {
                self.history.push(logo.clone());
                self.prompt.clear();
                self.error = None;
                tracing::info!(history = self.history.len(), "Applied AI edit");
                Ok(logo)
            }
            Err(e) => {
                tracing::error!(error = %e, "AI edit failed");
                self.error = Some(AI_EDIT_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Run one AI edit of the current logo with the current prompt.
    ///
    /// # Errors
    /// See [`Self::begin_ai_edit`] and [`Self::complete_ai_edit`].
    pub async fn request_ai_edit<E: ImageEditor>(&mut self, editor: &E) -> Result<Logo> {
        let ticket = self.begin_ai_edit()?;
        let outcome = editor.edit(ticket.logo(), ticket.prompt()).await;
        self.complete_ai_edit(ticket, outcome)
    }

    /// Step back to the previous logo. Returns the new current logo, or
    /// `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Logo> {
        let logo = self.history.undo().cloned();
        if logo.is_some() {
            tracing::debug!(history = self.history.len(), "Undid logo edit");
        }
        logo
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Export the current card.
    ///
    /// # Errors
    /// Returns the composer's error after recording the format-specific
    /// failure message.
    pub fn export(&mut self, format: ExportFormat) -> Result<Artifact> {
        let snapshot = CardSnapshot {
            card: &self.card,
            logo: self.history.current(),
            options: self.options,
        };

        match self.composer.compose(format, snapshot) {
            Ok(artifact) => {
                self.error = None;
                Ok(artifact)
            }
            Err(e) => {
                tracing::error!(format = %format, error = %e, "Export failed");
                self.error = Some(format.failure_message());
                Err(e)
            }
        }
    }
}
