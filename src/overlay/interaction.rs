//! Gesture handling and the modal edit draft.
//!
//! Translates discrete user gestures (drag-stop, form submit, checkbox
//! toggle, delete confirmation) into collection operations. Deletes are
//! two-phase: a request stages the identifier and only an explicit
//! confirmation performs the removal. Edits go through a [`ModalDraft`], a
//! full working copy that never touches the live collection until saved.

use std::sync::Arc;

use crate::error::{Error, Result};

use super::collection::OverlayCollection;
use super::types::{Overlay, OverlayPatch, Position, Size};

/// Working copy of one overlay's editable fields.
///
/// Created when the modify flow opens, discarded on cancel, converted into a
/// store update on save. At most one draft exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalDraft {
    overlay_id: String,
    pub text: String,
    pub position: Position,
    pub size: Size,
}

impl ModalDraft {
    /// Identifier of the overlay being edited.
    pub fn overlay_id(&self) -> &str {
        &self.overlay_id
    }
}

/// Drives user gestures into the collection manager.
pub struct InteractionController {
    collection: Arc<OverlayCollection>,
    draft: Option<ModalDraft>,
    pending_delete: Option<String>,
    settings_open: bool,
    add_input: String,
}

impl InteractionController {
    pub fn new(collection: Arc<OverlayCollection>) -> Self {
        Self {
            collection,
            draft: None,
            pending_delete: None,
            settings_open: false,
            add_input: String::new(),
        }
    }

    /// The collection this controller drives.
    pub fn collection(&self) -> &Arc<OverlayCollection> {
        &self.collection
    }

    // ------------------------------------------------------------------
    // Settings surface and creation form
    // ------------------------------------------------------------------

    pub fn open_settings(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    /// Replace the creation form's text buffer.
    pub fn set_add_input<S: Into<String>>(&mut self, text: S) {
        self.add_input = text.into();
    }

    pub fn add_input(&self) -> &str {
        &self.add_input
    }

    /// Submit the creation form.
    ///
    /// On success the input buffer is cleared and the settings surface
    /// closes; on failure both are preserved so the user can retry.
    pub async fn submit_add(&mut self) -> Result<Overlay> {
        let created = self.collection.add(&self.add_input).await?;
        self.add_input.clear();
        self.settings_open = false;
        Ok(created)
    }

    // ------------------------------------------------------------------
    // Direct gestures
    // ------------------------------------------------------------------

    /// A drag gesture settled at `position`.
    ///
    /// Coordinates arrive already clamped to the container bounds by the
    /// drag mechanism and are not re-validated here.
    pub async fn drag_stop(&self, id: &str, position: Position) -> Result<Overlay> {
        self.collection.move_to(id, position).await
    }

    /// Visibility checkbox toggled. Returns the new visibility.
    pub fn toggle_visibility(&self, id: &str) -> bool {
        self.collection.toggle_visible(id)
    }

    // ------------------------------------------------------------------
    // Two-phase delete
    // ------------------------------------------------------------------

    /// Stage an overlay for deletion, pending explicit confirmation.
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    /// Identifier currently staged for deletion, if any.
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Perform the staged deletion.
    ///
    /// The stage is cleared only when the store confirms; a failed delete
    /// leaves it in place for retry.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let id = self.pending_delete.clone().ok_or(Error::NoPendingDelete)?;
        self.collection.remove(&id).await?;
        self.pending_delete = None;
        Ok(())
    }

    /// Drop the staged deletion without a network call.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    // ------------------------------------------------------------------
    // Modal draft lifecycle
    // ------------------------------------------------------------------

    /// Open a modify draft for `id`, copying its current fields.
    ///
    /// Only one draft may be open at a time; an open draft must be saved or
    /// cancelled first.
    pub fn open_draft(&mut self, id: &str) -> Result<&ModalDraft> {
        if let Some(existing) = &self.draft {
            return Err(Error::DraftOpen(existing.overlay_id.clone()));
        }

        let overlay = self.collection.get(id).ok_or_else(|| Error::not_found(id))?;
        Ok(self.draft.insert(ModalDraft {
            overlay_id: overlay.id,
            text: overlay.text,
            position: overlay.position,
            size: overlay.size,
        }))
    }

    /// The open draft, if any.
    pub fn draft(&self) -> Option<&ModalDraft> {
        self.draft.as_ref()
    }

    /// Edit the draft's text. Mutates only the draft.
    pub fn set_draft_text<S: Into<String>>(&mut self, text: S) -> Result<()> {
        let draft = self.draft.as_mut().ok_or(Error::NoDraft)?;
        draft.text = text.into();
        Ok(())
    }

    /// Edit the draft's position. Mutates only the draft.
    pub fn set_draft_position(&mut self, position: Position) -> Result<()> {
        let draft = self.draft.as_mut().ok_or(Error::NoDraft)?;
        draft.position = position;
        Ok(())
    }

    /// Edit the draft's size. Mutates only the draft.
    pub fn set_draft_size(&mut self, size: Size) -> Result<()> {
        let draft = self.draft.as_mut().ok_or(Error::NoDraft)?;
        draft.size = size;
        Ok(())
    }

    /// Commit the draft to the store and collection.
    ///
    /// The draft is discarded only after confirmed success; on any failure
    /// (validation included) it stays open with its edits intact.
    pub async fn save_draft(&mut self) -> Result<Overlay> {
        let draft = self.draft.as_ref().ok_or(Error::NoDraft)?;
        let patch = OverlayPatch {
            text: draft.text.clone(),
            position: draft.position,
            size: draft.size,
        };

        let updated = self.collection.modify(&draft.overlay_id, patch).await?;
        self.draft = None;
        Ok(updated)
    }

    /// Discard the draft unconditionally, no network call.
    pub fn cancel_draft(&mut self) {
        self.draft = None;
    }
}
