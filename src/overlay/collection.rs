//! Authoritative in-memory overlay collection and visible-id set.
//!
//! The collection mirrors the remote store; every mutating operation issues
//! its store call first and commits the local change only in the success
//! path, so a failed round trip leaves the collection exactly as the store
//! last confirmed it. Each commit happens under a single write lock, and the
//! lock is never held across a network await.
//!
//! Renderers observe the collection through snapshot accessors and through
//! the [`OverlayEvent`] broadcast feed; they never reach into its state.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::error::{Error, Result};

use super::store::OverlayStore;
use super::types::{self, NewOverlay, Overlay, OverlayPatch, Position};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Change notification emitted after each committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum OverlayEvent {
    /// The collection was replaced by a full fetch.
    CollectionLoaded { count: usize },
    /// A new overlay was created and made visible.
    OverlayAdded { overlay: Overlay },
    /// An overlay's fields were replaced.
    OverlayUpdated { overlay: Overlay },
    /// An overlay was deleted.
    OverlayRemoved { id: String },
    /// An overlay was shown or hidden.
    VisibilityChanged { id: String, visible: bool },
}

struct Inner {
    overlays: Vec<Overlay>,
    visible: HashSet<String>,
}

/// Owner of the overlay collection and the subset currently rendered.
pub struct OverlayCollection {
    store: Arc<dyn OverlayStore>,
    inner: RwLock<Inner>,
    event_tx: broadcast::Sender<OverlayEvent>,
}

impl OverlayCollection {
    pub fn new(store: Arc<dyn OverlayStore>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            store,
            inner: RwLock::new(Inner {
                overlays: Vec::new(),
                visible: HashSet::new(),
            }),
            event_tx,
        }
    }

    /// Subscribe to the change feed.
    pub fn subscribe(&self) -> broadcast::Receiver<OverlayEvent> {
        self.event_tx.subscribe()
    }

    fn broadcast(&self, event: OverlayEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("No subscribers for overlay event");
        }
    }

    /// Replace the collection with the store's full record set and reset the
    /// visible set to every fetched identifier. An empty store is fine and
    /// simply renders nothing.
    pub async fn load_all(&self) -> Result<Vec<Overlay>> {
        let fetched = self.store.list().await?;

        {
            let mut inner = self.inner.write();
            inner.visible = fetched.iter().map(|o| o.id.clone()).collect();
            inner.overlays = fetched.clone();
        }

        tracing::info!(count = fetched.len(), "Loaded overlay collection");
        self.broadcast(OverlayEvent::CollectionLoaded {
            count: fetched.len(),
        });
        Ok(fetched)
    }

    /// Create an overlay with default geometry and make it visible.
    ///
    /// Empty or whitespace-only text is rejected locally; no network call is
    /// made and the collection does not change.
    pub async fn add(&self, text: &str) -> Result<Overlay> {
        types::validate_text(text)?;

        let created = self.store.create(NewOverlay::new(text)).await?;

        {
            let mut inner = self.inner.write();
            inner.visible.insert(created.id.clone());
            inner.overlays.push(created.clone());
        }

        self.broadcast(OverlayEvent::OverlayAdded {
            overlay: created.clone(),
        });
        Ok(created)
    }

    /// Persist a drag gesture's final position, then apply it locally.
    ///
    /// The store receives the full record with only the position merged in.
    /// On failure the rendered position stays at whatever the store last
    /// confirmed, which may lag the gesture's visual end state.
    pub async fn move_to(&self, id: &str, position: Position) -> Result<Overlay> {
        let current = self.get(id).ok_or_else(|| Error::not_found(id))?;
        let moved = current.with_position(position);

        self.store.update(id, &moved).await?;

        self.commit_update(moved.clone());
        tracing::debug!(id = %id, x = position.x, y = position.y, "Moved overlay");
        Ok(moved)
    }

    /// Replace an overlay's editable fields from a saved draft.
    pub async fn modify(&self, id: &str, patch: OverlayPatch) -> Result<Overlay> {
        types::validate_text(&patch.text)?;
        if !patch.size.is_positive() {
            return Err(Error::InvalidSize);
        }

        let current = self.get(id).ok_or_else(|| Error::not_found(id))?;
        let updated = current.with_patch(&patch);

        self.store.update(id, &updated).await?;

        self.commit_update(updated.clone());
        tracing::info!(id = %id, "Modified overlay");
        Ok(updated)
    }

    /// Delete an overlay from the store, the collection, and the visible set.
    ///
    /// Deleting an identifier that is currently hidden still removes the
    /// record; the visible set is untouched in that case. Confirmation is the
    /// interaction layer's responsibility, not this component's.
    pub async fn remove(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;

        {
            let mut inner = self.inner.write();
            inner.overlays.retain(|o| o.id != id);
            inner.visible.remove(id);
        }

        tracing::info!(id = %id, "Removed overlay");
        self.broadcast(OverlayEvent::OverlayRemoved { id: id.to_string() });
        Ok(())
    }

    /// Show or hide an overlay. Pure local state, no network call, and
    /// symmetric: toggling twice restores the original membership.
    ///
    /// Returns the new visibility. Identifiers not present in the collection
    /// are ignored so the visible set stays a subset of the collection.
    pub fn toggle_visible(&self, id: &str) -> bool {
        let visible = {
            let mut inner = self.inner.write();
            if !inner.overlays.iter().any(|o| o.id == id) {
                tracing::debug!(id = %id, "Ignored visibility toggle for unknown overlay");
                return false;
            }
            if inner.visible.remove(id) {
                false
            } else {
                inner.visible.insert(id.to_string());
                true
            }
        };

        self.broadcast(OverlayEvent::VisibilityChanged {
            id: id.to_string(),
            visible,
        });
        visible
    }

    /// Snapshot of the full collection in insertion order.
    pub fn overlays(&self) -> Vec<Overlay> {
        self.inner.read().overlays.clone()
    }

    /// Get a single overlay by identifier.
    pub fn get(&self, id: &str) -> Option<Overlay> {
        self.inner
            .read()
            .overlays
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    /// Snapshot of the currently visible identifiers.
    pub fn visible_ids(&self) -> HashSet<String> {
        self.inner.read().visible.clone()
    }

    /// Overlays currently rendered, in insertion order.
    pub fn visible_overlays(&self) -> Vec<Overlay> {
        let inner = self.inner.read();
        inner
            .overlays
            .iter()
            .filter(|o| inner.visible.contains(&o.id))
            .cloned()
            .collect()
    }

    /// Check whether an overlay is currently rendered.
    pub fn is_visible(&self, id: &str) -> bool {
        self.inner.read().visible.contains(id)
    }

    /// Number of overlays in the collection.
    pub fn len(&self) -> usize {
        self.inner.read().overlays.len()
    }

    /// Check whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().overlays.is_empty()
    }

    /// Replace the stored record matching `updated.id`, if still present.
    ///
    /// A record deleted while the update round trip was in flight stays
    /// deleted; the stale result is dropped.
    fn commit_update(&self, updated: Overlay) {
        let committed = {
            let mut inner = self.inner.write();
            match inner.overlays.iter_mut().find(|o| o.id == updated.id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        };

        if committed {
            self.broadcast(OverlayEvent::OverlayUpdated { overlay: updated });
        } else {
            tracing::debug!(id = %updated.id, "Dropped update for overlay deleted mid-flight");
        }
    }
}
