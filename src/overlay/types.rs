//! Data model for overlay annotations and their wire payloads.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Position assigned to an overlay created without explicit geometry.
pub const DEFAULT_POSITION: Position = Position { x: 100, y: 100 };

/// Size assigned to an overlay created without explicit geometry.
pub const DEFAULT_SIZE: Size = Size {
    width: 200,
    height: 50,
};

/// Pixel offset from the top-left corner of the video container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Pixel dimensions of an overlay. Both dimensions must stay positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// Returns `true` when both dimensions are non-zero.
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A persisted text annotation rendered over the video.
///
/// `id` is assigned by the remote store on creation and immutable
/// thereafter. The store historically serialized the identifier as `_id`,
/// which deserialization still accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlay {
    #[serde(alias = "_id")]
    pub id: String,
    pub text: String,
    pub position: Position,
    pub size: Size,
}

impl Overlay {
    /// Copy of this overlay with the position replaced.
    pub fn with_position(&self, position: Position) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Copy of this overlay with all editable fields replaced.
    pub fn with_patch(&self, patch: &OverlayPatch) -> Self {
        Self {
            id: self.id.clone(),
            text: patch.text.clone(),
            position: patch.position,
            size: patch.size,
        }
    }
}

/// Creation payload. Geometry left as `None` is filled with
/// [`DEFAULT_POSITION`] and [`DEFAULT_SIZE`] by the store client.
#[derive(Debug, Clone, Serialize)]
pub struct NewOverlay {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl NewOverlay {
    /// Creation payload with default geometry.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            position: None,
            size: None,
        }
    }
}

/// Full set of editable fields, as produced by a saved modify draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayPatch {
    pub text: String,
    pub position: Position,
    pub size: Size,
}

/// Reject empty or whitespace-only overlay text.
///
/// Shared by the create and modify paths; runs before any network call.
pub(crate) fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::EmptyText);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store_record() {
        let json = r#"{
            "_id": "64f1c2",
            "text": "Camera 1",
            "position": { "x": 10, "y": 20 },
            "size": { "width": 200, "height": 50 }
        }"#;

        let overlay: Overlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.id, "64f1c2");
        assert_eq!(overlay.text, "Camera 1");
        assert_eq!(overlay.position, Position { x: 10, y: 20 });
        assert_eq!(
            overlay.size,
            Size {
                width: 200,
                height: 50
            }
        );
    }

    #[test]
    fn test_deserialize_plain_id_field() {
        let json = r#"{"id":"o1","text":"t","position":{"x":0,"y":0},"size":{"width":1,"height":1}}"#;
        let overlay: Overlay = serde_json::from_str(json).unwrap();
        assert_eq!(overlay.id, "o1");
    }

    #[test]
    fn test_new_overlay_omits_missing_geometry() {
        let payload = serde_json::to_value(NewOverlay::new("hello")).unwrap();
        assert_eq!(payload["text"], "hello");
        assert!(payload.get("position").is_none());
        assert!(payload.get("size").is_none());
    }

    #[test]
    fn test_with_position_keeps_other_fields() {
        let overlay = Overlay {
            id: "o1".to_string(),
            text: "t".to_string(),
            position: Position { x: 1, y: 2 },
            size: DEFAULT_SIZE,
        };
        let moved = overlay.with_position(Position { x: 30, y: 40 });
        assert_eq!(moved.id, "o1");
        assert_eq!(moved.text, "t");
        assert_eq!(moved.position, Position { x: 30, y: 40 });
        assert_eq!(moved.size, DEFAULT_SIZE);
    }

    #[test]
    fn test_validate_text() {
        assert!(validate_text("hello").is_ok());
        assert!(matches!(validate_text(""), Err(Error::EmptyText)));
        assert!(matches!(validate_text("   "), Err(Error::EmptyText)));
        assert!(matches!(validate_text("\t\n"), Err(Error::EmptyText)));
    }

    #[test]
    fn test_size_is_positive() {
        assert!(DEFAULT_SIZE.is_positive());
        assert!(!Size {
            width: 0,
            height: 50
        }
        .is_positive());
        assert!(!Size {
            width: 200,
            height: 0
        }
        .is_positive());
    }
}
