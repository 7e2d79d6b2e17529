//! Screen-space label layer
//!
//! Labels live outside the 3D scene graph. The layer is the container the
//! UI paints from; the measurement engine appends and removes labels and the
//! label projector writes their screen placement every frame.

use glam::{Vec2, Vec3};
use uuid::Uuid;

/// Identifier of a label in a [`LabelLayer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelId(Uuid);

impl LabelId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// A text label anchored to a world-space point
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLabel {
    /// Displayed text
    pub text: String,
    /// World-space point the label follows
    pub anchor: Vec3,
    /// Whether the label is currently shown
    pub visible: bool,
    /// Pixel position relative to the viewport's top-left corner.
    /// `None` until the first projection pass places it.
    pub screen_position: Option<Vec2>,
}

/// Ordered container of overlay labels
#[derive(Debug, Default)]
pub struct LabelLayer {
    labels: Vec<(LabelId, OverlayLabel)>,
}

impl LabelLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new label. It starts hidden and unplaced.
    pub fn append(&mut self, text: impl Into<String>, anchor: Vec3) -> LabelId {
        let id = LabelId::new();
        self.labels.push((
            id,
            OverlayLabel {
                text: text.into(),
                anchor,
                visible: false,
                screen_position: None,
            },
        ));
        id
    }

    /// Detach a label. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: LabelId) -> bool {
        let before = self.labels.len();
        self.labels.retain(|(label_id, _)| *label_id != id);
        self.labels.len() != before
    }

    pub fn get(&self, id: LabelId) -> Option<&OverlayLabel> {
        self.labels
            .iter()
            .find(|(label_id, _)| *label_id == id)
            .map(|(_, label)| label)
    }

    pub fn get_mut(&mut self, id: LabelId) -> Option<&mut OverlayLabel> {
        self.labels
            .iter_mut()
            .find(|(label_id, _)| *label_id == id)
            .map(|(_, label)| label)
    }

    /// Show a label at a pixel position
    pub fn show_at(&mut self, id: LabelId, position: Vec2) {
        if let Some(label) = self.get_mut(id) {
            label.visible = true;
            label.screen_position = Some(position);
        }
    }

    /// Hide a label, keeping its text and last position
    pub fn hide(&mut self, id: LabelId) {
        if let Some(label) = self.get_mut(id) {
            label.visible = false;
        }
    }

    pub fn contains(&self, id: LabelId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate labels in creation order
    pub fn iter(&self) -> impl Iterator<Item = (LabelId, &OverlayLabel)> {
        self.labels.iter().map(|(id, label)| (*id, label))
    }

    /// Iterate only the labels that should be painted this frame
    pub fn visible(&self) -> impl Iterator<Item = &OverlayLabel> {
        self.labels
            .iter()
            .map(|(_, label)| label)
            .filter(|label| label.visible && label.screen_position.is_some())
    }
}
