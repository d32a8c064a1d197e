//! Drop Index Calculation
//!
//! Turns a pointer's vertical coordinate into an insertion index within a
//! column. Geometry is injected as plain boxes so this never touches the DOM.

use crate::domain::TaskId;

/// Vertical extent of a rendered task card, in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub top: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Insertion index for a pointer at `pointer_y` over `boxes` (top-to-bottom).
///
/// Returns the index of the first box whose midpoint is strictly below the
/// pointer, or `boxes.len()` when the pointer is past every midpoint.
pub fn drop_index(pointer_y: f64, boxes: &[BoundingBox]) -> usize {
    boxes
        .iter()
        .position(|b| b.midpoint() > pointer_y)
        .unwrap_or(boxes.len())
}

/// Boxes of the rendered cards, minus the card being dragged.
///
/// The dragged card still occupies space in its source column while the
/// gesture is live; leaving it in would shift every index after it by one.
pub fn visible_boxes(cards: &[(TaskId, BoundingBox)], dragged: Option<&TaskId>) -> Vec<BoundingBox> {
    cards
        .iter()
        .filter(|(id, _)| Some(id) != dragged)
        .map(|(_, b)| *b)
        .collect()
}
