//! Drag-and-drop gesture state

use shared::{OrderId, OrderStatus};

use super::Lane;

/// Card drag gesture. Only one card can be in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(OrderId),
}

impl DragState {
    /// Card picked up; replaces any gesture still in flight
    pub fn start(&mut self, id: OrderId) {
        *self = DragState::Dragging(id);
    }

    /// Gesture ended without a drop
    pub fn end(&mut self) {
        *self = DragState::Idle;
    }

    /// Card dropped on `lane`. Always returns to `Idle`; yields the move to
    /// perform when a card was being dragged onto a workflow lane.
    pub fn drop_on(&mut self, lane: Lane) -> Option<(OrderId, OrderStatus)> {
        match std::mem::take(self) {
            DragState::Dragging(id) => lane.status().map(|status| (id, status)),
            DragState::Idle => None,
        }
    }

    pub fn dragging(&self) -> Option<&OrderId> {
        match self {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }
}
