//! Lane partitioning

use std::fmt;

use shared::{Order, OrderStatus};

/// Board column. Orders whose status is outside the workflow go to
/// `Unrecognized` instead of vanishing from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    Status(OrderStatus),
    Unrecognized,
}

impl Lane {
    /// Every lane in display order
    pub const ALL: [Lane; 6] = [
        Lane::Status(OrderStatus::New),
        Lane::Status(OrderStatus::Confirmed),
        Lane::Status(OrderStatus::InProgress),
        Lane::Status(OrderStatus::Completed),
        Lane::Status(OrderStatus::Delivered),
        Lane::Unrecognized,
    ];

    pub fn of(order: &Order) -> Lane {
        order.lane().map_or(Lane::Unrecognized, Lane::Status)
    }

    /// Status an order takes when dropped here
    pub fn status(self) -> Option<OrderStatus> {
        match self {
            Lane::Status(status) => Some(status),
            Lane::Unrecognized => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lane::Status(status) => status.label(),
            Lane::Unrecognized => "Otros",
        }
    }
}

impl From<OrderStatus> for Lane {
    fn from(status: OrderStatus) -> Self {
        Lane::Status(status)
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One rendered column
#[derive(Debug, Clone, PartialEq)]
pub struct LaneView {
    pub lane: Lane,
    pub orders: Vec<Order>,
}

impl LaneView {
    pub fn count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Split orders into all six lanes, keeping the input order within a lane
pub fn partition<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<LaneView> {
    let mut views: Vec<LaneView> = Lane::ALL
        .iter()
        .map(|&lane| LaneView {
            lane,
            orders: Vec::new(),
        })
        .collect();

    for order in orders {
        let lane = Lane::of(order);
        if let Some(view) = views.iter_mut().find(|v| v.lane == lane) {
            view.orders.push(order.clone());
        }
    }

    views
}
