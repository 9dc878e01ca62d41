//! Board statistics for the dashboard

use std::collections::HashMap;

use shared::{Decimal, Order};

use crate::board::Lane;

/// Products listed in the dashboard ranking
pub const TOP_PRODUCTS: usize = 3;

/// Units sold of one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTally {
    pub name: String,
    pub quantity: u64,
}

/// Aggregates over the cached order list
#[derive(Debug, Clone, PartialEq)]
pub struct BoardStats {
    pub total_sales: Decimal,
    pub total_orders: usize,
    /// Every lane in display order, including empty ones
    pub lane_counts: Vec<(Lane, usize)>,
    pub top_products: Vec<ProductTally>,
}

impl BoardStats {
    pub fn compute(orders: &[Order]) -> Self {
        let lane_counts = Lane::ALL
            .iter()
            .map(|&lane| (lane, orders.iter().filter(|o| Lane::of(o) == lane).count()))
            .collect();

        Self {
            total_sales: orders.iter().map(|o| o.total).sum(),
            total_orders: orders.len(),
            lane_counts,
            top_products: top_products(orders, TOP_PRODUCTS),
        }
    }

    pub fn count(&self, lane: impl Into<Lane>) -> usize {
        let lane = lane.into();
        self.lane_counts
            .iter()
            .find(|(l, _)| *l == lane)
            .map_or(0, |(_, n)| *n)
    }
}

/// Best sellers by units, ties broken alphabetically
fn top_products(orders: &[Order], limit: usize) -> Vec<ProductTally> {
    let mut units: HashMap<&str, u64> = HashMap::new();
    for item in orders.iter().flat_map(|o| &o.line_items) {
        let name = match item.product_name.trim() {
            "" => "Sin nombre",
            name => name,
        };
        *units.entry(name).or_default() += u64::from(item.quantity);
    }

    let mut tallies: Vec<ProductTally> = units
        .into_iter()
        .map(|(name, quantity)| ProductTally {
            name: name.to_string(),
            quantity,
        })
        .collect();
    tallies.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.name.cmp(&b.name)));
    tallies.truncate(limit);
    tallies
}
