//! Board search

use shared::Order;

/// Search box match.
///
/// Customer name is compared case-insensitively; phone and order id by plain
/// substring. An empty query matches everything.
pub fn matches(order: &Order, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();

    order.customer.name.to_lowercase().contains(&needle)
        || order.customer.phone.contains(query)
        || order.id.as_str().to_lowercase().contains(&needle)
}
