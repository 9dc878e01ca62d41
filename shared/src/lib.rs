//! Shared types for the Studio Ayni back-office
//!
//! Wire models spoken by the REST backend (orders, catalog products, auth
//! DTOs and error bodies), shared by every client surface.

pub mod client;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use models::{
    Customer, LineItem, Order, OrderId, OrderPayload, OrderStatus, PaymentStatus, Product,
    ProductColor, StatusUpdate, StatusValue, compute_line_total,
};
