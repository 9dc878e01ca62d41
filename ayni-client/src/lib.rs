//! Ayni Client - back-office client for the Studio Ayni shop
//!
//! Talks to the shop's REST backend and keeps the order board state:
//! status lanes, drag-and-drop moves, the order form, the delivery agenda and
//! dashboard figures.

pub mod agenda;
pub mod api;
pub mod board;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod session;
pub mod stats;

pub use api::{OrderApi, RestOrderApi};
pub use board::{Lane, LaneView, LineItemEdit, Notice, NoticeKind, OrderBoard, OrderForm};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::NetworkHttpClient;
pub use session::Session;

// Re-export shared types for convenience
pub use shared::{
    Customer, Decimal, LineItem, Order, OrderId, OrderPayload, OrderStatus, PaymentStatus,
    Product, StatusValue, compute_line_total,
};
