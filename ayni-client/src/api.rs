//! Order API - the board's view of the backend
//!
//! The board only talks to the backend through [`OrderApi`], so it can be
//! driven by the REST implementation or by an in-memory double in tests.

use async_trait::async_trait;
use shared::{Order, OrderId, OrderPayload, OrderStatus, Product, StatusUpdate};

use crate::{ClientError, ClientResult, NetworkHttpClient};

const ORDERS_PATH: &str = "pedidos";
const PRODUCTS_PATH: &str = "productos";

/// Backend operations used by the order board
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Full order list
    async fn list_orders(&self) -> ClientResult<Vec<Order>>;

    async fn create_order(&self, payload: &OrderPayload) -> ClientResult<()>;

    /// Full-field update
    async fn update_order(&self, id: &OrderId, payload: &OrderPayload) -> ClientResult<()>;

    /// Single-field status transition
    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> ClientResult<()>;

    async fn delete_order(&self, id: &OrderId) -> ClientResult<()>;

    /// Public product catalog
    async fn list_products(&self) -> ClientResult<Vec<Product>>;
}

/// [`OrderApi`] over the REST backend
#[derive(Debug, Clone)]
pub struct RestOrderApi {
    http: NetworkHttpClient,
}

impl RestOrderApi {
    pub fn new(http: NetworkHttpClient) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &NetworkHttpClient {
        &self.http
    }

    fn order_path(id: &OrderId) -> String {
        format!("{}/{}", ORDERS_PATH, id)
    }
}

/// Decode a JSON array element by element.
///
/// A body that is not an array is an error; individual records that fail to
/// decode are skipped with a warning so one bad row cannot blank the board.
fn decode_list<T: serde::de::DeserializeOwned>(
    value: serde_json::Value,
    what: &str,
) -> ClientResult<Vec<T>> {
    let serde_json::Value::Array(items) = value else {
        return Err(ClientError::InvalidResponse(format!(
            "expected an array of {what}"
        )));
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Skipping malformed {}: {}", what, e);
                None
            }
        })
        .collect())
}

#[async_trait]
impl OrderApi for RestOrderApi {
    async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        let value: serde_json::Value = self.http.get(ORDERS_PATH).await?;
        decode_list(value, "orders")
    }

    async fn create_order(&self, payload: &OrderPayload) -> ClientResult<()> {
        self.http.post(ORDERS_PATH, payload).await
    }

    async fn update_order(&self, id: &OrderId, payload: &OrderPayload) -> ClientResult<()> {
        self.http.put(&Self::order_path(id), payload).await
    }

    async fn update_status(&self, id: &OrderId, status: OrderStatus) -> ClientResult<()> {
        self.http
            .put(&Self::order_path(id), &StatusUpdate { status })
            .await
    }

    async fn delete_order(&self, id: &OrderId) -> ClientResult<()> {
        self.http.delete(&Self::order_path(id)).await
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        let value: serde_json::Value = self.http.get_public(PRODUCTS_PATH).await?;
        decode_list(value, "products")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_rejects_non_array() {
        let result = decode_list::<Order>(json!({ "error": "oops" }), "orders");
        assert!(matches!(result, Err(ClientError::InvalidResponse(_))));
    }

    #[test]
    fn test_decode_list_skips_bad_records() {
        let orders = decode_list::<Order>(
            json!([
                { "id": 1, "estado": "pedido" },
                { "estado": "pedido" },
                { "id": 2, "estado": "entregado" }
            ]),
            "orders",
        )
        .unwrap();
        let ids: Vec<_> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_order_path() {
        assert_eq!(RestOrderApi::order_path(&OrderId::from(12)), "pedidos/12");
    }
}
