//! Order board - orders partitioned into status lanes
//!
//! The backend is the source of truth. The board keeps a session-scoped copy
//! of the order list, reloads it after every successful mutation and never
//! shows a status the backend has not accepted.
//!
//! All methods take `&self`; state sits behind a `tokio::sync::RwLock` that is
//! never held across a backend call, so gestures on different cards (or the
//! same card twice) can be in flight at the same time.

mod drag;
mod filter;
mod form;
mod lanes;
mod notice;

pub use drag::DragState;
pub use filter::matches;
pub use form::{FormTarget, LineItemDraft, LineItemEdit, OrderForm};
pub use lanes::{Lane, LaneView, partition};
pub use notice::{Notice, NoticeKind};

use std::sync::Arc;
use std::time::Duration;

use shared::{LineItem, Order, OrderId, OrderStatus, Product};
use tokio::sync::RwLock;

use crate::agenda::DeliveryAgenda;
use crate::api::{OrderApi, RestOrderApi};
use crate::stats::BoardStats;
use crate::{ClientConfig, ClientError, ClientResult, Session};

#[derive(Debug, Default)]
struct BoardState {
    orders: Vec<Order>,
    catalog: Vec<Product>,
    search: String,
    drag: DragState,
    detail: Option<OrderForm>,
    notice: Option<Notice>,
}

impl BoardState {
    fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    fn find_mut(&mut self, id: &OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|o| &o.id == id)
    }

    fn visible(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| matches(o, &self.search))
    }
}

/// Back-office order board
pub struct OrderBoard<A: OrderApi = RestOrderApi> {
    api: A,
    session: Arc<Session>,
    notice_ttl: Duration,
    state: RwLock<BoardState>,
}

impl OrderBoard<RestOrderApi> {
    /// Board over the REST backend described by `config`
    pub fn connect(config: &ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        let http = config.build_http_client(session.clone())?;
        Ok(Self::new(RestOrderApi::new(http), session).with_notice_ttl(config.notice_ttl()))
    }
}

impl<A: OrderApi> OrderBoard<A> {
    pub fn new(api: A, session: Arc<Session>) -> Self {
        Self {
            api,
            session,
            notice_ttl: Duration::from_secs(3),
            state: RwLock::new(BoardState::default()),
        }
    }

    pub fn with_notice_ttl(mut self, ttl: Duration) -> Self {
        self.notice_ttl = ttl;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The host should show the login screen
    pub async fn requires_login(&self) -> bool {
        !self.session.is_authenticated().await
    }

    // ========================================================================
    // Notices
    // ========================================================================

    async fn notify_success(&self, message: impl Into<String>) {
        self.state.write().await.notice = Some(Notice::success(message, self.notice_ttl));
    }

    /// Record a failed operation: banner, log, and drop the session on 401
    async fn fail(&self, error: &ClientError, fallback: &str) {
        tracing::warn!(error = %error, "{}", fallback);
        if error.is_unauthorized() {
            self.session.clear().await;
        }
        self.state.write().await.notice =
            Some(Notice::error(error.user_message(fallback), self.notice_ttl));
    }

    /// Current banner, if one is still showing
    pub async fn notice(&self) -> Option<Notice> {
        self.state
            .read()
            .await
            .notice
            .clone()
            .filter(Notice::is_active)
    }

    pub async fn dismiss_notice(&self) {
        self.state.write().await.notice = None;
    }

    // ========================================================================
    // Loading and views
    // ========================================================================

    /// Replace the cached order list with the backend's
    pub async fn load_orders(&self) -> ClientResult<()> {
        let orders = match self.api.list_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                self.fail(&e, "Error al cargar pedidos").await;
                return Err(e);
            }
        };

        for order in orders.iter().filter(|o| o.lane().is_none()) {
            tracing::warn!(
                order_id = %order.id,
                status = %order.status,
                "Order has an unrecognized status"
            );
        }
        tracing::info!(count = orders.len(), "Orders loaded");

        self.state.write().await.orders = orders;
        Ok(())
    }

    /// Every cached order, ignoring the search box
    pub async fn orders(&self) -> Vec<Order> {
        self.state.read().await.orders.clone()
    }

    pub async fn order(&self, id: &OrderId) -> Option<Order> {
        self.state.read().await.find(id).cloned()
    }

    pub async fn set_search(&self, query: impl Into<String>) {
        self.state.write().await.search = query.into();
    }

    pub async fn search(&self) -> String {
        self.state.read().await.search.clone()
    }

    /// Orders matching the search box
    pub async fn visible_orders(&self) -> Vec<Order> {
        self.state.read().await.visible().cloned().collect()
    }

    /// Lanes with the orders matching the search box
    pub async fn lanes(&self) -> Vec<LaneView> {
        partition(self.state.read().await.visible())
    }

    /// Cards in `lane` matching the search box
    pub async fn lane_count(&self, lane: impl Into<Lane>) -> usize {
        let lane = lane.into();
        self.state
            .read()
            .await
            .visible()
            .filter(|o| Lane::of(o) == lane)
            .count()
    }

    /// Dashboard figures over all cached orders
    pub async fn stats(&self) -> BoardStats {
        BoardStats::compute(&self.state.read().await.orders)
    }

    /// Delivery calendar over all cached orders
    pub async fn agenda(&self) -> DeliveryAgenda {
        DeliveryAgenda::new(self.state.read().await.orders.iter().cloned())
    }

    // ========================================================================
    // Status transitions
    // ========================================================================

    /// Move an order to `status`.
    ///
    /// Returns `Ok(false)` when the order is already there. The cached status
    /// only changes after the backend accepted the update; the list is then
    /// reloaded.
    pub async fn move_order(&self, id: &OrderId, status: OrderStatus) -> ClientResult<bool> {
        let current = self
            .order(id)
            .await
            .map(|o| o.status)
            .ok_or_else(|| ClientError::NotFound(format!("order {id}")))?;

        if current == status {
            tracing::debug!(order_id = %id, %status, "Order already in lane");
            return Ok(false);
        }

        if let Err(e) = self.api.update_status(id, status).await {
            self.fail(&e, "Error al actualizar estado").await;
            return Err(e);
        }

        {
            let mut state = self.state.write().await;
            if let Some(order) = state.find_mut(id) {
                order.status = status.into();
            }
        }
        tracing::info!(order_id = %id, from = %current, to = %status, "Order moved");
        self.notify_success(format!("✅ Estado actualizado a {}", status.label()))
            .await;

        if let Err(e) = self.load_orders().await {
            tracing::warn!(order_id = %id, "Reload after move failed: {}", e);
        }
        Ok(true)
    }

    /// Move one lane forward; no-op at `Delivered` or for unrecognized statuses
    pub async fn quick_advance(&self, id: &OrderId) -> ClientResult<bool> {
        match self.neighbour(id, OrderStatus::next).await? {
            Some(status) => self.move_order(id, status).await,
            None => Ok(false),
        }
    }

    /// Move one lane back; no-op at `New` or for unrecognized statuses
    pub async fn quick_retreat(&self, id: &OrderId) -> ClientResult<bool> {
        match self.neighbour(id, OrderStatus::previous).await? {
            Some(status) => self.move_order(id, status).await,
            None => Ok(false),
        }
    }

    async fn neighbour(
        &self,
        id: &OrderId,
        step: fn(OrderStatus) -> Option<OrderStatus>,
    ) -> ClientResult<Option<OrderStatus>> {
        let order = self
            .order(id)
            .await
            .ok_or_else(|| ClientError::NotFound(format!("order {id}")))?;
        Ok(order.lane().and_then(step))
    }

    // ========================================================================
    // Drag and drop
    // ========================================================================

    pub async fn drag_start(&self, id: OrderId) {
        self.state.write().await.drag.start(id);
    }

    /// Drag ended outside any lane
    pub async fn drag_end(&self) {
        self.state.write().await.drag.end();
    }

    pub async fn dragging(&self) -> Option<OrderId> {
        self.state.read().await.drag.dragging().cloned()
    }

    /// Card dropped on `lane`; moves it when a card was being dragged
    pub async fn drop_on(&self, lane: Lane) -> ClientResult<bool> {
        let action = self.state.write().await.drag.drop_on(lane);
        match action {
            Some((id, status)) => self.move_order(&id, status).await,
            None => Ok(false),
        }
    }

    // ========================================================================
    // Detail modal
    // ========================================================================

    /// Open the modal on a copy of the order's fields
    pub async fn open_detail(&self, id: &OrderId) -> ClientResult<()> {
        let mut state = self.state.write().await;
        let form = state
            .find(id)
            .map(OrderForm::from_order)
            .ok_or_else(|| ClientError::NotFound(format!("order {id}")))?;
        state.detail = Some(form);
        Ok(())
    }

    /// Open the modal on an empty form
    pub async fn open_create(&self) {
        self.state.write().await.detail = Some(OrderForm::new_order());
    }

    /// Close the modal, discarding staged edits
    pub async fn close_detail(&self) {
        self.state.write().await.detail = None;
    }

    /// Snapshot of the staged form
    pub async fn detail(&self) -> Option<OrderForm> {
        self.state.read().await.detail.clone()
    }

    /// Apply edits to the staged form; `None` if no modal is open
    pub async fn edit_detail<R>(&self, edit: impl FnOnce(&mut OrderForm) -> R) -> Option<R> {
        self.state.write().await.detail.as_mut().map(edit)
    }

    /// Save the staged form
    pub async fn save_detail(&self) -> ClientResult<()> {
        let form = self
            .detail()
            .await
            .ok_or_else(|| ClientError::Validation("No hay un pedido abierto".into()))?;
        self.save_order(&form).await
    }

    /// Create or update an order from `form`.
    ///
    /// On success the modal closes and the list is reloaded; on failure the
    /// modal stays open with its edits.
    pub async fn save_order(&self, form: &OrderForm) -> ClientResult<()> {
        let form = match form.validated() {
            Ok(form) => form,
            Err(e) => {
                self.fail(&e, "Error al guardar pedido").await;
                return Err(e);
            }
        };

        if form.total_overridden() {
            tracing::warn!(
                order_id = ?form.order_id(),
                total = %form.total,
                line_total = %form.computed_total(),
                "Saving an order whose total differs from its lines"
            );
        }

        let payload = form.to_payload();
        let result = match &form.target {
            FormTarget::Edit(id) => self.api.update_order(id, &payload).await,
            FormTarget::Create => self.api.create_order(&payload).await,
        };
        if let Err(e) = result {
            self.fail(&e, "Error al guardar pedido").await;
            return Err(e);
        }

        let message = match &form.target {
            FormTarget::Edit(id) => {
                tracing::info!(order_id = %id, "Order updated");
                "✅ Pedido actualizado"
            }
            FormTarget::Create => {
                tracing::info!(customer = %payload.customer.name, "Order created");
                "✅ Pedido creado"
            }
        };
        self.state.write().await.detail = None;
        self.notify_success(message).await;

        if let Err(e) = self.load_orders().await {
            tracing::warn!("Reload after save failed: {}", e);
        }
        Ok(())
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Delete an order after `confirm` approves it.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub async fn delete_order(
        &self,
        id: &OrderId,
        confirm: impl FnOnce(&Order) -> bool,
    ) -> ClientResult<bool> {
        let order = self
            .order(id)
            .await
            .ok_or_else(|| ClientError::NotFound(format!("order {id}")))?;
        if !confirm(&order) {
            return Ok(false);
        }

        if let Err(e) = self.api.delete_order(id).await {
            self.fail(&e, "Error al eliminar pedido").await;
            return Err(e);
        }

        {
            let mut state = self.state.write().await;
            state.orders.retain(|o| &o.id != id);
            if state.detail.as_ref().and_then(OrderForm::order_id) == Some(id) {
                state.detail = None;
            }
        }
        tracing::info!(order_id = %id, "Order deleted");
        self.notify_success("✅ Pedido eliminado").await;
        Ok(true)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch the public catalog for the "add from inventory" picker
    pub async fn load_catalog(&self) -> ClientResult<Vec<Product>> {
        match self.api.list_products().await {
            Ok(products) => {
                self.state.write().await.catalog = products.clone();
                Ok(products)
            }
            Err(e) => {
                self.fail(&e, "Error al cargar productos").await;
                Err(e)
            }
        }
    }

    pub async fn catalog(&self) -> Vec<Product> {
        self.state.read().await.catalog.clone()
    }

    /// Append a catalog product to the staged form as a single-unit line
    pub async fn add_from_catalog(&self, product_id: &str, color: Option<&str>) -> ClientResult<()> {
        let mut state = self.state.write().await;
        let line = state
            .catalog
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| LineItem::from_product(p, color))
            .ok_or_else(|| ClientError::NotFound(format!("product {product_id}")))?;
        let form = state
            .detail
            .as_mut()
            .ok_or_else(|| ClientError::Validation("No hay un pedido abierto".into()))?;
        form.push_line_item(&line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use shared::{Decimal, OrderPayload};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Mutex;

    /// In-memory backend double
    #[derive(Default)]
    struct FakeApi {
        orders: Mutex<Vec<Order>>,
        products: Vec<Product>,
        created: Mutex<Vec<OrderPayload>>,
        next_id: Mutex<i64>,
        fail_writes: AtomicBool,
        reject_token: AtomicBool,
    }

    impl FakeApi {
        fn with_orders(orders: Vec<Order>) -> Self {
            Self {
                orders: Mutex::new(orders),
                next_id: Mutex::new(100),
                ..Default::default()
            }
        }

        fn check_write(&self) -> ClientResult<()> {
            if self.reject_token.load(Ordering::SeqCst) {
                return Err(ClientError::Unauthorized);
            }
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ClientError::Api {
                    status: 500,
                    message: Some("Base de datos no disponible".into()),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl OrderApi for FakeApi {
        async fn list_orders(&self) -> ClientResult<Vec<Order>> {
            if self.reject_token.load(Ordering::SeqCst) {
                return Err(ClientError::Unauthorized);
            }
            Ok(self.orders.lock().await.clone())
        }

        async fn create_order(&self, payload: &OrderPayload) -> ClientResult<()> {
            self.check_write()?;
            let mut next_id = self.next_id.lock().await;
            *next_id += 1;
            let mut value = serde_json::to_value(payload)?;
            value["id"] = json!(*next_id);
            self.orders.lock().await.push(serde_json::from_value(value)?);
            self.created.lock().await.push(payload.clone());
            Ok(())
        }

        async fn update_order(&self, id: &OrderId, payload: &OrderPayload) -> ClientResult<()> {
            self.check_write()?;
            let mut value = serde_json::to_value(payload)?;
            value["id"] = json!(id.as_str());
            let updated: Order = serde_json::from_value(value)?;
            let mut orders = self.orders.lock().await;
            let slot = orders
                .iter_mut()
                .find(|o| &o.id == id)
                .ok_or_else(|| ClientError::Api { status: 404, message: None })?;
            *slot = updated;
            Ok(())
        }

        async fn update_status(&self, id: &OrderId, status: OrderStatus) -> ClientResult<()> {
            self.check_write()?;
            let mut orders = self.orders.lock().await;
            let order = orders
                .iter_mut()
                .find(|o| &o.id == id)
                .ok_or_else(|| ClientError::Api { status: 404, message: None })?;
            order.status = status.into();
            Ok(())
        }

        async fn delete_order(&self, id: &OrderId) -> ClientResult<()> {
            self.check_write()?;
            self.orders.lock().await.retain(|o| &o.id != id);
            Ok(())
        }

        async fn list_products(&self) -> ClientResult<Vec<Product>> {
            Ok(self.products.clone())
        }
    }

    fn order(id: i64, name: &str, estado: &str) -> Order {
        serde_json::from_value(json!({
            "id": id,
            "cliente": { "nombre": name, "whatsapp": format!("700{id}") },
            "productos": [{ "nombre": "Maceta", "cantidad": 1, "precio": 20 }],
            "total": 20,
            "estado": estado
        }))
        .unwrap()
    }

    async fn board_with(orders: Vec<Order>) -> OrderBoard<FakeApi> {
        let board = OrderBoard::new(
            FakeApi::with_orders(orders),
            Arc::new(Session::with_token("tok")),
        );
        board.load_orders().await.unwrap();
        board
    }

    fn sample() -> Vec<Order> {
        vec![
            order(1, "Ana Pérez", "pedido"),
            order(2, "Luis Rojas", "pedido"),
            order(3, "Carla Vaca", "pedido"),
            order(4, "Diego Soria", "confirmado"),
        ]
    }

    #[tokio::test]
    async fn test_move_updates_lane_counts() {
        let board = board_with(sample()).await;

        let moved = board
            .move_order(&OrderId::from(1), OrderStatus::Confirmed)
            .await
            .unwrap();

        assert!(moved);
        assert_eq!(board.lane_count(OrderStatus::New).await, 2);
        assert_eq!(board.lane_count(OrderStatus::Confirmed).await, 2);
        let notice = board.notice().await.unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert!(notice.message.contains("Confirmados"));
    }

    #[tokio::test]
    async fn test_move_to_same_lane_is_noop() {
        let board = board_with(sample()).await;
        let moved = board
            .move_order(&OrderId::from(4), OrderStatus::Confirmed)
            .await
            .unwrap();
        assert!(!moved);
        assert!(board.notice().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_move_leaves_status_unchanged() {
        let board = board_with(sample()).await;
        board.api().fail_writes.store(true, Ordering::SeqCst);

        let result = board
            .move_order(&OrderId::from(2), OrderStatus::InProgress)
            .await;

        assert!(matches!(result, Err(ClientError::Api { status: 500, .. })));
        let order = board.order(&OrderId::from(2)).await.unwrap();
        assert_eq!(order.status, OrderStatus::New);
        let notice = board.notice().await.unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.message, "Base de datos no disponible");
    }

    #[tokio::test]
    async fn test_move_unknown_order() {
        let board = board_with(sample()).await;
        let result = board.move_order(&OrderId::from(99), OrderStatus::New).await;
        assert!(matches!(result, Err(ClientError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_quick_actions_respect_boundaries() {
        let board = board_with(vec![order(1, "Ana", "pedido"), order(2, "Luis", "entregado")]).await;

        assert!(!board.quick_retreat(&OrderId::from(1)).await.unwrap());
        assert!(!board.quick_advance(&OrderId::from(2)).await.unwrap());

        assert!(board.quick_advance(&OrderId::from(1)).await.unwrap());
        assert_eq!(
            board.order(&OrderId::from(1)).await.unwrap().status,
            OrderStatus::Confirmed
        );
        assert!(board.quick_retreat(&OrderId::from(2)).await.unwrap());
        assert_eq!(
            board.order(&OrderId::from(2)).await.unwrap().status,
            OrderStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_unrecognized_status_gets_its_own_lane() {
        let board = board_with(vec![order(1, "Ana", "pedido"), order(2, "Luis", "cancelado")]).await;

        assert_eq!(board.lane_count(Lane::Unrecognized).await, 1);
        assert!(!board.quick_advance(&OrderId::from(2)).await.unwrap());

        // Dragging it into a real lane repairs it
        board.drag_start(OrderId::from(2)).await;
        assert!(board.drop_on(Lane::Status(OrderStatus::New)).await.unwrap());
        assert_eq!(board.lane_count(Lane::Unrecognized).await, 0);
        assert_eq!(board.lane_count(OrderStatus::New).await, 2);
    }

    #[tokio::test]
    async fn test_drag_and_drop() {
        let board = board_with(sample()).await;

        board.drag_start(OrderId::from(3)).await;
        assert_eq!(board.dragging().await, Some(OrderId::from(3)));
        assert!(board.drop_on(Lane::Status(OrderStatus::Completed)).await.unwrap());
        assert_eq!(board.dragging().await, None);
        assert_eq!(board.lane_count(OrderStatus::Completed).await, 1);

        board.drag_start(OrderId::from(1)).await;
        board.drag_end().await;
        assert!(!board.drop_on(Lane::Status(OrderStatus::Delivered)).await.unwrap());
        assert_eq!(board.lane_count(OrderStatus::Delivered).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_moves_end_in_a_requested_state() {
        let board = board_with(sample()).await;
        let id = OrderId::from(1);

        let (a, b) = tokio::join!(
            board.move_order(&id, OrderStatus::Confirmed),
            board.move_order(&id, OrderStatus::Completed),
        );
        assert!(a.is_ok() && b.is_ok());

        let status = board.order(&id).await.unwrap().status;
        assert!(status == OrderStatus::Confirmed || status == OrderStatus::Completed);
    }

    #[tokio::test]
    async fn test_search_filters_lanes() {
        let board = board_with(sample()).await;
        board.set_search("ana").await;

        let visible = board.visible_orders().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].customer.name, "Ana Pérez");
        assert_eq!(board.lane_count(OrderStatus::New).await, 1);
        assert_eq!(board.lanes().await[1].count(), 0);

        board.set_search("").await;
        assert_eq!(board.visible_orders().await.len(), 4);
    }

    #[tokio::test]
    async fn test_create_order_from_form() {
        let board = board_with(sample()).await;
        board.open_create().await;
        board
            .edit_detail(|form| {
                form.customer_name = "Eva Luna".into();
                form.customer_phone = "76543210".into();
                form.push_line_item(&LineItem::new("Llavero", 2, Decimal::from(15)));
                form.push_line_item(&LineItem::new("Organizador", 1, Decimal::from(30)));
            })
            .await
            .unwrap();

        assert_eq!(board.detail().await.unwrap().total, Decimal::from(60));
        board.save_detail().await.unwrap();

        assert!(board.detail().await.is_none());
        let orders = board.orders().await;
        assert_eq!(orders.len(), 5);
        let created = orders.iter().find(|o| o.customer.name == "Eva Luna").unwrap();
        assert_eq!(created.total, Decimal::from(60));
        assert_eq!(created.status, OrderStatus::New);
        assert_eq!(board.notice().await.unwrap().message, "✅ Pedido creado");
    }

    #[tokio::test]
    async fn test_invalid_form_keeps_modal_open() {
        let board = board_with(sample()).await;
        board.open_create().await;
        board
            .edit_detail(|form| form.customer_name = "Eva".into())
            .await;

        let result = board.save_detail().await;
        assert!(matches!(result, Err(ClientError::Validation(_))));
        assert!(board.detail().await.is_some());
        assert!(board.api().created.lock().await.is_empty());
        assert!(board.notice().await.unwrap().is_error());
    }

    #[tokio::test]
    async fn test_edit_existing_order() {
        let board = board_with(sample()).await;
        let id = OrderId::from(4);
        board.open_detail(&id).await.unwrap();
        board
            .edit_detail(|form| {
                form.urgent = true;
                form.notes = "Entregar en tienda".into();
                form.update_line_item(0, LineItemEdit::Quantity(3));
            })
            .await;

        // Nothing is sent until save
        assert!(!board.order(&id).await.unwrap().urgent);

        board.save_detail().await.unwrap();
        let order = board.order(&id).await.unwrap();
        assert!(order.urgent);
        assert_eq!(order.notes.as_deref(), Some("Entregar en tienda"));
        assert_eq!(order.total, Decimal::from(60));
        assert_eq!(order.status, OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_close_detail_discards_edits() {
        let board = board_with(sample()).await;
        board.open_detail(&OrderId::from(1)).await.unwrap();
        board.edit_detail(|form| form.customer_name = "Otro".into()).await;
        board.close_detail().await;

        assert!(board.detail().await.is_none());
        assert!(board.edit_detail(|_| ()).await.is_none());
        assert_eq!(
            board.order(&OrderId::from(1)).await.unwrap().customer.name,
            "Ana Pérez"
        );
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let board = board_with(sample()).await;
        let id = OrderId::from(2);

        assert!(!board.delete_order(&id, |_| false).await.unwrap());
        assert!(board.order(&id).await.is_some());

        board.open_detail(&id).await.unwrap();
        let deleted = board
            .delete_order(&id, |order| order.customer.name == "Luis Rojas")
            .await
            .unwrap();
        assert!(deleted);
        assert!(board.order(&id).await.is_none());
        assert!(board.detail().await.is_none());

        board.load_orders().await.unwrap();
        assert!(board.order(&id).await.is_none());
        assert_eq!(board.orders().await.len(), 3);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session() {
        let board = board_with(sample()).await;
        assert!(!board.requires_login().await);

        board.api().reject_token.store(true, Ordering::SeqCst);
        let result = board.load_orders().await;

        assert!(matches!(result, Err(ClientError::Unauthorized)));
        assert!(board.requires_login().await);
        // Stale list stays visible
        assert_eq!(board.orders().await.len(), 4);
        assert_eq!(board.notice().await.unwrap().message, "Error al cargar pedidos");
    }

    #[tokio::test]
    async fn test_add_from_catalog() {
        let product: Product = serde_json::from_value(json!({
            "id": 8, "nombre": "Aretes luna", "precio": 25, "colores": [{ "nombre": "Dorado" }]
        }))
        .unwrap();
        let api = FakeApi {
            products: vec![product],
            ..FakeApi::with_orders(Vec::new())
        };
        let board = OrderBoard::new(api, Arc::new(Session::with_token("tok")));

        assert_eq!(board.load_catalog().await.unwrap().len(), 1);
        assert!(matches!(
            board.add_from_catalog("8", None).await,
            Err(ClientError::Validation(_))
        ));

        board.open_create().await;
        board.add_from_catalog("8", None).await.unwrap();
        let form = board.detail().await.unwrap();
        assert_eq!(form.line_items[0].product_name, "Aretes luna");
        assert_eq!(form.line_items[0].color, "Dorado");
        assert_eq!(form.total, Decimal::from(25));

        assert!(matches!(
            board.add_from_catalog("missing", None).await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_ttl() {
        let board = board_with(sample())
            .await
            .with_notice_ttl(Duration::from_millis(500));
        board
            .move_order(&OrderId::from(1), OrderStatus::Confirmed)
            .await
            .unwrap();
        assert!(board.notice().await.is_some());

        tokio::time::advance(Duration::from_millis(600)).await;
        assert!(board.notice().await.is_none());
    }
}
