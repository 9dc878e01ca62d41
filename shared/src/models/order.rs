//! Order Model
//!
//! The backend stores orders with Spanish field names and has accumulated a
//! few shapes over time (nested vs. flat customer, storefront cart items vs.
//! admin line items). Everything is normalised here so the rest of the code
//! only sees one `Order`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::product::{Product, ProductColor};
use crate::util::{non_empty, null_as_default, parse_calendar_date, parse_timestamp, string_or_number};

// ============================================================================
// Identifiers
// ============================================================================

/// Backend-assigned order identifier (numeric ids are kept as text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(#[serde(deserialize_with = "string_or_number")] pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for OrderId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Status
// ============================================================================

/// Board lane an order sits in. Declaration order is the workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "pedido")]
    New,
    #[serde(rename = "confirmado")]
    Confirmed,
    #[serde(rename = "proceso", alias = "en_proceso")]
    InProgress,
    #[serde(rename = "realizado")]
    Completed,
    #[serde(rename = "entregado")]
    Delivered,
}

impl OrderStatus {
    /// All lanes, in workflow order
    pub const LANES: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Confirmed,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Delivered,
    ];

    /// Wire value sent to the backend
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "pedido",
            OrderStatus::Confirmed => "confirmado",
            OrderStatus::InProgress => "proceso",
            OrderStatus::Completed => "realizado",
            OrderStatus::Delivered => "entregado",
        }
    }

    /// Parse a wire value. `en_proceso` is an older spelling still found in
    /// some records.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.trim() {
            "pedido" => Some(OrderStatus::New),
            "confirmado" => Some(OrderStatus::Confirmed),
            "proceso" | "en_proceso" => Some(OrderStatus::InProgress),
            "realizado" => Some(OrderStatus::Completed),
            "entregado" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    /// Lane heading shown to staff
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::New => "Pedidos Nuevos",
            OrderStatus::Confirmed => "Confirmados",
            OrderStatus::InProgress => "En Proceso",
            OrderStatus::Completed => "Realizados",
            OrderStatus::Delivered => "Entregados",
        }
    }

    /// Zero-based position in the workflow
    pub fn position(self) -> usize {
        self as usize
    }

    /// Lane one step forward, `None` at `Delivered`
    pub fn next(self) -> Option<Self> {
        Self::LANES.get(self.position() + 1).copied()
    }

    /// Lane one step back, `None` at `New`
    pub fn previous(self) -> Option<Self> {
        self.position().checked_sub(1).map(|i| Self::LANES[i])
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status as stored on an order.
///
/// Values outside the lane set are kept verbatim so they survive a round
/// trip and can be shown in a catch-all lane instead of disappearing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusValue {
    Known(OrderStatus),
    Unrecognized(String),
}

impl StatusValue {
    pub fn from_wire(value: &str) -> Self {
        match OrderStatus::from_wire(value) {
            Some(status) => StatusValue::Known(status),
            None => StatusValue::Unrecognized(value.to_string()),
        }
    }

    pub fn known(&self) -> Option<OrderStatus> {
        match self {
            StatusValue::Known(status) => Some(*status),
            StatusValue::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusValue::Known(status) => status.as_str(),
            StatusValue::Unrecognized(raw) => raw,
        }
    }
}

impl Default for StatusValue {
    fn default() -> Self {
        StatusValue::Known(OrderStatus::New)
    }
}

impl From<OrderStatus> for StatusValue {
    fn from(status: OrderStatus) -> Self {
        StatusValue::Known(status)
    }
}

impl PartialEq<OrderStatus> for StatusValue {
    fn eq(&self, other: &OrderStatus) -> bool {
        self.known() == Some(*other)
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(StatusValue::from_wire(&raw))
    }
}

// ============================================================================
// Payment
// ============================================================================

/// Payment progress of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    /// Deposit received; see `Order::partial_amount`
    #[serde(rename = "adelanto")]
    Partial,
    #[serde(rename = "pagado")]
    Paid,
}

impl PaymentStatus {
    /// Unknown values fall back to `Pending`
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "adelanto" => PaymentStatus::Partial,
            "pagado" => PaymentStatus::Paid,
            _ => PaymentStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pendiente",
            PaymentStatus::Partial => "adelanto",
            PaymentStatus::Paid => "pagado",
        }
    }
}

// ============================================================================
// Customer
// ============================================================================

/// Customer contact attached to an order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "CustomerWire")]
pub struct Customer {
    #[serde(rename = "nombre")]
    pub name: String,
    /// WhatsApp number
    #[serde(rename = "whatsapp")]
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: None,
        }
    }
}

/// Admin entries use `whatsapp`, storefront reservations use `telefono`
#[derive(Deserialize)]
struct CustomerWire {
    nombre: Option<String>,
    whatsapp: Option<String>,
    telefono: Option<String>,
    email: Option<String>,
}

impl From<CustomerWire> for Customer {
    fn from(wire: CustomerWire) -> Self {
        Self {
            name: wire.nombre.unwrap_or_default(),
            phone: non_empty(wire.whatsapp)
                .or(non_empty(wire.telefono))
                .unwrap_or_default(),
            email: non_empty(wire.email),
        }
    }
}

// ============================================================================
// Line items
// ============================================================================

/// One product line on an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LineItemWire")]
pub struct LineItem {
    #[serde(rename = "nombre")]
    pub product_name: String,
    #[serde(rename = "color", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
    /// Unit price in Bs
    #[serde(rename = "precio")]
    pub unit_price: Decimal,
    /// Fields the board does not model (catalog `id`, `colorHex`, ...),
    /// sent back untouched on update
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LineItem {
    pub fn new(product_name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_name: product_name.into(),
            color: None,
            quantity,
            unit_price,
            extra: Map::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build a single-unit line from a catalog product.
    ///
    /// Without an explicit color the product's first color is used.
    pub fn from_product(product: &Product, color: Option<&str>) -> Self {
        Self {
            product_name: product.name.clone(),
            color: color
                .map(str::to_string)
                .or_else(|| product.default_color().map(str::to_string)),
            quantity: 1,
            unit_price: product.price,
            extra: Map::new(),
        }
    }

    /// `quantity × unit_price`
    pub fn subtotal(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Sum of `quantity × unit_price` over all lines
pub fn compute_line_total(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::subtotal).sum()
}

/// Storefront cart items carry `precioUnitario` and `colorSeleccionado`
/// alongside (or instead of) the admin field names.
#[derive(Deserialize)]
struct LineItemWire {
    nombre: Option<String>,
    color: Option<ProductColor>,
    #[serde(rename = "colorSeleccionado")]
    color_seleccionado: Option<ProductColor>,
    cantidad: Option<u32>,
    precio: Option<Decimal>,
    #[serde(rename = "precioUnitario")]
    precio_unitario: Option<Decimal>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<LineItemWire> for LineItem {
    fn from(wire: LineItemWire) -> Self {
        let color = wire
            .color
            .map(|c| c.name().to_string())
            .filter(|c| !c.trim().is_empty())
            .or_else(|| wire.color_seleccionado.map(|c| c.name().to_string()))
            .filter(|c| !c.trim().is_empty());
        let unit_price = match (wire.precio, wire.precio_unitario) {
            (Some(price), _) if !price.is_zero() => price,
            (_, Some(unit)) => unit,
            (price, None) => price.unwrap_or_default(),
        };
        Self {
            product_name: wire.nombre.unwrap_or_default(),
            color,
            quantity: wire.cantidad.unwrap_or(1),
            unit_price,
            extra: wire.extra,
        }
    }
}

// ============================================================================
// Order
// ============================================================================

/// Order as seen by the back-office board
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "OrderWire")]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub line_items: Vec<LineItem>,
    /// Order total in Bs. Editable independently of the line items.
    pub total: Decimal,
    pub status: StatusValue,
    pub payment_status: PaymentStatus,
    /// Deposit received, meaningful only for `PaymentStatus::Partial`
    pub partial_amount: Decimal,
    pub urgent: bool,
    pub delivery_date: Option<NaiveDate>,
    /// 3D printer the job is assigned to
    pub assigned_machine: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Lane of this order, `None` when the status is unrecognized
    pub fn lane(&self) -> Option<OrderStatus> {
        self.status.known()
    }

    /// Sum of the line subtotals (may differ from `total`)
    pub fn line_total(&self) -> Decimal {
        compute_line_total(&self.line_items)
    }
}

#[derive(Deserialize)]
struct OrderWire {
    id: Option<OrderId>,
    cliente: Option<Customer>,
    cliente_nombre: Option<String>,
    cliente_whatsapp: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    productos: Vec<LineItem>,
    total: Option<Decimal>,
    estado: Option<String>,
    estado_pago: Option<String>,
    monto_adelanto: Option<Decimal>,
    urgente: Option<bool>,
    fecha_entrega: Option<String>,
    maquina: Option<String>,
    notas: Option<String>,
    created_at: Option<String>,
}

impl TryFrom<OrderWire> for Order {
    type Error = String;

    fn try_from(wire: OrderWire) -> Result<Self, Self::Error> {
        let id = wire.id.ok_or_else(|| "order without id".to_string())?;

        let mut customer = wire.cliente.unwrap_or_default();
        if customer.name.trim().is_empty()
            && let Some(name) = non_empty(wire.cliente_nombre)
        {
            customer.name = name;
        }
        if customer.phone.trim().is_empty()
            && let Some(phone) = non_empty(wire.cliente_whatsapp)
        {
            customer.phone = phone;
        }

        Ok(Self {
            id,
            customer,
            line_items: wire.productos,
            total: wire.total.unwrap_or_default(),
            status: wire
                .estado
                .as_deref()
                .map(StatusValue::from_wire)
                .unwrap_or_default(),
            payment_status: wire
                .estado_pago
                .as_deref()
                .map(PaymentStatus::from_wire)
                .unwrap_or_default(),
            partial_amount: wire.monto_adelanto.unwrap_or_default(),
            urgent: wire.urgente.unwrap_or(false),
            delivery_date: wire.fecha_entrega.as_deref().and_then(parse_calendar_date),
            assigned_machine: non_empty(wire.maquina),
            notes: non_empty(wire.notas),
            created_at: wire.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Create / full-update body for `/pedidos`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPayload {
    #[serde(rename = "cliente")]
    pub customer: Customer,
    #[serde(rename = "productos")]
    pub line_items: Vec<LineItem>,
    pub total: Decimal,
    #[serde(rename = "estado_pago")]
    pub payment_status: PaymentStatus,
    #[serde(rename = "monto_adelanto")]
    pub partial_amount: Decimal,
    #[serde(rename = "estado")]
    pub status: StatusValue,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
    #[serde(rename = "urgente")]
    pub urgent: bool,
    #[serde(rename = "fecha_entrega")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(rename = "maquina")]
    pub assigned_machine: Option<String>,
}

/// Single-field status transition body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    #[serde(rename = "estado")]
    pub status: OrderStatus,
}
