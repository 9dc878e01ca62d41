//! Staged order form behind the detail / create modal

use std::borrow::Cow;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use shared::{
    Customer, Decimal, LineItem, Order, OrderId, OrderPayload, PaymentStatus, StatusValue,
    compute_line_total,
};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{ClientError, ClientResult};

/// What saving the form does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(OrderId),
}

/// Editable copy of one line
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct LineItemDraft {
    #[validate(length(min = 1, message = "Cada producto necesita un nombre"))]
    pub product_name: String,
    pub color: String,
    #[validate(range(min = 1, message = "La cantidad mínima es 1"))]
    pub quantity: u32,
    #[validate(custom(function = "non_negative_price"))]
    pub unit_price: Decimal,
    /// Unmodelled backend fields of the line, carried through unchanged
    pub extra: Map<String, Value>,
}

impl LineItemDraft {
    fn blank() -> Self {
        Self {
            product_name: String::new(),
            color: String::new(),
            quantity: 1,
            unit_price: Decimal::ZERO,
            extra: Map::new(),
        }
    }

    fn to_line_item(&self) -> LineItem {
        let mut item = LineItem::new(self.product_name.trim(), self.quantity, self.unit_price);
        item.extra = self.extra.clone();
        match self.color.trim() {
            "" => item,
            color => item.with_color(color),
        }
    }
}

impl From<&LineItem> for LineItemDraft {
    fn from(item: &LineItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            color: item.color.clone().unwrap_or_default(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            extra: item.extra.clone(),
        }
    }
}

fn non_negative_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_price")
            .with_message(Cow::Borrowed("El precio no puede ser negativo")));
    }
    Ok(())
}

/// Single field change on a line
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemEdit {
    Name(String),
    Color(String),
    Quantity(u32),
    UnitPrice(Decimal),
}

/// Staged edits; nothing reaches the backend until the form is saved.
///
/// Every line edit rewrites `total` with the line sum. `set_total` overrides
/// it by hand until the next line edit.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct OrderForm {
    pub target: FormTarget,
    #[validate(length(min = 1, message = "El nombre del cliente es obligatorio"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "El WhatsApp del cliente es obligatorio"))]
    pub customer_phone: String,
    pub customer_email: Option<String>,
    #[validate(nested)]
    pub line_items: Vec<LineItemDraft>,
    pub total: Decimal,
    pub status: StatusValue,
    pub payment_status: PaymentStatus,
    pub partial_amount: Decimal,
    pub urgent: bool,
    pub delivery_date: Option<NaiveDate>,
    pub assigned_machine: String,
    pub notes: String,
}

impl OrderForm {
    /// Empty form for a manually entered order
    pub fn new_order() -> Self {
        Self {
            target: FormTarget::Create,
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_email: None,
            line_items: Vec::new(),
            total: Decimal::ZERO,
            status: StatusValue::default(),
            payment_status: PaymentStatus::Pending,
            partial_amount: Decimal::ZERO,
            urgent: false,
            delivery_date: None,
            assigned_machine: String::new(),
            notes: String::new(),
        }
    }

    /// Form pre-filled from an existing order
    pub fn from_order(order: &Order) -> Self {
        Self {
            target: FormTarget::Edit(order.id.clone()),
            customer_name: order.customer.name.clone(),
            customer_phone: order.customer.phone.clone(),
            customer_email: order.customer.email.clone(),
            line_items: order.line_items.iter().map(LineItemDraft::from).collect(),
            total: order.total,
            status: order.status.clone(),
            payment_status: order.payment_status,
            partial_amount: order.partial_amount,
            urgent: order.urgent,
            delivery_date: order.delivery_date,
            assigned_machine: order.assigned_machine.clone().unwrap_or_default(),
            notes: order.notes.clone().unwrap_or_default(),
        }
    }

    pub fn order_id(&self) -> Option<&OrderId> {
        match &self.target {
            FormTarget::Edit(id) => Some(id),
            FormTarget::Create => None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.target == FormTarget::Create
    }

    // ========== Line items ==========

    /// Append an empty line
    pub fn add_line_item(&mut self) {
        self.line_items.push(LineItemDraft::blank());
        self.recompute_total();
    }

    /// Append a prepared line (e.g. picked from the catalog)
    pub fn push_line_item(&mut self, item: &LineItem) {
        self.line_items.push(LineItemDraft::from(item));
        self.recompute_total();
    }

    /// Apply one field change; `false` if `index` is out of range
    pub fn update_line_item(&mut self, index: usize, edit: LineItemEdit) -> bool {
        let Some(line) = self.line_items.get_mut(index) else {
            return false;
        };
        match edit {
            LineItemEdit::Name(name) => line.product_name = name,
            LineItemEdit::Color(color) => line.color = color,
            LineItemEdit::Quantity(quantity) => line.quantity = quantity,
            LineItemEdit::UnitPrice(price) => line.unit_price = price,
        }
        self.recompute_total();
        true
    }

    pub fn remove_line_item(&mut self, index: usize) -> bool {
        if index >= self.line_items.len() {
            return false;
        }
        self.line_items.remove(index);
        self.recompute_total();
        true
    }

    /// Manual total override
    pub fn set_total(&mut self, total: Decimal) {
        self.total = total;
    }

    /// Sum of the staged lines
    pub fn computed_total(&self) -> Decimal {
        compute_line_total(&self.lines())
    }

    /// Staged total differs from the line sum
    pub fn total_overridden(&self) -> bool {
        self.total != self.computed_total()
    }

    fn recompute_total(&mut self) {
        self.total = self.computed_total();
    }

    fn lines(&self) -> Vec<LineItem> {
        self.line_items
            .iter()
            .map(LineItemDraft::to_line_item)
            .collect()
    }

    // ========== Saving ==========

    /// Trimmed, validated copy ready to be sent
    pub fn validated(&self) -> ClientResult<OrderForm> {
        let mut form = self.clone();
        form.customer_name = form.customer_name.trim().to_string();
        form.customer_phone = form.customer_phone.trim().to_string();
        for line in &mut form.line_items {
            line.product_name = line.product_name.trim().to_string();
        }

        form.validate()
            .map_err(|e| ClientError::Validation(describe(&e)))?;

        if form.is_new() && form.line_items.is_empty() {
            return Err(ClientError::Validation(
                "Agrega al menos un producto al pedido".into(),
            ));
        }
        Ok(form)
    }

    /// Backend body with the full field set
    pub fn to_payload(&self) -> OrderPayload {
        OrderPayload {
            customer: Customer {
                name: self.customer_name.trim().to_string(),
                phone: self.customer_phone.trim().to_string(),
                email: self.customer_email.clone(),
            },
            line_items: self.lines(),
            total: self.total,
            payment_status: self.payment_status,
            partial_amount: match self.payment_status {
                PaymentStatus::Partial => self.partial_amount,
                _ => Decimal::ZERO,
            },
            status: self.status.clone(),
            notes: non_blank(&self.notes),
            urgent: self.urgent,
            delivery_date: self.delivery_date,
            assigned_machine: non_blank(&self.assigned_machine),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Flatten validator output into one banner line (sorted, deduplicated)
fn describe(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(list) => out.extend(list.iter().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Campo inválido: {field}"))
            })),
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::OrderStatus;

    fn filled_form() -> OrderForm {
        let mut form = OrderForm::new_order();
        form.customer_name = "Ana Pérez".into();
        form.customer_phone = "70012345".into();
        form
    }

    #[test]
    fn test_line_edits_recompute_total() {
        let mut form = filled_form();
        form.add_line_item();
        form.update_line_item(0, LineItemEdit::Name("Llavero".into()));
        form.update_line_item(0, LineItemEdit::Quantity(2));
        form.update_line_item(0, LineItemEdit::UnitPrice(Decimal::from(15)));
        form.push_line_item(&LineItem::new("Organizador", 1, Decimal::from(30)));

        assert_eq!(form.total, Decimal::from(60));
        assert!(!form.total_overridden());

        form.remove_line_item(1);
        assert_eq!(form.total, Decimal::from(30));
        assert!(!form.update_line_item(5, LineItemEdit::Quantity(1)));
    }

    #[test]
    fn test_manual_total_is_last_write_wins() {
        let mut form = filled_form();
        form.push_line_item(&LineItem::new("Maceta", 2, Decimal::from(20)));
        form.set_total(Decimal::from(35));
        assert_eq!(form.total, Decimal::from(35));
        assert!(form.total_overridden());

        form.update_line_item(0, LineItemEdit::Quantity(3));
        assert_eq!(form.total, Decimal::from(60));
    }

    #[test]
    fn test_validation_requires_contact_and_lines() {
        let empty = OrderForm::new_order();
        let err = empty.validated().unwrap_err();
        let ClientError::Validation(message) = err else {
            panic!("expected validation error");
        };
        assert!(message.contains("nombre del cliente"));
        assert!(message.contains("WhatsApp"));

        let no_lines = filled_form();
        assert!(matches!(no_lines.validated(), Err(ClientError::Validation(_))));

        let mut blank_phone = filled_form();
        blank_phone.customer_phone = "   ".into();
        blank_phone.add_line_item();
        assert!(blank_phone.validated().is_err());
    }

    #[test]
    fn test_validation_checks_lines() {
        let mut form = filled_form();
        form.add_line_item();
        assert!(form.validated().is_err());

        form.update_line_item(0, LineItemEdit::Name("Aretes".into()));
        form.update_line_item(0, LineItemEdit::Quantity(0));
        assert!(form.validated().is_err());

        form.update_line_item(0, LineItemEdit::Quantity(1));
        form.update_line_item(0, LineItemEdit::UnitPrice(Decimal::from(-5)));
        assert!(form.validated().is_err());

        form.update_line_item(0, LineItemEdit::UnitPrice(Decimal::from(5)));
        assert!(form.validated().is_ok());
    }

    #[test]
    fn test_existing_order_may_have_no_lines() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 3,
            "cliente": { "nombre": "Luis", "whatsapp": "600" },
            "estado": "realizado"
        }))
        .unwrap();
        let form = OrderForm::from_order(&order);
        assert_eq!(form.order_id(), Some(&OrderId::from(3)));
        assert!(form.validated().is_ok());
    }

    #[test]
    fn test_edit_keeps_unmodelled_line_fields() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": 12,
            "cliente": { "nombre": "Eva", "telefono": "6000" },
            "productos": [{
                "id": 3, "nombre": "Aretes", "precio": 25, "precioUnitario": 25,
                "cantidad": 3, "color": "Dorado", "colorHex": "#FFD700"
            }],
            "total": 75
        }))
        .unwrap();

        let mut form = OrderForm::from_order(&order);
        form.notes = "Recoge en tienda".into();
        form.update_line_item(0, LineItemEdit::Quantity(4));
        let body = serde_json::to_value(form.validated().unwrap().to_payload()).unwrap();

        let line = &body["productos"][0];
        assert_eq!(line["id"], 3);
        assert_eq!(line["colorHex"], "#FFD700");
        assert_eq!(line["color"], "Dorado");
        assert_eq!(line["cantidad"], 4);
        assert_eq!(body["notas"], "Recoge en tienda");
    }

    #[test]
    fn test_payload_trims_and_drops_unused_deposit() {
        let mut form = filled_form();
        form.customer_name = "  Ana  ".into();
        form.push_line_item(&LineItem::new("Maceta", 1, Decimal::from(20)));
        form.partial_amount = Decimal::from(5);
        form.assigned_machine = " ".into();
        form.status = OrderStatus::Confirmed.into();

        let payload = form.to_payload();
        assert_eq!(payload.customer.name, "Ana");
        assert_eq!(payload.partial_amount, Decimal::ZERO);
        assert_eq!(payload.assigned_machine, None);
        assert_eq!(payload.status, OrderStatus::Confirmed);

        form.payment_status = PaymentStatus::Partial;
        assert_eq!(form.to_payload().partial_amount, Decimal::from(5));
    }
}
