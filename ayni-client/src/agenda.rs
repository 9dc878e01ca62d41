//! Delivery agenda
//!
//! Calendar view over orders that have a delivery date. Weeks run Sunday to
//! Saturday.

use chrono::{Datelike, Duration, NaiveDate};
use shared::Order;

/// Days shown per page
pub const DAYS_PER_WEEK: usize = 7;

/// Scheduled deliveries
#[derive(Debug, Clone, Default)]
pub struct DeliveryAgenda {
    scheduled: Vec<Order>,
}

/// One calendar cell
#[derive(Debug, Clone)]
pub struct AgendaDay<'a> {
    pub date: NaiveDate,
    pub orders: Vec<&'a Order>,
}

impl AgendaDay<'_> {
    pub fn is_today(&self, today: NaiveDate) -> bool {
        self.date == today
    }

    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.date < today
    }
}

impl DeliveryAgenda {
    /// Keep only orders with a delivery date
    pub fn new(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            scheduled: orders
                .into_iter()
                .filter(|o| o.delivery_date.is_some())
                .collect(),
        }
    }

    pub fn scheduled(&self) -> &[Order] {
        &self.scheduled
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    /// Deliveries due on `date`
    pub fn orders_on(&self, date: NaiveDate) -> Vec<&Order> {
        self.scheduled
            .iter()
            .filter(|o| o.delivery_date == Some(date))
            .collect()
    }

    /// The Sunday-to-Saturday week containing `date`
    pub fn week_of(&self, date: NaiveDate) -> Vec<AgendaDay<'_>> {
        let start = week_start(date);
        start
            .iter_days()
            .take(DAYS_PER_WEEK)
            .map(|day| AgendaDay {
                date: day,
                orders: self.orders_on(day),
            })
            .collect()
    }

    /// Deliveries due today or later, soonest first
    pub fn upcoming(&self, today: NaiveDate) -> Vec<&Order> {
        let mut upcoming: Vec<&Order> = self
            .scheduled
            .iter()
            .filter(|o| o.delivery_date.is_some_and(|d| d >= today))
            .collect();
        upcoming.sort_by_key(|o| o.delivery_date);
        upcoming
    }

    pub fn urgent_count(&self) -> usize {
        self.scheduled.iter().filter(|o| o.urgent).count()
    }
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_signed(Duration::days(offset))
        .unwrap_or(date)
}

/// Move `date` by whole weeks (negative goes back)
pub fn shift_week(date: NaiveDate, weeks: i64) -> NaiveDate {
    date.checked_add_signed(Duration::weeks(weeks))
        .unwrap_or(date)
}

/// Printer name without the model suffix ("Ender 3 - A" → "Ender 3")
pub fn machine_label(order: &Order) -> Option<&str> {
    order
        .assigned_machine
        .as_deref()
        .and_then(|m| m.split(" - ").next())
        .map(str::trim)
        .filter(|m| !m.is_empty())
}
