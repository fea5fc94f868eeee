//! Core data types: orders, line items and computed metrics

mod error;

pub use error::{OrderStatsError, Result};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an order or a user.
///
/// Exports carry identifiers either as integers or as strings, so both are
/// kept as-is. Serialized untagged: `42` or `"A-42"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

pub type OrderId = RecordId;
pub type UserId = RecordId;

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// A single line of an order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderItem {
    pub price: f64,
    pub quantity: u64,
}

impl OrderItem {
    pub fn new(price: f64, quantity: u64) -> Self {
        Self { price, quantity }
    }

    /// Line cost (price × quantity)
    pub fn cost(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// A customer order with its line items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub items: Vec<OrderItem>,
}

/// Totals for one order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTotals {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub total_cost: f64,
    pub total_quantity: u64,
}

/// The seven summary statistics computed over a set of orders.
///
/// Identifier and date fields are `None` only when no orders were given.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub most_expensive_order_id: Option<OrderId>,
    pub most_items_order_id: Option<OrderId>,
    pub busiest_day: Option<NaiveDate>,
    pub top_user_by_order_count: Option<UserId>,
    pub top_user_by_revenue: Option<UserId>,
    pub average_order_value: f64,
    pub average_item_price: f64,
}

impl Metrics {
    /// Metrics for an empty order set
    pub fn empty() -> Self {
        Self {
            most_expensive_order_id: None,
            most_items_order_id: None,
            busiest_day: None,
            top_user_by_order_count: None,
            top_user_by_revenue: None,
            average_order_value: 0.0,
            average_item_price: 0.0,
        }
    }

    /// True when no order contributed to these metrics
    pub fn is_empty(&self) -> bool {
        self.most_expensive_order_id.is_none()
    }
}
