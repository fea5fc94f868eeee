//! JSON nested-order parser

use crate::types::{Order, OrderItem, OrderStatsError, RecordId, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use super::validate::{
    check_price, check_quantity, parse_price, parse_quantity, parse_record_id, require, DateGuard,
    DropTally,
};
use super::OrderSource;

/// Order object as exported.
///
/// Fields stay loose JSON values until validated, so one malformed value
/// drops its own record instead of failing the whole document.
#[derive(Deserialize)]
struct JsonOrder {
    order_id: Option<Value>,
    user_id: Option<Value>,
    date: Option<Value>,
    #[serde(default)]
    items: Value,
}

#[derive(Deserialize)]
struct JsonItem {
    price: Option<Value>,
    quantity: Option<Value>,
}

/// `{"orders": [...]}` wrapper
#[derive(Deserialize)]
struct JsonEnvelope {
    orders: Vec<Value>,
}

/// Identifier: integer numbers or strings; strings follow the CSV rules
fn record_id(value: Option<Value>, field: &'static str) -> Result<RecordId> {
    match value {
        None => Err(OrderStatsError::MissingRequiredField { field }),
        Some(Value::Number(n)) => n.as_i64().map(RecordId::Int).ok_or_else(|| {
            OrderStatsError::InvalidValue {
                field,
                value: n.to_string(),
            }
        }),
        Some(Value::String(s)) => Ok(parse_record_id(require(Some(&s), field)?)),
        Some(other) => Err(OrderStatsError::InvalidValue {
            field,
            value: other.to_string(),
        }),
    }
}

/// Price as a number or numeric string; absent counts as 0
fn item_price(value: Option<Value>) -> Result<f64> {
    match value {
        None => Ok(0.0),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(price) => check_price(price),
            None => parse_price(&n.to_string()),
        },
        Some(Value::String(s)) => parse_price(&s),
        Some(other) => Err(OrderStatsError::InvalidNumber {
            field: "price",
            value: other.to_string(),
        }),
    }
}

/// Quantity as an integer, whole float (`2.0`) or numeric string; absent counts as 1
fn item_quantity(value: Option<Value>) -> Result<u64> {
    match value {
        None => Ok(1),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(quantity) => check_quantity(quantity),
            None => parse_quantity(&n.to_string()),
        },
        Some(Value::String(s)) => parse_quantity(&s),
        Some(other) => Err(OrderStatsError::InvalidNumber {
            field: "quantity",
            value: other.to_string(),
        }),
    }
}

/// Parser for JSON order exports (an array of orders, or `{"orders": [...]}`)
pub struct JsonOrderSource;

impl JsonOrderSource {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw bytes in place (simd-json mutates the buffer)
    fn parse_bytes(&self, content: &mut [u8]) -> Result<Vec<Order>> {
        let first = content.iter().find(|b| !b.is_ascii_whitespace()).copied();
        let raw: Vec<Value> = match first {
            None => return Ok(Vec::new()),
            Some(b'{') => simd_json::from_slice::<JsonEnvelope>(content)?.orders,
            Some(_) => simd_json::from_slice(content)?,
        };

        let mut orders = Vec::with_capacity(raw.len());
        let mut seen: HashSet<RecordId> = HashSet::with_capacity(raw.len());
        let mut dates = DateGuard::new();
        let mut drops = DropTally::new("json");

        for (i, value) in raw.into_iter().enumerate() {
            let location = format!("order #{}", i + 1);
            let order = serde_json::from_value::<JsonOrder>(value)
                .map_err(OrderStatsError::from)
                .and_then(|order| self.build_order(order, &mut dates, &mut drops, &location));
            let order = match order {
                Ok(order) => order,
                Err(e) => {
                    drops.record(&location, &e);
                    continue;
                }
            };

            if !seen.insert(order.order_id.clone()) {
                let e = OrderStatsError::DuplicateOrderId(order.order_id.to_string());
                drops.record(&location, &e);
                continue;
            }
            orders.push(order);
        }

        dates.finish()?;
        drops.log_summary(orders.len());
        Ok(orders)
    }

    /// Validate one raw order; bad items are dropped individually
    fn build_order(
        &self,
        raw: JsonOrder,
        dates: &mut DateGuard,
        drops: &mut DropTally,
        location: &str,
    ) -> Result<Order> {
        let order_id = record_id(raw.order_id, "order_id")?;
        let user_id = record_id(raw.user_id, "user_id")?;
        let date = match raw.date {
            None => return Err(OrderStatsError::MissingRequiredField { field: "date" }),
            Some(Value::String(s)) => dates.check(require(Some(&s), "date")?)?,
            Some(other) => dates.check(&other.to_string())?,
        };

        let raw_items = match raw.items {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => {
                return Err(OrderStatsError::InvalidValue {
                    field: "items",
                    value: other.to_string(),
                })
            }
        };

        let mut items = Vec::with_capacity(raw_items.len());
        for (j, item) in raw_items.into_iter().enumerate() {
            match Self::build_item(item) {
                Ok(item) => items.push(item),
                Err(e) => drops.record(&format!("{} item #{}", location, j + 1), &e),
            }
        }

        Ok(Order {
            order_id,
            user_id,
            date,
            items,
        })
    }

    fn build_item(value: Value) -> Result<OrderItem> {
        let item: JsonItem = serde_json::from_value(value)?;
        Ok(OrderItem::new(
            item_price(item.price)?,
            item_quantity(item.quantity)?,
        ))
    }
}

impl Default for JsonOrderSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderSource for JsonOrderSource {
    fn name(&self) -> &str {
        "json"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Order>> {
        let mut bytes = content.as_bytes().to_vec();
        self.parse_bytes(&mut bytes)
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<Order>> {
        let mut content = std::fs::read(path)?;
        self.parse_bytes(&mut content)
    }
}
