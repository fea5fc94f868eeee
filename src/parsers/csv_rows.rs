//! CSV order-line parser
//!
//! Each row is one line item; rows sharing an `order_id` are grouped back
//! into a single order, in first-seen order.

use crate::types::{Order, OrderItem, OrderStatsError, RecordId, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

use super::validate::{
    parse_price, parse_quantity, parse_record_id, require, DateGuard, DropTally,
};
use super::OrderSource;

const REQUIRED_COLUMNS: [&str; 5] = ["order_id", "user_id", "date", "price", "quantity"];

/// Column positions of the required fields
struct Columns {
    order_id: usize,
    user_id: usize,
    date: usize,
    price: usize,
    quantity: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let positions =
            REQUIRED_COLUMNS.map(|name| headers.iter().position(|h| h.trim() == name));

        match positions {
            [Some(order_id), Some(user_id), Some(date), Some(price), Some(quantity)] => Ok(Self {
                order_id,
                user_id,
                date,
                price,
                quantity,
            }),
            _ => Err(OrderStatsError::MissingColumns(
                REQUIRED_COLUMNS
                    .iter()
                    .zip(positions.iter())
                    .filter(|(_, pos)| pos.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect(),
            )),
        }
    }
}

/// One validated row
struct OrderLine {
    order_id: RecordId,
    user_id: RecordId,
    date: NaiveDate,
    item: OrderItem,
}

/// Parser for flat CSV order exports
pub struct CsvOrderSource;

impl CsvOrderSource {
    pub fn new() -> Self {
        Self
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        columns: &Columns,
        dates: &mut DateGuard,
    ) -> Result<OrderLine> {
        let order_id = require(record.get(columns.order_id), "order_id")?;
        let user_id = require(record.get(columns.user_id), "user_id")?;
        let date = require(record.get(columns.date), "date")?;
        let price = require(record.get(columns.price), "price")?;
        let quantity = require(record.get(columns.quantity), "quantity")?;

        let date = dates.check(date)?;
        let item = OrderItem::new(parse_price(price)?, parse_quantity(quantity)?);

        Ok(OrderLine {
            order_id: parse_record_id(order_id),
            user_id: parse_record_id(user_id),
            date,
            item,
        })
    }
}

impl Default for CsvOrderSource {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderSource for CsvOrderSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn parse_str(&self, content: &str) -> Result<Vec<Order>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns = Columns::from_headers(reader.headers()?)?;

        let mut orders: Vec<Order> = Vec::new();
        let mut by_id: HashMap<RecordId, usize> = HashMap::new();
        let mut dates = DateGuard::new();
        let mut drops = DropTally::new("csv");

        for result in reader.records() {
            let record = result?;
            let location = record
                .position()
                .map(|p| format!("line {}", p.line()))
                .unwrap_or_else(|| "row".to_string());

            let line = match self.parse_row(&record, &columns, &mut dates) {
                Ok(line) => line,
                Err(e) => {
                    drops.record(&location, &e);
                    continue;
                }
            };

            match by_id.get(&line.order_id) {
                Some(&pos) => {
                    let order = &mut orders[pos];
                    if order.user_id != line.user_id || order.date != line.date {
                        let e = OrderStatsError::DuplicateOrderId(line.order_id.to_string());
                        drops.record(&location, &e);
                        continue;
                    }
                    order.items.push(line.item);
                }
                None => {
                    by_id.insert(line.order_id.clone(), orders.len());
                    orders.push(Order {
                        order_id: line.order_id,
                        user_id: line.user_id,
                        date: line.date,
                        items: vec![line.item],
                    });
                }
            }
        }

        dates.finish()?;
        drops.log_summary(orders.len());
        Ok(orders)
    }
}
