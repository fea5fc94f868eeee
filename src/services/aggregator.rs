//! Order aggregation: per-order totals and the seven summary metrics

use crate::types::{Metrics, Order, OrderId, OrderTotals, UserId};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::AddAssign;

/// Insertion-ordered keyed accumulator.
///
/// `argmax` returns the first key holding the maximum value, in the order keys
/// were first seen, so ties resolve the same way for the same input order.
#[derive(Debug, Clone)]
pub struct Tally<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> Default for Tally<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K, V> Tally<K, V>
where
    K: Eq + Hash + Clone,
    V: Copy + Default + PartialOrd + AddAssign,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the running total for `key`
    pub fn add(&mut self, key: &K, value: V) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 += value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                let mut total = V::default();
                total += value;
                self.entries.push((key.clone(), total));
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.index.get(key).map(|&pos| self.entries[pos].1)
    }

    /// Key with the largest total (first one wins on ties)
    pub fn argmax(&self) -> Option<&K> {
        let mut best: Option<&(K, V)> = None;
        for entry in &self.entries {
            match best {
                Some(b) if entry.1 <= b.1 => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

/// Running state for a single pass over orders.
///
/// Order ids are expected to be unique; record sources reject duplicates
/// before orders get here.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    pub order_cost: Tally<OrderId, f64>,
    pub order_quantity: Tally<OrderId, u64>,
    pub orders_per_day: Tally<NaiveDate, u64>,
    pub user_order_count: Tally<UserId, u64>,
    pub user_revenue: Tally<UserId, f64>,
    order_count: u64,
    cost_sum: f64,
    unit_count: u64,
    unit_price_sum: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one order into every aggregate
    pub fn add_order(&mut self, order: &Order) {
        let (cost, quantity) = OrderAggregator::order_totals(order);

        self.order_cost.add(&order.order_id, cost);
        self.order_quantity.add(&order.order_id, quantity);
        self.orders_per_day.add(&order.date, 1);
        self.user_order_count.add(&order.user_id, 1);
        self.user_revenue.add(&order.user_id, cost);

        self.order_count += 1;
        self.cost_sum += cost;

        // Each unit contributes its price once: Σ price×qty over Σ qty.
        // Counts saturate instead of wrapping on absurd quantities.
        self.unit_count = self.unit_count.saturating_add(quantity);
        self.unit_price_sum += cost;
    }

    /// Derive the final metrics
    pub fn finish(&self) -> Metrics {
        let average_order_value = if self.order_count > 0 {
            self.cost_sum / self.order_count as f64
        } else {
            0.0
        };
        let average_item_price = if self.unit_count > 0 {
            self.unit_price_sum / self.unit_count as f64
        } else {
            0.0
        };

        Metrics {
            most_expensive_order_id: self.order_cost.argmax().cloned(),
            most_items_order_id: self.order_quantity.argmax().cloned(),
            busiest_day: self.orders_per_day.argmax().copied(),
            top_user_by_order_count: self.user_order_count.argmax().cloned(),
            top_user_by_revenue: self.user_revenue.argmax().cloned(),
            average_order_value,
            average_item_price,
        }
    }
}

/// Order statistics aggregator
pub struct OrderAggregator;

impl OrderAggregator {
    /// Compute the seven summary metrics over `orders`
    pub fn aggregate(orders: &[Order]) -> Metrics {
        Self::accumulate(orders).finish()
    }

    /// Run the single pass and keep the intermediate aggregates
    pub fn accumulate(orders: &[Order]) -> Accumulator {
        let mut acc = Accumulator::new();
        for order in orders {
            acc.add_order(order);
        }
        acc
    }

    /// (total cost, total quantity) of one order; quantity saturates at `u64::MAX`
    pub fn order_totals(order: &Order) -> (f64, u64) {
        order
            .items
            .iter()
            .fold((0.0, 0u64), |(cost, qty), item| {
                (cost + item.cost(), qty.saturating_add(item.quantity))
            })
    }

    /// Per-order totals, in input order
    pub fn per_order(orders: &[Order]) -> Vec<OrderTotals> {
        orders
            .iter()
            .map(|order| {
                let (total_cost, total_quantity) = Self::order_totals(order);
                OrderTotals {
                    order_id: order.order_id.clone(),
                    user_id: order.user_id.clone(),
                    date: order.date,
                    total_cost,
                    total_quantity,
                }
            })
            .collect()
    }
}
