//! Human-readable rendering of metrics and per-order totals

use crate::types::{Metrics, OrderTotals, RecordId};
use std::fmt::Write;

/// Maximum number of decimals accepted for monetary output
pub const MAX_PRECISION: usize = 10;

const ABSENT: &str = "-";

fn id_or_absent(id: Option<&RecordId>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| ABSENT.to_string())
}

/// Format a monetary value with fixed decimals.
///
/// Rounding here is display-only; the computed value keeps full precision.
pub fn format_amount(value: f64, precision: usize) -> String {
    format!("{:.*}", precision.min(MAX_PRECISION), value)
}

/// Render the seven metrics as numbered lines
pub fn render_metrics(metrics: &Metrics, precision: usize) -> String {
    let busiest_day = metrics
        .busiest_day
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| ABSENT.to_string());

    let rows = [
        (
            "Most expensive order",
            id_or_absent(metrics.most_expensive_order_id.as_ref()),
        ),
        (
            "Order with most items",
            id_or_absent(metrics.most_items_order_id.as_ref()),
        ),
        ("Busiest day", busiest_day),
        (
            "Top user by order count",
            id_or_absent(metrics.top_user_by_order_count.as_ref()),
        ),
        (
            "Top user by revenue",
            id_or_absent(metrics.top_user_by_revenue.as_ref()),
        ),
        (
            "Average order value",
            format_amount(metrics.average_order_value, precision),
        ),
        (
            "Average item price",
            format_amount(metrics.average_item_price, precision),
        ),
    ];

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (i, (label, value)) in rows.iter().enumerate() {
        let _ = writeln!(out, "{}. {:<width$}  {}", i + 1, label, value, width = width);
    }
    out
}

/// Render per-order totals as a fixed-width table
pub fn render_order_totals(totals: &[OrderTotals], precision: usize) -> String {
    const HEADERS: [&str; 5] = ["ORDER", "USER", "DATE", "ITEMS", "TOTAL"];

    let rows: Vec<[String; 5]> = totals
        .iter()
        .map(|t| {
            [
                t.order_id.to_string(),
                t.user_id.to_string(),
                t.date.format("%Y-%m-%d").to_string(),
                t.total_quantity.to_string(),
                format_amount(t.total_cost, precision),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: [&str; 5]| {
        let _ = writeln!(
            out,
            "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}  {:>w4$}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            cells[4],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
            w4 = widths[4],
        );
    };

    push_row(HEADERS);
    for row in &rows {
        push_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_metrics() -> Metrics {
        Metrics {
            most_expensive_order_id: Some(RecordId::Int(1001)),
            most_items_order_id: Some(RecordId::from("B-7")),
            busiest_day: NaiveDate::from_ymd_opt(2024, 3, 5),
            top_user_by_order_count: Some(RecordId::from("alice")),
            top_user_by_revenue: Some(RecordId::Int(42)),
            average_order_value: 12.346,
            average_item_price: 3.0,
        }
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(12.346, 2), "12.35");
        assert_eq!(format_amount(3.0, 0), "3");
        assert_eq!(format_amount(1.0, 50), "1.0000000000");
    }

    #[test]
    fn test_render_metrics_lines() {
        let text = render_metrics(&sample_metrics(), 2);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("1. Most expensive order"));
        assert!(lines[0].ends_with("1001"));
        assert!(lines[1].ends_with("B-7"));
        assert!(lines[2].ends_with("2024-03-05"));
        assert!(lines[3].ends_with("alice"));
        assert!(lines[4].ends_with("42"));
        assert!(lines[5].ends_with("12.35"));
        assert!(lines[6].ends_with("3.00"));
    }

    #[test]
    fn test_render_metrics_empty() {
        let text = render_metrics(&Metrics::empty(), 2);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[..5].iter().all(|l| l.ends_with(" -")));
        assert!(lines[5].ends_with("0.00"));
        assert!(lines[6].ends_with("0.00"));
    }

    #[test]
    fn test_render_order_totals() {
        let totals = vec![
            OrderTotals {
                order_id: RecordId::Int(1),
                user_id: RecordId::from("u1"),
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                total_cost: 20.0,
                total_quantity: 2,
            },
            OrderTotals {
                order_id: RecordId::from("LONG-ORDER-ID"),
                user_id: RecordId::from("u2"),
                date: NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(),
                total_cost: 0.5,
                total_quantity: 10,
            },
        ];
        let text = render_order_totals(&totals, 2);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ORDER"));
        assert!(lines[1].starts_with("1 "));
        assert!(lines[1].ends_with("20.00"));
        assert!(lines[2].starts_with("LONG-ORDER-ID"));
        assert!(lines[2].ends_with(" 0.50"));
        // Columns line up
        assert_eq!(lines[0].len(), lines[1].len());
        assert_eq!(lines[1].len(), lines[2].len());
    }

    #[test]
    fn test_render_order_totals_empty() {
        let text = render_order_totals(&[], 2);
        assert_eq!(text.lines().count(), 1);
    }
}
