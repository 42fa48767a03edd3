use super::{customer_summaries, format_money, html_table, RenderedPage};
use crate::data::Table;

/// Customers banded into high, mid and low spend tiers by total revenue.
pub fn show(table: &Table) -> RenderedPage {
    let summaries = customer_summaries(table);
    let total_revenue: f64 = summaries.iter().map(|s| s.total_spend).sum();

    // summaries are sorted by spend descending; split into three near-equal
    // bands, high spenders first.
    let n = summaries.len();
    let high_end = n.div_ceil(3);
    let mid_end = high_end + (n - high_end).div_ceil(2);

    let tiers = [
        ("High value", &summaries[..high_end]),
        ("Mid value", &summaries[high_end..mid_end]),
        ("Low value", &summaries[mid_end..]),
    ];

    let rows: Vec<Vec<String>> = tiers
        .iter()
        .map(|(name, members)| {
            let revenue: f64 = members.iter().map(|s| s.total_spend).sum();
            let share = if total_revenue > 0.0 {
                revenue / total_revenue * 100.0
            } else {
                0.0
            };
            vec![
                name.to_string(),
                members.len().to_string(),
                format_money(revenue),
                format!("{share:.1}%"),
            ]
        })
        .collect();

    RenderedPage {
        title: "Customer Segmentation".to_string(),
        html: format!(
            "<p>{n} customers split into spend tiers:</p>{}",
            html_table(&["Segment", "Customers", "Revenue", "Revenue Share"], &rows)
        ),
    }
}
