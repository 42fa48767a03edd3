use super::{customer_summaries, format_date, format_money, html_table, RenderedPage};
use crate::data::Table;

const TOP_CUSTOMERS: usize = 10;

/// Raw recency, frequency and monetary inputs per customer. Frequency counts
/// transaction lines, recency is the last purchase date on record.
pub fn show(table: &Table) -> RenderedPage {
    let summaries = customer_summaries(table);

    let rows: Vec<Vec<String>> = summaries
        .iter()
        .take(TOP_CUSTOMERS)
        .map(|s| {
            vec![
                s.customer_id.clone(),
                format_date(s.last_purchase),
                s.orders.to_string(),
                format_money(s.total_spend),
            ]
        })
        .collect();

    let html = format!(
        "<p>{} customers. Top {} by total spend:</p>{}",
        summaries.len(),
        rows.len(),
        html_table(
            &["Customer", "Last Purchase", "Transactions", "Total Spend"],
            &rows
        )
    );

    RenderedPage {
        title: "RFM Analysis".to_string(),
        html,
    }
}
