use super::{format_date, format_money, html_table, RenderedPage};
use crate::data::Table;
use std::collections::HashSet;

const PREVIEW_ROWS: usize = 10;

/// Headline metrics and a preview of the first rows.
pub fn show(table: &Table) -> RenderedPage {
    let total_revenue: f64 = table.rows().iter().map(|r| r.revenue).sum();
    let customers: HashSet<&str> = table
        .rows()
        .iter()
        .map(|r| r.customer_id.as_str())
        .collect();
    let first_date = table.rows().iter().filter_map(|r| r.invoice_date).min();
    let last_date = super::latest_invoice_date(table);

    let metrics = format!(
        "<div class=\"metrics\">\
         <div class=\"metric\"><h4>Transactions</h4><p>{}</p></div>\
         <div class=\"metric\"><h4>Customers</h4><p>{}</p></div>\
         <div class=\"metric\"><h4>Total Revenue</h4><p>{}</p></div>\
         <div class=\"metric\"><h4>Date Range</h4><p>{} to {}</p></div>\
         </div>",
        table.len(),
        customers.len(),
        format_money(total_revenue),
        format_date(first_date),
        format_date(last_date),
    );

    let headers: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    let preview: Vec<Vec<String>> = table
        .rows()
        .iter()
        .take(PREVIEW_ROWS)
        .map(|row| {
            let mut cells: Vec<String> = row.cells().to_vec();
            cells.push(format_money(row.revenue));
            cells
        })
        .collect();

    RenderedPage {
        title: "Overview".to_string(),
        html: format!(
            "{metrics}<h3>First {} rows</h3>{}",
            preview.len(),
            html_table(&headers, &preview)
        ),
    }
}
