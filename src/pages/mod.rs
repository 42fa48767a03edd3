pub mod churn_prediction;
pub mod customer_segmentation;
pub mod future_predictions;
pub mod overview;
pub mod rfm_analysis;

use crate::data::Table;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The five pages offered by the sidebar selector. Serialized with the exact
/// UI labels, so anything else is rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageLabel {
    #[default]
    #[serde(rename = "Overview")]
    Overview,
    #[serde(rename = "RFM Analysis")]
    RfmAnalysis,
    #[serde(rename = "Churn Prediction")]
    ChurnPrediction,
    #[serde(rename = "Customer Segmentation")]
    CustomerSegmentation,
    #[serde(rename = "Future Predictions")]
    FuturePredictions,
}

impl PageLabel {
    pub const ALL: [PageLabel; 5] = [
        PageLabel::Overview,
        PageLabel::RfmAnalysis,
        PageLabel::ChurnPrediction,
        PageLabel::CustomerSegmentation,
        PageLabel::FuturePredictions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PageLabel::Overview => "Overview",
            PageLabel::RfmAnalysis => "RFM Analysis",
            PageLabel::ChurnPrediction => "Churn Prediction",
            PageLabel::CustomerSegmentation => "Customer Segmentation",
            PageLabel::FuturePredictions => "Future Predictions",
        }
    }
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one page renderer: a title and a self-contained HTML fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    pub title: String,
    pub html: String,
}

/// Dispatch to exactly one renderer. The table is passed by reference; no
/// copy, no filtering.
pub fn route(page: PageLabel, table: &Table) -> RenderedPage {
    match page {
        PageLabel::Overview => overview::show(table),
        PageLabel::RfmAnalysis => rfm_analysis::show(table),
        PageLabel::ChurnPrediction => churn_prediction::show(table),
        PageLabel::CustomerSegmentation => customer_segmentation::show(table),
        PageLabel::FuturePredictions => future_predictions::show(table),
    }
}

/// Per-customer roll-up shared by the RFM, churn and segmentation pages.
pub(crate) struct CustomerSummary {
    pub customer_id: String,
    pub orders: usize,
    pub total_spend: f64,
    pub last_purchase: Option<NaiveDateTime>,
}

/// Aggregate the table per customer, sorted by total spend descending.
pub(crate) fn customer_summaries(table: &Table) -> Vec<CustomerSummary> {
    let mut by_customer: HashMap<&str, CustomerSummary> = HashMap::new();
    for row in table.rows() {
        let entry = by_customer
            .entry(row.customer_id.as_str())
            .or_insert_with(|| CustomerSummary {
                customer_id: row.customer_id.clone(),
                orders: 0,
                total_spend: 0.0,
                last_purchase: None,
            });
        entry.orders += 1;
        entry.total_spend += row.revenue;
        if row.invoice_date > entry.last_purchase {
            entry.last_purchase = row.invoice_date;
        }
    }

    let mut summaries: Vec<CustomerSummary> = by_customer.into_values().collect();
    summaries.sort_by(|a, b| {
        b.total_spend
            .partial_cmp(&a.total_spend)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    summaries
}

pub(crate) fn latest_invoice_date(table: &Table) -> Option<NaiveDateTime> {
    table.rows().iter().filter_map(|r| r.invoice_date).max()
}

pub(crate) fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn html_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::from("<table class=\"data-table\"><thead><tr>");
    for h in headers {
        out.push_str(&format!("<th>{}</th>", html_escape(h)));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", html_escape(cell)));
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
    out
}

pub(crate) fn format_date(date: Option<NaiveDateTime>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

pub(crate) fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}
