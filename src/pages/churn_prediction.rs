use super::{customer_summaries, format_date, format_money, html_table, latest_invoice_date, RenderedPage};
use crate::data::Table;

/// Customers with no purchase in this many days (relative to the newest
/// invoice in the upload) are flagged as at risk.
const INACTIVITY_CUTOFF_DAYS: i64 = 90;

const LISTED_CUSTOMERS: usize = 10;

/// Days-since-last-purchase per customer against a fixed inactivity cutoff.
pub fn show(table: &Table) -> RenderedPage {
    let reference = match latest_invoice_date(table) {
        Some(d) => d,
        None => {
            return RenderedPage {
                title: "Churn Prediction".to_string(),
                html: "<p>No parseable invoice dates in this dataset; churn \
                       risk cannot be assessed.</p>"
                    .to_string(),
            }
        }
    };

    let summaries = customer_summaries(table);
    let mut dated: Vec<(&super::CustomerSummary, i64)> = summaries
        .iter()
        .filter_map(|s| {
            s.last_purchase
                .map(|d| (s, (reference - d).num_days()))
        })
        .collect();
    dated.sort_by(|a, b| b.1.cmp(&a.1));

    let at_risk = dated
        .iter()
        .filter(|(_, days)| *days > INACTIVITY_CUTOFF_DAYS)
        .count();
    let undated = summaries.len() - dated.len();

    let rows: Vec<Vec<String>> = dated
        .iter()
        .take(LISTED_CUSTOMERS)
        .map(|(s, days)| {
            let status = if *days > INACTIVITY_CUTOFF_DAYS {
                "At risk"
            } else {
                "Active"
            };
            vec![
                s.customer_id.clone(),
                format_date(s.last_purchase),
                days.to_string(),
                format_money(s.total_spend),
                status.to_string(),
            ]
        })
        .collect();

    let mut html = format!(
        "<p>{} of {} customers inactive for more than {} days \
         (as of {}).</p>{}",
        at_risk,
        dated.len(),
        INACTIVITY_CUTOFF_DAYS,
        format_date(Some(reference)),
        html_table(
            &["Customer", "Last Purchase", "Days Inactive", "Total Spend", "Status"],
            &rows
        )
    );
    if undated > 0 {
        html.push_str(&format!(
            "<p class=\"note\">{undated} customer(s) have no parseable dates and are not scored.</p>"
        ));
    }

    RenderedPage {
        title: "Churn Prediction".to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_table;

    #[test]
    fn flags_long_inactive_customers() {
        let csv = "CustomerID,InvoiceDate,Quantity,UnitPrice\n\
1001,1/5/2010 8:26,1,5.00\n\
1002,12/1/2010 9:41,1,5.00\n";
        let table = load_table(csv.as_bytes()).unwrap();
        let page = show(&table);
        assert_eq!(page.title, "Churn Prediction");
        assert!(page.html.contains("At risk"));
        assert!(page.html.contains("1 of 2 customers inactive"));
    }

    #[test]
    fn handles_all_null_dates() {
        let csv = "CustomerID,InvoiceDate,Quantity,UnitPrice\n1001,???,1,5.00\n";
        let table = load_table(csv.as_bytes()).unwrap();
        let page = show(&table);
        assert!(page.html.contains("cannot be assessed"));
    }
}
