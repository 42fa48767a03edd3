use super::{format_money, html_table, RenderedPage};
use crate::data::Table;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Revenue by calendar month, oldest first. History only; rows without a
/// parseable date are excluded and counted separately.
pub fn show(table: &Table) -> RenderedPage {
    let mut months: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    let mut undated = 0usize;
    for row in table.rows() {
        match row.invoice_date {
            Some(d) => {
                let entry = months.entry((d.year(), d.month())).or_insert((0.0, 0));
                entry.0 += row.revenue;
                entry.1 += 1;
            }
            None => undated += 1,
        }
    }

    if months.is_empty() {
        return RenderedPage {
            title: "Future Predictions".to_string(),
            html: "<p>No parseable invoice dates; monthly revenue history is \
                   unavailable.</p>"
                .to_string(),
        };
    }

    let rows: Vec<Vec<String>> = months
        .iter()
        .map(|(&(year, month), &(revenue, count))| {
            vec![
                format!("{year}-{month:02}"),
                count.to_string(),
                format_money(revenue),
            ]
        })
        .collect();

    let mut html = format!(
        "<p>Monthly revenue over {} month(s):</p>{}",
        rows.len(),
        html_table(&["Month", "Transactions", "Revenue"], &rows)
    );
    if undated > 0 {
        html.push_str(&format!(
            "<p class=\"note\">{undated} row(s) without a parseable date were excluded.</p>"
        ));
    }

    RenderedPage {
        title: "Future Predictions".to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_table;

    #[test]
    fn groups_revenue_by_month_in_order() {
        let csv = "CustomerID,InvoiceDate,Quantity,UnitPrice\n\
1001,1/15/2011 8:26,1,4.00\n\
1002,12/1/2010 9:41,2,3.00\n";
        let table = load_table(csv.as_bytes()).unwrap();
        let page = show(&table);
        let dec = page.html.find("2010-12").unwrap();
        let jan = page.html.find("2011-01").unwrap();
        assert!(dec < jan, "months should be chronological");
        assert!(page.html.contains("6.00"));
    }

    #[test]
    fn counts_undated_rows() {
        let csv = "CustomerID,InvoiceDate,Quantity,UnitPrice\n\
1001,12/1/2010 8:26,1,4.00\n\
1002,bad,1,3.00\n";
        let table = load_table(csv.as_bytes()).unwrap();
        let page = show(&table);
        assert!(page.html.contains("1 row(s) without a parseable date"));
    }
}
