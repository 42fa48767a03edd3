use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Columns every uploaded dataset must carry, matched case-sensitively.
pub const REQUIRED_COLUMNS: [&str; 4] = ["CustomerID", "InvoiceDate", "Quantity", "UnitPrice"];

// Timestamp layouts seen in legacy retail exports. Tried in order; a value
// that matches none of them becomes a null date for that row only.
const DATETIME_FORMATS: [&str; 4] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("{0}")]
    Parse(String),
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Parse(err.to_string())
    }
}

/// One sales line from the uploaded file. The four required fields are typed;
/// `cells` keeps the raw row in header order so extra columns pass through
/// untouched.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub customer_id: String,
    pub invoice_date: Option<NaiveDateTime>,
    pub quantity: f64,
    pub unit_price: f64,
    pub revenue: f64,
    cells: Vec<String>,
}

impl Transaction {
    /// Raw cells of the original row, in header order.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// An immutable, schema-checked transaction table. Constructed once per
/// upload by [`load_table`]; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Transaction>,
}

impl Table {
    /// Column names: the original header order with `Revenue` appended.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse an uploaded CSV into a [`Table`].
///
/// Bytes are decoded as ISO-8859-1 so non-UTF-8 legacy exports load cleanly.
/// The header is validated against [`REQUIRED_COLUMNS`] before any row is
/// read; all missing names are reported together. Unparseable dates degrade
/// to null in that row, while a non-numeric Quantity or UnitPrice aborts the
/// whole load.
pub fn load_table(bytes: &[u8]) -> Result<Table, LoadError> {
    let text = decode_latin1(bytes);
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !headers.iter().any(|h| h == *name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::Schema { missing });
    }

    let customer_idx = column_index(&headers, "CustomerID")?;
    let date_idx = column_index(&headers, "InvoiceDate")?;
    let quantity_idx = column_index(&headers, "Quantity")?;
    let price_idx = column_index(&headers, "UnitPrice")?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let customer_id = field(&record, customer_idx, row)?.to_string();
        let invoice_date = parse_invoice_date(field(&record, date_idx, row)?);
        let quantity = numeric_field(&record, quantity_idx, "Quantity", row)?;
        let unit_price = numeric_field(&record, price_idx, "UnitPrice", row)?;

        rows.push(Transaction {
            customer_id,
            invoice_date,
            quantity,
            unit_price,
            revenue: unit_price * quantity,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    let mut columns = headers;
    columns.push("Revenue".to_string());
    Ok(Table { columns, rows })
}

// ISO-8859-1 maps every byte to the code point of the same value, so this
// decode is total.
fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn column_index(headers: &[String], name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| LoadError::Schema {
            missing: vec![name.to_string()],
        })
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize, row: usize) -> Result<&'r str, LoadError> {
    record
        .get(idx)
        .ok_or_else(|| LoadError::Parse(format!("row {row}: missing field {idx}")))
}

fn numeric_field(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    row: usize,
) -> Result<f64, LoadError> {
    let value = field(record, idx, row)?;
    value.trim().parse::<f64>().map_err(|_| {
        LoadError::Parse(format!("row {row}: {name} value '{value}' is not numeric"))
    })
}

fn parse_invoice_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}
