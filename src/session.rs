use crate::data::{load_table, LoadError, Table};
use crate::pages::{self, PageLabel, RenderedPage};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, warn};

const NO_DATA_WARNING: &str = "No data available. Please upload a dataset.";

/// A file handed over by the upload control.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

// Memoized load outcome, keyed by content hash. Failures are cached too, so
// byte-identical bad input is not re-parsed either.
struct CacheEntry {
    hash: [u8; 32],
    outcome: Result<Arc<Table>, LoadError>,
}

/// All state that survives between interaction cycles: the current upload,
/// the selected page and the memoized parse result.
#[derive(Default)]
pub struct Session {
    upload: Option<Upload>,
    page: PageLabel,
    cache: Option<CacheEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// fileChanged event: replace the current upload. The stale cache entry
    /// is detected by hash on the next cycle.
    pub fn set_upload(&mut self, upload: Upload) {
        self.upload = Some(upload);
    }

    /// pageChanged event.
    pub fn select_page(&mut self, page: PageLabel) {
        self.page = page;
    }

    pub fn page(&self) -> PageLabel {
        self.page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Success,
    Error,
}

/// One user-visible status message. The loader emits exactly one per fresh
/// parse and none on a cache hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

impl Banner {
    fn success(text: impl Into<String>) -> Self {
        Banner {
            kind: BannerKind::Success,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Banner {
            kind: BannerKind::Error,
            text: text.into(),
        }
    }
}

/// Everything one interaction cycle produces for the client.
#[derive(Debug, Serialize)]
pub struct CycleOutput {
    pub page: String,
    pub banner: Option<Banner>,
    pub warning: Option<String>,
    pub rendered: Option<RenderedPage>,
}

/// Run the orchestration pipeline once: load the current upload (through the
/// memo cache), then route the selected page if a non-empty table resulted,
/// otherwise warn that no data is available.
pub fn run_cycle(session: &mut Session) -> CycleOutput {
    let (table, banner) = load_current(session);

    let (warning, rendered) = match table {
        Some(table) if !table.is_empty() => {
            (None, Some(pages::route(session.page, &table)))
        }
        _ => (Some(NO_DATA_WARNING.to_string()), None),
    };

    CycleOutput {
        page: session.page.label().to_string(),
        banner,
        warning,
        rendered,
    }
}

fn load_current(session: &mut Session) -> (Option<Arc<Table>>, Option<Banner>) {
    let upload = match &session.upload {
        Some(upload) => upload,
        None => return (None, None),
    };

    let hash: [u8; 32] = Sha256::digest(&upload.bytes).into();
    if let Some(entry) = &session.cache {
        if entry.hash == hash {
            return (entry.outcome.as_ref().ok().cloned(), None);
        }
    }

    let outcome = load_table(&upload.bytes).map(Arc::new);
    let banner = match &outcome {
        Ok(table) => {
            info!(file = %upload.filename, rows = table.len(), "data loaded");
            Banner::success("Data loaded successfully!")
        }
        Err(err @ LoadError::Schema { .. }) => {
            warn!(file = %upload.filename, %err, "schema validation failed");
            Banner::error(format!("{err}. Please check your dataset."))
        }
        Err(err) => {
            warn!(file = %upload.filename, %err, "load failed");
            Banner::error(format!("Error loading file: {err}"))
        }
    };

    let table = outcome.as_ref().ok().cloned();
    session.cache = Some(CacheEntry { hash, outcome });
    (table, Some(banner))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &[u8] = b"CustomerID,InvoiceDate,Quantity,UnitPrice\n\
1001,12/1/2010 8:26,6,2.55\n\
1002,12/1/2010 9:41,2,4.25\n";

    fn upload(name: &str, bytes: &[u8]) -> Upload {
        Upload {
            filename: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn absent_upload_emits_no_banner() {
        let mut session = Session::new();
        let out = run_cycle(&mut session);
        assert_eq!(out.page, "Overview");
        assert!(out.banner.is_none());
        assert!(out.rendered.is_none());
        assert_eq!(out.warning.as_deref(), Some(NO_DATA_WARNING));
    }

    #[test]
    fn fresh_load_emits_one_success_banner_and_routes() {
        let mut session = Session::new();
        session.set_upload(upload("retail.csv", VALID));
        let out = run_cycle(&mut session);
        let banner = out.banner.expect("fresh parse must emit a banner");
        assert_eq!(banner.kind, BannerKind::Success);
        assert!(out.warning.is_none());
        assert_eq!(out.rendered.unwrap().title, "Overview");
    }

    #[test]
    fn identical_content_is_not_reparsed() {
        let mut session = Session::new();
        session.set_upload(upload("retail.csv", VALID));
        assert!(run_cycle(&mut session).banner.is_some());

        // page change re-runs the pipeline against the same bytes
        session.select_page(PageLabel::ChurnPrediction);
        let out = run_cycle(&mut session);
        assert!(out.banner.is_none(), "cache hit must not repeat the banner");
        assert_eq!(out.rendered.unwrap().title, "Churn Prediction");
    }

    #[test]
    fn new_upload_invalidates_the_cache() {
        let mut session = Session::new();
        session.set_upload(upload("a.csv", VALID));
        assert!(run_cycle(&mut session).banner.is_some());

        let other = b"CustomerID,InvoiceDate,Quantity,UnitPrice\n2001,12/5/2010 11:00,1,9.99\n";
        session.set_upload(upload("b.csv", other));
        let out = run_cycle(&mut session);
        assert!(out.banner.is_some(), "new content must be parsed again");
    }

    #[test]
    fn missing_columns_banner_names_them() {
        let mut session = Session::new();
        session.set_upload(upload("broken.csv", b"CustomerID,InvoiceDate,Quantity\n1001,x,1\n"));
        let out = run_cycle(&mut session);
        let banner = out.banner.unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(
            banner.text,
            "Missing required columns: UnitPrice. Please check your dataset."
        );
        assert!(out.rendered.is_none());
        assert!(out.warning.is_some());
    }

    #[test]
    fn failed_load_is_memoized_too() {
        let mut session = Session::new();
        session.set_upload(upload("broken.csv", b"CustomerID\n1001\n"));
        assert!(run_cycle(&mut session).banner.is_some());
        let out = run_cycle(&mut session);
        assert!(out.banner.is_none());
        assert_eq!(out.warning.as_deref(), Some(NO_DATA_WARNING));
    }

    #[test]
    fn empty_table_loads_but_warns() {
        let mut session = Session::new();
        session.set_upload(upload("empty.csv", b"CustomerID,InvoiceDate,Quantity,UnitPrice\n"));
        let out = run_cycle(&mut session);
        assert_eq!(out.banner.unwrap().kind, BannerKind::Success);
        assert!(out.rendered.is_none());
        assert_eq!(out.warning.as_deref(), Some(NO_DATA_WARNING));
    }
}
