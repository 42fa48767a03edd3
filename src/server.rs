use crate::pages::PageLabel;
use crate::session::{run_cycle, Session, Upload};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::RwLock;
use tracing::debug;

pub type SharedSession = web::Data<RwLock<Session>>;

// Uploaded retail exports can run to hundreds of thousands of rows.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
        .route("/", web::get().to(index))
        .route("/render", web::get().to(render))
        .route("/upload", web::post().to(upload))
        .route("/select", web::post().to(select))
        .route("/health", web::get().to(health));
}

#[derive(Deserialize)]
struct UploadQuery {
    filename: String,
}

#[derive(Deserialize)]
struct SelectRequest {
    page: PageLabel,
}

async fn render(state: SharedSession) -> HttpResponse {
    with_session(&state, |session| run_cycle(session))
}

async fn upload(
    state: SharedSession,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> HttpResponse {
    // The upload control only offers .csv, mirrored here for direct callers.
    if !query.filename.to_ascii_lowercase().ends_with(".csv") {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "banner": { "kind": "error", "text": "Only .csv files are accepted." }
        }));
    }

    debug!(file = %query.filename, bytes = body.len(), "upload received");
    let upload = Upload {
        filename: query.filename.clone(),
        bytes: body.to_vec(),
    };
    with_session(&state, |session| {
        session.set_upload(upload);
        run_cycle(session)
    })
}

async fn select(state: SharedSession, request: web::Json<SelectRequest>) -> HttpResponse {
    with_session(&state, |session| {
        session.select_page(request.page);
        run_cycle(session)
    })
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("CRM Dashboard is running!")
}

fn with_session<F>(state: &SharedSession, f: F) -> HttpResponse
where
    F: FnOnce(&mut Session) -> crate::session::CycleOutput,
{
    match state.write() {
        Ok(mut session) => HttpResponse::Ok().json(f(&mut session)),
        Err(_) => HttpResponse::InternalServerError().body("session lock poisoned"),
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html").body(SHELL_HTML)
}

const SHELL_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>CRM Dashboard</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 0; display: flex; min-height: 100vh; }
        .sidebar { width: 300px; background: #f5f5f5; padding: 20px; border-right: 1px solid #ddd; }
        .main { flex: 1; padding: 25px; }
        .sidebar h3 { margin-top: 0; }
        .sidebar ul { padding-left: 18px; font-size: 14px; }
        .radio-group label { display: block; margin: 6px 0; cursor: pointer; }
        .banner { padding: 12px 16px; border-radius: 5px; margin-bottom: 15px; display: none; }
        .banner.success { background: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
        .banner.error { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
        .banner.warning { background: #fff3cd; color: #856404; border: 1px solid #ffeaa7; }
        .metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; margin-bottom: 20px; }
        .metric { background: #f8f9fa; padding: 15px; border-radius: 8px; border-left: 4px solid #007bff; }
        .metric h4 { margin: 0 0 6px 0; font-size: 13px; color: #555; }
        .metric p { margin: 0; font-size: 20px; }
        .data-table { width: 100%; border-collapse: collapse; margin: 10px 0; }
        .data-table th, .data-table td { padding: 8px 10px; text-align: left; border-bottom: 1px solid #ddd; font-size: 14px; }
        .data-table th { background: #f8f9fa; }
        .note { color: #856404; font-size: 13px; }
    </style>
</head>
<body>
    <div class="sidebar">
        <h3>Upload Your Dataset</h3>
        <p>Required columns:</p>
        <ul>
            <li><code>CustomerID</code></li>
            <li><code>InvoiceDate</code></li>
            <li><code>Quantity</code></li>
            <li><code>UnitPrice</code></li>
        </ul>
        <input type="file" id="file" accept=".csv">

        <h3>CRM Analysis</h3>
        <div class="radio-group" id="pages">
            <label><input type="radio" name="page" value="Overview" checked> Overview</label>
            <label><input type="radio" name="page" value="RFM Analysis"> RFM Analysis</label>
            <label><input type="radio" name="page" value="Churn Prediction"> Churn Prediction</label>
            <label><input type="radio" name="page" value="Customer Segmentation"> Customer Segmentation</label>
            <label><input type="radio" name="page" value="Future Predictions"> Future Predictions</label>
        </div>
    </div>

    <div class="main">
        <div id="banner" class="banner"></div>
        <div id="warning" class="banner warning"></div>
        <h2 id="title"></h2>
        <div id="page"></div>
    </div>

    <script>
        function paint(data) {
            const banner = document.getElementById('banner');
            if (data.banner) {
                banner.className = 'banner ' + data.banner.kind;
                banner.textContent = data.banner.text;
                banner.style.display = 'block';
            } else if (data.banner === null) {
                banner.style.display = 'none';
            }

            const warning = document.getElementById('warning');
            if (data.warning) {
                warning.textContent = data.warning;
                warning.style.display = 'block';
            } else {
                warning.style.display = 'none';
            }

            document.getElementById('title').textContent = data.rendered ? data.rendered.title : '';
            document.getElementById('page').innerHTML = data.rendered ? data.rendered.html : '';
        }

        document.getElementById('file').addEventListener('change', async (event) => {
            const file = event.target.files[0];
            if (!file) return;
            const response = await fetch('/upload?filename=' + encodeURIComponent(file.name), {
                method: 'POST',
                body: file
            });
            paint(await response.json());
        });

        document.getElementById('pages').addEventListener('change', async (event) => {
            const response = await fetch('/select', {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({page: event.target.value})
            });
            paint(await response.json());
        });

        fetch('/render').then(r => r.json()).then(paint);
    </script>
</body>
</html>
"#;
