use actix_web::{test, web, App};
use crm_dashboard::{server, session::Session};
use serde_json::{json, Value};
use std::sync::RwLock;

const SAMPLE_CSV: &str = "\
CustomerID,InvoiceDate,Quantity,UnitPrice
1001,12/1/2010 8:26,6,2.55
1002,12/1/2010 9:41,2,4.25
1001,12/3/2010 10:03,12,0.85
";

macro_rules! dashboard {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(RwLock::new(Session::new())))
                .configure(server::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn no_data_warning_before_any_upload() {
    let app = dashboard!();
    let req = test::TestRequest::get().uri("/render").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["page"], "Overview");
    assert!(body["banner"].is_null());
    assert!(body["rendered"].is_null());
    assert_eq!(body["warning"], "No data available. Please upload a dataset.");
}

#[actix_web::test]
async fn upload_then_browse_pages() {
    let app = dashboard!();

    let req = test::TestRequest::post()
        .uri("/upload?filename=retail.csv")
        .set_payload(SAMPLE_CSV)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["banner"]["kind"], "success");
    assert_eq!(body["banner"]["text"], "Data loaded successfully!");
    assert_eq!(body["rendered"]["title"], "Overview");
    assert!(body["warning"].is_null());

    // page change hits the memo cache: no banner repetition, churn page only
    let req = test::TestRequest::post()
        .uri("/select")
        .set_json(json!({ "page": "Churn Prediction" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["banner"].is_null());
    assert_eq!(body["rendered"]["title"], "Churn Prediction");
}

#[actix_web::test]
async fn missing_column_upload_is_reported() {
    let app = dashboard!();

    let req = test::TestRequest::post()
        .uri("/upload?filename=broken.csv")
        .set_payload("CustomerID,InvoiceDate,Quantity\n1001,12/1/2010 8:26,6\n")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["banner"]["kind"], "error");
    assert_eq!(
        body["banner"]["text"],
        "Missing required columns: UnitPrice. Please check your dataset."
    );
    assert!(body["rendered"].is_null());
    assert!(body["warning"].is_string());
}

#[actix_web::test]
async fn rejects_non_csv_extension() {
    let app = dashboard!();

    let req = test::TestRequest::post()
        .uri("/upload?filename=data.xlsx")
        .set_payload(SAMPLE_CSV)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);
}

#[actix_web::test]
async fn unknown_page_label_is_a_bad_request() {
    let app = dashboard!();

    let req = test::TestRequest::post()
        .uri("/select")
        .set_json(json!({ "page": "Basket Analysis" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_client_error());
}

#[actix_web::test]
async fn dashboard_shell_lists_all_pages() {
    let app = dashboard!();

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = String::from_utf8(body.to_vec()).unwrap();
    for label in [
        "Overview",
        "RFM Analysis",
        "Churn Prediction",
        "Customer Segmentation",
        "Future Predictions",
    ] {
        assert!(html.contains(label), "shell should offer {label}");
    }
    assert!(html.contains("accept=\".csv\""));
}

#[actix_web::test]
async fn health_endpoint_responds() {
    let app = dashboard!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let res = test::call_service(&app, req).await;
    assert!(res.status().is_success());
}
