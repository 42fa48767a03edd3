use actix_web::{web, App, HttpServer};
use anyhow::Context;
use crm_dashboard::{server, session::Session};
use std::sync::RwLock;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let addr = std::env::var("CRM_DASHBOARD_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    // One session per server instance; cycles serialize on the lock.
    let session = web::Data::new(RwLock::new(Session::new()));

    info!(%addr, "starting CRM dashboard");
    HttpServer::new(move || {
        App::new()
            .app_data(session.clone())
            .configure(server::configure)
    })
    .bind(&addr)
    .with_context(|| format!("cannot bind {addr}"))?
    .run()
    .await?;

    Ok(())
}
