mod bench;
mod config;
mod metrics;
mod models;
mod params;
mod rpc;

use axum::{
    response::Redirect,
    routing::{get, get_service},
    Router,
};
use chrono::Utc;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;

use crate::config::load_config;
use crate::metrics::{get_benchmark, get_groups};
use crate::models::EndpointGroup;
use crate::rpc::{HttpTransport, RpcClient};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// CLI arguments
#[derive(Parser)]
#[command(name = "RPC Benchmark", about = "JSON-RPC endpoint latency benchmark")]
struct Cli {
    /// IP address to bind the server to
    #[arg(long)]
    listen_ip: Option<String>,

    /// Port to bind the server to
    #[arg(long)]
    port: Option<u16>,
}

/// Shared by the API handlers: the configured groups and the one HTTP
/// client every benchmark pass goes through.
pub struct AppState {
    pub groups: Vec<EndpointGroup>,
    pub client: RpcClient<HttpTransport>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let mut config = load_config()?;

    if let Some(ip) = args.listen_ip {
        config.server.listen_ip = Some(ip);
    }
    if let Some(port) = args.port {
        config.server.port = Some(port);
    }

    std::fs::create_dir_all("static")?;
    std::fs::write("static/index.html", include_str!("static/index.html"))?;
    std::fs::write("static/grid.js", include_str!("static/grid.js"))?;
    std::fs::write("static/styles.css", include_str!("static/styles.css"))?;

    let timeout = Duration::from_secs(
        config
            .benchmark
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
    );
    let state = Arc::new(AppState {
        groups: config.benchmark.groups,
        client: RpcClient::new(HttpTransport::new(timeout)?),
    });

    let app = Router::new()
        .route("/", get(|| async { Redirect::to("/static/index.html") }))
        .route("/api/groups", get(get_groups))
        .route("/api/benchmark", get(get_benchmark))
        .nest_service("/static", get_service(ServeDir::new("static")))
        .with_state(state);

    let ip = config
        .server
        .listen_ip
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = config.server.port.unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", ip, port).parse()?;

    println!(
        "[{}] Server running on http://{}",
        Utc::now().to_rfc3339(),
        addr
    );
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
