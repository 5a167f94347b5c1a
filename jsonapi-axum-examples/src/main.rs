//! Example: articles service
//!
//! Run with: cargo run --bin articles
//! Test with:
//!   curl 'http://localhost:3000/articles?page[size]=2&sort=-id'
//!   curl 'http://localhost:3000/articles?filter[tag]=rust&callback=render'
//!   curl -X POST http://localhost:3000/articles \
//!     -H 'x-user-id: 7' -d '{"title": "Hello"}'
//!
//! Set JSONAPI_DEBUG=1 to expose panic messages in error responses and
//! RUST_LOG=debug to see the parsed requests.

use jsonapi_axum::{ApiConfig, PaginationConfig};
use jsonapi_axum_examples::{AppState, app, server_addr};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let debug_mode = std::env::var("JSONAPI_DEBUG")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let config = ApiConfig::new()
        .debug(debug_mode)
        .pagination(PaginationConfig::new().default_page_size(20).max_page_size(100));

    let router = app(AppState::default(), config).layer(TraceLayer::new_for_http());

    let addr = server_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, debug = debug_mode, "articles service listening");

    axum::serve(listener, router).await?;
    Ok(())
}
