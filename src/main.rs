use todolist::{
    application::item_service::ItemServiceImpl,
    config::Config,
    http::routing::{self, items},
    infrastructure::csv_store::CsvItemStore,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let store = CsvItemStore::new(&config.csv_path);
    let service = ItemServiceImpl::new(store);
    let router = routing::app(items::router(items::AppState { service }));

    let addr = config.bind_addr;
    tracing::info!(%addr, csv = %config.csv_path.display(), "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
