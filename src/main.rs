use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use mirador::catalog::{LocationStore, MemoryCatalog, ProductStore, RemoteCatalog};
use mirador::core::config::{load_config, MiradorConfig};
use mirador::http::build_router;
use mirador::AppState;

fn parse_port_from_args() -> Option<u16> {
    let mut args = std::env::args().peekable();
    while let Some(a) = args.next() {
        if a == "--port" {
            if let Some(v) = args.next() {
                if let Ok(p) = v.parse::<u16>() {
                    return Some(p);
                }
            }
        } else if let Some(rest) = a.strip_prefix("--port=") {
            if let Ok(p) = rest.parse::<u16>() {
                return Some(p);
            }
        }
    }
    None
}

fn build_stores(
    config: &MiradorConfig,
) -> anyhow::Result<(Arc<dyn LocationStore>, Arc<dyn ProductStore>)> {
    if let Some(base_url) = config.resolve_upstream_base_url() {
        let timeout = Duration::from_millis(config.resolve_upstream_timeout_ms());
        info!("Catalog backend: upstream {} (timeout {:?})", base_url, timeout);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        let remote = Arc::new(RemoteCatalog::new(client, base_url, timeout));
        let locations: Arc<dyn LocationStore> = remote.clone();
        let products: Arc<dyn ProductStore> = remote;
        return Ok((locations, products));
    }

    let seed_path = config.resolve_seed_path();
    let memory = match MemoryCatalog::load(&seed_path) {
        Ok(catalog) => {
            info!(
                "Catalog backend: seed file {} ({} places, {} products)",
                seed_path,
                catalog.location_count(),
                catalog.product_count()
            );
            catalog
        }
        Err(e) => {
            warn!("Failed to load seed file {}: {}. Starting with an empty catalog.", seed_path, e);
            MemoryCatalog::empty()
        }
    };
    let memory = Arc::new(memory);
    let locations: Arc<dyn LocationStore> = memory.clone();
    let products: Arc<dyn ProductStore> = memory;
    Ok((locations, products))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    info!("Starting mirador");

    let config = load_config();
    let (locations, products) = build_stores(&config)?;

    let state = Arc::new(AppState::new(locations, products).with_cache(
        Duration::from_secs(config.resolve_cache_ttl_secs()),
        config.resolve_cache_capacity(),
    ));

    let app = build_router(state);

    let port = parse_port_from_args().unwrap_or_else(|| config.resolve_port());
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Address already in use: {}. Stop the existing process or run with --port {} (or set PORT/MIRADOR_PORT).",
                bind_addr,
                port.saturating_add(1)
            )
        }
        Err(e) => return Err(e.into()),
    };
    info!("mirador listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).ok();
        let mut sigint = signal(SignalKind::interrupt()).ok();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                if let Some(ref mut s) = sigterm {
                    s.recv().await;
                } else {
                    futures::future::pending::<()>().await;
                }
            } => {},
            _ = async {
                if let Some(ref mut s) = sigint {
                    s.recv().await;
                } else {
                    futures::future::pending::<()>().await;
                }
            } => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
}
