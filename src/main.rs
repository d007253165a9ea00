use anyhow::Context;
use nomo::api::{self, app_state::AppState};
use nomo::config::loader::ConfigLoader;
use nomo::notify::LogNotifier;
use nomo::notion::NotionClient;
use nomo::observability::{ObservabilityState, create_observability_router, init_tracing};
use nomo::services::binding::{BindingCache, create_bind_service, create_binding_resolver};
use nomo::services::composer::{ComposerConfig, PageComposer};
use nomo::services::dispatcher::{Dispatcher, DispatcherConfig};
use nomo::storage::StorageFactory;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config)?;

    // guard 需要一直持有到进程退出
    let _log_guard = init_tracing(&config.logging)?;
    info!(
        "Starting {} ({} environment)...",
        config.app_name, config.environment
    );

    let repository = StorageFactory::create(&config.database).await?;
    info!("Binding repository initialized ({:?})", config.database.backend);

    let cache = config
        .dispatch
        .binding_cache_enabled
        .then(|| BindingCache::new(config.dispatch.binding_cache_ttl()));
    let resolver = create_binding_resolver(repository.clone(), cache.clone());
    let bind_service = create_bind_service(repository, cache);
    info!("Binding services initialized");

    let client = NotionClient::new(&config.notion)?;
    let dispatcher = Dispatcher::new(
        resolver,
        PageComposer::new(ComposerConfig::from(&config.notion)),
        Arc::new(client),
        Arc::new(LogNotifier),
        DispatcherConfig::from(&config.dispatch),
    );
    info!("Dispatcher initialized");

    let app_state = AppState::new(Arc::new(dispatcher), bind_service)
        .with_lark_verification_token(&config.lark.verification_token)
        .with_lark_event_ttl(config.lark.event_dedup_ttl());

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
    ));
    let router = create_observability_router(observability_state).merge(api::create_router(app_state));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // 服务提前退出
            result??;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    info!("Shutting down server...");
    let _ = shutdown_tx.send(true);

    let grace = Duration::from_secs(config.server.shutdown_timeout);
    match tokio::time::timeout(grace, server).await {
        Ok(Ok(Ok(()))) => info!("Server exited"),
        Ok(Ok(Err(e))) => error!("Server error during shutdown: {}", e),
        Ok(Err(e)) => error!("Server task failed: {}", e),
        Err(_) => warn!("Server forced to shutdown after {:?}", grace),
    }

    Ok(())
}

/// 等待 Ctrl+C，unix 下还包括 SIGTERM 和 SIGHUP
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
            (Ok(mut term), Ok(mut hup)) => {
                tokio::select! {
                    _ = term.recv() => {}
                    _ = hup.recv() => {}
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
