use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use job_portal::config::AppConfig;
use job_portal::dispatch::Dispatcher;
use job_portal::service::Services;
use job_portal::store::SqlStore;
use job_portal::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::error::ServeError;
use crate::infra::{AppState, LocalMediaStore};
use crate::routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), ServeError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(database) = args.database.take() {
        config.database.path = database;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let store = Arc::new(SqlStore::open(&config.database.path)?);
    let media = Arc::new(LocalMediaStore::new(&config.media));
    let dispatcher = Arc::new(Dispatcher::new(Services::new(store, media)));

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        dispatcher,
    };

    let app = routes::router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, database = %config.database.path.display(), "job portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
