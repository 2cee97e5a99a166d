use crate::cli::ServeArgs;
use crate::infra::{build_context, AppState};
use crate::routes::with_service_routes;
use ats_fit::config::AppConfig;
use ats_fit::error::AppError;
use ats_fit::telemetry;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (context, _workers) = build_context(&config);
    if config.ats.access_token.is_none() {
        info!("ACCESS_TOKEN not set, status updates will be logged as failures");
    }

    let app = with_service_routes(Arc::new(context))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        status_workers = config.propagation.workers,
        status_max_attempts = config.propagation.max_attempts,
        "ats-fit ready and listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
