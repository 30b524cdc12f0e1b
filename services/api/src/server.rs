use crate::cli::ServeArgs;
use crate::infra::{load_criteria, AppState};
use crate::routes::with_credit_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credito::config::AppConfig;
use credito::error::AppError;
use credito::telemetry;
use credito::workflows::lending::applications::{
    CreditEvaluationService, SystemClock, TracingAuditSink,
};
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

    telemetry::init(config.environment, &config.telemetry)?;

    let criteria = load_criteria(&config.scoring)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let evaluation_service = Arc::new(CreditEvaluationService::new(
        Arc::new(TracingAuditSink),
        Arc::new(SystemClock),
        criteria,
    ));

    let app = with_credit_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
