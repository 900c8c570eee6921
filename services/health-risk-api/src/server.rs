use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRecordSubmitter, InMemorySessionRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use health_risk::config::AppConfig;
use health_risk::error::AppError;
use health_risk::telemetry;
use health_risk::workflows::assessment::AssessmentService;
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

    let submitter = Arc::new(InMemoryRecordSubmitter::default());
    let sessions = Arc::new(InMemorySessionRepository::default());
    let assessment_service = Arc::new(AssessmentService::from_config(
        submitter,
        sessions,
        &config.assessment,
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        policy = ?config.assessment.submission_policy,
        %addr,
        "health risk assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
