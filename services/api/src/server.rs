use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPipelineStore};
use crate::routes::with_compensation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sales_comp::compensation::CompensationService;
use sales_comp::config::AppConfig;
use sales_comp::error::AppError;
use sales_comp::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let policy = config.compensation.resolve_policy()?;
    let gate = config.compensation.leadership_gate();
    if !gate.is_configured() {
        warn!("COMP_LEADERSHIP_SECRET is not set; the Head panel will deny every request");
    }
    let currency = config.compensation.currency_format();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        policy: Arc::new(policy.clone()),
        currency: currency.clone(),
    };

    let store = Arc::new(InMemoryPipelineStore::default());
    let service = Arc::new(
        CompensationService::new(store, policy.clone(), gate).with_currency(currency),
    );

    let app = with_compensation_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        sdr_policy = policy.sdr.policy.label(),
        head_strategy = policy.head.label(),
        "sales compensation engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
