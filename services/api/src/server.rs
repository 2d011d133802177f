use crate::cli::ServeArgs;
use crate::infra::{sample_offers, AppState, InMemoryComparisonStore, InMemoryOfferSource};
use crate::routes::with_offer_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use offer_eval::config::AppConfig;
use offer_eval::error::AppError;
use offer_eval::telemetry;
use offer_eval::workflows::offers::{OfferEvaluationService, OfferImporter, TemplateNarrator};
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let seed = match args.offers.take() {
        Some(path) => {
            let offers = OfferImporter::from_path(&path)?;
            info!(path = %path.display(), count = offers.len(), "offers imported");
            offers
        }
        None if args.sample_data => sample_offers(),
        None => Vec::new(),
    };

    let service = Arc::new(OfferEvaluationService::new(
        Arc::new(InMemoryOfferSource::with_offers(seed)),
        Arc::new(InMemoryComparisonStore::default()),
        Arc::new(TemplateNarrator),
        config.engine.clone(),
    ));

    let app = with_offer_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "offer evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
