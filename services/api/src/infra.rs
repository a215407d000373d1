use metrics_exporter_prometheus::PrometheusHandle;
use quiz_engine::catalog::Catalog;
use quiz_engine::config::AppConfig;
use quiz_engine::error::AppError;
use quiz_engine::ScoringService;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the configured catalog and wraps it in a scoring service with the
/// standard narratives.
pub(crate) fn scoring_service(config: &AppConfig) -> Result<ScoringService, AppError> {
    let catalog = Catalog::load(&config.catalog)?;
    Ok(ScoringService::with_standard_summaries(Arc::new(catalog)))
}
