use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use ats_fit::analysis::{AnalysisPipeline, FitScorer, MockScorer};
use ats_fit::config::AppConfig;
use ats_fit::connectors::ConnectorRunner;
use ats_fit::gateway::GatewayClient;
use ats_fit::propagation::{
    status_updater, AtsStatusClient, PropagationQueue, PropagationWorkers, StatusUpdater,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Collaborators shared by the request handlers.
pub(crate) struct ServiceContext {
    pub(crate) pipeline: AnalysisPipeline,
    /// Baseline-only scorer shared with the pipeline; backs `POST /process`.
    pub(crate) baseline_scorer: Arc<dyn FitScorer>,
    /// Scorer with candidate and offer bonuses for the gateway listings.
    pub(crate) gateway_scorer: Arc<dyn FitScorer>,
    pub(crate) gateway: GatewayClient,
    pub(crate) connectors: ConnectorRunner,
    /// Direct ATS transport behind the update-status endpoint.
    pub(crate) status_client: Arc<dyn StatusUpdater>,
}

/// Wire every collaborator from the resolved configuration. Must run inside the runtime
/// because the propagation workers are spawned here.
pub(crate) fn build_context(config: &AppConfig) -> (ServiceContext, PropagationWorkers) {
    let baseline_scorer: Arc<dyn FitScorer> = Arc::new(MockScorer::new().without_signals());
    let updater = status_updater(&config.ats, &config.propagation);
    let (queue, workers) = PropagationQueue::spawn(updater, &config.propagation);

    let context = ServiceContext {
        pipeline: AnalysisPipeline::new(baseline_scorer.clone(), Arc::new(queue)),
        baseline_scorer,
        gateway_scorer: Arc::new(MockScorer::new()),
        gateway: GatewayClient::new(config.gateway.clone()),
        connectors: ConnectorRunner::new(config.connectors.clone()),
        status_client: Arc::new(AtsStatusClient::new(&config.ats)),
    };

    (context, workers)
}
