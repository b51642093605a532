use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

/// Counts roster links written or removed, labelled by which side of the class changed.
pub(crate) fn record_roster_change(side: &'static str, action: &'static str, links: usize) {
    metrics::counter!(
        "roster_changes_total",
        "side" => side,
        "action" => action
    )
    .increment(links as u64);
}

pub(crate) fn record_analytics_request(kind: &'static str) {
    metrics::counter!("analytics_requests_total", "kind" => kind).increment(1);
}
