use chrono::NaiveDate;
use jobtrail::config::AuthConfig;
use jobtrail::tracking::{
    CredentialHasher, InMemoryTrackingStore, SystemClock, TokenIssuer, TrackingServices,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wires the tracking services over a fresh in-memory store using the wall clock.
pub(crate) fn in_memory_services(auth: &AuthConfig) -> TrackingServices<InMemoryTrackingStore> {
    TrackingServices::new(
        Arc::new(InMemoryTrackingStore::new()),
        CredentialHasher::default(),
        TokenIssuer::from_config(auth),
        Arc::new(SystemClock),
    )
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
