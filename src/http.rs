use crate::probe::HostProbe;
use crate::samplers::{
    self, cpu, memory, network, storage, system, temperature, MetricsSnapshot,
};
use axum::extract::State;
use axum::{routing::get, Json, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

#[derive(Clone)]
pub struct HttpAppState {
    pub probe: Arc<dyn HostProbe>,
}

/// API routes plus, when configured, the dashboard asset directory as a
/// fallback. Every JSON endpoint answers 200 with best-effort content;
/// sampling failures surface as null fields, never as 5xx.
pub fn build_router(probe: Arc<dyn HostProbe>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_headers(Any);

    let router = Router::new()
        .route("/api/metrics", get(metrics_handler))
        .route("/api/cpu", get(cpu_handler))
        .route("/api/memory", get(memory_handler))
        .route("/api/storage", get(storage_handler))
        .route("/api/network", get(network_handler))
        .route("/api/temperature", get(temperature_handler))
        .route("/api/system", get(system_handler))
        .layer(cors)
        .with_state(HttpAppState { probe });

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

async fn metrics_handler(State(state): State<HttpAppState>) -> Json<MetricsSnapshot> {
    Json(samplers::collect_metrics(state.probe.as_ref()))
}

async fn cpu_handler(State(state): State<HttpAppState>) -> Json<cpu::CpuSnapshot> {
    Json(cpu::sample(state.probe.as_ref()))
}

async fn memory_handler(State(state): State<HttpAppState>) -> Json<memory::MemorySnapshot> {
    Json(memory::sample(state.probe.as_ref()))
}

async fn storage_handler(
    State(state): State<HttpAppState>,
) -> Json<Option<storage::StorageSnapshot>> {
    Json(storage::sample(state.probe.as_ref()))
}

async fn network_handler(
    State(state): State<HttpAppState>,
) -> Json<Option<network::NetworkSnapshot>> {
    Json(network::sample(state.probe.as_ref()))
}

async fn temperature_handler(
    State(state): State<HttpAppState>,
) -> Json<temperature::TemperatureSnapshot> {
    Json(temperature::sample(state.probe.as_ref()))
}

async fn system_handler(State(state): State<HttpAppState>) -> Json<system::SystemSnapshot> {
    Json(system::sample(state.probe.as_ref()))
}
