//! HTTP API server with observability for the ticketing service.
//!
//! Provides REST endpoints for buying tickets, fetching ticket codes and
//! administering purchases, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use artifact_store::ArtifactStore;
use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use ticketing::{AdminSecret, AdminService, PurchaseOrchestrator, TicketLookup};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<O, A>(state: Arc<AppState<O, A>>, metrics_handle: PrometheusHandle) -> Router
where
    O: OrderStore + 'static,
    A: ArtifactStore + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/purchases", post(routes::purchases::create::<O, A>))
        .route(
            "/purchases/{order_number}/ticket",
            get(routes::purchases::ticket::<O, A>),
        )
        .route("/codes", post(routes::codes::generate::<O, A>))
        .route("/admin/purchases", get(routes::admin::list::<O, A>))
        .route(
            "/admin/purchases/{order_number}",
            get(routes::admin::get::<O, A>).delete(routes::admin::cancel::<O, A>),
        )
        .route("/admin/tickets/verify", post(routes::admin::verify::<O, A>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the ticketing services over the given stores.
pub fn create_default_state<O, A>(orders: O, artifacts: A, config: &Config) -> Arc<AppState<O, A>>
where
    O: OrderStore + Clone,
    A: ArtifactStore + Clone,
{
    let generator = config.code_generator();

    if config.admin_secret.is_empty() {
        tracing::warn!("ADMIN_SECRET is not set, admin routes are disabled");
    }

    Arc::new(AppState {
        orchestrator: PurchaseOrchestrator::new(orders.clone(), artifacts.clone(), generator)
            .with_config(config.orchestrator()),
        lookup: TicketLookup::new(orders.clone(), artifacts.clone()),
        admin: AdminService::new(
            orders,
            artifacts,
            AdminSecret::new(config.admin_secret.clone()),
        ),
        generator,
    })
}
