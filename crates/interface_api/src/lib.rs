//! HTTP API Layer
//!
//! This crate provides the REST API for the reconciliation core using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for records, mappings, and health
//! - **Middleware**: Request tracing and audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, config::ApiConfig};
//! use infra_store::MemoryRecordStore;
//! use std::sync::Arc;
//!
//! let app = create_router(Arc::new(MemoryRecordStore::new()), ApiConfig::default());
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use domain_reconciliation::{MappingHistory, ReconciliationEngine, RecordStorePort};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{health, irm, mapping, shipping_bill};
use crate::middleware::audit_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStorePort>,
    pub engine: ReconciliationEngine,
    pub history: MappingHistory,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `store` - The record store every handler operates against
/// * `config` - API configuration
pub fn create_router(store: Arc<dyn RecordStorePort>, config: ApiConfig) -> Router {
    let state = AppState {
        engine: ReconciliationEngine::new(store.clone()),
        history: MappingHistory::new(store.clone()),
        store,
        config,
    };

    // Public routes
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // IRM routes
    let irm_routes = Router::new()
        .route("/", post(irm::create_irm))
        .route("/", get(irm::list_irms))
        .route("/bulk", post(irm::bulk_import_irms))
        .route("/:id", get(irm::get_irm))
        .route("/:id", put(irm::update_irm));

    // Shipping bill routes
    let sb_routes = Router::new()
        .route("/", post(shipping_bill::create_sb))
        .route("/", get(shipping_bill::list_sbs))
        .route("/bulk", post(shipping_bill::bulk_import_sbs))
        .route("/:id", get(shipping_bill::get_sb))
        .route("/:id", put(shipping_bill::update_sb));

    // Mapping routes
    let mapping_routes = Router::new()
        .route("/", get(mapping::list_mappings))
        .route("/irm-to-sb", post(mapping::allocate_irm_to_sbs))
        .route("/sb-to-irm", post(mapping::allocate_sb_to_irms))
        .route("/by-sb/:sb_no", get(mapping::history_for_shipping_bill))
        .route("/by-irm/:ref_no", get(mapping::history_for_remittance));

    let api_routes = Router::new()
        .nest("/irm", irm_routes)
        .nest("/shipping-bills", sb_routes)
        .nest("/mappings", mapping_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
