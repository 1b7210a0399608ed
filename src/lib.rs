//! MediPOS Pricing API Library
//!
//! Batch-level inventory valuation, discount resolution, and price-override
//! workflows for a multi-tenant medical center POS.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::{extract::State, response::Json, routing::get, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

// Common response wrapper
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Liveness probe: process is up and the database answers a trivial query.
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let db_ok = state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    Json(ApiResponse::ok(HealthStatus {
        status: "ok",
        database: if db_ok { "up" } else { "down" },
    }))
}

/// Versioned API surface consumed by the POS terminals and admin UI.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/inventory", handlers::inventory::inventory_router())
        .nest("/discounts", handlers::discounts::discounts_router())
        .nest("/pricing", handlers::pricing::pricing_router())
        .nest("/reports", handlers::reports::reports_router())
}

/// Full application router minus the state.
pub fn app_router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "medipos-api up" }))
        .route("/health", get(health_check))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
}
