use std::sync::Arc;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{auth::require_jwt, config::Config, main_lib::AppState};

mod accounts;
mod ai;
mod auth;
mod bills;
mod budgets;
mod categories;
mod export;
mod goals;
mod insights;
mod recurring;
mod reports;
mod tags;
mod transactions;

pub async fn healthz() -> &'static str {
    "ok"
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_allow.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        layer.allow_origin(origins)
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let protected = Router::new()
        .merge(auth::protected_router())
        .merge(accounts::router())
        .merge(categories::router())
        .merge(tags::router())
        .merge(transactions::router())
        .merge(budgets::router())
        .merge(bills::router())
        .merge(goals::router())
        .merge(recurring::router())
        .merge(insights::router())
        .merge(reports::router())
        .merge(export::router())
        .merge(ai::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(auth::public_router())
        .merge(protected);

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors_layer(config))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
