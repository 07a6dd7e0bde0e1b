use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::handlers::{baselines, health};
use crate::middleware::account_middleware;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/patch/v1";

pub fn app(state: AppState) -> Router {
    let mut app = Router::new()
        // Public
        .route("/health", get(health::health))
        // Account-scoped API
        .merge(baseline_routes())
        .with_state(state);

    if config::config().api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    if config::config().security.enable_cors {
        app = app.layer(CorsLayer::permissive());
    }
    app
}

fn baseline_routes() -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/baselines", API_PREFIX),
            get(baselines::list_baselines).put(baselines::create_baseline),
        )
        .route(
            &format!("{}/baselines/:baseline_id/systems", API_PREFIX),
            get(baselines::list_baseline_systems),
        )
        .route_layer(middleware::from_fn(account_middleware))
}
