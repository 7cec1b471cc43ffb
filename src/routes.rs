//! Route table: generic resource endpoints, service endpoints, and the
//! permission gate.

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{Config, Permission, GLOBAL_SCOPE};
use crate::handlers;
use crate::response;
use crate::state::AppState;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// The full application: service routes, resource routes, and the outer
/// layers. Tests drive this router directly.
///
/// The allow-origin header is stamped onto every response by a plain
/// header layer, not a CORS layer: a CORS layer answers OPTIONS itself,
/// and OPTIONS belongs to the dispatch table here.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(resource_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
}

/// `/{resource}` and `/{resource}/{id}`. Verbs outside the table answer
/// 400 rather than a bare 405, and unmatched paths answer 404, both in the
/// envelope. The permission gate wraps all of it, fallbacks included.
pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/:resource",
            get(handlers::list)
                .put(handlers::create)
                .options(handlers::preflight)
                .fallback(handlers::unsupported),
        )
        .route(
            "/:resource/:id",
            get(handlers::read_one)
                .post(handlers::update)
                .delete(handlers::delete)
                .options(handlers::preflight)
                .fallback(handlers::unsupported),
        )
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_permission,
        ))
        .with_state(state)
}

async fn require_permission(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !verb_allowed(&state.config, request.method()) {
        return response::message(StatusCode::UNAUTHORIZED, "Permission denied");
    }
    next.run(request).await
}

/// A verb is allowed when its table grants the global scope. Verbs with no
/// table (OPTIONS and anything exotic) pass through to dispatch.
fn verb_allowed(config: &Config, method: &Method) -> bool {
    let table = match *method {
        Method::GET => &config.get_permissions,
        Method::PUT => &config.put_permissions,
        Method::POST => &config.post_permissions,
        Method::DELETE => &config.delete_permissions,
        _ => return true,
    };
    table.get(GLOBAL_SCOPE) == Some(&Permission::Allow)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Service routes, outside the permission gate: GET /health, GET /version.
pub fn common_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn verbs_follow_their_own_tables() {
        let config = Config {
            get_permissions: HashMap::from([(GLOBAL_SCOPE.to_string(), Permission::Allow)]),
            put_permissions: HashMap::from([(GLOBAL_SCOPE.to_string(), Permission::Deny)]),
            post_permissions: HashMap::new(),
            delete_permissions: HashMap::from([("other".to_string(), Permission::Allow)]),
            ..Config::default()
        };
        assert!(verb_allowed(&config, &Method::GET));
        assert!(!verb_allowed(&config, &Method::PUT));
        // Absent global scope denies, whatever else the table holds.
        assert!(!verb_allowed(&config, &Method::POST));
        assert!(!verb_allowed(&config, &Method::DELETE));
    }

    #[test]
    fn ungated_verbs_pass_through() {
        let config = Config {
            get_permissions: HashMap::new(),
            ..Config::default()
        };
        assert!(verb_allowed(&config, &Method::OPTIONS));
        assert!(verb_allowed(&config, &Method::PATCH));
    }
}
