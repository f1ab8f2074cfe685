//! Request pipeline stages.
//!
//! Each stage is an interceptor of the form `(request, next) -> response`.
//! [`apply_pipeline`] composes them in a fixed order:
//! error containment, then request logging, then authentication.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header::AUTHORIZATION},
    middleware::{Next, from_fn, from_fn_with_state},
    response::{IntoResponse, Response},
};
use futures::FutureExt;
use tower::ServiceBuilder;

use users_auth::CallerIdentity;

use crate::app::errors::ApiError;
use crate::config::ApiConfig;
use crate::context::{CallerContext, CallerSlot};

#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<ApiConfig>,
}

/// Wrap `router` in the full request pipeline.
pub fn apply_pipeline(router: Router, config: Arc<ApiConfig>) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(from_fn(error_containment_middleware))
            .layer(from_fn(request_logging_middleware))
            .layer(from_fn_with_state(
                AuthState { config },
                auth_middleware,
            )),
    )
}

/// Outermost stage: turns a panic anywhere downstream into a generic 500.
pub async fn error_containment_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let cause = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::error!(%method, %uri, %cause, "unhandled panic while serving request");
            ApiError::internal(anyhow::anyhow!("panic: {cause}")).into_response()
        }
    }
}

/// Logs one line per request once the inner stages finish, whatever the outcome.
///
/// A panic below this stage is logged as a 500 and then resumed so the
/// containment stage still builds the response.
pub async fn request_logging_middleware(mut req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().path().to_string(), |pq| pq.as_str().to_string());
    let slot = CallerSlot::new();
    req.extensions_mut().insert(slot.clone());
    let started = Instant::now();

    let outcome = AssertUnwindSafe(next.run(req)).catch_unwind().await;

    let status = match &outcome {
        Ok(response) => response.status().as_u16(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
    };
    let caller = CallerIdentity::masked_or_anonymous(slot.get().map(CallerContext::caller));
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    tracing::info!(%method, %path, status, elapsed_ms, %caller, "request completed");

    match outcome {
        Ok(response) => response,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Requires a listed bearer token, except for exempt paths in development mode.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if state.config.is_exempt(req.uri().path()) {
        return next.run(req).await;
    }

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let caller = match state.config.tokens.authenticate(header) {
        Ok(caller) => caller,
        Err(reason) => {
            tracing::debug!(%reason, path = %req.uri().path(), "authentication failed");
            return ApiError::Unauthorized.into_response();
        }
    };

    let context = CallerContext::new(caller);
    if let Some(slot) = req.extensions().get::<CallerSlot>() {
        slot.fill(context.clone());
    }
    req.extensions_mut().insert(context);

    next.run(req).await
}
