use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Extension, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use users_core::UserId;
use users_directory::{CreateUserRequest, ListQuery, Page, UpdateUserRequest, User};

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<User>>, ApiError> {
    let Query(query) = query
        .map_err(|e| ApiError::BadRequest(format!("Invalid query string: {}", e.body_text())))?;
    Ok(Json(services.list(&query)?))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(services.get(parse_id(&id)?)?))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    caller: Option<Extension<CallerContext>>,
    body: Result<Json<Option<CreateUserRequest>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(bad_body)?;
    let user = services.create(request)?;

    if let Some(Extension(caller)) = caller {
        tracing::info!(user_id = %user.id, caller = %caller.masked(), "create audited");
    }

    let location = format!("/users/{}", user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<Option<UpdateUserRequest>>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            // unknown ids win over malformed bodies
            services.get(id)?;
            return Err(bad_body(rejection));
        }
    };
    Ok(Json(services.update(id, request)?))
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    services.delete(parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Identifiers are opaque to callers, so an unparseable one is simply unknown.
fn parse_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>().map_err(ApiError::from)
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}
