//! API Routes
//!
//! Listing and detail routes for bootcamps, courses, reviews and users,
//! mounted under `/api/v1`.

use axum::{
    extract::{Path, RawQuery, State},
    middleware::from_fn_with_state,
    routing::{delete, get, MethodRouter},
    Extension, Json, Router,
};
use serde_json::Value;
use tracing::info;

use crate::auth::{Principal, Role};
use crate::query::{
    ExpansionDirective, FilterExpr, FilterRequest, FilterSet, QueryDescriptor, ResultEnvelope,
};
use crate::store::collections;

use super::errors::{ApiError, ApiResult};
use super::middleware::{require_auth, require_roles, RequiredRoles};
use super::response::{ListResponse, SingleResponse};
use super::server::AppState;

/// Build the `/api/v1` router.
///
/// Guards wrap individual method handlers, so an unsupported method on a
/// guarded path is still answered with 405.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/bootcamps", get(list_bootcamps))
        .route("/bootcamps/:id", get(get_bootcamp))
        .route("/bootcamps/:id/courses", get(list_bootcamp_courses))
        .route("/courses", get(list_courses))
        .route(
            "/courses/:id",
            get(get_course).merge(restricted(
                delete(delete_course),
                &state,
                [Role::publisher(), Role::admin()],
            )),
        )
        .route("/reviews", get(list_reviews))
        .route("/reviews/:id", get(get_review))
        .route("/users", restricted(get(list_users), &state, [Role::admin()]))
        .route("/users/:id", restricted(get(get_user), &state, [Role::admin()]))
        .route("/auth/me", signed_in(get(current_user), &state))
        .with_state(state)
}

fn signed_in(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(state.clone(), require_auth))
}

/// `require_roles` runs inside `require_auth`
fn restricted<const N: usize>(
    route: MethodRouter<AppState>,
    state: &AppState,
    roles: [Role; N],
) -> MethodRouter<AppState> {
    let route = route.route_layer(from_fn_with_state(RequiredRoles::new(roles), require_roles));
    signed_in(route, state)
}

/// Courses and reviews carry the owning bootcamp's name and description
fn bootcamp_expansion() -> ExpansionDirective {
    ExpansionDirective::new("bootcamp", collections::BOOTCAMPS).select(["name", "description"])
}

fn filter_request(raw: Option<String>) -> ApiResult<FilterRequest> {
    match raw.as_deref() {
        Some(query) if !query.is_empty() => Ok(FilterRequest::parse_query_string(query)?),
        _ => Ok(FilterRequest::new()),
    }
}

async fn list(
    state: &AppState,
    collection: &str,
    expand: Option<ExpansionDirective>,
    raw: Option<String>,
) -> ApiResult<Json<ResultEnvelope>> {
    let request = filter_request(raw)?;
    let envelope = state.results.run(collection, expand, &request).await?;
    Ok(Json(envelope))
}

async fn fetch_one(
    state: &AppState,
    collection: &str,
    label: &str,
    id: &str,
    expand: Option<ExpansionDirective>,
) -> ApiResult<Json<SingleResponse>> {
    let doc = state
        .store
        .find(collection, &QueryDescriptor::by_id(id, expand))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound(format!("No {label} with the id of {id}")))?;
    Ok(Json(SingleResponse::new(doc)))
}

// ==================
// Bootcamps
// ==================

async fn list_bootcamps(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<ResultEnvelope>> {
    list(&state, collections::BOOTCAMPS, None, raw).await
}

async fn get_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SingleResponse>> {
    fetch_one(&state, collections::BOOTCAMPS, "bootcamp", &id, None).await
}

async fn list_bootcamp_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ListResponse>> {
    let query = QueryDescriptor {
        filter: FilterSet::new().and(FilterExpr::eq("bootcamp", Value::String(id))),
        ..Default::default()
    };
    let courses = state.store.find(collections::COURSES, &query).await?;
    Ok(Json(ListResponse::new(courses)))
}

// ==================
// Courses
// ==================

async fn list_courses(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<ResultEnvelope>> {
    list(&state, collections::COURSES, Some(bootcamp_expansion()), raw).await
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SingleResponse>> {
    fetch_one(&state, collections::COURSES, "course", &id, Some(bootcamp_expansion())).await
}

/// Only the course's owner or an admin may delete it
async fn delete_course(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Json<SingleResponse>> {
    let course = state
        .store
        .find_by_id(collections::COURSES, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No course with the id of {id}")))?;

    let owner = course.get("user").and_then(Value::as_str);
    if owner != Some(principal.id.as_str()) && !principal.role.is_admin() {
        return Err(ApiError::Forbidden(format!(
            "User {} is not authorized to delete course {id}",
            principal.id
        )));
    }

    state.store.delete(collections::COURSES, &id).await?;
    info!(course = %id, user = %principal.id, "course deleted");
    Ok(Json(SingleResponse::empty()))
}

// ==================
// Reviews
// ==================

async fn list_reviews(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<ResultEnvelope>> {
    list(&state, collections::REVIEWS, Some(bootcamp_expansion()), raw).await
}

async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SingleResponse>> {
    fetch_one(&state, collections::REVIEWS, "review", &id, Some(bootcamp_expansion())).await
}

// ==================
// Users
// ==================

async fn list_users(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<ResultEnvelope>> {
    list(&state, collections::USERS, None, raw).await
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SingleResponse>> {
    fetch_one(&state, collections::USERS, "user", &id, None).await
}

async fn current_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<SingleResponse>> {
    let user = state
        .store
        .find_by_id(collections::USERS, &principal.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user with the id of {}", principal.id)))?;
    Ok(Json(SingleResponse::new(user)))
}
