//! Activity CRUD and listing endpoints.
//!
//! ```text
//! GET    /api/v1/activities
//! GET    /api/v1/activities/{id}
//! POST   /api/v1/activities
//! PUT    /api/v1/activities/{id}
//! DELETE /api/v1/activities/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::{ActivityDraft, ActivityQuery, ActivityUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::activities_dto::{
    ActivityBody, ActivityListResponse, CreateActivityRequestBody, ListActivitiesParams,
    UpdateActivityRequestBody,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_activity_id;

/// List activities with filtering, sorting, and pagination.
///
/// The window read and the matching count are resolved concurrently; the
/// response carries the window, its pagination metadata, and an echo of the
/// effective filters.
#[utoipa::path(
    get,
    path = "/api/v1/activities",
    params(ListActivitiesParams),
    responses(
        (status = 200, description = "One page of matching activities", body = ActivityListResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "listActivities"
)]
#[get("/activities")]
pub async fn list_activities(
    state: web::Data<HttpState>,
    params: web::Query<ListActivitiesParams>,
) -> ApiResult<HttpResponse> {
    let query = ActivityQuery::try_from(params.into_inner())?;
    let listing = state.activities.list(query).await?;
    Ok(HttpResponse::Ok().json(ActivityListResponse::from(listing)))
}

/// Fetch one activity by id.
#[utoipa::path(
    get,
    path = "/api/v1/activities/{id}",
    params(("id" = String, Path, description = "Activity identifier")),
    responses(
        (status = 200, description = "The requested activity", body = ActivityBody),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown activity", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "getActivity"
)]
#[get("/activities/{id}")]
pub async fn get_activity(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_activity_id(path.as_str())?;
    let activity = state.activities.get(id).await?;
    Ok(HttpResponse::Ok().json(ActivityBody::from(activity)))
}

/// Create a new activity.
#[utoipa::path(
    post,
    path = "/api/v1/activities",
    request_body = CreateActivityRequestBody,
    responses(
        (status = 201, description = "Activity created", body = ActivityBody),
        (status = 400, description = "Validation failure", body = ErrorSchema),
        (status = 409, description = "Duplicate key", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "createActivity"
)]
#[post("/activities")]
pub async fn create_activity(
    state: web::Data<HttpState>,
    payload: web::Json<CreateActivityRequestBody>,
) -> ApiResult<HttpResponse> {
    let draft = ActivityDraft::try_from(payload.into_inner())?;
    let activity = state.activities.create(draft).await?;
    Ok(HttpResponse::Created().json(ActivityBody::from(activity)))
}

/// Partially update an activity.
///
/// Only supplied fields are validated and applied; the record's `updatedAt`
/// stamp is refreshed either way.
#[utoipa::path(
    put,
    path = "/api/v1/activities/{id}",
    params(("id" = String, Path, description = "Activity identifier")),
    request_body = UpdateActivityRequestBody,
    responses(
        (status = 200, description = "Activity updated", body = ActivityBody),
        (status = 400, description = "Validation failure", body = ErrorSchema),
        (status = 404, description = "Unknown activity", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "updateActivity"
)]
#[put("/activities/{id}")]
pub async fn update_activity(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateActivityRequestBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_activity_id(path.as_str())?;
    let update = ActivityUpdate::try_from(payload.into_inner())?;
    let activity = state.activities.update(id, update).await?;
    Ok(HttpResponse::Ok().json(ActivityBody::from(activity)))
}

/// Delete an activity, cleaning up its hosted media best-effort.
///
/// Media deletion failures are logged and discarded; they never fail the
/// request.
#[utoipa::path(
    delete,
    path = "/api/v1/activities/{id}",
    params(("id" = String, Path, description = "Activity identifier")),
    responses(
        (status = 204, description = "Activity deleted"),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown activity", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["activities"],
    operation_id = "deleteActivity"
)]
#[delete("/activities/{id}")]
pub async fn delete_activity(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_activity_id(path.as_str())?;
    state.activities.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
